use crate::pages::{LocationCreatePage, LocationEditPage, LocationsPage, LoginPage, RootAuthed};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    provide_context(AppContext(AppState::new()));

    view! {
        <Router>
            <Routes fallback=|| view! { <div class="px-4 py-8 text-xs text-muted-foreground">"Not found"</div> }>
                <Route path=path!("authentication/login") view=LoginPage />
                <Route path=path!("") view=move || view! {
                    <RootAuthed>
                        <LocationsPage />
                    </RootAuthed>
                } />
                <Route path=path!("location") view=move || view! {
                    <RootAuthed>
                        <LocationsPage />
                    </RootAuthed>
                } />
                <Route path=path!("pages/location/create") view=move || view! {
                    <RootAuthed>
                        <LocationCreatePage />
                    </RootAuthed>
                } />
                <Route path=path!("pages/location/edit/:id") view=move || view! {
                    <RootAuthed>
                        <LocationEditPage />
                    </RootAuthed>
                } />
            </Routes>
        </Router>
    }
}
