use super::{LoginPage, LOCATIONS_PATH, LOGIN_PATH};
use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::AppContext;
use icons::{LogOut, MapPin};
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

#[component]
pub fn AppLayout(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());
    let location = use_location();

    let user_label = move || {
        app_state
            .0
            .session
            .with(|s| s.as_ref().and_then(|s| s.user.as_ref()).map(|u| u.display_name()))
            .unwrap_or_else(|| "Admin".to_string())
    };

    let on_logout = move |_| {
        app_state.0.sign_out();
        navigate.with_value(|nav| nav(LOGIN_PATH, Default::default()));
    };

    let pathname = location.pathname;
    let on_locations = Signal::derive(move || pathname.with(|p| is_location_path(p)));

    view! {
        <div class="flex min-h-screen bg-background text-foreground">
            <aside class="flex w-56 shrink-0 flex-col border-r border-border bg-muted/30 px-3 py-4">
                <div class="mb-6 px-2 text-sm font-semibold">"KTP Admin"</div>

                <nav class="flex flex-col gap-1">
                    <NavLink href=LOCATIONS_PATH active=on_locations>
                        <MapPin />
                        <span class="truncate">"Location"</span>
                    </NavLink>
                </nav>

                <div class="mt-auto flex flex-col gap-2 border-t border-border pt-3">
                    <div class="truncate px-2 text-xs text-muted-foreground">{user_label}</div>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Sm
                        class="w-full justify-start"
                        on:click=on_logout
                    >
                        <LogOut />
                        "Logout"
                    </Button>
                </div>
            </aside>

            <main class="min-w-0 flex-1 px-6 py-6">{children()}</main>
        </div>
    }
}

/// Every signed-in route is part of the location section; `/` renders the list.
fn is_location_path(path: &str) -> bool {
    path == "/" || path.starts_with(LOCATIONS_PATH) || path.starts_with("/pages/location")
}

#[component]
fn NavLink(href: &'static str, #[prop(into)] active: Signal<bool>, children: ChildrenFn) -> impl IntoView {
    let children = StoredValue::new(children);

    move || {
        let variant = if active.get() {
            ButtonVariant::Accent
        } else {
            ButtonVariant::Ghost
        };
        view! {
            <Button
                variant=variant
                size=ButtonSize::Sm
                class="w-full justify-start"
                attr:aria-current=active.get().then_some("page")
                href=href
            >
                {children.with_value(|c| c())}
            </Button>
        }
    }
}

/// Protected route wrapper: without a session the login page is shown in place.
#[component]
pub fn RootAuthed(children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let is_authenticated = move || app_state.0.is_authenticated();

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    view! {
        <Show when=is_authenticated fallback=move || view! { <LoginPage /> }>
            <AppLayout>
                {move || children.with_value(|c| c())}
            </AppLayout>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::{edit_location_path, CREATE_LOCATION_PATH};

    #[test]
    fn location_nav_covers_every_list_and_form_route() {
        let edit = edit_location_path("a1");
        for path in ["/", LOCATIONS_PATH, CREATE_LOCATION_PATH, edit.as_str()] {
            assert!(is_location_path(path), "{path}");
        }
        assert!(!is_location_path(LOGIN_PATH));
    }
}
