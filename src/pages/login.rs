use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    ErrorAlert, Input, Label, Spinner,
};
use crate::state::login::LoginForm;
use crate::state::AppContext;
use icons::{Eye, EyeOff};
use leptos::logging::warn;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

#[component]
pub fn LoginPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let form: RwSignal<LoginForm> = RwSignal::new(LoginForm::default());
    let navigate = StoredValue::new(use_navigate());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(request) = form.try_update(|f| f.begin_submit()).flatten() else {
            return;
        };
        let api_client = app_state.0.api_client.get_untracked();
        let store = app_state.0.session_store;

        spawn_local(async move {
            let result = api_client.login(&request.email, &request.password).await;
            if let Err(e) = &result {
                warn!("login rejected for {}: {e}", request.email);
            }

            if let Some(session) = form.try_update(|f| f.finish_submit(result, &store)).flatten() {
                app_state.0.sign_in(session);
                navigate.with_value(|nav| nav("/", Default::default()));
            }
        });
    };

    let loading = move || form.with(|f| f.loading);

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <span class="text-sm font-medium text-foreground">"KTP Admin"</span>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Sign in"</CardTitle>
                        <CardDescription class="text-xs">"Use your admin email and password."</CardDescription>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-3" on:submit=on_submit>
                            <div class="flex flex-col gap-1.5">
                                <Label html_for="email" class="text-xs">"Email"</Label>
                                <Input
                                    id="email"
                                    r#type="email"
                                    autocomplete="username"
                                    placeholder="admin@example.com"
                                    required=true
                                    class="h-8 text-sm"
                                    value=Signal::derive(move || form.with(|f| f.email.clone()))
                                    on_input=Callback::new(move |v: String| form.update(|f| f.email = v))
                                />
                            </div>

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="password" class="text-xs">"Password"</Label>
                                <div class="relative">
                                    <Input
                                        id="password"
                                        r#type=Signal::derive(move || form.with(|f| f.password_input_type()))
                                        autocomplete="current-password"
                                        placeholder="••••••••"
                                        required=true
                                        class="h-8 pr-9 text-sm"
                                        value=Signal::derive(move || form.with(|f| f.password.clone()))
                                        on_input=Callback::new(move |v: String| form.update(|f| f.password = v))
                                    />
                                    <Button
                                        variant=ButtonVariant::Ghost
                                        size=ButtonSize::Icon
                                        class="absolute right-0.5 top-0.5 h-7 w-7"
                                        attr:r#type="button"
                                        attr:aria-label=move || {
                                            if form.with(|f| f.show_password) { "Hide password" } else { "Show password" }
                                        }
                                        on:click=move |_| form.update(|f| f.toggle_password())
                                    >
                                        {move || {
                                            if form.with(|f| f.show_password) {
                                                view! { <EyeOff class="size-4" /> }.into_any()
                                            } else {
                                                view! { <Eye class="size-4" /> }.into_any()
                                            }
                                        }}
                                    </Button>
                                </div>
                            </div>

                            <ErrorAlert message=Signal::derive(move || form.with(|f| f.error.clone())) />

                            <Button class="w-full" size=ButtonSize::Sm attr:disabled=loading>
                                <span class="inline-flex items-center gap-2">
                                    <Show when=loading fallback=|| ().into_view()>
                                        <Spinner />
                                    </Show>
                                    {move || if loading() { "Signing in..." } else { "Sign in" }}
                                </span>
                            </Button>
                        </form>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
