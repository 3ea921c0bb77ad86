use leptos::html;
use leptos::prelude::*;
use tw_merge::tw_merge;
use wasm_bindgen::JsCast;

/// Text input driven by a controller field rather than a dedicated signal.
///
/// `value` is read reactively; every keystroke is reported through `on_input`.
#[component]
pub fn Input(
    #[prop(into, optional)] class: String,

    #[prop(default = "text".into(), into)] r#type: Signal<&'static str>,
    #[prop(into, optional)] placeholder: String,
    #[prop(into, optional)] name: String,
    #[prop(into, optional)] id: String,
    #[prop(into, optional)] autocomplete: String,
    #[prop(optional)] required: bool,
    #[prop(optional)] autofocus: bool,
    #[prop(default = false.into(), into)] disabled: Signal<bool>,

    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,

    #[prop(optional)] node_ref: NodeRef<html::Input>,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "placeholder:text-muted-foreground selection:bg-primary selection:text-primary-foreground dark:bg-input/30 border-input flex h-9 w-full min-w-0 rounded-md border bg-transparent px-3 py-1 text-base shadow-xs transition-[color,box-shadow] outline-none disabled:pointer-events-none disabled:cursor-not-allowed disabled:opacity-50 md:text-sm",
        "focus-visible:border-ring focus-visible:ring-ring/50",
        "focus-visible:ring-2",
        "aria-invalid:ring-destructive/20 dark:aria-invalid:ring-destructive/40 aria-invalid:border-destructive",
        class
    );

    let handle_input = move |ev: web_sys::Event| {
        if let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        {
            on_input.run(input.value());
        }
    };

    view! {
        <input
            data-name="Input"
            type=move || r#type.get()
            class=merged_class
            placeholder=placeholder
            name=name
            id=id
            autocomplete=autocomplete
            required=required
            autofocus=autofocus
            disabled=move || disabled.get()
            prop:value=move || value.get()
            on:input=handle_input
            node_ref=node_ref
        />
    }
}
