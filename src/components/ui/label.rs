use leptos::prelude::*;
use tw_merge::*;

/// Field label; a trailing `*` marks required fields.
#[component]
pub fn Label(
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] html_for: String,
    #[prop(optional)] required: bool,
    children: Children,
) -> impl IntoView {
    let class = tw_merge!(
        "flex items-center gap-1 text-sm leading-none font-medium select-none peer-disabled:cursor-not-allowed peer-disabled:opacity-50",
        class
    );

    view! {
        <label class=class r#for=html_for>
            {children()}
            {required.then(|| view! { <span class="text-destructive">"*"</span> })}
        </label>
    }
}
