use crate::util::PLACEHOLDER;
use leptos::prelude::*;

/// Renders stored rich text as markup.
///
/// This is the only place the console injects HTML it did not build itself.
/// The backend is the sanitizing authority for these fields; a client-side
/// sanitizer, if ever added, belongs here.
#[component]
pub fn TrustedHtml(
    #[prop(into)] html: Option<String>,
    #[prop(optional, into)] class: String,
) -> impl IntoView {
    let html = html
        .filter(|h| !h.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    view! { <div data-name="TrustedHtml" class=class inner_html=html /> }
}
