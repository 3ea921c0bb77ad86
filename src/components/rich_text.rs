use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use leptos::html;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Clone, Copy)]
enum Format {
    Bold,
    Italic,
    Underline,
    OrderedList,
    BulletList,
    Link,
    Clear,
}

impl Format {
    const TOOLBAR: [Format; 7] = [
        Format::Bold,
        Format::Italic,
        Format::Underline,
        Format::OrderedList,
        Format::BulletList,
        Format::Link,
        Format::Clear,
    ];

    fn label(self) -> &'static str {
        match self {
            Format::Bold => "B",
            Format::Italic => "I",
            Format::Underline => "U",
            Format::OrderedList => "1.",
            Format::BulletList => "•",
            Format::Link => "Link",
            Format::Clear => "Clear",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Format::Bold => "Bold",
            Format::Italic => "Italic",
            Format::Underline => "Underline",
            Format::OrderedList => "Numbered list",
            Format::BulletList => "Bulleted list",
            Format::Link => "Insert link",
            Format::Clear => "Clear formatting",
        }
    }

    fn label_class(self) -> &'static str {
        match self {
            Format::Bold => "font-bold",
            Format::Italic => "italic",
            Format::Underline => "underline",
            _ => "",
        }
    }

    fn apply(self) {
        let Ok(doc) = document().dyn_into::<web_sys::HtmlDocument>() else {
            return;
        };

        let _ = match self {
            Format::Bold => doc.exec_command("bold"),
            Format::Italic => doc.exec_command("italic"),
            Format::Underline => doc.exec_command("underline"),
            Format::OrderedList => doc.exec_command("insertOrderedList"),
            Format::BulletList => doc.exec_command("insertUnorderedList"),
            Format::Link => {
                let url = window()
                    .prompt_with_message("Link URL")
                    .ok()
                    .flatten()
                    .filter(|u| !u.trim().is_empty());
                match url {
                    Some(url) => doc.exec_command_with_show_ui_and_value("createLink", false, url.trim()),
                    None => return,
                }
            }
            Format::Clear => {
                let _ = doc.exec_command("unlink");
                doc.exec_command("removeFormat")
            }
        };
    }
}

/// An editor left with only empty markup (`<br>`, `<p></p>`) has no content.
pub(crate) fn normalize_editor_html(html: &str, text: &str) -> String {
    let has_media = html.contains("<img");
    if text.trim().is_empty() && !has_media {
        String::new()
    } else {
        html.to_string()
    }
}

/// Contenteditable HTML editor with a formatting toolbar.
///
/// `initial` is written into the editor once on mount; afterwards the DOM owns
/// the content and every change is reported through `on_change`.
#[component]
pub fn RichTextEditor(
    #[prop(into)] initial: String,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] id: String,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let editor_ref: NodeRef<html::Div> = NodeRef::new();

    Effect::new(move |_| {
        if let Some(el) = editor_ref.get() {
            el.set_inner_html(&initial);
        }
    });

    let emit = move || {
        if let Some(el) = editor_ref.get_untracked() {
            let text = el.text_content().unwrap_or_default();
            on_change.run(normalize_editor_html(&el.inner_html(), &text));
        }
    };

    view! {
        <div data-name="RichTextEditor" class="rounded-md border border-input shadow-xs focus-within:border-ring focus-within:ring-2 focus-within:ring-ring/50">
            <div class="flex flex-wrap items-center gap-1 border-b border-border px-1.5 py-1">
                {Format::TOOLBAR
                    .into_iter()
                    .map(|format| {
                        view! {
                            <Button
                                variant=ButtonVariant::Ghost
                                size=ButtonSize::Toolbar
                                attr:r#type="button"
                                attr:title=format.title()
                                on:mousedown=move |ev: web_sys::MouseEvent| {
                                    // Keep the selection inside the editor.
                                    ev.prevent_default();
                                    if let Some(el) = editor_ref.get_untracked() {
                                        let _ = el.focus();
                                    }
                                    format.apply();
                                    emit();
                                }
                            >
                                <span class=format.label_class()>{format.label()}</span>
                            </Button>
                        }
                    })
                    .collect_view()}
            </div>
            <div
                id=id
                node_ref=editor_ref
                contenteditable="true"
                data-placeholder=placeholder
                class="prose prose-sm min-h-[120px] max-w-none px-3 py-2 text-sm outline-none empty:before:text-muted-foreground empty:before:content-[attr(data-placeholder)]"
                on:input=move |_| emit()
                on:blur=move |_| emit()
            ></div>
        </div>
    }
}
