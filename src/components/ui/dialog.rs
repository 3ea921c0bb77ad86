use icons::X;
use leptos::prelude::*;
use leptos_ui::clx;
use tw_merge::*;

use crate::components::ui::button::{Button, ButtonSize, ButtonVariant};

mod components {
    use super::*;
    clx! {DialogBody, div, "flex flex-col gap-4"}
    clx! {DialogHeader, div, "flex flex-col gap-1"}
    clx! {DialogTitle, h3, "text-base leading-none font-semibold"}
    clx! {DialogDescription, p, "text-muted-foreground text-xs"}
    clx! {DialogFooter, footer, "flex items-center justify-end gap-2 pt-2"}
}

pub use components::*;

/// Centered modal over a dimmed backdrop.
///
/// Visibility is owned by the caller; `on_close` fires for the close button
/// and backdrop clicks. Escape is bound by the page that owns the state.
#[component]
pub fn Modal(
    children: ChildrenFn,
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    #[prop(optional, into)] class: String,
    #[prop(default = true)] close_on_backdrop_click: bool,
    #[prop(optional)] hide_close_button: bool,
) -> impl IntoView {
    let merged_class = tw_merge!(
        "relative w-full max-w-sm rounded-md border border-border bg-background p-4 shadow-lg",
        class
    );
    let children = StoredValue::new(children);
    let merged_class = StoredValue::new(merged_class);

    view! {
        <Show when=move || open.get() fallback=|| ().into_view()>
            <div
                data-name="Modal"
                class="fixed inset-0 z-50 flex items-center justify-center bg-black/30 px-4"
                on:click=move |_| {
                    if close_on_backdrop_click {
                        on_close.run(());
                    }
                }
            >
                <div
                    role="dialog"
                    aria-modal="true"
                    class=merged_class.get_value()
                    on:click=|ev: web_sys::MouseEvent| ev.stop_propagation()
                >
                    <Show when=move || !hide_close_button fallback=|| ().into_view()>
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Icon
                            class="absolute right-2 top-2 h-7 w-7"
                            attr:aria-label="Close"
                            on:click=move |_| on_close.run(())
                        >
                            <X class="size-4" />
                        </Button>
                    </Show>
                    {move || children.with_value(|c| c())}
                </div>
            </div>
        </Show>
    }
}
