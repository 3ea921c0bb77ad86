use icons::LoaderCircle;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <LoaderCircle class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Blocks the content area while a record is being fetched.
#[component]
pub fn LoadingBlock(#[prop(into, optional)] label: String) -> impl IntoView {
    view! {
        <div class="flex min-h-[40vh] flex-col items-center justify-center gap-2 text-xs text-muted-foreground">
            <Spinner class="size-6" />
            {label}
        </div>
    }
}
