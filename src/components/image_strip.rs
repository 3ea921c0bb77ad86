use leptos::prelude::*;

/// Row of fixed-size thumbnails. `urls` must already be resolved.
#[component]
pub fn ImageStrip(urls: Vec<String>, #[prop(optional, into)] class: String) -> impl IntoView {
    if urls.is_empty() {
        return view! { <div class="text-xs text-muted-foreground">"-"</div> }.into_any();
    }

    view! {
        <div class=format!("flex flex-wrap gap-3 {class}")>
            {urls
                .into_iter()
                .enumerate()
                .map(|(i, url)| view! { <Thumbnail url=url alt=format!("Image {}", i + 1) /> })
                .collect_view()}
        </div>
    }
    .into_any()
}

#[component]
fn Thumbnail(url: String, alt: String) -> impl IntoView {
    let broken: RwSignal<bool> = RwSignal::new(false);

    view! {
        <div class="h-[120px] w-[160px] overflow-hidden rounded-md border border-border bg-muted shadow-sm">
            <Show
                when=move || !broken.get()
                fallback=|| view! {
                    <div class="flex h-full w-full items-center justify-center text-xs text-muted-foreground">
                        "Image unavailable"
                    </div>
                }
            >
                <img
                    src=url.clone()
                    alt=alt.clone()
                    loading="lazy"
                    class="h-full w-full object-cover"
                    on:error=move |_| broken.set(true)
                />
            </Show>
        </div>
    }
}
