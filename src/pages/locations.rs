use super::{edit_location_path, CREATE_LOCATION_PATH};
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, DialogBody, DialogDescription, DialogFooter, DialogHeader,
    DialogTitle, Input, Modal, Spinner,
};
use crate::components::{ImageStrip, TrustedHtml};
use crate::models::{Location, LocationRow};
use crate::state::location_list::{FetchOutcome, LocationListState, PAGE_SIZE_OPTIONS};
use crate::state::AppContext;
use crate::util::format_created_at;
use icons::{ChevronLeft, ChevronRight, Eye, Pencil, Plus, Trash2};
use leptos::ev;
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dom::helpers::window_event_listener;
use leptos_router::hooks::use_navigate;
use wasm_bindgen::JsCast;

#[component]
pub fn LocationsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let list: RwSignal<LocationListState> = RwSignal::new(LocationListState::new());
    let navigate = StoredValue::new(use_navigate());

    // Refetch whenever page, page size or search text changes.
    let query = Memo::new(move |_| list.with(|s| s.query()));

    Effect::new(move |_| {
        query.track();

        let Some((seq, q)) = list.try_update(|s| s.begin_fetch()) else {
            return;
        };
        let api_client = app_state.0.api_client.get_untracked();

        spawn_local(async move {
            let result = api_client.list_locations(&q).await;
            match list.try_update(|s| s.finish_fetch(seq, result)) {
                Some(FetchOutcome::Failed(e)) => {
                    if e.is_unauthorized() {
                        warn!("Location list rejected the session token");
                    }
                    error!("Error loading locations: {e}");
                }
                Some(FetchOutcome::Stale) => log!("discarded stale location page (request {seq})"),
                _ => {}
            }
        });
    });

    let key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if ev.key() != "Escape" {
            return;
        }
        let (confirming, viewing) =
            list.with_untracked(|s| (s.pending_delete.is_some(), s.detail_open));
        if confirming {
            list.update(|s| s.cancel_delete());
        } else if viewing {
            list.update(|s| s.close_detail());
        }
    });
    on_cleanup(move || key_handle.remove());

    let on_confirm_delete = move |_| {
        let Some(id) = list.try_update(|s| s.begin_delete()).flatten() else {
            return;
        };
        let api_client = app_state.0.api_client.get_untracked();

        spawn_local(async move {
            let result = api_client.delete_location(&id).await;
            if let Some(Err(message)) = list.try_update(|s| s.finish_delete(&id, result)) {
                error!("Error deleting location {id}: {message}");
                let _ = window().alert_with_message(&message);
            }
        });
    };

    let on_edit = move |id: String| {
        navigate.with_value(|nav| nav(&edit_location_path(&id), Default::default()));
    };

    let on_page_size = move |ev: web_sys::Event| {
        let size = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
            .and_then(|el| el.value().parse::<usize>().ok());
        if let Some(size) = size {
            list.update(|s| s.set_page_size(size));
        }
    };

    let loading = move || list.with(|s| s.loading);

    view! {
        <div class="flex flex-col gap-4">
            <div class="flex flex-wrap items-center justify-between gap-3">
                <h1 class="text-lg font-semibold">"Locations"</h1>
                <div class="flex items-center gap-2">
                    <Input
                        r#type="search"
                        placeholder="Search locations..."
                        class="h-8 w-64 text-sm"
                        value=Signal::derive(move || list.with(|s| s.search_text.clone()))
                        on_input=Callback::new(move |v: String| list.update(|s| s.set_search(v)))
                    />
                    <Button size=ButtonSize::Sm href=CREATE_LOCATION_PATH>
                        <Plus />
                        "Create Location"
                    </Button>
                </div>
            </div>

            <div class="relative overflow-x-auto rounded-md border border-border">
                <Show when=loading fallback=|| ().into_view()>
                    <div class="absolute inset-0 z-10 flex items-center justify-center bg-background/60">
                        <Spinner class="size-5" />
                    </div>
                </Show>

                <table class="w-full text-sm">
                    <thead class="bg-muted/50 text-left text-xs text-muted-foreground">
                        <tr>
                            <th class="w-12 px-3 py-2">"#"</th>
                            <th class="px-3 py-2">"Location Name"</th>
                            <th class="w-28 px-3 py-2">"Latitude"</th>
                            <th class="w-28 px-3 py-2">"Longitude"</th>
                            <th class="w-32 px-3 py-2">"Created At"</th>
                            <th class="w-32 px-3 py-2">"Actions"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let rows = list.with(|s| s.rows.clone());
                            if rows.is_empty() {
                                return view! {
                                    <tr>
                                        <td colspan="6" class="px-3 py-8 text-center text-xs text-muted-foreground">
                                            {move || if loading() { "Loading..." } else { "No locations found" }}
                                        </td>
                                    </tr>
                                }
                                .into_any();
                            }

                            rows.into_iter()
                                .map(|row| view! { <LocationTableRow row=row list=list on_edit=on_edit /> })
                                .collect_view()
                                .into_any()
                        }}
                    </tbody>
                </table>
            </div>

            <div class="flex flex-wrap items-center justify-end gap-3 text-xs text-muted-foreground">
                <label class="flex items-center gap-2">
                    "Rows per page"
                    <select
                        class="h-8 rounded-md border border-input bg-transparent px-2 text-xs"
                        on:change=on_page_size
                        prop:value=move || list.with(|s| s.page_size.to_string())
                    >
                        {PAGE_SIZE_OPTIONS
                            .into_iter()
                            .map(|n| view! { <option value=n.to_string()>{n}</option> })
                            .collect_view()}
                    </select>
                </label>
                <span>{move || list.with(|s| s.range_caption())}</span>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="h-8 w-8"
                    attr:aria-label="Previous page"
                    attr:disabled=move || !list.with(|s| s.has_prev())
                    on:click=move |_| list.update(|s| s.set_page(s.page.saturating_sub(1)))
                >
                    <ChevronLeft />
                </Button>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    class="h-8 w-8"
                    attr:aria-label="Next page"
                    attr:disabled=move || !list.with(|s| s.has_next())
                    on:click=move |_| list.update(|s| s.set_page(s.page + 1))
                >
                    <ChevronRight />
                </Button>
            </div>

            <Modal
                open=Signal::derive(move || list.with(|s| s.detail_open))
                on_close=Callback::new(move |_| list.update(|s| s.close_detail()))
                class="max-h-[85vh] max-w-3xl overflow-y-auto p-0"
            >
                {move || list.with(|s| s.selected.clone()).map(|location| view! { <LocationDetail location=location /> })}
            </Modal>

            <Modal
                open=Signal::derive(move || list.with(|s| s.pending_delete.is_some()))
                on_close=Callback::new(move |_| list.update(|s| s.cancel_delete()))
                hide_close_button=true
            >
                <DialogBody>
                    <DialogHeader>
                        <DialogTitle class="text-sm text-destructive">"Delete location"</DialogTitle>
                        <DialogDescription>
                            "Are you sure you want to delete this location?"
                        </DialogDescription>
                    </DialogHeader>
                    <div class="rounded-md border border-border bg-muted px-3 py-2 text-sm">
                        {move || list.with(|s| s.pending_delete.as_ref().map(|r| r.location_name.clone()))}
                    </div>
                    <DialogFooter>
                        <Button
                            variant=ButtonVariant::Outline
                            size=ButtonSize::Sm
                            attr:disabled=move || list.with(|s| s.deleting)
                            on:click=move |_| list.update(|s| s.cancel_delete())
                        >
                            "Cancel"
                        </Button>
                        <Button
                            variant=ButtonVariant::Destructive
                            size=ButtonSize::Sm
                            attr:disabled=move || list.with(|s| s.deleting)
                            on:click=on_confirm_delete
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || list.with(|s| s.deleting) fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if list.with(|s| s.deleting) { "Deleting..." } else { "Delete" }}
                            </span>
                        </Button>
                    </DialogFooter>
                </DialogBody>
            </Modal>
        </div>
    }
}

#[component]
fn LocationTableRow<F>(row: LocationRow, list: RwSignal<LocationListState>, on_edit: F) -> impl IntoView
where
    F: Fn(String) + Copy + 'static,
{
    let record = StoredValue::new(row.record.clone());
    let id = row.id.clone();
    let delete_id = row.id.clone();

    view! {
        <tr class="border-t border-border hover:bg-muted/30">
            <td class="px-3 py-2 text-muted-foreground">{row.order}</td>
            <td class="px-3 py-2 font-medium">{row.location_name}</td>
            <td class="px-3 py-2">{row.lat}</td>
            <td class="px-3 py-2">{row.lng}</td>
            <td class="px-3 py-2">{row.created_at}</td>
            <td class="px-3 py-2">
                <div class="flex items-center gap-0.5">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="h-7 w-7 text-primary"
                        attr:title="View"
                        on:click=move |_| list.update(|s| s.view(record.get_value()))
                    >
                        <Eye />
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="h-7 w-7 text-emerald-600"
                        attr:title="Edit"
                        on:click=move |_| on_edit(id.clone())
                    >
                        <Pencil />
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="h-7 w-7 text-destructive"
                        attr:title="Delete"
                        on:click=move |_| list.update(|s| s.request_delete(&delete_id))
                    >
                        <Trash2 />
                    </Button>
                </div>
            </td>
        </tr>
    }
}

/// Read-only view of a full record.
#[component]
fn LocationDetail(location: Location) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client.get_untracked();
    let images: Vec<String> = location
        .photogenic_forecast_images
        .iter()
        .map(|r| api_client.image_url(r))
        .collect();

    view! {
        <div class="bg-primary px-6 py-4 text-primary-foreground">
            <h3 class="pr-8 text-lg font-semibold">{format!("{} Details", location.location_name)}</h3>
        </div>
        <table class="w-full text-sm">
            <tbody class="[&_td]:px-4 [&_td]:py-3 [&_td]:align-top [&_tr]:border-b [&_tr]:border-border">
                <tr>
                    <td class="w-[30%] font-semibold">"Coordinates"</td>
                    <td>{format!("{}, {}", location.lat, location.lng)}</td>
                </tr>
                <tr>
                    <td class="font-semibold">"Created At"</td>
                    <td>{format_created_at(location.created_at.as_deref())}</td>
                </tr>
                <tr>
                    <td class="font-semibold">"Itinerary Tip"</td>
                    <td><TrustedHtml html=location.itinerary_tip.clone() /></td>
                </tr>
                <tr>
                    <td class="font-semibold">"What to Pack"</td>
                    <td><TrustedHtml html=location.what_to_pack.clone() /></td>
                </tr>
                <tr>
                    <td class="font-semibold">"Best Time to Visit"</td>
                    <td><TrustedHtml html=location.best_time_to_visit.clone() /></td>
                </tr>
                <tr>
                    <td class="font-semibold">"Photogenic Forecast"</td>
                    <td><TrustedHtml html=location.photogenic_forecast_content.clone() /></td>
                </tr>
                <tr>
                    <td class="font-semibold">"Images"</td>
                    <td><ImageStrip urls=images /></td>
                </tr>
            </tbody>
        </table>
    }
}
