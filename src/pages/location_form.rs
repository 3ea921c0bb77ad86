use super::LOCATIONS_PATH;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardHeader, CardTitle, ErrorAlert, Input,
    Label, LoadingBlock, Spinner,
};
use crate::components::{ImageStrip, RichTextEditor};
use crate::models::{DraftField, FormMode, PendingUpload, REQUIRED_FIELDS};
use crate::state::location_form::LocationForm;
use crate::state::AppContext;
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Params, PartialEq, Clone, Debug)]
pub struct LocationRouteParams {
    pub id: Option<String>,
}

#[component]
pub fn LocationCreatePage() -> impl IntoView {
    view! { <LocationFormPage form=LocationForm::create() /> }
}

#[component]
pub fn LocationEditPage() -> impl IntoView {
    let params = use_params::<LocationRouteParams>();
    let id = Memo::new(move |_| {
        params.with(|p| p.as_ref().ok().and_then(|p| p.id.clone()).unwrap_or_default())
    });

    move || view! { <LocationFormPage form=LocationForm::edit(id.get()) /> }
}

async fn read_upload(file: &web_sys::File) -> Result<PendingUpload, JsValue> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer()).await?;
    Ok(PendingUpload {
        file_name: file.name(),
        mime_type: file.type_(),
        bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

fn selected_files(ev: &web_sys::Event) -> Vec<web_sys::File> {
    ev.target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        .and_then(|input| input.files())
        .map(|list| (0..list.length()).filter_map(|i| list.get(i)).collect())
        .unwrap_or_default()
}

#[component]
fn LocationFormPage(form: LocationForm) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let form: RwSignal<LocationForm> = RwSignal::new(form);
    let navigate = StoredValue::new(use_navigate());

    let go_back = move || {
        let went_back = window()
            .history()
            .ok()
            .filter(|h| h.length().unwrap_or(0) > 1)
            .is_some_and(|h| h.back().is_ok());
        if !went_back {
            navigate.with_value(|nav| nav(LOCATIONS_PATH, Default::default()));
        }
    };

    if let FormMode::Edit { id } = form.with_untracked(|f| f.mode.clone()) {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_location(&id).await {
                Ok(location) => {
                    form.try_update(|f| f.hydrate(location));
                }
                Err(e) => {
                    if e.is_unauthorized() {
                        warn!("Location {id} rejected the session token");
                    }
                    error!("Error fetching location {id}: {e}");
                    form.try_update(|f| f.fail_hydrate(&e));
                }
            }
        });
    }

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(Ok((mode, draft))) = form.try_update(|f| f.begin_submit()) else {
            return;
        };
        let api_client = app_state.0.api_client.get_untracked();

        spawn_local(async move {
            let result = api_client.save_location(&mode, &draft).await;
            if let Err(e) = &result {
                error!("Error saving location: {e}");
            }
            if form.try_update(|f| f.finish_submit(result)).unwrap_or(false) {
                go_back();
            }
        });
    };

    let on_files = move |ev: web_sys::Event| {
        let files = selected_files(&ev);
        let Some(seq) = form.try_update(|f| f.begin_file_read()) else {
            return;
        };
        spawn_local(async move {
            let mut uploads = Vec::with_capacity(files.len());
            for file in files {
                match read_upload(&file).await {
                    Ok(upload) => uploads.push(upload),
                    Err(e) => warn!("skipping unreadable file {}: {e:?}", file.name()),
                }
            }
            if form.try_update(|f| f.finish_file_read(seq, uploads)) == Some(false) {
                log!("dropping superseded file selection {seq}");
            }
        });
    };

    let (mode, title, submit_label) =
        form.with_untracked(|f| (f.mode.clone(), f.title(), f.submit_label()));
    let is_edit = mode.is_edit();
    let submitting = move || form.with(|f| f.submitting);
    let busy = move || form.with(|f| f.submitting || f.reading_files);

    let existing_images = move || {
        let api_client = app_state.0.api_client.get_untracked();
        form.with(|f| {
            f.existing_images
                .iter()
                .map(|r| api_client.image_url(r))
                .collect::<Vec<_>>()
        })
    };

    let fields = mode.fields();
    let field_view = move |field: DraftField| {
        let required = REQUIRED_FIELDS.contains(&field);
        let id = field.wire_name();

        let control = if field.is_rich_text() {
            view! {
                <RichTextEditor
                    id=id
                    initial=form.with_untracked(|f| f.draft.get(field).to_string())
                    on_change=Callback::new(move |html: String| form.update(|f| f.set_field(field, html)))
                />
            }
            .into_any()
        } else {
            view! {
                <Input
                    id=id
                    name=id
                    class="h-8 text-sm"
                    value=Signal::derive(move || form.with(|f| f.draft.get(field).to_string()))
                    on_input=Callback::new(move |v: String| form.update(|f| f.set_field(field, v)))
                />
            }
            .into_any()
        };

        view! {
            <div class="flex flex-col gap-1.5">
                <Label html_for=id class="text-xs" required=required>{field.label()}</Label>
                {control}
            </div>
        }
    };

    view! {
        <div class="mx-auto flex max-w-4xl flex-col gap-4">
            <Show
                when=move || !form.with(|f| f.loading)
                fallback=|| view! { <LoadingBlock label="Loading location..." /> }
            >
                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">{title}</CardTitle>
                    </CardHeader>

                    <CardContent>
                        <form class="flex flex-col gap-4" on:submit=on_submit>
                            {fields.iter().copied().map(field_view).collect_view()}

                            <div class="flex flex-col gap-1.5">
                                <Label html_for="photogenicImages" class="text-xs">
                                    {move || form.with(|f| f.upload_label())}
                                </Label>
                                <input
                                    id="photogenicImages"
                                    type="file"
                                    accept="image/*"
                                    multiple=true
                                    class="text-xs file:mr-3 file:rounded-md file:border file:border-input file:bg-transparent file:px-3 file:py-1 file:text-xs"
                                    on:change=on_files
                                />
                            </div>

                            <Show when=move || is_edit fallback=|| ().into_view()>
                                <div class="flex flex-col gap-1.5">
                                    <span class="text-xs font-medium">"Existing Images"</span>
                                    {move || view! { <ImageStrip urls=existing_images() /> }}
                                </div>
                            </Show>

                            <ErrorAlert message=Signal::derive(move || form.with(|f| f.error.clone())) />

                            <div class="flex items-center justify-end gap-2 pt-2">
                                <Button
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Sm
                                    attr:r#type="button"
                                    attr:disabled=submitting
                                    on:click=move |_| go_back()
                                >
                                    "Cancel"
                                </Button>
                                <Button size=ButtonSize::Sm attr:disabled=busy>
                                    <span class="inline-flex items-center gap-2">
                                        <Show when=submitting fallback=|| ().into_view()>
                                            <Spinner />
                                        </Show>
                                        {move || if submitting() { "Saving..." } else { submit_label }}
                                    </span>
                                </Button>
                            </div>
                        </form>
                    </CardContent>
                </Card>
            </Show>
        </div>
    }
}
