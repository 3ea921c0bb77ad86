use crate::api::{ApiError, ApiResult};
use crate::models::{
    DraftField, FormMode, Location, LocationDraft, PendingUpload, REQUIRED_FIELDS,
};
use crate::util::decode_html_entities;

const LOAD_FAILED: &str = "Failed to load location details";

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormError {
    #[error("{} is required", .0.label())]
    MissingField(DraftField),
    #[error("already submitting")]
    AlreadySubmitting,
    #[error("Selected images are still loading")]
    FilesPending,
}

/// Draft, hydration and submission state shared by the create and edit pages.
#[derive(Clone, Debug)]
pub(crate) struct LocationForm {
    pub mode: FormMode,
    pub draft: LocationDraft,

    /// Images already stored for the record; shown for context only.
    pub existing_images: Vec<String>,

    /// Edit mode: the record is still being fetched.
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<String>,

    /// A file selection is being read into memory.
    pub reading_files: bool,
    file_read_seq: u64,
}

impl LocationForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: LocationDraft::default(),
            existing_images: vec![],
            loading: false,
            submitting: false,
            error: None,
            reading_files: false,
            file_read_seq: 0,
        }
    }

    pub fn edit(id: impl Into<String>) -> Self {
        Self {
            mode: FormMode::Edit { id: id.into() },
            loading: true,
            ..Self::create()
        }
    }

    pub fn title(&self) -> &'static str {
        if self.mode.is_edit() {
            "Edit Location"
        } else {
            "Create Location"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.mode.is_edit() {
            "Update"
        } else {
            "Create"
        }
    }

    pub fn upload_label(&self) -> String {
        if self.reading_files {
            return "Reading images...".to_string();
        }
        match self.draft.images.len() {
            0 if self.mode.is_edit() => "Upload New Images".to_string(),
            0 => "Upload Images".to_string(),
            n => format!("{n} image(s) selected"),
        }
    }

    fn fallbacks(&self) -> (&'static str, &'static str) {
        if self.mode.is_edit() {
            ("Failed to update location", "Error updating location")
        } else {
            ("Failed to create location", "Error creating location")
        }
    }

    /// Populate the draft from a fetched record.
    ///
    /// Rich-text fields arrive entity-encoded and are decoded exactly once.
    pub fn hydrate(&mut self, location: Location) {
        let decode = |v: Option<String>| decode_html_entities(v.as_deref().unwrap_or_default());

        self.draft = LocationDraft {
            location_name: location.location_name,
            lat: location.lat.to_string(),
            lng: location.lng.to_string(),
            itinerary_tip: decode(location.itinerary_tip),
            what_to_pack: decode(location.what_to_pack),
            photogenic_forecast_content: decode(location.photogenic_forecast_content),
            photogenic_forecast_link: location.photogenic_forecast_link.unwrap_or_default(),
            best_time_to_visit: decode(location.best_time_to_visit),
            additional_field: decode(location.additional_field),
            images: vec![],
        };
        self.existing_images = location.photogenic_forecast_images;
        self.loading = false;
        self.error = None;
    }

    pub fn fail_hydrate(&mut self, _err: &ApiError) {
        self.loading = false;
        self.error = Some(LOAD_FAILED.to_string());
    }

    pub fn set_field(&mut self, field: DraftField, value: String) {
        self.draft.set(field, value);
    }

    /// Mark a new file selection as in flight and return its sequence number.
    pub fn begin_file_read(&mut self) -> u64 {
        self.file_read_seq += 1;
        self.reading_files = true;
        self.file_read_seq
    }

    /// Replace the pending uploads with a finished read.
    ///
    /// Returns `false` when a newer selection superseded `seq`.
    pub fn finish_file_read(&mut self, seq: u64, images: Vec<PendingUpload>) -> bool {
        if seq != self.file_read_seq {
            return false;
        }
        self.reading_files = false;
        self.draft.images = images;
        true
    }

    pub fn validate(&self) -> Result<(), FormError> {
        match REQUIRED_FIELDS
            .iter()
            .find(|f| self.draft.get(**f).trim().is_empty())
        {
            Some(f) => Err(FormError::MissingField(*f)),
            None => Ok(()),
        }
    }

    /// Guard and validate; on success the caller sends the returned draft.
    pub fn begin_submit(&mut self) -> Result<(FormMode, LocationDraft), FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        if self.reading_files {
            self.error = Some(FormError::FilesPending.to_string());
            return Err(FormError::FilesPending);
        }
        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.submitting = true;
        self.error = None;
        Ok((self.mode.clone(), self.draft.clone()))
    }

    /// Returns `true` when the page should navigate back. `submitting` stays
    /// set on success since the form is about to unmount.
    pub fn finish_submit(&mut self, result: ApiResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                let (failed, unreachable) = self.fallbacks();
                self.error = Some(e.describe(failed, unreachable));
                self.submitting = false;
                false
            }
        }
    }
}
