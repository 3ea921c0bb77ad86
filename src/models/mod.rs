use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Admin account object returned by the login endpoint under `data`.
///
/// Only a couple of fields are read by the console; the rest is kept as-is so
/// the persisted copy survives backend schema changes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AdminUser {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl AdminUser {
    pub fn email(&self) -> Option<&str> {
        self.extra.get("email").and_then(|v| v.as_str())
    }

    pub fn display_name(&self) -> String {
        self.extra
            .get("name")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.email())
            .unwrap_or("Admin")
            .to_string()
    }
}

/// A location record as stored by the remote API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Location {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub location_name: String,

    #[serde(default)]
    pub lat: Coordinate,
    #[serde(default)]
    pub lng: Coordinate,

    // Rich-text blocks, HTML-entity encoded by the backend.
    #[serde(default)]
    pub itinerary_tip: Option<String>,
    #[serde(default)]
    pub what_to_pack: Option<String>,
    #[serde(default)]
    pub photogenic_forecast_content: Option<String>,
    #[serde(default)]
    pub best_time_to_visit: Option<String>,
    #[serde(default)]
    pub additional_field: Option<String>,

    #[serde(default)]
    pub photogenic_forecast_link: Option<String>,

    /// Absolute URLs or storage-relative paths (`uploads/...`).
    #[serde(default)]
    pub photogenic_forecast_images: Vec<String>,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// A latitude or longitude exactly as the server sent it.
///
/// Numbers keep their JSON spelling, strings are kept verbatim (older records
/// were saved straight from form text), and `null` or a missing value is
/// empty. Nothing here is validated, so one odd record never fails a page.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub(crate) struct Coordinate(String);

impl Coordinate {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(Self(text))
    }
}

/// One page of the server-side paginated list.
#[derive(Clone, Debug, PartialEq, Default)]
pub(crate) struct LocationPage {
    pub records: Vec<Location>,
    pub total: u64,
}

/// Pagination and search cursor. `page` is 0-based; the wire is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ListQuery {
    pub page: usize,
    pub page_size: usize,
    pub search: String,
}

impl ListQuery {
    pub fn wire_page(&self) -> usize {
        self.page + 1
    }
}

/// Flattened table row derived from a [`Location`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LocationRow {
    pub id: String,
    /// 1-based display order across pages.
    pub order: usize,
    pub location_name: String,
    pub lat: String,
    pub lng: String,
    pub itinerary_tip: String,
    pub best_time_to_visit: String,
    pub created_at: String,
    pub record: Location,
}

/// A newly selected image, read into memory so it can be attached to the
/// multipart body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart field name shared by every uploaded image.
pub(crate) const IMAGE_FIELD: &str = "photogenicImages";

/// Writable text fields of a location, named as the backend expects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub(crate) enum DraftField {
    LocationName,
    Lat,
    Lng,
    ItineraryTip,
    WhatToPack,
    PhotogenicForecastContent,
    PhotogenicForecastLink,
    BestTimeToVisit,
    AdditionalField,
}

impl DraftField {
    pub fn wire_name(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            DraftField::LocationName => "Location Name",
            DraftField::Lat => "Latitude",
            DraftField::Lng => "Longitude",
            DraftField::ItineraryTip => "Itinerary Tip",
            DraftField::WhatToPack => "What to Pack",
            DraftField::PhotogenicForecastContent => "Photogenic Forecast",
            DraftField::PhotogenicForecastLink => "Photogenic Forecast Link",
            DraftField::BestTimeToVisit => "Best Time to Visit",
            DraftField::AdditionalField => "Additional Field",
        }
    }

    /// Edited with the rich-text editor rather than a plain input.
    pub fn is_rich_text(self) -> bool {
        matches!(
            self,
            DraftField::ItineraryTip
                | DraftField::WhatToPack
                | DraftField::PhotogenicForecastContent
                | DraftField::BestTimeToVisit
                | DraftField::AdditionalField
        )
    }
}

pub(crate) const REQUIRED_FIELDS: [DraftField; 3] =
    [DraftField::LocationName, DraftField::Lat, DraftField::Lng];

const CREATE_FIELDS: [DraftField; 9] = [
    DraftField::LocationName,
    DraftField::Lat,
    DraftField::Lng,
    DraftField::ItineraryTip,
    DraftField::WhatToPack,
    DraftField::PhotogenicForecastContent,
    DraftField::PhotogenicForecastLink,
    DraftField::BestTimeToVisit,
    DraftField::AdditionalField,
];

const UPDATE_FIELDS: [DraftField; 7] = [
    DraftField::LocationName,
    DraftField::Lat,
    DraftField::Lng,
    DraftField::ItineraryTip,
    DraftField::WhatToPack,
    DraftField::PhotogenicForecastContent,
    DraftField::BestTimeToVisit,
];

/// Which record a form submission targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FormMode {
    Create,
    Edit { id: String },
}

impl FormMode {
    /// Text fields carried by the multipart body for this mode.
    pub fn fields(&self) -> &'static [DraftField] {
        match self {
            FormMode::Create => &CREATE_FIELDS,
            FormMode::Edit { .. } => &UPDATE_FIELDS,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }
}

/// Client-held, not yet persisted copy of a location's writable fields.
#[derive(Clone, Debug, PartialEq, Default)]
pub(crate) struct LocationDraft {
    pub location_name: String,
    pub lat: String,
    pub lng: String,
    pub itinerary_tip: String,
    pub what_to_pack: String,
    pub photogenic_forecast_content: String,
    pub photogenic_forecast_link: String,
    pub best_time_to_visit: String,
    pub additional_field: String,
    pub images: Vec<PendingUpload>,
}

impl LocationDraft {
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::LocationName => &self.location_name,
            DraftField::Lat => &self.lat,
            DraftField::Lng => &self.lng,
            DraftField::ItineraryTip => &self.itinerary_tip,
            DraftField::WhatToPack => &self.what_to_pack,
            DraftField::PhotogenicForecastContent => &self.photogenic_forecast_content,
            DraftField::PhotogenicForecastLink => &self.photogenic_forecast_link,
            DraftField::BestTimeToVisit => &self.best_time_to_visit,
            DraftField::AdditionalField => &self.additional_field,
        }
    }

    pub fn set(&mut self, field: DraftField, value: String) {
        let slot = match field {
            DraftField::LocationName => &mut self.location_name,
            DraftField::Lat => &mut self.lat,
            DraftField::Lng => &mut self.lng,
            DraftField::ItineraryTip => &mut self.itinerary_tip,
            DraftField::WhatToPack => &mut self.what_to_pack,
            DraftField::PhotogenicForecastContent => &mut self.photogenic_forecast_content,
            DraftField::PhotogenicForecastLink => &mut self.photogenic_forecast_link,
            DraftField::BestTimeToVisit => &mut self.best_time_to_visit,
            DraftField::AdditionalField => &mut self.additional_field,
        };
        *slot = value;
    }

    /// `(name, value)` pairs for the text part of the multipart body.
    pub fn text_parts(&self, mode: &FormMode) -> Vec<(&'static str, String)> {
        mode.fields()
            .iter()
            .map(|f| (f.wire_name(), self.get(*f).to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn location_deserializes_minimal_record() {
        let json = r#"{"_id":"a","locationName":"X","lat":1,"lng":2.5}"#;
        let loc: Location = serde_json::from_str(json).expect("minimal record should parse");
        assert_eq!(loc.id, "a");
        assert_eq!(loc.location_name, "X");
        assert_eq!(loc.lat.as_str(), "1");
        assert_eq!(loc.lng.as_str(), "2.5");
        assert!(loc.itinerary_tip.is_none());
        assert!(loc.photogenic_forecast_images.is_empty());
        assert!(loc.created_at.is_none());
    }

    #[test]
    fn string_coordinates_are_kept_verbatim() {
        let json = r#"{"_id":"a","locationName":"X","lat":"12,5","lng":"north"}"#;
        let loc: Location = serde_json::from_str(json).expect("string coordinates should parse");
        assert_eq!(loc.lat.as_str(), "12,5");
        assert_eq!(loc.lng.to_string(), "north");
    }

    #[test]
    fn null_or_missing_coordinates_are_empty() {
        let json = r#"{"_id":"a","locationName":"X","lat":null}"#;
        let loc: Location =
            serde_json::from_str(json).expect("record without coordinates should parse");
        assert_eq!(loc.lat, Coordinate::default());
        assert_eq!(loc.lng.as_str(), "");
    }

    #[test]
    fn draft_field_wire_names_are_camel_case() {
        assert_eq!(DraftField::LocationName.wire_name(), "locationName");
        assert_eq!(DraftField::Lat.wire_name(), "lat");
        assert_eq!(
            DraftField::PhotogenicForecastContent.wire_name(),
            "photogenicForecastContent"
        );
        assert_eq!(DraftField::BestTimeToVisit.wire_name(), "bestTimeToVisit");
    }

    #[test]
    fn plain_and_rich_text_fields() {
        let rich: Vec<DraftField> = CREATE_FIELDS
            .into_iter()
            .filter(|f| f.is_rich_text())
            .collect();
        assert_eq!(rich.len(), 5);
        assert!(REQUIRED_FIELDS.iter().all(|f| !f.is_rich_text()));
        assert!(!DraftField::PhotogenicForecastLink.is_rich_text());
    }

    #[test]
    fn create_parts_include_every_field() {
        let mut d = LocationDraft::default();
        d.set(DraftField::LocationName, "Lake".to_string());
        d.set(DraftField::AdditionalField, "<p>x</p>".to_string());

        let names: Vec<&str> = d
            .text_parts(&FormMode::Create)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(
            names,
            vec![
                "locationName",
                "lat",
                "lng",
                "itineraryTip",
                "whatToPack",
                "photogenicForecastContent",
                "photogenicForecastLink",
                "bestTimeToVisit",
                "additionalField",
            ]
        );
    }

    #[test]
    fn update_parts_skip_create_only_fields() {
        let d = LocationDraft {
            location_name: "Lake".to_string(),
            photogenic_forecast_link: "http://x".to_string(),
            ..Default::default()
        };
        let parts = d.text_parts(&FormMode::Edit { id: "a".to_string() });
        assert!(parts.iter().all(|(n, _)| *n != "photogenicForecastLink"));
        assert!(parts.iter().all(|(n, _)| *n != "additionalField"));
        assert_eq!(parts[0], ("locationName", "Lake".to_string()));
    }

    #[test]
    fn admin_user_display_name_falls_back_to_email() {
        let u = AdminUser {
            extra: serde_json::json!({"email": "a@b.c"}),
        };
        assert_eq!(u.display_name(), "a@b.c");

        let named = AdminUser {
            extra: serde_json::json!({"email": "a@b.c", "name": "Ann"}),
        };
        assert_eq!(named.display_name(), "Ann");
    }
}
