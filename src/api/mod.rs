use crate::models::{
    AdminUser, FormMode, ListQuery, Location, LocationDraft, LocationPage, IMAGE_FIELD,
};
use crate::util::resolve_image_url;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiError {
    /// The request never completed.
    #[error("network error: {0}")]
    Network(String),

    /// 4xx carrying structured field messages.
    #[error("validation failed ({status}): {}", .messages.join("; "))]
    Validation {
        status: u16,
        messages: Vec<String>,
        message: Option<String>,
    },

    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    #[error("not found")]
    NotFound { message: Option<String> },

    /// Any other non-2xx.
    #[error("request failed ({status})")]
    Server { status: u16, message: Option<String> },

    /// 2xx whose body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    errors: Option<Vec<FieldMessage>>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct FieldMessage {
    #[serde(default)]
    msg: Option<String>,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self::Parse(e.to_string())
    }

    /// Classify a non-2xx response from its status and raw body.
    pub(crate) fn from_failure(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let message = parsed.message.filter(|m| !m.trim().is_empty());
        let messages: Vec<String> = parsed
            .errors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|e| e.msg)
            .filter(|m| !m.trim().is_empty())
            .collect();

        match status {
            401 => Self::Unauthorized { message },
            404 => Self::NotFound { message },
            400..=499 if !messages.is_empty() => Self::Validation {
                status,
                messages,
                message,
            },
            _ => Self::Server { status, message },
        }
    }

    /// Most specific user-facing text: first field message, then the
    /// server's `message`, then `failed`. Transport and decode failures use
    /// `unreachable`.
    pub(crate) fn describe(&self, failed: &str, unreachable: &str) -> String {
        match self {
            Self::Validation {
                messages, message, ..
            } => messages
                .first()
                .or(message.as_ref())
                .cloned()
                .unwrap_or_else(|| failed.to_string()),
            Self::Unauthorized { message }
            | Self::NotFound { message }
            | Self::Server { message, .. } => {
                message.clone().unwrap_or_else(|| failed.to_string())
            }
            Self::Network(_) | Self::Parse(_) => unreachable.to_string(),
        }
    }

    pub(crate) fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_base_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let raw = Self::from_window()
            .or_else(|| option_env!("API_BASE_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Self {
            api_base_url: normalize_base_url(&raw),
        }
    }

    // `window.ENV.API_BASE_URL` (documented in index.html), then
    // `window.ENV.api_base_url`.
    fn from_window() -> Option<String> {
        let env = web_sys::window()?.get("ENV")?;
        if env.is_undefined() || !env.is_object() {
            return None;
        }

        ["API_BASE_URL", "api_base_url"].into_iter().find_map(|key| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string())
                .filter(|s| !s.trim().is_empty())
        })
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct LocationListData {
    #[serde(default)]
    locations: Vec<Location>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Deserialize, Default)]
struct Pagination {
    #[serde(default)]
    total: u64,
}

#[derive(Serialize, Clone, Debug)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub data: Option<AdminUser>,
}

pub(crate) fn parse_location_list(body: &str) -> ApiResult<LocationPage> {
    let env: Envelope<LocationListData> = serde_json::from_str(body).map_err(ApiError::parse)?;
    Ok(LocationPage {
        records: env.data.locations,
        total: env.data.pagination.total,
    })
}

pub(crate) fn parse_location_details(body: &str) -> ApiResult<Location> {
    let env: Envelope<Option<Location>> = serde_json::from_str(body).map_err(ApiError::parse)?;
    env.data.ok_or(ApiError::NotFound { message: None })
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            token: None,
        }
    }

    pub fn from_env(token: Option<String>) -> Self {
        let mut client = Self::new(EnvConfig::new().api_base_url);
        client.set_token(token);
        client
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn image_url(&self, reference: &str) -> String {
        resolve_image_url(&self.base_url, reference)
    }

    /// The search parameter is omitted entirely when the search text is
    /// blank; otherwise it is sent exactly as typed.
    pub(crate) fn location_list_url(&self, query: &ListQuery) -> String {
        let mut url = format!(
            "{}?page={}&limit={}",
            self.url("/api/admin/location-list"),
            query.wire_page(),
            query.page_size
        );
        if !query.search.trim().is_empty() {
            url.push_str("&search=");
            url.push_str(&urlencoding::encode(&query.search));
        }
        url
    }

    fn record_url(&self, action: &str, id: &str) -> String {
        self.url(&format!("/api/admin/{action}/{}", urlencoding::encode(id)))
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        auth_header: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(header) = auth_header {
            req = req.header("Authorization", header);
        }
        req
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> ApiResult<String> {
        let req = Self::with_auth_headers(req, self.get_auth_header());
        let res = req.send().await.map_err(ApiError::network)?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        if status.is_success() {
            Ok(body)
        } else {
            Err(ApiError::from_failure(status.as_u16(), &body))
        }
    }

    fn multipart_form(draft: &LocationDraft, mode: &FormMode) -> ApiResult<Form> {
        let mut form = Form::new();
        for (name, value) in draft.text_parts(mode) {
            form = form.text(name, value);
        }

        for upload in &draft.images {
            let mut part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
            if !upload.mime_type.is_empty() {
                part = part.mime_str(&upload.mime_type).map_err(ApiError::network)?;
            }
            form = form.part(IMAGE_FIELD, part);
        }

        Ok(form)
    }

    pub async fn list_locations(&self, query: &ListQuery) -> ApiResult<LocationPage> {
        let client = reqwest::Client::new();
        let body = self.send(client.get(self.location_list_url(query))).await?;
        parse_location_list(&body)
    }

    pub async fn get_location(&self, id: &str) -> ApiResult<Location> {
        let client = reqwest::Client::new();
        let body = self
            .send(client.get(self.record_url("location-details", id)))
            .await?;
        parse_location_details(&body)
    }

    pub async fn create_location(&self, draft: &LocationDraft) -> ApiResult<()> {
        let form = Self::multipart_form(draft, &FormMode::Create)?;
        let client = reqwest::Client::new();
        self.send(
            client
                .post(self.url("/api/admin/save-location"))
                .multipart(form),
        )
        .await
        .map(|_| ())
    }

    pub async fn update_location(&self, id: &str, draft: &LocationDraft) -> ApiResult<()> {
        let mode = FormMode::Edit { id: id.to_string() };
        let form = Self::multipart_form(draft, &mode)?;
        let client = reqwest::Client::new();
        self.send(
            client
                .put(self.record_url("update-location", id))
                .multipart(form),
        )
        .await
        .map(|_| ())
    }

    /// Create or update depending on the form mode.
    pub async fn save_location(&self, mode: &FormMode, draft: &LocationDraft) -> ApiResult<()> {
        match mode {
            FormMode::Create => self.create_location(draft).await,
            FormMode::Edit { id } => self.update_location(id, draft).await,
        }
    }

    pub async fn delete_location(&self, id: &str) -> ApiResult<()> {
        let client = reqwest::Client::new();
        self.send(client.delete(self.record_url("delete-location", id)))
            .await
            .map(|_| ())
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let client = reqwest::Client::new();
        let body = self
            .send(client.post(self.url("/api/admin/login")).json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            }))
            .await?;
        serde_json::from_str(&body).map_err(ApiError::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> ApiClient {
        ApiClient::new("http://api.test/")
    }

    fn query(page: usize, page_size: usize, search: &str) -> ListQuery {
        ListQuery {
            page,
            page_size,
            search: search.to_string(),
        }
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(client().base_url, "http://api.test");
        assert_eq!(normalize_base_url(" http://a.test// "), "http://a.test");
    }

    #[test]
    fn list_url_is_one_based_and_omits_empty_search() {
        assert_eq!(
            client().location_list_url(&query(0, 10, "")),
            "http://api.test/api/admin/location-list?page=1&limit=10"
        );
        assert_eq!(
            client().location_list_url(&query(2, 20, "   ")),
            "http://api.test/api/admin/location-list?page=3&limit=20"
        );
    }

    #[test]
    fn list_url_encodes_search() {
        assert_eq!(
            client().location_list_url(&query(0, 50, "lake & hills")),
            "http://api.test/api/admin/location-list?page=1&limit=50&search=lake%20%26%20hills"
        );
    }

    #[test]
    fn list_url_sends_search_as_typed() {
        assert_eq!(
            client().location_list_url(&query(0, 10, " lake ")),
            "http://api.test/api/admin/location-list?page=1&limit=10&search=%20lake%20"
        );
    }

    #[test]
    fn record_urls_encode_id() {
        let c = client();
        assert_eq!(
            c.record_url("location-details", "abc"),
            "http://api.test/api/admin/location-details/abc"
        );
        assert_eq!(
            c.record_url("delete-location", "a/b"),
            "http://api.test/api/admin/delete-location/a%2Fb"
        );
    }

    #[test]
    fn auth_header_follows_token() {
        let mut c = client();
        assert!(c.get_auth_header().is_none());
        assert!(!c.is_authenticated());

        c.set_token(Some("jwt".to_string()));
        assert_eq!(c.get_auth_header().as_deref(), Some("Bearer jwt"));
        assert!(c.is_authenticated());
    }

    #[test]
    fn parses_location_list_envelope() {
        let body = r#"{"data":{"locations":[{"_id":"a","locationName":"X","lat":1,"lng":2}],"pagination":{"total":1}}}"#;
        let page = parse_location_list(body).expect("list should parse");
        assert_eq!(page.total, 1);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "a");
    }

    #[test]
    fn one_odd_record_does_not_fail_the_page() {
        let body = r#"{"data":{"locations":[{"_id":"a","locationName":"X","lat":1,"lng":2},{"_id":"b","locationName":"Y","lat":"12,5"}],"pagination":{"total":2}}}"#;
        let page = parse_location_list(body).expect("mixed page should parse");
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[1].lat.as_str(), "12,5");
        assert_eq!(page.records[1].lng.as_str(), "");
    }

    #[test]
    fn malformed_list_body_is_parse_error() {
        assert!(matches!(
            parse_location_list(r#"{"locations":[]}"#),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn null_detail_is_not_found() {
        assert_eq!(
            parse_location_details(r#"{"data":null}"#),
            Err(ApiError::NotFound { message: None })
        );
        let loc = parse_location_details(r#"{"data":{"_id":"z","locationName":"Z","lat":0,"lng":0}}"#)
            .expect("detail should parse");
        assert_eq!(loc.id, "z");
    }

    #[test]
    fn classifies_validation_failure() {
        let err = ApiError::from_failure(
            422,
            r#"{"errors":[{"msg":"Location name is required"},{"msg":"Lat invalid"}],"message":"Bad"}"#,
        );
        assert_eq!(
            err,
            ApiError::Validation {
                status: 422,
                messages: vec![
                    "Location name is required".to_string(),
                    "Lat invalid".to_string()
                ],
                message: Some("Bad".to_string()),
            }
        );
        assert_eq!(
            err.describe("Failed to create location", "Error creating location"),
            "Location name is required"
        );
    }

    #[test]
    fn message_used_when_no_field_errors() {
        let err = ApiError::from_failure(400, r#"{"errors":[],"message":"Duplicate location"}"#);
        assert!(matches!(err, ApiError::Server { status: 400, .. }));
        assert_eq!(err.describe("fallback", "offline"), "Duplicate location");
    }

    #[test]
    fn fallback_when_body_is_not_json() {
        let err = ApiError::from_failure(500, "<html>oops</html>");
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: None
            }
        );
        assert_eq!(
            err.describe("Failed to update location", "Error updating location"),
            "Failed to update location"
        );
    }

    #[test]
    fn unauthorized_and_not_found_keep_message() {
        let err = ApiError::from_failure(401, r#"{"message":"Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.describe("Login failed", "Login failed"), "Invalid credentials");

        let err = ApiError::from_failure(404, "");
        assert_eq!(err, ApiError::NotFound { message: None });
    }

    #[test]
    fn network_failure_uses_unreachable_text() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(
            err.describe("Failed to delete location", "Error deleting location"),
            "Error deleting location"
        );
    }

    #[test]
    fn login_response_contract_deserialize() {
        let json = r#"{"token":"jwt-token","data":{"_id":"u1","email":"admin@ktp.test"}}"#;
        let parsed: LoginResponse = serde_json::from_str(json).expect("login response should parse");
        assert_eq!(parsed.token, "jwt-token");
        let user = parsed.data.expect("user present");
        assert_eq!(user.email(), Some("admin@ktp.test"));
    }

    #[test]
    fn image_url_uses_client_base() {
        assert_eq!(
            client().image_url("uploads/foo.png"),
            "http://api.test/uploads/foo.png"
        );
    }
}
