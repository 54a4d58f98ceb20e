/* 📖 # Why does LookupError not use the workspace error type?

Every lookup outcome ends up on screen, and the screen only distinguishes
three failures: the server rejected the identifier (400), the server has no
such thing (404), or something else went wrong. `LookupError` is that
taxonomy. Transport problems arrive from the PAL as `ThingLookupError` and are
folded into `Unclassified`, keeping their text as the reason for the logs.
*/

use thing_lookup_base::pal::PalHandle;
use thing_lookup_base::pal::http::{HttpRequest, HttpResponse, HttpStatusCode};
use tracing::{debug, instrument};

use crate::config::LookupConfig;
use crate::thing::{LookupRequest, ThingRecord};

/// Message shown for HTTP 400.
pub const INVALID_ID_MESSAGE: &str = "Invalid ID supplied";
/// Message shown for HTTP 404.
pub const NOT_FOUND_MESSAGE: &str = "thing not found";
/// Message shown for every other failure.
pub const UNCLASSIFIED_MESSAGE: &str = "failed";

/// Why a lookup did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The server rejected the identifier (HTTP 400).
    InvalidId,
    /// No thing exists for the identifier (HTTP 404).
    NotFound,
    /// Any other status, an unreadable body, or no response at all.
    Unclassified { reason: String },
}

impl LookupError {
    /// The text shown in the error slot.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidId => INVALID_ID_MESSAGE,
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::Unclassified { .. } => UNCLASSIFIED_MESSAGE,
        }
    }

    fn unclassified(reason: impl Into<String>) -> Self {
        Self::Unclassified {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unclassified { reason } => write!(f, "{}: {}", UNCLASSIFIED_MESSAGE, reason),
            other => write!(f, "{}", other.user_message()),
        }
    }
}

impl std::error::Error for LookupError {}

/// The lookup service boundary: fetch one thing by identifier.
pub trait LookupService: std::fmt::Debug {
    fn fetch_by_id(&self, request: &LookupRequest) -> Result<ThingRecord, LookupError>;
}

/// Interpret a lookup response.
pub fn classify_response(response: &HttpResponse) -> Result<ThingRecord, LookupError> {
    let status = response.status();
    if status.is_success() {
        return serde_json::from_slice::<ThingRecord>(response.body().as_bytes()).map_err(|e| {
            LookupError::unclassified(format!("response body is not a thing record: {}", e))
        });
    }
    match status {
        HttpStatusCode::BAD_REQUEST => Err(LookupError::InvalidId),
        HttpStatusCode::NOT_FOUND => Err(LookupError::NotFound),
        other => Err(LookupError::unclassified(format!(
            "unexpected status {}",
            other
        ))),
    }
}

/// `LookupService` that issues `GET {base_url}/things/{id}` through the PAL.
#[derive(Debug, Clone)]
pub struct HttpLookupService {
    pal: PalHandle,
    base_url: String,
}

impl HttpLookupService {
    pub fn new(pal: PalHandle, config: &LookupConfig) -> Self {
        Self::with_base_url(pal, config.base_url())
    }

    pub fn with_base_url(pal: PalHandle, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { pal, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The URL a request is sent to; the identifier is percent-encoded.
    pub fn thing_url(&self, request: &LookupRequest) -> String {
        format!(
            "{}/things/{}",
            self.base_url,
            urlencoding::encode(request.id())
        )
    }
}

impl LookupService for HttpLookupService {
    #[instrument(skip(self, request), fields(id = %request))]
    fn fetch_by_id(&self, request: &LookupRequest) -> Result<ThingRecord, LookupError> {
        let url = self.thing_url(request);
        debug!(%url, "fetching thing");
        let response = self
            .pal
            .send_http_request(HttpRequest::get(url).with_header("Accept", "application/json"))
            .map_err(|e| LookupError::unclassified(e.to_string()))?;
        debug!(status = %response.status(), "lookup response received");
        classify_response(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thing_lookup_base::MockPal;

    fn widget_json() -> &'static str {
        r#"{"id":"1","name":"Widget","location":"Aisle 5","type":"Tool"}"#
    }

    #[test]
    fn test_classify_success() {
        let record = classify_response(&HttpResponse::json(widget_json())).unwrap();
        assert_eq!(record, ThingRecord::new("1", "Widget", "Aisle 5", "Tool"));
    }

    #[test]
    fn test_classify_success_with_numeric_id() {
        let response =
            HttpResponse::json(r#"{"id":1,"name":"Widget","location":"Aisle 5","type":"Tool"}"#);
        let record = classify_response(&response).unwrap();
        assert_eq!(record.id(), "1");
    }

    #[test]
    fn test_classify_any_2xx_with_record_body() {
        let response = HttpResponse::json(widget_json()).with_status(203u16);
        assert!(classify_response(&response).is_ok());
    }

    #[test]
    fn test_classify_400_and_404() {
        assert_eq!(
            classify_response(&HttpResponse::bad_request()),
            Err(LookupError::InvalidId)
        );
        assert_eq!(
            classify_response(&HttpResponse::not_found().with_body("thing not found")),
            Err(LookupError::NotFound)
        );
    }

    #[test]
    fn test_classify_other_statuses_as_unclassified() {
        for code in [401u16, 403, 418, 500, 503, 599] {
            let err = classify_response(&HttpResponse::new(code)).unwrap_err();
            assert!(matches!(err, LookupError::Unclassified { .. }), "status {}", code);
            assert_eq!(err.user_message(), "failed");
        }
    }

    #[test]
    fn test_classify_success_with_bad_body() {
        let err = classify_response(&HttpResponse::json("not json")).unwrap_err();
        assert_eq!(err.user_message(), "failed");
        assert!(err.to_string().starts_with("failed: response body is not a thing record"));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(LookupError::InvalidId.user_message(), "Invalid ID supplied");
        assert_eq!(LookupError::NotFound.user_message(), "thing not found");
        assert_eq!(LookupError::NotFound.to_string(), "thing not found");
    }

    #[test]
    fn test_thing_url_encodes_identifier() {
        let service = HttpLookupService::with_base_url(
            PalHandle::new(MockPal::new()),
            "http://localhost:7777/",
        );
        assert_eq!(service.base_url(), "http://localhost:7777");

        let request = LookupRequest::new("a/b c").unwrap();
        assert_eq!(
            service.thing_url(&request),
            "http://localhost:7777/things/a%2Fb%20c"
        );
    }

    #[test]
    fn test_transport_failure_is_unclassified() {
        let mock = MockPal::new();
        let service = HttpLookupService::new(
            PalHandle::new(mock.clone()),
            &LookupConfig::new("localhost", 9999),
        );

        let err = service
            .fetch_by_id(&LookupRequest::new("1").unwrap())
            .unwrap_err();

        assert_eq!(err.user_message(), "failed");
        let sent = mock.sent_requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url(), "http://localhost:9999/things/1");
        assert_eq!(sent[0].headers().get("accept"), Some("application/json"));
    }
}
