//! Shared plumbing for the Google REST adapters.
//!
//! Requests carry an OAuth bearer token obtained out of band (for example a
//! service-account token minted by `gcloud auth print-access-token`).

use naomi_application::ports::adapter_error::AdapterError;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Authenticated HTTP client for Google APIs.
#[derive(Clone)]
pub struct GoogleApiClient {
    http: reqwest::Client,
    access_token: String,
}

impl std::fmt::Debug for GoogleApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleApiClient")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl GoogleApiClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, AdapterError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| AdapterError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            access_token: access_token.into(),
        })
    }

    pub fn get(&self, url: Url) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.access_token)
    }

    pub fn post(&self, url: Url) -> RequestBuilder {
        self.http.post(url).bearer_auth(&self.access_token)
    }

    pub fn patch(&self, url: Url) -> RequestBuilder {
        self.http.patch(url).bearer_auth(&self.access_token)
    }

    pub fn delete(&self, url: Url) -> RequestBuilder {
        self.http.delete(url).bearer_auth(&self.access_token)
    }
}

/// Build `base` + path segments, percent-encoding each segment.
pub fn endpoint(base: &str, segments: &[&str]) -> Result<Url, AdapterError> {
    let mut url = Url::parse(base)
        .map_err(|e| AdapterError::Other(format!("Invalid base URL '{}': {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| AdapterError::Other(format!("Base URL '{}' cannot take a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request and turn transport failures into [`AdapterError::Network`].
pub async fn send(request: RequestBuilder) -> Result<Response, AdapterError> {
    request
        .send()
        .await
        .map_err(|e| AdapterError::Network(e.to_string()))
}

/// Map a non-success status to an [`AdapterError`], passing success through.
pub async fn check_status(response: Response) -> Result<Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string()
    });
    debug!("Google API returned {}: {}", status, message);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AdapterError::Unauthorized(message),
        StatusCode::NOT_FOUND | StatusCode::GONE => AdapterError::NotFound(message),
        _ => AdapterError::Http {
            status: status.as_u16(),
            message,
        },
    })
}

/// Send, check the status and decode a JSON body.
pub async fn send_json(request: RequestBuilder) -> Result<serde_json::Value, AdapterError> {
    let response = check_status(send(request).await?).await?;
    response
        .json()
        .await
        .map_err(|e| AdapterError::InvalidResponse(e.to_string()))
}

/// Google error bodies look like `{"error": {"code": 403, "message": "..."}}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(|m| m.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = endpoint(
            "https://www.googleapis.com/calendar/v3/",
            &["calendars", "team@group.calendar.google.com", "events"],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.googleapis.com/calendar/v3/calendars/team@group.calendar.google.com/events"
        );

        let url = endpoint("http://127.0.0.1:1234", &["spreadsheets", "a b", "values"]).unwrap();
        assert_eq!(url.path(), "/spreadsheets/a%20b/values");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        assert!(endpoint("not a url", &["x"]).is_err());
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error": {"code": 403, "message": "The caller does not have permission"}}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("The caller does not have permission")
        );
        assert_eq!(error_message("<html>"), None);
    }
}
