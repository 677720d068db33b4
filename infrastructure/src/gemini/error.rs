//! Classification of Gemini failures into [`GatewayError`].

use naomi_application::ports::llm_gateway::GatewayError;
use reqwest::StatusCode;

/// Map an HTTP error status and body to a [`GatewayError`].
///
/// Gemini reports a bad key as `400 INVALID_ARGUMENT` with an
/// "API key not valid" message, so 400 is inspected before falling through
/// to [`GatewayError::RequestFailed`].
pub fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    let message = error_message(body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string()
    });

    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Authentication(message),
        StatusCode::BAD_REQUEST if is_key_rejection(&message, body) => {
            GatewayError::Authentication(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        s if s.is_server_error() => GatewayError::Unavailable(format!("{}: {}", s.as_u16(), message)),
        s => GatewayError::RequestFailed(format!("{}: {}", s.as_u16(), message)),
    }
}

/// Map a transport failure to a [`GatewayError`].
pub fn classify_transport(err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::Unavailable(err.to_string())
    } else if err.is_decode() {
        GatewayError::MalformedResponse(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(|m| m.as_str())
        .map(String::from)
}

fn is_key_rejection(message: &str, body: &str) -> bool {
    message.contains("API key") || body.contains("API_KEY_INVALID")
}
