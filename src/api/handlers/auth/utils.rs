//! Small helpers shared by the auth handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use regex::Regex;
use tracing::error;

use super::types::ErrorMessage;

/// Basic `local@domain` email format check.
pub(super) fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Non-empty field presence; fields are not trimmed, only emptiness counts.
pub(super) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|field| !field.is_empty())
}

/// Avatar URL derived deterministically from the username at creation time.
pub(super) fn profile_image_url(username: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={username}")
}

/// Extract a client IP for rate limiting from common proxy headers.
pub(super) fn extract_client_ip(headers: &axum::http::HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if forwarded.is_some() {
        return forwarded.map(str::to_string);
    }
    headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(super) fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorMessage::new(message))).into_response()
}

/// Translate an unexpected failure into a 500 response. The generic message
/// is all a production caller sees; detail rides along outside production.
pub(super) fn internal_error(production: bool, err: &anyhow::Error) -> Response {
    error!("Internal error: {err:#}");

    let mut message = ErrorMessage::new("Internal server error.");
    if !production {
        message.detail = Some(format!("{err:#}"));
    }

    (StatusCode::INTERNAL_SERVER_ERROR, Json(message)).into_response()
}
