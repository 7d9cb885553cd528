//! HTTP response building helpers
//!
//! Provides a consistent API for building HTTP responses across all handlers.
//! Errors are always `{"error": message}`; challenge precondition failures
//! also carry a machine-readable `code`.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{header, Response, StatusCode};
use serde::Serialize;

use crate::challenge::ChallengeError;
use crate::error::GenmaveError;

pub type HttpResponse = Response<Full<Bytes>>;

fn build(status: StatusCode, content_type: Option<&str>, body: Bytes) -> HttpResponse {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    if let Some(ct) = content_type {
        if let Ok(value) = header::HeaderValue::from_str(ct) {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
    }
    response
}

/// Build a JSON response with the given status code
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    build(status, Some("application/json"), Bytes::from(json))
}

/// Build a JSON response with 200 OK status
pub fn ok<T: Serialize>(body: &T) -> HttpResponse {
    json_response(StatusCode::OK, body)
}

/// Build a JSON response with 201 Created status
pub fn created<T: Serialize>(body: &T) -> HttpResponse {
    json_response(StatusCode::CREATED, body)
}

/// Build an empty response with 204 No Content status
pub fn no_content() -> HttpResponse {
    build(StatusCode::NO_CONTENT, None, Bytes::new())
}

/// Build a 404 Not Found response with message
pub fn not_found(message: &str) -> HttpResponse {
    json_response(StatusCode::NOT_FOUND, &serde_json::json!({ "error": message }))
}

/// Build a 400 Bad Request response with message
pub fn bad_request(message: &str) -> HttpResponse {
    json_response(StatusCode::BAD_REQUEST, &serde_json::json!({ "error": message }))
}

pub fn method_not_allowed() -> HttpResponse {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &serde_json::json!({ "error": "Method not allowed" }),
    )
}

fn challenge_code(error: &ChallengeError) -> &'static str {
    match error {
        ChallengeError::NotActive(_) => "not_active",
        ChallengeError::DayOutOfRange(_) => "day_out_of_range",
        ChallengeError::NotCurrentDay { .. } => "not_current_day",
        ChallengeError::DayAlreadyCompleted(_) => "day_already_completed",
        ChallengeError::DayLocked(_) => "day_locked",
        ChallengeError::EmptyReflection => "empty_reflection",
        ChallengeError::FeedbackNotDue => "feedback_not_due",
        ChallengeError::UnknownTrack(_) => "unknown_track",
    }
}

/// Convert a GenmaveError to an appropriate HTTP response
pub fn error_response(error: GenmaveError) -> HttpResponse {
    let status = match &error {
        GenmaveError::NotFound(_) => StatusCode::NOT_FOUND,
        GenmaveError::InvalidInput(_) | GenmaveError::Json(_) => StatusCode::BAD_REQUEST,
        GenmaveError::Challenge(ChallengeError::UnknownTrack(_)) => StatusCode::NOT_FOUND,
        GenmaveError::Challenge(ChallengeError::DayOutOfRange(_)) => StatusCode::BAD_REQUEST,
        GenmaveError::Challenge(_) => StatusCode::CONFLICT,
        GenmaveError::Unauthorized => StatusCode::UNAUTHORIZED,
        GenmaveError::Forbidden(_) => StatusCode::FORBIDDEN,
        GenmaveError::Pool(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    }

    let body = match &error {
        GenmaveError::Challenge(e) => serde_json::json!({ "error": e.to_string(), "code": challenge_code(e) }),
        _ => serde_json::json!({ "error": error.to_string() }),
    };
    json_response(status, &body)
}

/// Result type alias for handlers
pub type HandlerResult = Result<HttpResponse, GenmaveError>;

/// Wrap an optional service result into an HTTP response
/// Returns 404 if None
pub fn from_option<T: Serialize>(result: Result<Option<T>, GenmaveError>, not_found_msg: &str) -> HttpResponse {
    match result {
        Ok(Some(value)) => ok(&value),
        Ok(None) => not_found(not_found_msg),
        Err(e) => error_response(e),
    }
}

/// Returns 204 No Content if deleted, 404 Not Found if not found
pub fn from_delete_bool_result(result: Result<bool, GenmaveError>, not_found_msg: &str) -> HttpResponse {
    match result {
        Ok(true) => no_content(),
        Ok(false) => not_found(not_found_msg),
        Err(e) => error_response(e),
    }
}
