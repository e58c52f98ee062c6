//! Shared response shapes and error mapping for route handlers.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use services::AttendanceError;
use validator::ValidationErrors;

use crate::response::{ApiResponse, Empty};

/// Joins every field-level validation message into one line.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn validation_error_response(errors: &ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<Empty>::error(format_validation_errors(errors))),
    )
        .into_response()
}

/// Body that failed to parse or had the wrong shape. Reported as a 400 in the
/// usual envelope instead of axum's plain-text rejection.
pub fn json_rejection_response(rejection: JsonRejection) -> Response {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<Empty>::error(format!(
            "Invalid request body: {}",
            rejection.body_text()
        ))),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<db::models::user::Model> for UserResponse {
    fn from(user: db::models::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Returned with a 400 when a check-in falls outside the event window.
#[derive(Debug, Serialize)]
pub struct WindowViolation {
    pub event_start: DateTime<Utc>,
    pub event_end: DateTime<Utc>,
    pub grace_minutes: i32,
}

/// Maps a service error onto the HTTP status and envelope. Store and hashing
/// failures are logged here and reported without detail.
pub fn error_response(err: AttendanceError) -> Response {
    let message = err.to_string();
    let status = match &err {
        AttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
        AttendanceError::Forbidden(_) => StatusCode::FORBIDDEN,
        AttendanceError::InvalidInput(_)
        | AttendanceError::SessionCancelled
        | AttendanceError::InvalidCode => StatusCode::BAD_REQUEST,
        AttendanceError::Conflict(_) => StatusCode::CONFLICT,
        AttendanceError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AttendanceError::OutsideWindow {
            event_start,
            event_end,
            grace_minutes,
        } => {
            let payload = WindowViolation {
                event_start: *event_start,
                event_end: *event_end,
                grace_minutes: *grace_minutes,
            };
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(payload, message)),
            )
                .into_response();
        }
        AttendanceError::Hashing(_) | AttendanceError::Database(_) => {
            tracing::error!(error = %err, "Attendance request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Internal server error")),
            )
                .into_response();
        }
    };

    (status, Json(ApiResponse::<Empty>::error(message))).into_response()
}
