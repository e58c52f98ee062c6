use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::attendance_session::AttendanceSessionService;
use util::state::AppState;
use validator::Validate;

use super::common::{IssuedSessionResponse, OpenAttendanceRequest};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{error_response, json_rejection_response, validation_error_response};

/// POST /api/events/{event_id}/attendance
///
/// Open the attendance session for an event. Team admins only.
///
/// ### Request Body
/// ```json
/// { "code": "ABC123" }
/// ```
/// `code` is optional; a random 6-character code is generated when omitted.
///
/// ### Responses
/// - `201 Created`: the session and its plaintext `code`. The code is not
///   retrievable afterwards.
/// - `400 Bad Request` (code not 6–10 characters)
/// - `403 Forbidden` (not a team admin)
/// - `404 Not Found` (no such event)
/// - `409 Conflict` (event already has a session)
pub async fn open_attendance(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<OpenAttendanceRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    if let Err(errors) = req.validate() {
        return validation_error_response(&errors);
    }

    match AttendanceSessionService::open(app_state.db(), user.actor(), event_id, req.code).await {
        Ok(issued) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                IssuedSessionResponse::from(issued),
                "Attendance session opened",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
