use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::attendance_session::AttendanceSessionService;
use services::check_in::CheckInService;
use util::state::AppState;

use super::common::RemovedCheckInResponse;
use crate::auth::AuthUser;
use crate::response::{ApiResponse, Empty};
use crate::routes::common::{UserResponse, error_response};

/// DELETE /api/attendance/{session_id}/checkin/{check_in_id}
///
/// Remove a check-in. Team admins only. The user can check in again afterwards;
/// their logged attempts are kept.
///
/// ### Responses
/// - `200 OK` with `{ "removed_user": { "id", "username", "email" } }`
/// - `400 Bad Request` (check-in belongs to another session)
/// - `403 Forbidden` (not a team admin)
/// - `404 Not Found` (no such session or check-in)
pub async fn remove_check_in(
    State(app_state): State<AppState>,
    Path((session_id, check_in_id)): Path<(i64, i64)>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match CheckInService::remove(app_state.db(), session_id, check_in_id, user.actor()).await {
        Ok(removed) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RemovedCheckInResponse {
                    removed_user: UserResponse::from(removed),
                },
                "Check-in removed",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /api/attendance/{session_id}
///
/// Delete a session with all its check-ins and attempts. Team admins only.
pub async fn delete_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match AttendanceSessionService::delete(app_state.db(), user.actor(), session_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<Empty>::success(
                Empty::default(),
                "Attendance session deleted",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
