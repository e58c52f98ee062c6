use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::attendance_session::{AttendanceSessionService, accepting_window};
use services::check_in::CheckInService;
use util::state::AppState;
use validator::Validate;

use super::common::{
    AttemptListResponse, AttemptResponse, AttemptsQuery, CheckInEntry, CheckInResponse,
    SessionSummaryResponse,
};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{error_response, validation_error_response};
use crate::routes::events::common::{EventResponse, SessionResponse};

/// GET /api/attendance/{session_id}
///
/// Session summary for members of the owning team: status, the event and its
/// accepting window, how many have checked in, and the caller's own check-in.
pub async fn get_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match AttendanceSessionService::summary(app_state.db(), user.actor(), session_id).await {
        Ok(summary) => {
            let (opens_at, closes_at) = accepting_window(&summary.event);
            let response = SessionSummaryResponse {
                session: SessionResponse::from(summary.session),
                event: EventResponse::from(summary.event),
                opens_at,
                closes_at,
                check_in_count: summary.check_in_count,
                my_check_in: summary.my_check_in.map(CheckInResponse::from),
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(response, "Attendance session retrieved")),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/attendance/{session_id}/checkins
///
/// Everyone checked in to the session, oldest first. Team admins only.
pub async fn list_check_ins(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match CheckInService::list(app_state.db(), session_id, user.actor()).await {
        Ok(rows) => {
            let entries: Vec<CheckInEntry> = rows.into_iter().map(CheckInEntry::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(entries, "Check-ins retrieved")),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/attendance/{session_id}/attempts
///
/// Verification attempt log, newest first. Team admins only.
///
/// ### Query Parameters
/// - `page` (default 1)
/// - `per_page` (default 20, max 100)
/// - `success` (optional `true`/`false` filter)
pub async fn list_attempts(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<AttemptsQuery>,
) -> Response {
    if let Err(errors) = query.validate() {
        return validation_error_response(&errors);
    }

    match AttendanceSessionService::attempts(
        app_state.db(),
        user.actor(),
        session_id,
        query.success,
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(20),
    )
    .await
    {
        Ok(page) => {
            let response = AttemptListResponse {
                attempts: page.attempts.into_iter().map(AttemptResponse::from).collect(),
                page: page.page,
                per_page: page.per_page,
                total: page.total,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(response, "Attempts retrieved")),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
