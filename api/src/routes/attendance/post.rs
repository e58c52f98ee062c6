use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use services::attempt_limiter::AttemptPolicy;
use services::check_in::{CheckInRequest as CheckInCommand, CheckInService};
use util::state::AppState;
use validator::Validate;

use super::common::{CheckInRequest, CheckInResponse, CheckInResultResponse, ManualCheckInRequest};
use crate::auth::{AuthUser, extractors::ClientIp};
use crate::response::ApiResponse;
use crate::routes::common::{error_response, json_rejection_response, validation_error_response};

/// POST /api/attendance/{session_id}/checkin
///
/// Check the caller in with the session code. Members of the owning team only.
///
/// ### Request Body
/// ```json
/// { "code": "ABC123" }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "check_in": { ... }, "already_checked_in": false },
///   "message": "Checked in successfully"
/// }
/// ```
///   Repeating a successful check-in returns the same record with
///   `already_checked_in: true`.
/// - `400 Bad Request`: malformed code, session cancelled, wrong code, or outside
///   the event window. The window case carries
///   `{ "event_start", "event_end", "grace_minutes" }` in `data`.
/// - `403 Forbidden` (not a team member)
/// - `404 Not Found` (no such session)
/// - `429 Too Many Requests` (too many recent attempts)
pub async fn check_in(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    ClientIp(client_ip): ClientIp,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    if let Err(errors) = req.validate() {
        return validation_error_response(&errors);
    }

    let command = CheckInCommand {
        session_id,
        user_id: claims.sub,
        code: &req.code,
        client_ip: client_ip.as_deref(),
        now: Utc::now(),
    };

    match CheckInService::check_in(app_state.db(), command, AttemptPolicy::from_config()).await {
        Ok(result) => {
            let already = result.already_checked_in();
            let message = if already {
                "Already checked in"
            } else {
                "Checked in successfully"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    CheckInResultResponse {
                        check_in: CheckInResponse::from(result.check_in),
                        already_checked_in: already,
                    },
                    message,
                )),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}

/// POST /api/attendance/{session_id}/checkins/manual
///
/// Record a check-in for a team member without a code. Team admins only.
/// Idempotent like the code path; window and cancellation do not apply.
///
/// ### Request Body
/// ```json
/// { "user_id": 42 }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ check_in, already_checked_in }`
/// - `403 Forbidden` (not a team admin)
/// - `404 Not Found` (no such session, or the user is not a team member)
pub async fn manual_check_in(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<ManualCheckInRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    match CheckInService::check_in_manually(
        app_state.db(),
        session_id,
        user.actor(),
        req.user_id,
        Utc::now(),
    )
    .await
    {
        Ok(result) => {
            let already = result.already_checked_in();
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    CheckInResultResponse {
                        check_in: CheckInResponse::from(result.check_in),
                        already_checked_in: already,
                    },
                    if already {
                        "User was already checked in"
                    } else {
                        "Check-in recorded"
                    },
                )),
            )
                .into_response()
        }
        Err(e) => error_response(e),
    }
}
