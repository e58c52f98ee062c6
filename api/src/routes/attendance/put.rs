use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::attendance_session::AttendanceSessionService;
use util::state::AppState;
use validator::Validate;

use super::common::UpdateSessionRequest;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{error_response, json_rejection_response, validation_error_response};
use crate::routes::events::common::IssuedSessionResponse;

/// PUT /api/attendance/{session_id}
///
/// Cancel or reopen a session and/or rotate its code. Team admins only.
///
/// ### Request Body
/// ```json
/// { "status": "cancelled", "code": "NEWCODE1" }
/// ```
/// Both fields are optional. When `code` is given the response echoes the
/// new plaintext once; existing check-ins stay valid.
pub async fn update_session(
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpdateSessionRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    if let Err(errors) = req.validate() {
        return validation_error_response(&errors);
    }

    match AttendanceSessionService::update(
        app_state.db(),
        user.actor(),
        session_id,
        req.status,
        req.code,
    )
    .await
    {
        Ok(issued) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                IssuedSessionResponse::from(issued),
                "Attendance session updated",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
