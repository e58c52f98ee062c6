use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::event::{CreateEvent, EventService};
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{error_response, json_rejection_response, validation_error_response};
use crate::routes::events::common::{CreateEventRequest, EventResponse};

/// POST /api/teams/{team_id}/events
///
/// Create an event for a team. Team admins only.
///
/// ### Request Body
/// ```json
/// {
///   "title": "Weekly build night",
///   "start_time": "2026-03-01T18:00:00Z",
///   "end_time": "2026-03-01T20:00:00Z",
///   "grace_minutes": 10
/// }
/// ```
///
/// ### Responses
/// - `201 Created` with the event
/// - `400 Bad Request` (validation failure, `end_time` before `start_time`)
/// - `403 Forbidden` (not a team admin)
pub async fn create_event(
    State(app_state): State<AppState>,
    Path(team_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    if let Err(errors) = req.validate() {
        return validation_error_response(&errors);
    }

    let params = CreateEvent {
        team_id,
        title: req.title,
        start_time: req.start_time,
        end_time: req.end_time,
        grace_minutes: req.grace_minutes.unwrap_or(0),
    };

    match EventService::create(app_state.db(), user.actor(), params).await {
        Ok(event) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                EventResponse::from(event),
                "Event created successfully",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
