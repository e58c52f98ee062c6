use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::event::EventChanges;
use services::event::EventService;
use util::state::AppState;
use validator::Validate;

use super::common::{EventResponse, UpdateEventRequest};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{error_response, json_rejection_response, validation_error_response};

/// PUT /api/events/{event_id}
///
/// Update an event's title, times or grace period. Team admins only. Omitted
/// fields are left as they are; the resulting schedule must still be valid.
pub async fn update_event(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<UpdateEventRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(rejection) => return json_rejection_response(rejection),
    };

    if let Err(errors) = req.validate() {
        return validation_error_response(&errors);
    }

    let changes = EventChanges {
        title: req.title,
        start_time: req.start_time,
        end_time: req.end_time,
        grace_minutes: req.grace_minutes,
    };

    match EventService::update(app_state.db(), user.actor(), event_id, changes).await {
        Ok(event) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                EventResponse::from(event),
                "Event updated successfully",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
