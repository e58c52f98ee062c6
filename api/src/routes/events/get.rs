use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::event::EventService;
use util::state::AppState;

use super::common::EventResponse;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::error_response;

/// GET /api/events/{event_id}
///
/// Event details for members of the owning team.
pub async fn get_event(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
    Extension(user): Extension<AuthUser>,
) -> Response {
    match EventService::get(app_state.db(), user.actor(), event_id).await {
        Ok(event) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                EventResponse::from(event),
                "Event retrieved successfully",
            )),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
