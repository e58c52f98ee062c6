use axum::{
    Router,
    routing::{delete, get, post},
};
use util::state::AppState;

pub mod common;
mod delete;
mod get;
mod post;
mod put;

pub use delete::{delete_session, remove_check_in};
pub use get::{get_session, list_attempts, list_check_ins};
pub use post::{check_in, manual_check_in};
pub use put::update_session;

/// Builds the `/attendance` route group. Every handler resolves the owning
/// team from the session and checks membership or admin rights itself.
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{session_id}",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route("/{session_id}/checkin", post(check_in))
        .route("/{session_id}/checkin/{check_in_id}", delete(remove_check_in))
        .route("/{session_id}/checkins", get(list_check_ins))
        .route("/{session_id}/checkins/manual", post(manual_check_in))
        .route("/{session_id}/attempts", get(list_attempts))
}
