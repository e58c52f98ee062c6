use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
mod get;
mod post;
mod put;

pub use get::get_event;
pub use post::open_attendance;
pub use put::update_event;

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/{event_id}", get(get_event).put(update_event))
        .route("/{event_id}/attendance", post(open_attendance))
}
