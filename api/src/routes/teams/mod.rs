use axum::{Router, routing::post};
use util::state::AppState;

mod post;

pub use post::create_event;

pub fn team_routes() -> Router<AppState> {
    Router::new().route("/{team_id}/events", post(create_event))
}
