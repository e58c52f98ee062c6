//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/teams` → Event creation under a team (authenticated)
//! - `/events` → Event details and opening attendance (authenticated)
//! - `/attendance` → Sessions, check-in and its administration (authenticated)

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    attendance::attendance_routes, events::event_routes, health::health_routes,
    teams::team_routes,
};
use axum::{Router, middleware::from_fn};
use util::state::AppState;

pub mod attendance;
pub mod common;
pub mod events;
pub mod health;
pub mod teams;

/// Builds the complete application router for all HTTP endpoints.
///
/// Everything except `/health` sits behind `allow_authenticated`, which puts
/// the caller's `AuthUser` into the request extensions.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/teams", team_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/events", event_routes().route_layer(from_fn(allow_authenticated)))
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
