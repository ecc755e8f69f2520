//! HTTP route entry point.
//!
//! - `/health` → liveness probe (public)
//! - `/attendance` → check-in, bulk sync, corrections and codes (authenticated)

use axum::{Router, middleware::from_fn};

use crate::auth::guards::allow_authenticated;
use crate::routes::{attendance::attendance_routes, health::health_routes};
use crate::state::AppState;

pub mod attendance;
pub mod health;

/// Builds the application router with its state applied.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}
