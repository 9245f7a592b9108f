//! HTTP route entry point.
//!
//! Route groups:
//! - `/api/health` → liveness probe
//! - `/api/mark-attendance`, `/api/student-stats/{id}` → attendance records
//! - `/api/create-session` → class sessions
//! - `/` and everything else → static frontend files

use axum::{
    Router,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    middleware::from_fn,
};
use tower_http::cors::CorsLayer;

use crate::{middleware::log_request, state::AppState};

pub mod attendance;
pub mod frontend;
pub mod health;
pub mod sessions;

use attendance::attendance_routes;
use frontend::FrontendFiles;
use health::health_routes;
use sessions::session_routes;

/// Builds the `/api` route group.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .merge(attendance_routes())
        .merge(session_routes())
}

/// The complete application: API under `/api`, static files everywhere else,
/// with request logging and permissive CORS applied to all of it.
pub fn app(app_state: AppState, files: FrontendFiles) -> Router {
    let cors = CorsLayer::very_permissive().expose_headers([CONTENT_DISPOSITION, CONTENT_TYPE]);

    Router::new()
        .nest("/api", routes())
        .merge(files.router())
        .with_state(app_state)
        .layer(from_fn(log_request))
        .layer(cors)
}
