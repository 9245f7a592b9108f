use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::{response::MessageResponse, state::AppState};

/// Builds the `/health` route.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /api/health
///
/// Reports that the process is up. Does not touch the document store.
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "message": "Health check passed"
/// }
/// ```
async fn health_check() -> impl IntoResponse {
    Json(MessageResponse::success("Health check passed"))
}
