use axum::{Router, routing::post};

use crate::state::AppState;

mod common;
mod post;

pub use common::{CreateSessionReq, CreateSessionResponse};
pub use post::create_session;

pub fn session_routes() -> Router<AppState> {
    Router::new().route("/create-session", post(create_session))
}
