use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod common;
mod get;
mod post;

pub use common::MarkAttendanceReq;
pub use get::student_stats;
pub use post::mark_attendance;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/mark-attendance", post(mark_attendance))
        .route("/student-stats/{id}", get(student_stats))
}
