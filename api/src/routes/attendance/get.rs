use axum::{
    Json,
    extract::{Path, State},
};
use services::stats::{StatsService, StudentStats};
use tracing::error;

use crate::{response::ApiError, state::AppState};

/// GET /api/student-stats/{id}
///
/// Attendance summary for one student across all courses.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "attendance_pct": 76, "classes_attended": 38, "kpi_status": "Excellent" }
/// ```
/// - `500 Internal Server Error` → `{ "error": "<reason>" }`
pub async fn student_stats(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<StudentStats>, ApiError> {
    StatsService::for_student(state.store(), state.settings(), &student_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Failed to load stats for {student_id}: {e}");
            ApiError::new(e.to_string())
        })
}
