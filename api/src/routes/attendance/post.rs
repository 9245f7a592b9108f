use axum::{Json, extract::State, extract::rejection::JsonRejection};
use services::attendance_record::{AttendanceRecordService, MarkAttendance};
use tracing::{debug, error, info};

use super::common::MarkAttendanceReq;
use crate::{
    response::{ApiError, MessageResponse},
    state::AppState,
};

/// POST /api/mark-attendance
///
/// Stores one `Present` record for the scan. Calling twice stores twice.
///
/// ### Request Body
/// ```json
/// { "studentId": "u21000001", "courseId": "COS301", "location": "IT 2-27" }
/// ```
///
/// ### Responses
/// - `200 OK` → `{ "success": true, "message": "Attendance marked for COS301" }`
/// - `500 Internal Server Error` → `{ "success": false, "error": "<reason>" }`
pub async fn mark_attendance(
    State(state): State<AppState>,
    payload: Result<Json<MarkAttendanceReq>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        error!("Rejected attendance payload: {rejection}");
        ApiError::unsuccessful(rejection.body_text())
    })?;

    if body.timestamp.is_some() {
        debug!("Ignoring client-supplied scan timestamp");
    }

    let params: MarkAttendance = body.into();
    let student = params.student_id.clone();
    let course = params.course_id.clone();

    AttendanceRecordService::mark(state.store(), state.warehouse(), state.settings(), params)
        .await
        .map_err(|e| {
            error!("Failed to record attendance for {student} -> {course}: {e}");
            ApiError::unsuccessful(e.to_string())
        })?;

    info!("Attendance recorded: {student} -> {course}");
    Ok(Json(MessageResponse::success(format!(
        "Attendance marked for {course}"
    ))))
}
