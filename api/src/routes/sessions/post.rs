use axum::{Json, extract::State, extract::rejection::JsonRejection};
use services::attendance_session::AttendanceSessionService;
use tracing::{error, info};

use super::common::{CreateSessionReq, CreateSessionResponse};
use crate::{response::ApiError, state::AppState};

/// POST /api/create-session
///
/// Opens a class session for faculty and returns the payload to render as a
/// QR code for students to scan.
///
/// ### Request Body
/// ```json
/// { "facultyId": "lect-17", "courseName": "COS301", "room": "IT 4-1" }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "sessionId": "Xc9...", "qrCodeData": "NEVO:Xc9..." }
/// ```
/// - `500 Internal Server Error` → `{ "error": "<reason>" }`
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionReq>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        error!("Rejected session payload: {rejection}");
        ApiError::new(rejection.body_text())
    })?;

    let created = AttendanceSessionService::create(state.store(), state.settings(), body.into())
        .await
        .map_err(|e| {
            error!("Failed to create session: {e}");
            ApiError::new(e.to_string())
        })?;

    info!("Session {} opened", created.session_id);
    Ok(Json(created.into()))
}
