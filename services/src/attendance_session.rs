use db::{
    DocumentStore, FieldValue,
    models::{NewSession, attendance_session},
};
use log::info;
use serde::Serialize;

use crate::{service::ServiceError, settings::AttendanceSettings};

/// Session details from faculty, stored as sent.
#[derive(Debug, Clone, Default)]
pub struct CreateSession {
    pub faculty_id: FieldValue,
    pub course_name: FieldValue,
    pub room: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSession {
    pub session_id: String,
    pub qr_code_data: String,
}

pub struct AttendanceSessionService;

impl AttendanceSessionService {
    /// Opens a session. Sessions are written active and never closed here.
    pub async fn create(
        store: &dyn DocumentStore,
        settings: &AttendanceSettings,
        params: CreateSession,
    ) -> Result<CreatedSession, ServiceError> {
        let session = NewSession {
            faculty_id: params.faculty_id,
            course_name: params.course_name,
            room: params.room,
        };

        let session_id = store
            .add(attendance_session::COLLECTION, session.into_document())
            .await?;
        let qr_code_data = attendance_session::qr_code_data(&settings.qr_prefix, &session_id);

        info!("Session {session_id} created");
        Ok(CreatedSession {
            session_id,
            qr_code_data,
        })
    }
}
