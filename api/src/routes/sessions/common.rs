use db::FieldValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use services::attendance_session::{CreateSession, CreatedSession};

/// Session details from faculty. Fields are optional and untyped.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionReq {
    #[serde(default)]
    pub faculty_id: Value,
    #[serde(default)]
    pub course_name: Value,
    #[serde(default)]
    pub room: Value,
}

impl From<CreateSessionReq> for CreateSession {
    fn from(req: CreateSessionReq) -> Self {
        CreateSession {
            faculty_id: FieldValue::from(req.faculty_id),
            course_name: FieldValue::from(req.course_name),
            room: FieldValue::from(req.room),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub success: bool,
    #[serde(flatten)]
    pub session: CreatedSession,
}

impl From<CreatedSession> for CreateSessionResponse {
    fn from(session: CreatedSession) -> Self {
        Self {
            success: true,
            session,
        }
    }
}
