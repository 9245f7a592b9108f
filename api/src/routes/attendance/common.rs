use db::FieldValue;
use serde::Deserialize;
use serde_json::Value;
use services::attendance_record::MarkAttendance;

/// Body of a student QR scan. Every field is optional and kept as whatever
/// JSON type the client sent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceReq {
    #[serde(default)]
    pub student_id: Value,
    #[serde(default)]
    pub course_id: Value,
    #[serde(default)]
    pub location: Value,
    /// Device clock at scan time. Accepted for compatibility; the stored
    /// timestamp always comes from the store.
    pub timestamp: Option<Value>,
}

impl From<MarkAttendanceReq> for MarkAttendance {
    fn from(req: MarkAttendanceReq) -> Self {
        MarkAttendance {
            student_id: FieldValue::from(req.student_id),
            course_id: FieldValue::from(req.course_id),
            location: FieldValue::from(req.location),
        }
    }
}
