use crate::store::{Document, FieldValue};

pub const COLLECTION: &str = "ActiveSessions";

pub const FACULTY_ID: &str = "facultyId";
pub const COURSE_NAME: &str = "courseName";
pub const ROOM: &str = "room";
pub const IS_ACTIVE: &str = "isActive";
pub const CREATED_AT: &str = "createdAt";

/// A class session opened by faculty. Always written as active; nothing
/// in the service closes it. Fields are stored as the caller sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSession {
    pub faculty_id: FieldValue,
    pub course_name: FieldValue,
    pub room: FieldValue,
}

impl NewSession {
    pub fn into_document(self) -> Document {
        Document::from([
            (FACULTY_ID.to_owned(), self.faculty_id),
            (COURSE_NAME.to_owned(), self.course_name),
            (ROOM.to_owned(), self.room),
            (IS_ACTIVE.to_owned(), FieldValue::Bool(true)),
            (CREATED_AT.to_owned(), FieldValue::ServerTimestamp),
        ])
    }
}

/// Payload encoded into the session QR code: `<prefix>:<session id>`.
pub fn qr_code_data(prefix: &str, session_id: &str) -> String {
    format!("{prefix}:{session_id}")
}
