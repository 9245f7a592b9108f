use crate::store::{Document, FieldValue};

pub const COLLECTION: &str = "Attendance";

pub const STUDENT_ID: &str = "studentId";
pub const COURSE_ID: &str = "courseId";
pub const STATUS: &str = "status";
pub const TIMESTAMP: &str = "timestamp";
pub const LOCATION: &str = "location";

/// Every record written by a scan carries this status.
pub const STATUS_PRESENT: &str = "Present";

/// One scan, as it will be written to the `Attendance` collection.
///
/// Identity fields are stored as the caller sent them, whatever their type;
/// absent values are persisted as nulls. A falsy location (absent, null,
/// empty, zero or `false`) is replaced by the default.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceRecord {
    pub student_id: FieldValue,
    pub course_id: FieldValue,
    pub location: FieldValue,
}

impl NewAttendanceRecord {
    pub fn new(
        student_id: FieldValue,
        course_id: FieldValue,
        location: FieldValue,
        default_location: &str,
    ) -> Self {
        let location = if location.is_falsy() {
            FieldValue::from(default_location)
        } else {
            location
        };

        Self {
            student_id,
            course_id,
            location,
        }
    }

    pub fn into_document(self) -> Document {
        Document::from([
            (STUDENT_ID.to_owned(), self.student_id),
            (COURSE_ID.to_owned(), self.course_id),
            (STATUS.to_owned(), FieldValue::from(STATUS_PRESENT)),
            (TIMESTAMP.to_owned(), FieldValue::ServerTimestamp),
            (LOCATION.to_owned(), self.location),
        ])
    }
}
