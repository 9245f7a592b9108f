pub mod attendance_record;
pub mod attendance_session;

pub use attendance_record::NewAttendanceRecord;
pub use attendance_session::NewSession;
