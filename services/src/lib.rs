pub mod attendance_record;
pub mod attendance_session;
pub mod service;
pub mod settings;
pub mod stats;

pub use service::ServiceError;
pub use settings::AttendanceSettings;
