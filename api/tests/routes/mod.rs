mod attendance_test;
mod cors_test;
mod sessions_test;
