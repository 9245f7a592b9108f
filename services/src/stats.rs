//! Per-student attendance statistics.
//!
//! The percentage is measured against [`AttendanceSettings::total_classes`]
//! rather than the student's real timetable, and is deliberately not clamped:
//! a student with more records than classes reports more than 100%.

use db::{DocumentStore, FieldValue, models::attendance_record};
use serde::Serialize;

use crate::{service::ServiceError, settings::AttendanceSettings};

/// Percentages strictly above this are "Excellent".
pub const EXCELLENT_ABOVE_PCT: u64 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KpiStatus {
    Excellent,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl KpiStatus {
    pub fn for_percentage(pct: u64) -> Self {
        if pct > EXCELLENT_ABOVE_PCT {
            KpiStatus::Excellent
        } else {
            KpiStatus::NeedsImprovement
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentStats {
    pub attendance_pct: u64,
    pub classes_attended: u64,
    pub kpi_status: KpiStatus,
}

/// `round(attended / total * 100)` with halves rounding up, in integers.
pub fn attendance_percentage(attended: u64, total_classes: u64) -> u64 {
    (attended * 200 + total_classes) / (total_classes * 2)
}

pub fn compute_stats(attended: u64, settings: &AttendanceSettings) -> StudentStats {
    let attendance_pct = attendance_percentage(attended, u64::from(settings.total_classes.get()));
    StudentStats {
        attendance_pct,
        classes_attended: attended,
        kpi_status: KpiStatus::for_percentage(attendance_pct),
    }
}

pub struct StatsService;

impl StatsService {
    /// Counts every attendance record for `student_id`, across all courses.
    pub async fn for_student(
        store: &dyn DocumentStore,
        settings: &AttendanceSettings,
        student_id: &str,
    ) -> Result<StudentStats, ServiceError> {
        let attended = store
            .count_where_eq(
                attendance_record::COLLECTION,
                attendance_record::STUDENT_ID,
                &FieldValue::from(student_id),
            )
            .await?;

        Ok(compute_stats(attended, settings))
    }
}
