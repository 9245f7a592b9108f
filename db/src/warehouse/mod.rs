//! # Analytics warehouse
//!
//! Optional downstream sink for attendance scans. Nothing here is wired in
//! unless `WAREHOUSE_STREAMING=true`; the document store stays the system of
//! record either way.

pub mod bigquery;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::StoreError, store::FieldValue};

/// Row shape of the `attendance_logs` table. Ids are forwarded as the
/// caller sent them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceLogRow {
    pub student_id: FieldValue,
    pub course_id: FieldValue,
    /// BigQuery `DATETIME` literal, no zone.
    pub scan_time: String,
    pub status: &'static str,
}

impl AttendanceLogRow {
    pub const STATUS_PRESENT: &'static str = "PRESENT";

    pub fn present(
        student_id: FieldValue,
        course_id: FieldValue,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            student_id,
            course_id,
            scan_time: scanned_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            status: Self::STATUS_PRESENT,
        }
    }
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    async fn stream_attendance(&self, row: AttendanceLogRow) -> Result<(), StoreError>;
}
