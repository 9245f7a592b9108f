use chrono::Utc;
use db::{
    AttendanceLogRow, DocumentStore, FieldValue, Warehouse,
    models::{NewAttendanceRecord, attendance_record},
};
use log::info;

use crate::{service::ServiceError, settings::AttendanceSettings};

/// One student scan. Nothing is required or type-checked; absent ids are
/// stored as nulls.
#[derive(Debug, Clone, Default)]
pub struct MarkAttendance {
    pub student_id: FieldValue,
    pub course_id: FieldValue,
    pub location: FieldValue,
}

pub struct AttendanceRecordService;

impl AttendanceRecordService {
    /// Appends one `Present` record and returns its id.
    ///
    /// Not idempotent: identical calls produce separate records. When a
    /// warehouse is attached the scan is streamed to it after the store
    /// write, and a warehouse failure fails the call.
    pub async fn mark(
        store: &dyn DocumentStore,
        warehouse: Option<&dyn Warehouse>,
        settings: &AttendanceSettings,
        params: MarkAttendance,
    ) -> Result<String, ServiceError> {
        let record = NewAttendanceRecord::new(
            params.student_id.clone(),
            params.course_id.clone(),
            params.location,
            &settings.default_location,
        );

        let id = store
            .add(attendance_record::COLLECTION, record.into_document())
            .await?;

        if let Some(warehouse) = warehouse {
            let row = AttendanceLogRow::present(params.student_id, params.course_id, Utc::now());
            warehouse
                .stream_attendance(row)
                .await
                .map_err(ServiceError::Warehouse)?;
        }

        info!("Attendance document {id} written to {}", store.backend());
        Ok(id)
    }
}
