//! Application state shared across Axum route handlers.
//!
//! Holds the long-lived handles to the external services. Built once at
//! startup by [`AppState::init`], cloned into every handler through Axum's
//! `State<T>` extractor, and torn down by [`AppState::shutdown`] after the
//! server has drained.

use std::sync::Arc;

use db::{Connections, DocumentStore, StoreError, Warehouse};
use services::AttendanceSettings;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn DocumentStore>,
    warehouse: Option<Arc<dyn Warehouse>>,
    settings: Arc<AttendanceSettings>,
    project_id: Option<String>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        warehouse: Option<Arc<dyn Warehouse>>,
        settings: AttendanceSettings,
    ) -> Self {
        Self {
            store,
            warehouse,
            settings: Arc::new(settings),
            project_id: None,
        }
    }

    /// Connects to the configured backends and captures the attendance settings.
    pub async fn init() -> Result<Self, StoreError> {
        let Connections {
            store,
            warehouse,
            project_id,
        } = db::connect().await?;

        let mut state = Self::new(store, warehouse, AttendanceSettings::from_config());
        state.project_id = project_id;
        Ok(state)
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn warehouse(&self) -> Option<&dyn Warehouse> {
        self.warehouse.as_deref()
    }

    pub fn settings(&self) -> &AttendanceSettings {
        &self.settings
    }

    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// Releases the store client. Requests arriving afterwards may fail.
    pub async fn shutdown(&self) {
        match self.store.shutdown().await {
            Ok(()) => info!("Closed {} store", self.store.backend()),
            Err(e) => warn!("Error while closing {} store: {e}", self.store.backend()),
        }
    }
}
