//! Clients for the two external collaborators: the document store that holds
//! attendance and session records, and the optional analytics warehouse.
//!
//! Handles are built once by [`connect`] and shared for the lifetime of the
//! process.

pub mod auth;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod models;
pub mod store;
pub mod warehouse;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use util::config;

pub use error::StoreError;
pub use store::{Document, DocumentStore, FieldValue};
pub use warehouse::{AttendanceLogRow, Warehouse};

use auth::{ServiceAccount, TokenProvider};
use firestore::FirestoreStore;
use memory::MemoryStore;
use warehouse::bigquery::BigQueryWarehouse;

/// Long-lived handles to the external services.
#[derive(Clone)]
pub struct Connections {
    pub store: Arc<dyn DocumentStore>,
    pub warehouse: Option<Arc<dyn Warehouse>>,
    /// Project the store is bound to, if it has one.
    pub project_id: Option<String>,
}

/// Builds the store (and warehouse, when streaming is enabled) from the global config.
pub async fn connect() -> Result<Connections, StoreError> {
    let backend = config::store_backend();

    if backend.eq_ignore_ascii_case("memory") {
        info!("Using in-memory document store");
        if config::warehouse_streaming() {
            tracing::warn!("WAREHOUSE_STREAMING ignored for the in-memory store");
        }
        return Ok(Connections {
            store: Arc::new(MemoryStore::new()),
            warehouse: None,
            project_id: None,
        });
    }

    if !backend.eq_ignore_ascii_case("firestore") {
        return Err(StoreError::Backend(format!(
            "Unknown STORE_BACKEND '{backend}' (expected 'firestore' or 'memory')"
        )));
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config::http_timeout_secs()))
        .build()?;
    let database = config::firestore_database();
    let emulator_host = config::firestore_emulator_host();

    // The emulator needs no credentials, only a project id.
    if let (Some(host), Some(project_id)) = (&emulator_host, config::google_cloud_project()) {
        if !config::warehouse_streaming() {
            info!("Using Firestore emulator at {host} for project {project_id}");
            return Ok(Connections {
                store: Arc::new(FirestoreStore::emulator(http, host, &project_id, &database)),
                warehouse: None,
                project_id: Some(project_id),
            });
        }
    }

    let account = ServiceAccount::from_file(&config::credentials_path())?;
    let project_id = config::google_cloud_project().unwrap_or_else(|| account.project_id.clone());
    let tokens = Arc::new(TokenProvider::new(http.clone(), account));

    let store = match emulator_host {
        Some(host) => {
            info!("Using Firestore emulator at {host}");
            FirestoreStore::emulator(http.clone(), &host, &project_id, &database)
        }
        None => FirestoreStore::new(http.clone(), tokens.clone(), &project_id, &database),
    };

    let warehouse: Option<Arc<dyn Warehouse>> = if config::warehouse_streaming() {
        info!(
            "Streaming attendance to BigQuery {}.{}",
            config::warehouse_dataset(),
            config::warehouse_table()
        );
        Some(Arc::new(BigQueryWarehouse::new(
            http,
            tokens,
            &project_id,
            &config::warehouse_dataset(),
            &config::warehouse_table(),
        )))
    } else {
        None
    };

    Ok(Connections {
        store: Arc::new(store),
        warehouse,
        project_id: Some(project_id),
    })
}
