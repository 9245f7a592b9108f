//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables (and an optional
//! `.env` file). It provides thread-safe access and mutation for tests.
//!
//! Most callers use the free accessor functions at the bottom of this module
//! (`config::port()`, `config::total_classes()`, ...) rather than the struct.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    pub static_root: String,
    pub index_file: String,
    pub store_backend: String,
    pub credentials_path: String,
    pub firestore_emulator_host: Option<String>,
    pub google_cloud_project: Option<String>,
    pub firestore_database: String,
    pub total_classes: u32,
    pub default_location: String,
    pub qr_prefix: String,
    pub warehouse_streaming: bool,
    pub warehouse_dataset: String,
    pub warehouse_table: String,
    pub http_timeout_secs: u64,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Panics if a variable is present but cannot be parsed.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let total_classes: u32 = parse_or("TOTAL_CLASSES", 50);
        assert!(total_classes > 0, "TOTAL_CLASSES must be at least 1");

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "nevo-attendance".into()),
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "api=info,db=info,services=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: flag("LOG_TO_STDOUT"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", 3000),
            static_root: env::var("STATIC_ROOT").unwrap_or_else(|_| ".".into()),
            index_file: env::var("INDEX_FILE").unwrap_or_else(|_| "index.html".into()),
            store_backend: env::var("STORE_BACKEND").unwrap_or_else(|_| "firestore".into()),
            credentials_path: env::var("GOOGLE_APPLICATION_CREDENTIALS")
                .unwrap_or_else(|_| "./serviceAccountKey.json".into()),
            firestore_emulator_host: env::var("FIRESTORE_EMULATOR_HOST")
                .ok()
                .filter(|h| !h.trim().is_empty()),
            google_cloud_project: env::var("GOOGLE_CLOUD_PROJECT")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            firestore_database: env::var("FIRESTORE_DATABASE")
                .unwrap_or_else(|_| "(default)".into()),
            total_classes,
            default_location: env::var("DEFAULT_LOCATION")
                .unwrap_or_else(|_| "Campus GPS".into()),
            qr_prefix: env::var("QR_PREFIX").unwrap_or_else(|_| "NEVO".into()),
            warehouse_streaming: flag("WAREHOUSE_STREAMING"),
            warehouse_dataset: env::var("WAREHOUSE_DATASET")
                .unwrap_or_else(|_| "nevo_analytics".into()),
            warehouse_table: env::var("WAREHOUSE_TABLE")
                .unwrap_or_else(|_| "attendance_logs".into()),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 30),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_static_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.static_root = value.into());
    }

    pub fn set_store_backend(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.store_backend = value.into());
    }

    pub fn set_credentials_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.credentials_path = value.into());
    }

    pub fn set_firestore_emulator_host(value: Option<String>) {
        AppConfig::set_field(|cfg| cfg.firestore_emulator_host = value);
    }

    pub fn set_google_cloud_project(value: Option<String>) {
        AppConfig::set_field(|cfg| cfg.google_cloud_project = value);
    }

    /// Override the stats denominator. Zero is ignored.
    pub fn set_total_classes(value: u32) {
        if value > 0 {
            AppConfig::set_field(|cfg| cfg.total_classes = value);
        }
    }

    pub fn set_qr_prefix(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.qr_prefix = value.into());
    }

    pub fn set_warehouse_streaming(value: bool) {
        AppConfig::set_field(|cfg| cfg.warehouse_streaming = value);
    }
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => {
            tracing::debug!("{key} not set, using default");
            default
        }
    }
}

// --- Accessors ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn static_root() -> String {
    AppConfig::global().static_root.clone()
}

pub fn index_file() -> String {
    AppConfig::global().index_file.clone()
}

pub fn store_backend() -> String {
    AppConfig::global().store_backend.clone()
}

pub fn credentials_path() -> String {
    AppConfig::global().credentials_path.clone()
}

pub fn firestore_emulator_host() -> Option<String> {
    AppConfig::global().firestore_emulator_host.clone()
}

/// Project id to use instead of the one in the key file.
pub fn google_cloud_project() -> Option<String> {
    AppConfig::global().google_cloud_project.clone()
}

pub fn firestore_database() -> String {
    AppConfig::global().firestore_database.clone()
}

pub fn total_classes() -> u32 {
    AppConfig::global().total_classes
}

pub fn default_location() -> String {
    AppConfig::global().default_location.clone()
}

pub fn qr_prefix() -> String {
    AppConfig::global().qr_prefix.clone()
}

pub fn warehouse_streaming() -> bool {
    AppConfig::global().warehouse_streaming
}

pub fn warehouse_dataset() -> String {
    AppConfig::global().warehouse_dataset.clone()
}

pub fn warehouse_table() -> String {
    AppConfig::global().warehouse_table.clone()
}

pub fn http_timeout_secs() -> u64 {
    AppConfig::global().http_timeout_secs
}
