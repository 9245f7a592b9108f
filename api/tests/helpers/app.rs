use std::{fs, sync::Arc};

use api::{
    routes::{app, frontend::FrontendFiles},
    state::AppState,
};
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{Request, StatusCode},
};
use db::{
    DocumentStore, FieldValue,
    memory::MemoryStore,
    models::{NewAttendanceRecord, attendance_record},
};
use serde_json::Value;
use services::AttendanceSettings;
use tempfile::TempDir;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><title>NEVO</title>";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    _static_root: TempDir,
}

impl TestApp {
    /// Sends a request and returns the status and raw body.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Bytes) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Bytes) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }
}

/// App backed by a fresh in-memory store and a temp static root holding an
/// index page, a script, a credential file and a dotfile.
pub fn make_test_app() -> TestApp {
    make_test_app_with_store(Arc::new(MemoryStore::new()))
}

pub fn make_test_app_with_store(store: Arc<MemoryStore>) -> TestApp {
    let static_root = tempfile::tempdir().unwrap();
    fs::write(static_root.path().join("index.html"), INDEX_HTML).unwrap();
    fs::write(static_root.path().join("app.js"), "console.log('nevo');").unwrap();
    fs::write(
        static_root.path().join("serviceAccountKey.json"),
        r#"{"project_id":"secret"}"#,
    )
    .unwrap();
    fs::write(static_root.path().join(".env"), "PORT=3000").unwrap();

    let files = FrontendFiles::new(static_root.path(), "index.html").hide("serviceAccountKey.json");
    make_test_app_with_files(store, files, static_root)
}

/// App serving `files`; `static_root` is kept alive for the app's lifetime.
pub fn make_test_app_with_files(
    store: Arc<MemoryStore>,
    files: FrontendFiles,
    static_root: TempDir,
) -> TestApp {
    let state = AppState::new(
        store.clone() as Arc<dyn DocumentStore>,
        None,
        AttendanceSettings::default(),
    );

    TestApp {
        router: app(state, files),
        store,
        _static_root: static_root,
    }
}

/// Sends `body` (or nothing) as JSON and parses the JSON response.
pub async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let (status, bytes) = app.send(req).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Inserts `count` attendance records for `student_id` directly into the store.
pub async fn seed_attendance(store: &MemoryStore, student_id: &str, count: usize) {
    for i in 0..count {
        let doc = NewAttendanceRecord::new(
            student_id.into(),
            format!("C{}", i % 3).into(),
            FieldValue::Null,
            "Campus GPS",
        )
        .into_document();
        store.add(attendance_record::COLLECTION, doc).await.unwrap();
    }
}
