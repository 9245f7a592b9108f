use std::sync::Arc;

use axum::http::StatusCode;
use db::{
    FieldValue,
    memory::MemoryStore,
    models::attendance_session::{self, COLLECTION},
};
use serde_json::json;

use crate::helpers::{app::make_test_app_with_store, make_test_app, send_json};

#[tokio::test]
async fn create_session_returns_id_and_qr_payload() {
    let app = make_test_app();

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/create-session",
        Some(json!({ "facultyId": "F1", "courseName": "COS301", "room": "IT 4-1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let session_id = json["sessionId"].as_str().unwrap();
    assert!(!session_id.is_empty());
    assert_eq!(json["qrCodeData"], format!("NEVO:{session_id}"));

    let doc = app.store.get(COLLECTION, session_id).await.unwrap();
    assert_eq!(doc[attendance_session::IS_ACTIVE], FieldValue::Bool(true));
    assert_eq!(doc[attendance_session::FACULTY_ID], FieldValue::from("F1"));
    assert_eq!(doc[attendance_session::COURSE_NAME], FieldValue::from("COS301"));
    assert_eq!(doc[attendance_session::ROOM], FieldValue::from("IT 4-1"));
    assert!(matches!(
        doc[attendance_session::CREATED_AT],
        FieldValue::Timestamp(_)
    ));
}

#[tokio::test]
async fn each_call_opens_a_new_session() {
    let app = make_test_app();
    let body = json!({ "facultyId": "F1", "courseName": "COS301", "room": "IT 4-1" });

    let (_, first) = send_json(&app, "POST", "/api/create-session", Some(body.clone())).await;
    let (_, second) = send_json(&app, "POST", "/api/create-session", Some(body)).await;

    assert_ne!(first["sessionId"], second["sessionId"]);
    assert_eq!(app.store.documents(COLLECTION).await.len(), 2);
}

#[tokio::test]
async fn store_failure_returns_500_with_error_only() {
    let store = Arc::new(MemoryStore::failing("Quota exceeded."));
    let app = make_test_app_with_store(store);

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/create-session",
        Some(json!({ "facultyId": "F1", "courseName": "COS301", "room": "IT 4-1" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Quota exceeded." }));
}

#[tokio::test]
async fn session_fields_are_stored_as_sent() {
    let app = make_test_app();

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/create-session",
        Some(json!({ "facultyId": 17, "room": { "building": "IT", "floor": 4 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let session_id = json["sessionId"].as_str().unwrap();
    let doc = app.store.get(COLLECTION, session_id).await.unwrap();
    assert_eq!(doc[attendance_session::FACULTY_ID], FieldValue::Integer(17));
    assert_eq!(doc[attendance_session::COURSE_NAME], FieldValue::Null);
    assert_eq!(
        doc[attendance_session::ROOM],
        FieldValue::from(json!({ "building": "IT", "floor": 4 }))
    );
}
