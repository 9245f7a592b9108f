use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use db::{
    FieldValue,
    memory::MemoryStore,
    models::attendance_record::{self, COLLECTION},
};
use serde_json::{Value, json};

use crate::helpers::{app::make_test_app_with_store, make_test_app, seed_attendance, send_json};

// ---------------------------
// POST /api/mark-attendance
// ---------------------------

#[tokio::test]
async fn mark_attendance_stores_present_record() {
    let app = make_test_app();

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/mark-attendance",
        Some(json!({ "studentId": "S1", "courseId": "C1", "location": "IT 2-27" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Attendance marked for C1");

    let docs = app.store.documents(COLLECTION).await;
    assert_eq!(docs.len(), 1);
    let (_, doc) = &docs[0];
    assert_eq!(doc[attendance_record::STUDENT_ID], FieldValue::from("S1"));
    assert_eq!(doc[attendance_record::COURSE_ID], FieldValue::from("C1"));
    assert_eq!(doc[attendance_record::STATUS], FieldValue::from("Present"));
    assert_eq!(doc[attendance_record::LOCATION], FieldValue::from("IT 2-27"));
}

#[tokio::test]
async fn identical_scans_are_stored_twice() {
    let app = make_test_app();
    let body = json!({ "studentId": "S1", "courseId": "C1" });

    for _ in 0..2 {
        let (status, _) =
            send_json(&app, "POST", "/api/mark-attendance", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.store.documents(COLLECTION).await.len(), 2);
}

#[tokio::test]
async fn missing_location_uses_default_and_client_timestamp_is_ignored() {
    let app = make_test_app();

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/mark-attendance",
        Some(json!({
            "studentId": "S2",
            "courseId": "C9",
            "timestamp": "1999-01-01T00:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, doc) = app.store.documents(COLLECTION).await.remove(0);
    assert_eq!(doc[attendance_record::LOCATION], FieldValue::from("Campus GPS"));
    match &doc[attendance_record::TIMESTAMP] {
        FieldValue::Timestamp(at) => assert!(at.timestamp() > 946_684_800),
        other => panic!("expected server timestamp, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_ids_are_persisted_as_nulls() {
    let app = make_test_app();

    let (status, _) = send_json(&app, "POST", "/api/mark-attendance", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, doc) = app.store.documents(COLLECTION).await.remove(0);
    assert_eq!(doc[attendance_record::STUDENT_ID], FieldValue::Null);
    assert_eq!(doc[attendance_record::COURSE_ID], FieldValue::Null);
}

#[tokio::test]
async fn store_failure_returns_500_with_success_false() {
    let store = Arc::new(MemoryStore::failing("Missing or insufficient permissions."));
    let app = make_test_app_with_store(store);

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/mark-attendance",
        Some(json!({ "studentId": "S1", "courseId": "C1" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({ "success": false, "error": "Missing or insufficient permissions." })
    );
}

#[tokio::test]
async fn non_string_fields_are_stored_as_sent() {
    let app = make_test_app();

    let (status, json) = send_json(
        &app,
        "POST",
        "/api/mark-attendance",
        Some(json!({ "studentId": 42, "courseId": 301, "location": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Attendance marked for 301");

    let (_, doc) = app.store.documents(COLLECTION).await.remove(0);
    assert_eq!(doc[attendance_record::STUDENT_ID], FieldValue::Integer(42));
    assert_eq!(doc[attendance_record::COURSE_ID], FieldValue::Integer(301));
    assert_eq!(doc[attendance_record::LOCATION], FieldValue::from("Campus GPS"));
}

#[tokio::test]
async fn falsy_location_uses_default() {
    let app = make_test_app();

    for location in [json!(""), json!(false), json!(null)] {
        let (status, _) = send_json(
            &app,
            "POST",
            "/api/mark-attendance",
            Some(json!({ "studentId": "S1", "courseId": "C1", "location": location })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    for (_, doc) in app.store.documents(COLLECTION).await {
        assert_eq!(doc[attendance_record::LOCATION], FieldValue::from("Campus GPS"));
    }
}

#[tokio::test]
async fn malformed_json_is_reported_as_500() {
    let app = make_test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/api/mark-attendance")
        .header("Content-Type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, bytes) = app.send(req).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(app.store.documents(COLLECTION).await.is_empty());
}

// ---------------------------
// GET /api/student-stats/{id}
// ---------------------------

#[tokio::test]
async fn stats_above_threshold_are_excellent() {
    let app = make_test_app();
    seed_attendance(&app.store, "S38", 38).await;
    seed_attendance(&app.store, "other", 5).await;

    let (status, json) = send_json(&app, "GET", "/api/student-stats/S38", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "attendance_pct": 76, "classes_attended": 38, "kpi_status": "Excellent" })
    );
}

#[tokio::test]
async fn stats_below_threshold_need_improvement() {
    let app = make_test_app();
    seed_attendance(&app.store, "S37", 37).await;

    let (_, json) = send_json(&app, "GET", "/api/student-stats/S37", None).await;

    assert_eq!(json["attendance_pct"], 74);
    assert_eq!(json["classes_attended"], 37);
    assert_eq!(json["kpi_status"], "Needs Improvement");
}

#[tokio::test]
async fn stats_for_unknown_student_are_zero() {
    let app = make_test_app();

    let (status, json) = send_json(&app, "GET", "/api/student-stats/nobody", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "attendance_pct": 0, "classes_attended": 0, "kpi_status": "Needs Improvement" })
    );
}

#[tokio::test]
async fn stats_are_not_clamped_above_one_hundred() {
    let app = make_test_app();
    seed_attendance(&app.store, "S60", 60).await;

    let (_, json) = send_json(&app, "GET", "/api/student-stats/S60", None).await;

    assert_eq!(json["attendance_pct"], 120);
    assert_eq!(json["kpi_status"], "Excellent");
}

#[tokio::test]
async fn marked_scans_show_up_in_stats() {
    let app = make_test_app();

    for course in ["C1", "C2", "C3"] {
        send_json(
            &app,
            "POST",
            "/api/mark-attendance",
            Some(json!({ "studentId": "S5", "courseId": course })),
        )
        .await;
    }

    let (_, json) = send_json(&app, "GET", "/api/student-stats/S5", None).await;
    assert_eq!(json["classes_attended"], 3);
    assert_eq!(json["attendance_pct"], 6);
}

#[tokio::test]
async fn stats_store_failure_returns_500_with_error_only() {
    let store = Arc::new(MemoryStore::failing("The service is currently unavailable."));
    let app = make_test_app_with_store(store);

    let (status, json) = send_json(&app, "GET", "/api/student-stats/S1", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "The service is currently unavailable." }));
}

#[tokio::test]
async fn failures_do_not_affect_later_requests() {
    let store = Arc::new(MemoryStore::failing("transient"));
    let app = make_test_app_with_store(store.clone());

    let (status, _) = send_json(&app, "GET", "/api/student-stats/S1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    store.set_failure(None).await;
    let (status, _) = send_json(&app, "GET", "/api/student-stats/S1", None).await;
    assert_eq!(status, StatusCode::OK);
}
