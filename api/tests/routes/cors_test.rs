use axum::{
    body::Body,
    http::{
        Method, Request, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
            ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
        },
    },
};
use tower::ServiceExt;

use crate::helpers::make_test_app;

const FRONTEND_ORIGIN: &str = "http://localhost:5173";

#[tokio::test]
async fn preflight_allows_any_origin() {
    let app = make_test_app();

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/mark-attendance")
        .header(ORIGIN, FRONTEND_ORIGIN)
        .header(ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
        FRONTEND_ORIGIN
    );
}

#[tokio::test]
async fn api_responses_carry_cors_headers() {
    let app = make_test_app();

    let req = Request::builder()
        .uri("/api/student-stats/S1")
        .header(ORIGIN, FRONTEND_ORIGIN)
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
        FRONTEND_ORIGIN
    );
    let exposed = response.headers()[ACCESS_CONTROL_EXPOSE_HEADERS]
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(exposed.contains("content-disposition"));
}
