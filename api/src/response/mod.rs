//! JSON bodies returned by the API.
//!
//! Success bodies are endpoint specific. Failures are all HTTP 500 and carry
//! the upstream error message as-is:
//!
//! ```json
//! { "error": "Missing or insufficient permissions." }
//! ```
//!
//! Endpoints that report `success` on the happy path also report it on
//! failure:
//!
//! ```json
//! { "success": false, "error": "Missing or insufficient permissions." }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `{ "success": true, "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<bool>,
    error: String,
}

/// A failed request. Always rendered as `500 Internal Server Error`.
#[derive(Debug)]
pub struct ApiError {
    message: String,
    with_success_flag: bool,
}

impl ApiError {
    /// `{ "error": message }`
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            with_success_flag: false,
        }
    }

    /// `{ "success": false, "error": message }`
    pub fn unsuccessful(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            with_success_flag: true,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: self.with_success_flag.then_some(false),
            error: self.message,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
