//! HTTP-facing error responses for the task endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// Token did not match the one recorded for this task.
    Forbidden,
    /// No task with that id has ever been submitted.
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "invalid token"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "unknown task id"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
