//! Responses for requests no route accepts.
//!
//! ```text
//! unknown path          → 404 {"message": "resource not found"}
//! known path, bad verb  → 405 {"message": "method not allowed"}
//! ```

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::error::ApiError;

pub async fn not_found() -> ApiError {
    ApiError::not_found("resource")
}

pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "method not allowed" })),
    )
}
