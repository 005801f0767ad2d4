//! # HTTP Handlers
//!
//! One module per resource. Every handler follows the same shape:
//!
//! ```text
//! decode (JsonBody / Path / Query)
//!     │
//!     ▼
//! validate (RequestValidator)           ← short-circuits with 400
//!     │
//!     ▼
//! repository call (Arc<dyn ...>)        ← DbError::kind() picks the status
//!     │
//!     ▼
//! envelope: {"data": ..} | {"message": ..} | {"errors": ..}
//! ```

pub mod category;
pub mod fallback;
pub mod health;
pub mod product;
pub mod user;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

/// `200 {"data": ...}`
pub(crate) fn data<T: Serialize>(value: T) -> Json<Value> {
    Json(json!({ "data": value }))
}

/// `201 {"message": ...}`
pub(crate) fn created(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "message": message })))
}

/// Parses a path id. Anything that is not an integer cannot name a row,
/// so it is reported as not found.
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::not_found(entity))
}
