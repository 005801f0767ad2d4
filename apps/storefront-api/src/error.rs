//! # API Error Type
//!
//! Every failed request ends as an [`ApiError`], which renders the JSON
//! envelope and status code.
//!
//! ## Error Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                          Status   Body                          │
//! │  ──────                          ──────   ────                          │
//! │  malformed JSON                  400      {"message": "invalid payload"}│
//! │  FieldErrors (validation)        400      {"errors": {field: [..]}}     │
//! │  duplicate email                 400      {"message": "Email already …"}│
//! │  ErrorKind::NotFound             404      {"message": "<entity> not …"} │
//! │  ErrorKind::BadRequest           400      {"message": <error text>}     │
//! │  anything else                   500      {"message": <error text>}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers branch on [`ErrorKind`], never on message text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use storefront_core::{ErrorKind, FieldErrors};
use storefront_db::DbError;

/// API error returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A single message under the status implied by `kind`.
    #[error("{message}")]
    Message { kind: ErrorKind, message: String },

    /// Field-level validation failures.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ApiError::Message {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::BadRequest, message)
    }

    /// `"<entity> not found"`, e.g. `"product not found"`.
    pub fn not_found(entity: &str) -> Self {
        ApiError::new(ErrorKind::NotFound, format!("{} not found", entity))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorKind::InternalServer, message)
    }

    /// The body for undecodable request payloads.
    pub fn invalid_payload() -> Self {
        ApiError::bad_request("invalid payload")
    }

    /// Maps a repository error, naming `entity` in the not-found message.
    pub fn from_db(entity: &str, err: DbError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => ApiError::not_found(entity),
            kind => ApiError::new(kind, err.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Message { kind, .. } => *kind,
            ApiError::Validation(_) => ErrorKind::BadRequest,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = match self {
            ApiError::Message { message, .. } => json!({ "message": message }),
            ApiError::Validation(errors) => json!({ "errors": errors }),
        };

        (status, Json(body)).into_response()
    }
}
