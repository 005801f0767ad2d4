//! Request extractors.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

/// JSON request body.
///
/// Unlike `axum::Json`, the `Content-Type` header is not checked, and every
/// failure (unreadable body, syntax error, wrong field types) is reported
/// the same way: 400 `{"message": "invalid payload"}`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "Failed to read request body");
            ApiError::invalid_payload()
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            debug!(error = %e, "Failed to decode request body");
            ApiError::invalid_payload()
        })
    }
}
