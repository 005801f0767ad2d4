//! Per-request deadline.
//!
//! The handler future is dropped when the deadline passes, which drops any
//! database query it is awaiting. The client gets
//! 500 `{"message": "request timed out"}`.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::ApiError;

/// Deadline applied by [`request_timeout`].
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout(pub Duration);

/// Use with `axum::middleware::from_fn_with_state(RequestTimeout(..), request_timeout)`.
pub async fn request_timeout(
    State(RequestTimeout(limit)): State<RequestTimeout>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();

    match tokio::time::timeout(limit, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(%method, %uri, timeout_ms = limit.as_millis() as u64, "Request timed out");
            ApiError::internal("request timed out").into_response()
        }
    }
}
