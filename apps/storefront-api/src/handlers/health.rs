//! Liveness probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// `200 {"status": "ok", "database": "<engine>"}`, or 503 when the database
/// does not answer.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let engine = state.db.engine().to_string();

    if state.db.health_check().await {
        (StatusCode::OK, Json(json!({ "status": "ok", "database": engine })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "unavailable", "database": engine })),
        )
    }
}
