//! User endpoints.
//!
//! - `GET  /users`    - list users (never includes passwords)
//! - `POST /users`    - register a user
//! - `POST /register` - same as `POST /users`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use storefront_core::validation::RULE_UNIQUE;
use storefront_core::NewUser;
use tracing::info;

use super::{created, data};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;

const ENTITY: &str = "user";

pub async fn fetch_users(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = state
        .users
        .fetch()
        .await
        .map_err(|e| ApiError::from_db(ENTITY, e))?;

    Ok(data(users))
}

/// Registers a user.
///
/// ## Flow
/// ```text
/// validate payload ──fail──► 400 {"errors": ..}
///     │
///     ▼
/// get_by_email ──found──► 400 {"message": "Email already exists"}
///     │ not found                (nothing inserted)
///     ▼
/// create (hash + insert) ──► 201 {"message": "User created successfully"}
/// ```
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state.validator.validate(&payload)?;

    let email = payload.email.clone().unwrap_or_default();
    match state.users.get_by_email(&email).await {
        Ok(_) => return Err(ApiError::bad_request(state.validator.message(RULE_UNIQUE))),
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(ApiError::from_db(ENTITY, e)),
    }

    let user = state
        .users
        .create(payload)
        .await
        .map_err(|e| ApiError::from_db(ENTITY, e))?;

    info!(id = user.id, "User created");
    Ok(created("User created successfully"))
}
