//! Category endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use storefront_core::NewCategory;
use tracing::info;

use super::{created, data, parse_id};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;

const ENTITY: &str = "category";

pub async fn fetch_categories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let categories = state
        .categories
        .fetch()
        .await
        .map_err(|e| ApiError::from_db(ENTITY, e))?;

    Ok(data(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    let category = state
        .categories
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_db(ENTITY, e))?;

    Ok(data(category))
}

/// Creates a category. Insert failures (such as a taken id) are 500s.
pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewCategory>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let category = state
        .categories
        .create(payload)
        .await
        .map_err(|e| ApiError::from_db(ENTITY, e))?;

    info!(id = category.id, "Category created");
    Ok(created("Category created successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{get, post, test_app};

    #[tokio::test]
    async fn test_empty_list() {
        let (app, _db) = test_app().await;

        let res = get(&app, "/api/v1/categories").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (app, _db) = test_app().await;

        let res = post(&app, "/api/v1/categories", r#"{"id":4,"name":"Snacks"}"#).await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.body, json!({"message": "Category created successfully"}));

        let res = get(&app, "/api/v1/categories/4").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!({"data": {"id": 4, "name": "Snacks"}}));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_a_server_error() {
        let (app, _db) = test_app().await;
        post(&app, "/api/v1/categories", r#"{"id":1,"name":"Drinks"}"#).await;

        let res = post(&app, "/api/v1/categories", r#"{"id":1,"name":"Again"}"#).await;
        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.body["message"].is_string());

        let res = get(&app, "/api/v1/categories").await;
        assert_eq!(res.body, json!({"data": [{"id": 1, "name": "Drinks"}]}));
    }

    #[tokio::test]
    async fn test_not_found() {
        let (app, _db) = test_app().await;

        let res = get(&app, "/api/v1/categories/9").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body, json!({"message": "category not found"}));

        let res = get(&app, "/api/v1/categories/abc").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let (app, _db) = test_app().await;

        let res = post(&app, "/api/v1/categories", r#"{"id":"one"}"#).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body, json!({"message": "invalid payload"}));
    }
}
