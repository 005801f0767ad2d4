//! Product endpoints.
//!
//! `GET /products` has two shapes:
//!
//! ```text
//! /products                      → {"data": [product, ...]}
//! /products?page=2&per_page=5    → {"data": {"metadata": {..}, "products": [..]}}
//! ```
//!
//! Unparsable or non-positive `page` / `per_page` values fall back to the
//! defaults (1 and 10); they never produce a 400. A repeated key keeps its
//! first value, and unknown keys are ignored.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::Value;
use storefront_core::{Page, PageMetadata, Pagination};
use tracing::debug;

use super::{data, parse_id};
use crate::error::ApiError;
use crate::AppState;

const ENTITY: &str = "product";

/// Raw query parameters; parsed leniently by [`Pagination::from_query`].
#[derive(Debug, Default, PartialEq)]
pub struct ProductQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ProductQuery {
    /// Picks `page` and `per_page` out of the raw pairs, first occurrence wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = ProductQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "per_page" => &mut query.per_page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    fn is_paginated(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }
}

pub async fn fetch_products(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let query = match query {
        Ok(Query(pairs)) => ProductQuery::from_pairs(pairs),
        Err(e) => {
            debug!(error = %e, "Ignoring malformed product query");
            ProductQuery::default()
        }
    };

    if !query.is_paginated() {
        let products = state
            .products
            .fetch()
            .await
            .map_err(|e| ApiError::from_db(ENTITY, e))?;
        return Ok(data(products));
    }

    let pagination = Pagination::from_query(query.page.as_deref(), query.per_page.as_deref());
    let (total, products) = state
        .products
        .fetch_paginated(pagination.offset(), pagination.limit())
        .await
        .map_err(|e| ApiError::from_db(ENTITY, e))?;

    Ok(data(Page {
        metadata: PageMetadata::new(pagination, products.len(), total),
        products,
    }))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    let product = state
        .products
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::from_db(ENTITY, e))?;

    Ok(data(product))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::ProductQuery;
    use crate::test_support::{get, seed_products, test_app};

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_from_pairs() {
        assert_eq!(ProductQuery::from_pairs(vec![]), ProductQuery::default());

        let query = ProductQuery::from_pairs(pairs(&[
            ("page", "1"),
            ("sort", "name"),
            ("page", "2"),
            ("per_page", "5"),
        ]));
        assert_eq!(query.page.as_deref(), Some("1"));
        assert_eq!(query.per_page.as_deref(), Some("5"));
        assert!(query.is_paginated());

        assert!(!ProductQuery::from_pairs(pairs(&[("sort", "name")])).is_paginated());
    }

    #[tokio::test]
    async fn test_empty_list() {
        let (app, _db) = test_app().await;

        let res = get(&app, "/api/v1/products").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!({"data": []}));
    }

    #[tokio::test]
    async fn test_plain_list() {
        let (app, db) = test_app().await;
        seed_products(&db, 3).await;

        let res = get(&app, "/api/v1/products").await;
        let products = res.body["data"].as_array().unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0]["id"], 1);
        assert_eq!(products[0]["category"], json!({"id": 1, "name": "Drinks"}));
    }

    #[tokio::test]
    async fn test_paginated_metadata() {
        let (app, db) = test_app().await;
        seed_products(&db, 12).await;

        let res = get(&app, "/api/v1/products?page=2&per_page=5").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            res.body["data"]["metadata"],
            json!({"page": 2, "per_page": 5, "sub_total": 5, "total": 12, "total_pages": 3})
        );
        let ids: Vec<i64> = res.body["data"]["products"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);
    }

    #[tokio::test]
    async fn test_bad_page_values_fall_back() {
        let (app, db) = test_app().await;
        seed_products(&db, 12).await;

        let res = get(&app, "/api/v1/products?page=abc&per_page=-3").await;
        assert_eq!(res.status, StatusCode::OK);
        let metadata = &res.body["data"]["metadata"];
        assert_eq!(metadata["page"], 1);
        assert_eq!(metadata["per_page"], 10);
        assert_eq!(metadata["sub_total"], 10);
        assert_eq!(metadata["total_pages"], 2);
    }

    #[tokio::test]
    async fn test_repeated_page_key_stays_paginated() {
        let (app, db) = test_app().await;
        seed_products(&db, 12).await;

        let res = get(&app, "/api/v1/products?page=1&page=2&per_page=5").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            res.body["data"]["metadata"],
            json!({"page": 1, "per_page": 5, "sub_total": 5, "total": 12, "total_pages": 3})
        );
        assert_eq!(res.body["data"]["products"][0]["id"], 1);

        let res = get(&app, "/api/v1/products?per_page=4&per_page=x").await;
        assert_eq!(res.body["data"]["metadata"]["per_page"], 4);
        assert_eq!(res.body["data"]["metadata"]["page"], 1);
    }

    #[tokio::test]
    async fn test_undecodable_row_is_internal_error() {
        let (app, db) = test_app().await;
        seed_products(&db, 3).await;
        db.execute("UPDATE products SET price = 'abc' WHERE id = 3")
            .await
            .unwrap();

        for uri in ["/api/v1/products", "/api/v1/products?page=1&per_page=10"] {
            let res = get(&app, uri).await;
            assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            let message = res.body["message"].as_str().unwrap();
            assert!(message.starts_with("Query failed"), "{}", message);
            assert!(res.body.get("data").is_none());
        }

        let res = get(&app, "/api/v1/products/1").await;
        assert_eq!(res.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (app, db) = test_app().await;
        seed_products(&db, 2).await;

        let res = get(&app, "/api/v1/products/2").await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(
            res.body,
            json!({"data": {
                "id": 2,
                "name": "Product 2",
                "description": "Item 2",
                "price": 5.0,
                "image_url": "https://img.example/2.png",
                "stock": 10,
                "sold": 2,
                "category": {"id": 1, "name": "Drinks"}
            }})
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let (app, _db) = test_app().await;

        let res = get(&app, "/api/v1/products/999").await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body, json!({"message": "product not found"}));
    }
}
