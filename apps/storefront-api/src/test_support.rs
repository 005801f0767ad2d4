//! Helpers for driving the router in tests without binding a socket.

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use storefront_db::Database;
use tower::ServiceExt;

use crate::{router, AppState};

/// A router over a fresh in-memory database, plus the database handle for seeding.
pub(crate) async fn test_app() -> (Router, Database) {
    let db = Database::in_memory().await.unwrap();
    let app = router(AppState::new(db.clone()), Duration::from_secs(5));
    (app, db)
}

/// Response status, headers and body (`Value::Null` when the body is empty).
pub(crate) struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub(crate) async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse { status, headers, body }
}

pub(crate) async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None).await
}

pub(crate) async fn post(app: &Router, uri: &str, body: &str) -> TestResponse {
    send(app, Method::POST, uri, Some(body)).await
}

/// One category (id 1, "Drinks") and `count` products in it, ids 1..=count.
pub(crate) async fn seed_products(db: &Database, count: usize) {
    let mut sql = String::from("INSERT INTO categories (id, name) VALUES (1, 'Drinks');");
    for i in 1..=count {
        sql.push_str(&format!(
            "INSERT INTO products (name, description, price, image_url, stock, sold, category_id) \
             VALUES ('Product {i}', 'Item {i}', {price}, 'https://img.example/{i}.png', 10, {i}, 1);",
            price = i as f64 * 2.5
        ));
    }
    db.execute(&sql).await.unwrap();
}
