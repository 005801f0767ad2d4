//! # Storefront API
//!
//! JSON HTTP API for users, categories and products.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront API                                  │
//! │                                                                         │
//! │  request                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  cors ──► trace ──► request timeout ──► router (/api/v1, /health)      │
//! │                                              │                          │
//! │                   ┌──────────────────────────┼───────────────────────┐ │
//! │                   ▼                          ▼                       ▼ │
//! │            handlers::user          handlers::category    handlers::product
//! │                   │                          │                       │ │
//! │                   └──────────── AppState ────┴───────────────────────┘ │
//! │                                   │                                     │
//! │                 Arc<dyn UserRepository / CategoryRepository /           │
//! │                         ProductRepository>  +  Arc<RequestValidator>    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Routes
//! | Method | Path                       |
//! |--------|----------------------------|
//! | GET    | `/api/v1/categories`       |
//! | POST   | `/api/v1/categories`       |
//! | GET    | `/api/v1/categories/{id}`  |
//! | GET    | `/api/v1/products`         |
//! | GET    | `/api/v1/products/{id}`    |
//! | GET    | `/api/v1/users`            |
//! | POST   | `/api/v1/users`            |
//! | POST   | `/api/v1/register`         |
//! | GET    | `/health`                  |

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use storefront_core::RequestValidator;
use storefront_db::{CategoryRepository, Database, ProductRepository, UserRepository};
use tower_http::trace::TraceLayer;

use crate::handlers::{category, fallback, health, product, user};
use crate::middleware::{cors, request_timeout, RequestTimeout};

// Re-exports
pub use config::Settings;
pub use error::ApiError;

/// Common path prefix for every resource route.
pub const API_PREFIX: &str = "/api/v1";

/// Shared application state.
///
/// Built once at startup; handlers receive a clone per request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub validator: Arc<RequestValidator>,
    pub db: Database,
}

impl AppState {
    /// Binds every repository to `db` and registers the validation rules.
    pub fn new(db: Database) -> Self {
        AppState {
            users: db.users(),
            categories: db.categories(),
            products: db.products(),
            validator: Arc::new(RequestValidator::new()),
            db,
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState, timeout: Duration) -> Router {
    let api = Router::new()
        .route(
            "/categories",
            get(category::fetch_categories).post(category::create_category),
        )
        .route("/categories/{id}", get(category::get_category))
        .route("/products", get(product::fetch_products))
        .route("/products/{id}", get(product::get_product))
        .route("/users", get(user::fetch_users).post(user::create_user))
        .route("/register", post(user::create_user))
        .method_not_allowed_fallback(fallback::method_not_allowed);

    Router::new()
        .nest(API_PREFIX, api)
        .route("/health", get(health::health))
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .fallback(fallback::not_found)
        .layer(axum::middleware::from_fn_with_state(
            RequestTimeout(timeout),
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(cors))
        .with_state(state)
}
