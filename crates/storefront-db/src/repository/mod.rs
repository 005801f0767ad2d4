//! # Repository Module
//!
//! Engine-agnostic data-access contracts and their implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Contract, Three Engines                          │
//! │                                                                         │
//! │  HTTP Handler                                                          │
//! │       │                                                                 │
//! │       │  state.products.get_by_id(42)                                  │
//! │       ▼                                                                 │
//! │  Arc<dyn ProductRepository>                                            │
//! │       │                                                                 │
//! │       ├──► postgres::PgProductRepository     WHERE p.id = $1           │
//! │       ├──► mysql::MySqlProductRepository     WHERE p.id = ?            │
//! │       └──► sqlite::SqliteProductRepository   WHERE p.id = ?            │
//! │                                                                         │
//! │  Every backend implements every method. The handler layer never       │
//! │  knows which engine it is talking to.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - `fetch` returns rows ordered by ascending id; an empty table is an
//!   empty `Vec`, never an error.
//! - `get_by_*` returns [`DbError::NotFound`] when zero rows match.
//! - A row that fails to decode aborts the whole fetch; rows decoded before
//!   it are discarded.
//! - `create` returns the persisted record including its assigned id.
//! - Dropping a returned future (client disconnect, request timeout)
//!   abandons the in-flight query.
//!
//! [`DbError::NotFound`]: crate::error::DbError::NotFound

/// The product projection every backend shares; callers `concat!` their
/// own WHERE / ORDER BY / LIMIT clause.
macro_rules! select_products {
    () => {
        "SELECT p.id, p.name, p.description, p.price, p.image_url, p.stock, p.sold, \
         p.category_id, c.name AS category_name \
         FROM products p \
         JOIN categories c ON p.category_id = c.id"
    };
}

pub mod mysql;
pub mod postgres;
pub mod sqlite;

use async_trait::async_trait;
use storefront_core::password::hash_password;
use storefront_core::{Category, NewCategory, NewUser, Product, User};

use crate::error::{DbError, DbResult};

// =============================================================================
// Contracts
// =============================================================================

/// Data access for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, ascending by id. Never includes passwords.
    async fn fetch(&self) -> DbResult<Vec<User>>;

    async fn get_by_id(&self, id: i64) -> DbResult<User>;

    /// Used for the uniqueness pre-check on registration.
    async fn get_by_email(&self, email: &str) -> DbResult<User>;

    /// Hashes the password, inserts the row, and returns the stored user.
    async fn create(&self, user: NewUser) -> DbResult<User>;
}

/// Data access for categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn fetch(&self) -> DbResult<Vec<Category>>;

    async fn get_by_id(&self, id: i64) -> DbResult<Category>;

    /// Inserts a category. Insert failures (e.g. a duplicate id) are
    /// returned to the caller.
    async fn create(&self, category: NewCategory) -> DbResult<Category>;
}

/// Data access for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn fetch(&self) -> DbResult<Vec<Product>>;

    /// Returns `(total, page)` where `total` is an unfiltered `COUNT(*)`.
    ///
    /// The count and the windowed select are separate statements with no
    /// shared snapshot, so concurrent writes may make `total` disagree
    /// with the page contents.
    async fn fetch_paginated(&self, offset: i64, limit: i64) -> DbResult<(i64, Vec<Product>)>;

    async fn get_by_id(&self, id: i64) -> DbResult<Product>;
}

// =============================================================================
// Row Types
// =============================================================================
// Shared by every backend: the derive is generic over the driver's row type.

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CategoryRow {
    pub id: i64,
    pub name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
        }
    }
}

/// A product joined with its category's name.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: String,
    pub stock: i64,
    pub sold: i64,
    pub category_id: i64,
    pub category_name: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image_url: row.image_url,
            stock: row.stock,
            sold: row.sold,
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
        }
    }
}

/// A registration payload ready for insertion: required fields present and
/// the password replaced by its hash.
pub(crate) struct PreparedUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl PreparedUser {
    /// Hashes the password on the blocking pool; Argon2 is deliberately slow.
    pub(crate) async fn from_new_user(user: NewUser) -> DbResult<Self> {
        let email = user.email.ok_or(DbError::MissingField("email"))?;
        let password = user.password.ok_or(DbError::MissingField("password"))?;

        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DbError::Internal(e.to_string()))??;

        Ok(PreparedUser {
            name: user.name,
            email,
            password_hash,
            role: user.role,
        })
    }
}
