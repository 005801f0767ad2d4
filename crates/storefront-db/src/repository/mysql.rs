//! # MySQL Repositories
//!
//! MySQL has no `RETURNING`, so inserts run as `execute`, take
//! `last_insert_id()` and read the row back by id.
//!
//! ```text
//! INSERT ... ──► MySqlQueryResult ──► last_insert_id() ──► get_by_id(id)
//! ```

use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use storefront_core::{Category, NewCategory, NewUser, Product, User};

use super::{
    CategoryRepository, CategoryRow, PreparedUser, ProductRepository, ProductRow, UserRepository,
    UserRow,
};
use crate::error::{DbError, DbResult};

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepository { pool }
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn fetch(&self) -> DbResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, role FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched users");
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> DbResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| DbError::not_found("user", id))
    }

    async fn get_by_email(&self, email: &str) -> DbResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, role FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| DbError::not_found("user", email))
    }

    async fn create(&self, user: NewUser) -> DbResult<User> {
        let prepared = PreparedUser::from_new_user(user).await?;

        let result = sqlx::query(
            "INSERT INTO users (name, email, password, role) VALUES (?, ?, ?, ?)",
        )
        .bind(&prepared.name)
        .bind(&prepared.email)
        .bind(&prepared.password_hash)
        .bind(&prepared.role)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id() as i64;
        debug!(id, "Created user");
        self.get_by_id(id).await
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone)]
pub struct MySqlCategoryRepository {
    pool: MySqlPool,
}

impl MySqlCategoryRepository {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlCategoryRepository { pool }
    }
}

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn fetch(&self) -> DbResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name FROM categories ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched categories");
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Category> {
        sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Category::from)
            .ok_or_else(|| DbError::not_found("category", id))
    }

    async fn create(&self, category: NewCategory) -> DbResult<Category> {
        let id = match category.id {
            Some(id) => {
                sqlx::query("INSERT INTO categories (id, name) VALUES (?, ?)")
                    .bind(id)
                    .bind(&category.name)
                    .execute(&self.pool)
                    .await?;
                id
            }
            None => {
                sqlx::query("INSERT INTO categories (name) VALUES (?)")
                    .bind(&category.name)
                    .execute(&self.pool)
                    .await?
                    .last_insert_id() as i64
            }
        };

        debug!(id, "Created category");
        self.get_by_id(id).await
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone)]
pub struct MySqlProductRepository {
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlProductRepository { pool }
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn fetch(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(concat!(select_products!(), " ORDER BY p.id ASC"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Fetched products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn fetch_paginated(&self, offset: i64, limit: i64) -> DbResult<(i64, Vec<Product>)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        // MySQL's two-argument form takes the offset first.
        let rows = sqlx::query_as::<_, ProductRow>(concat!(
            select_products!(),
            " ORDER BY p.id ASC LIMIT ?, ?"
        ))
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(total, offset, limit, count = rows.len(), "Fetched product page");
        Ok((total, rows.into_iter().map(Product::from).collect()))
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Product> {
        sqlx::query_as::<_, ProductRow>(concat!(select_products!(), " WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Product::from)
            .ok_or_else(|| DbError::not_found("product", id))
    }
}
