//! # SQLite Repositories
//!
//! Same statements as the MySQL backend (`?` placeholders), with
//! `RETURNING` for inserts. Backs the in-memory database used in tests.

use async_trait::async_trait;
use sqlx::SqlitePool;
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
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteUserRepository { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
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

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, email, role
            "#,
        )
        .bind(&prepared.name)
        .bind(&prepared.email)
        .bind(&prepared.password_hash)
        .bind(&prepared.role)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = row.id, "Created user");
        Ok(row.into())
    }
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone)]
pub struct SqliteCategoryRepository {
    pool: SqlitePool,
}

impl SqliteCategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCategoryRepository { pool }
    }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
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
        let row = match category.id {
            Some(id) => {
                sqlx::query_as::<_, CategoryRow>(
                    "INSERT INTO categories (id, name) VALUES (?, ?) RETURNING id, name",
                )
                .bind(id)
                .bind(&category.name)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
                )
                .bind(&category.name)
                .fetch_one(&self.pool)
                .await?
            }
        };

        debug!(id = row.id, "Created category");
        Ok(row.into())
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteProductRepository { pool }
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
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

        let rows = sqlx::query_as::<_, ProductRow>(concat!(
            select_products!(),
            " ORDER BY p.id ASC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
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

// =============================================================================
// Unit Tests
// =============================================================================
