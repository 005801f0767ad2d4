//! # PostgreSQL Repositories
//!
//! Placeholders are positional (`$1`, `$2`, ...) and inserts read the stored
//! row back with `RETURNING`.

use async_trait::async_trait;
use sqlx::PgPool;
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
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        PgUserRepository { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
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
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or_else(|| DbError::not_found("user", id))
    }

    async fn get_by_email(&self, email: &str) -> DbResult<User> {
        sqlx::query_as::<_, UserRow>("SELECT id, name, email, role FROM users WHERE email = $1")
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
            VALUES ($1, $2, $3, $4)
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

/// Sets the `categories.id` sequence to the current maximum id. `setval`
/// with `is_called = true` makes the next `nextval` return `MAX(id) + 1`.
pub(crate) const SYNC_CATEGORY_SEQUENCE: &str = "SELECT setval(\
     pg_get_serial_sequence('categories', 'id'), \
     (SELECT COALESCE(MAX(id), 1) FROM categories))";

#[derive(Debug, Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        PgCategoryRepository { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
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
        sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Category::from)
            .ok_or_else(|| DbError::not_found("category", id))
    }

    async fn create(&self, category: NewCategory) -> DbResult<Category> {
        let row = match category.id {
            Some(id) => {
                let row = sqlx::query_as::<_, CategoryRow>(
                    "INSERT INTO categories (id, name) VALUES ($1, $2) RETURNING id, name",
                )
                .bind(id)
                .bind(&category.name)
                .fetch_one(&self.pool)
                .await?;

                // An explicit id bypasses the sequence; move it past the
                // largest id so later assigned ids cannot collide.
                sqlx::query(SYNC_CATEGORY_SEQUENCE)
                    .execute(&self.pool)
                    .await?;
                row
            }
            None => {
                sqlx::query_as::<_, CategoryRow>(
                    "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
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
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        PgProductRepository { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
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
            " ORDER BY p.id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        debug!(total, offset, limit, count = rows.len(), "Fetched product page");
        Ok((total, rows.into_iter().map(Product::from).collect()))
    }

    async fn get_by_id(&self, id: i64) -> DbResult<Product> {
        sqlx::query_as::<_, ProductRow>(concat!(select_products!(), " WHERE p.id = $1"))
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

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = include_str!("../../../../schema/postgres.sql");

    /// Runs against `STOREFRONT_TEST_POSTGRES_URL`; the tables there are dropped.
    async fn scratch_pool() -> Option<PgPool> {
        let url = std::env::var("STOREFRONT_TEST_POSTGRES_URL").ok()?;
        let pool = PgPool::connect(&url).await.unwrap();
        sqlx::raw_sql("DROP TABLE IF EXISTS products, categories, users")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
        Some(pool)
    }

    #[tokio::test]
    #[ignore = "needs STOREFRONT_TEST_POSTGRES_URL"]
    async fn test_assigned_category_id_follows_explicit_ids() {
        let Some(pool) = scratch_pool().await else {
            return;
        };
        let repo = PgCategoryRepository::new(pool);

        let explicit = repo
            .create(NewCategory { id: Some(1), name: "Drinks".into() })
            .await
            .unwrap();
        assert_eq!(explicit.id, 1);

        let assigned = repo
            .create(NewCategory { id: None, name: "Snacks".into() })
            .await
            .unwrap();
        assert_eq!(assigned.id, 2);

        repo.create(NewCategory { id: Some(10), name: "Frozen".into() })
            .await
            .unwrap();
        let after_gap = repo
            .create(NewCategory { id: None, name: "Bakery".into() })
            .await
            .unwrap();
        assert_eq!(after_gap.id, 11);
    }
}
