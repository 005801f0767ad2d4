//! # Database Pool Management
//!
//! Engine selection and connection pool creation.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Connection Pool                           │
//! │                                                                         │
//! │  API startup                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbConfig::new(Engine::Postgres) ← host, port, credentials, pool size  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │       │                                                                 │
//! │       ├──► Pool::Postgres(PgPool)                                      │
//! │       ├──► Pool::MySql(MySqlPool)                                      │
//! │       └──► Pool::Sqlite(SqlitePool) ← schema applied on connect        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.users() / db.categories() / db.products()                          │
//! │       └── Arc<dyn ...Repository> bound to the matching backend         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, MySqlPool, PgPool, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult, ParseEngineError};
use crate::repository::mysql::{MySqlCategoryRepository, MySqlProductRepository, MySqlUserRepository};
use crate::repository::postgres::{PgCategoryRepository, PgProductRepository, PgUserRepository};
use crate::repository::sqlite::{
    SqliteCategoryRepository, SqliteProductRepository, SqliteUserRepository,
};
use crate::repository::{CategoryRepository, ProductRepository, UserRepository};

/// DDL applied to every SQLite connection pool.
const SQLITE_SCHEMA: &str = include_str!("../../../schema/sqlite.sql");

/// SQLite's in-memory database name.
pub const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Engine
// =============================================================================

/// The relational engine behind the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Postgres,
    MySql,
    Sqlite,
}

impl Engine {
    /// Port used when none is configured. SQLite has none.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Engine::Postgres => Some(5432),
            Engine::MySql => Some(3306),
            Engine::Sqlite => None,
        }
    }
}

impl FromStr for Engine {
    type Err = ParseEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Engine::Postgres),
            "mysql" => Ok(Engine::MySql),
            "sqlite" => Ok(Engine::Sqlite),
            other => Err(ParseEngineError(other.to_string())),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Engine::Postgres => "postgres",
            Engine::MySql => "mysql",
            Engine::Sqlite => "sqlite",
        })
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use storefront_db::{DbConfig, Engine};
///
/// let config = DbConfig::new(Engine::Postgres)
///     .host("db.internal")
///     .credentials("shop", "secret")
///     .database("storefront")
///     .max_connections(20);
///
/// assert_eq!(config.port(), 5432);
/// ```
#[derive(Clone)]
pub struct DbConfig {
    pub engine: Engine,

    pub host: String,

    /// Falls back to the engine's default port when unset.
    pub port: Option<u16>,

    pub username: String,

    pub password: String,

    /// Database name; for SQLite, the file path or [`IN_MEMORY`].
    pub database: String,

    /// Default: 10
    pub max_connections: u32,

    /// How long a query waits for a free connection.
    /// Default: 5 seconds
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub fn new(engine: Engine) -> Self {
        DbConfig {
            engine,
            host: "localhost".to_string(),
            port: None,
            username: String::new(),
            password: String::new(),
            database: String::new(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(&self) -> u16 {
        self.port.or(self.engine.default_port()).unwrap_or_default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// An isolated in-memory SQLite database (for testing).
    ///
    /// An in-memory database lives only as long as its connection, so the
    /// pool is pinned to one connection that is never recycled.
    pub fn in_memory() -> Self {
        DbConfig::new(Engine::Sqlite).database(IN_MEMORY).max_connections(1)
    }

    fn is_in_memory(&self) -> bool {
        self.engine == Engine::Sqlite && self.database == IN_MEMORY
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("engine", &self.engine)
            .field("host", &self.host)
            .field("port", &self.port())
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

// =============================================================================
// Database
// =============================================================================

#[derive(Debug, Clone)]
enum Pool {
    Postgres(PgPool),
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

/// Main database handle providing repository access.
///
/// Cloning is cheap; clones share the same pool.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(config).await?;
///
/// let users = db.users();          // Arc<dyn UserRepository>
/// let product = db.products().get_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Connects to the configured engine.
    ///
    /// ## Returns
    /// * `Ok(Database)` - Pool created and at least one connection opened
    /// * `Err(DbError::ConnectionFailed)` - Unreachable server, bad credentials, ...
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            engine = %config.engine,
            host = %config.host,
            database = %config.database,
            "Initializing database connection"
        );

        let pool = match config.engine {
            Engine::Postgres => {
                let options = PgConnectOptions::new()
                    .host(&config.host)
                    .port(config.port())
                    .username(&config.username)
                    .password(&config.password)
                    .database(&config.database);

                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout)
                    .connect_with(options)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                Pool::Postgres(pool)
            }
            Engine::MySql => {
                let options = MySqlConnectOptions::new()
                    .host(&config.host)
                    .port(config.port())
                    .username(&config.username)
                    .password(&config.password)
                    .database(&config.database);

                let pool = MySqlPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout)
                    .connect_with(options)
                    .await
                    .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                Pool::MySql(pool)
            }
            Engine::Sqlite => Pool::Sqlite(connect_sqlite(&config).await?),
        };

        info!(max_connections = config.max_connections, "Database pool created");
        Ok(Database { pool })
    }

    /// Shortcut for `Database::new(DbConfig::in_memory())`.
    pub async fn in_memory() -> DbResult<Self> {
        Database::new(DbConfig::in_memory()).await
    }

    pub fn engine(&self) -> Engine {
        match self.pool {
            Pool::Postgres(_) => Engine::Postgres,
            Pool::MySql(_) => Engine::MySql,
            Pool::Sqlite(_) => Engine::Sqlite,
        }
    }

    /// Returns the user repository for this engine.
    pub fn users(&self) -> Arc<dyn UserRepository> {
        match &self.pool {
            Pool::Postgres(pool) => Arc::new(PgUserRepository::new(pool.clone())),
            Pool::MySql(pool) => Arc::new(MySqlUserRepository::new(pool.clone())),
            Pool::Sqlite(pool) => Arc::new(SqliteUserRepository::new(pool.clone())),
        }
    }

    /// Returns the category repository for this engine.
    pub fn categories(&self) -> Arc<dyn CategoryRepository> {
        match &self.pool {
            Pool::Postgres(pool) => Arc::new(PgCategoryRepository::new(pool.clone())),
            Pool::MySql(pool) => Arc::new(MySqlCategoryRepository::new(pool.clone())),
            Pool::Sqlite(pool) => Arc::new(SqliteCategoryRepository::new(pool.clone())),
        }
    }

    /// Returns the product repository for this engine.
    pub fn products(&self) -> Arc<dyn ProductRepository> {
        match &self.pool {
            Pool::Postgres(pool) => Arc::new(PgProductRepository::new(pool.clone())),
            Pool::MySql(pool) => Arc::new(MySqlProductRepository::new(pool.clone())),
            Pool::Sqlite(pool) => Arc::new(SqliteProductRepository::new(pool.clone())),
        }
    }

    /// Runs raw SQL against the pool (seeding fixtures, ad-hoc maintenance).
    pub async fn execute(&self, sql: &str) -> DbResult<()> {
        match &self.pool {
            Pool::Postgres(pool) => {
                pool.execute(sql).await?;
            }
            Pool::MySql(pool) => {
                pool.execute(sql).await?;
            }
            Pool::Sqlite(pool) => {
                pool.execute(sql).await?;
            }
        }
        Ok(())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        match &self.pool {
            Pool::Postgres(pool) => pool.close().await,
            Pool::MySql(pool) => pool.close().await,
            Pool::Sqlite(pool) => pool.close().await,
        }
    }

    /// Checks if the database is healthy (can execute queries).
    pub async fn health_check(&self) -> bool {
        let result = match &self.pool {
            Pool::Postgres(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            Pool::MySql(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
            Pool::Sqlite(pool) => sqlx::query("SELECT 1").execute(pool).await.map(|_| ()),
        };

        if let Err(e) = &result {
            debug!(error = %e, "Health check failed");
        }
        result.is_ok()
    }
}

// =============================================================================
// SQLite
// =============================================================================

async fn connect_sqlite(config: &DbConfig) -> DbResult<SqlitePool> {
    let (options, pool_options) = if config.is_in_memory() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        let pool_options = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        (options, pool_options)
    } else {
        let options = SqliteConnectOptions::new()
            .filename(&config.database)
            .create_if_missing(true);
        let pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
        (options, pool_options)
    };

    let pool = pool_options
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options.foreign_keys(true))
        .await
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    pool.execute(SQLITE_SCHEMA).await?;
    debug!("SQLite schema applied");

    Ok(pool)
}

/// A fresh in-memory pool with the schema applied.
#[cfg(test)]
pub(crate) async fn in_memory_pool() -> DbResult<SqlitePool> {
    connect_sqlite(&DbConfig::in_memory()).await
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_str() {
        assert_eq!("postgres".parse::<Engine>().unwrap(), Engine::Postgres);
        assert_eq!("PostgreSQL".parse::<Engine>().unwrap(), Engine::Postgres);
        assert_eq!("mysql".parse::<Engine>().unwrap(), Engine::MySql);
        assert_eq!("sqlite".parse::<Engine>().unwrap(), Engine::Sqlite);
        assert!("oracle".parse::<Engine>().is_err());
    }

    #[test]
    fn test_unknown_engine_is_a_parse_error() {
        let err = " Oracle ".parse::<Engine>().unwrap_err();
        assert_eq!(err, ParseEngineError("oracle".to_string()));
        assert_eq!(err.to_string(), "unsupported database engine: oracle");

        assert!("".parse::<Engine>().is_err());
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new(Engine::MySql)
            .host("db")
            .with_port(3307)
            .credentials("shop", "hunter2")
            .database("storefront")
            .max_connections(20);

        assert_eq!(config.port(), 3307);
        assert_eq!(config.max_connections, 20);
        assert_eq!(DbConfig::new(Engine::Postgres).port(), 5432);
        assert_eq!(DbConfig::new(Engine::MySql).port(), 3306);
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let config = DbConfig::new(Engine::Postgres).credentials("shop", "hunter2");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[redacted]"));
    }

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::in_memory().await.unwrap();

        assert_eq!(db.engine(), Engine::Sqlite);
        assert!(db.health_check().await);
        assert!(db.products().fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::in_memory().await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }
}
