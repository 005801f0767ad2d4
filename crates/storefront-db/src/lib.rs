//! # storefront-db: Database Layer for Storefront
//!
//! Repository contracts for users, categories and products, with one
//! implementation per supported engine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (GET /api/v1/products/42)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  storefront-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐                  │   │
//! │  │   │   Database    │    │    Repositories    │                  │   │
//! │  │   │   (pool.rs)   │    │                    │                  │   │
//! │  │   │               │    │ UserRepository     │                  │   │
//! │  │   │ Pg / MySql /  │◄───│ CategoryRepository │                  │   │
//! │  │   │ Sqlite pool   │    │ ProductRepository  │                  │   │
//! │  │   └───────────────┘    └────────────────────┘                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL / MySQL / SQLite                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Engine selection and connection pool creation
//! - [`error`] - Database error types
//! - [`repository`] - Repository traits and per-engine implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::Database;
//!
//! let db = Database::in_memory().await?;
//! let categories = db.categories().fetch().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ParseEngineError};
pub use pool::{Database, DbConfig, Engine};

pub use repository::{CategoryRepository, ProductRepository, UserRepository};
