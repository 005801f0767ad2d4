//! # storefront-core: Pure Domain Logic for Storefront
//!
//! This crate contains the domain model and every rule that can be checked
//! without touching the network or a database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP Handlers (axum)                         │   │
//! │  │    decode JSON ──► validate ──► repository ──► JSON envelope    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │ password  │  │ validation │  │  error   │  │   │
//! │  │   │  User     │  │  hash     │  │  rules     │  │ ErrorKind│  │   │
//! │  │   │  Product  │  │  strength │  │  messages  │  │ CoreError│  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  │        Repository traits + Postgres / MySQL / SQLite            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Category, pagination)
//! - [`password`] - Password hashing and strength policy
//! - [`validation`] - Payload validation and error formatting
//! - [`error`] - Error kinds and domain errors
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Pagination, PageMetadata};
//!
//! let window = Pagination::from_query(Some("2"), Some("5"));
//! assert_eq!(window.offset(), 5);
//!
//! let meta = PageMetadata::new(window, 5, 12);
//! assert_eq!(meta.total_pages, 3);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod password;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind};
pub use types::*;
pub use validation::{FieldErrors, RequestValidator};
