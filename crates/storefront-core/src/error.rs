//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── ErrorKind        - The fixed kind vocabulary handlers dispatch on │
//! │  └── CoreError        - Domain failures (password hashing)             │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (in app)                                                   │
//! │  └── ApiError         - What the HTTP client sees (JSON envelope)      │
//! │                                                                         │
//! │  Flow: CoreError → DbError → kind() → ApiError → HTTP status + body    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Every error exposes an [`ErrorKind`]; callers compare kinds, never
//!    message text
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// The fixed vocabulary of failure kinds visible at the HTTP boundary.
///
/// ## Mapping
/// ```text
/// NotFound        → 404  zero rows matched a lookup
/// BadRequest      → 400  malformed payload, failed validation, duplicate email
/// InternalServer  → 500  database or hashing failures not otherwise classified
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    InternalServer,
}

impl ErrorKind {
    /// Returns a stable, lowercase name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::InternalServer => "internal_server",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The hashing primitive rejected the input or its parameters.
    ///
    /// ## When This Occurs
    /// - Password exceeds the primitive's length limit
    /// - Salt generation or parameter setup failed
    #[error("failed to hash password: {0}")]
    Hashing(String),
}

impl CoreError {
    /// Returns the kind this error maps to at the HTTP boundary.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Hashing(_) => ErrorKind::InternalServer,
        }
    }
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
