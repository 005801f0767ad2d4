//! # Domain Types
//!
//! Core domain types used throughout Storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Product      │   │    Category     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  name           │   │  name, price    │◄──│  name           │       │
//! │  │  email (unique) │   │  stock, sold    │   └─────────────────┘       │
//! │  │  role           │   │  category (copy)│                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Inbound payloads:  NewUser, NewCategory                               │
//! │  Listing helpers:   Pagination, PageMetadata, Page<T>                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Model vs Write Payload
//! `User` never carries a password. The only type that does is `NewUser`,
//! which is deserialize-only, so a password (plaintext or hashed) can never
//! end up in a response body.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::validation::check_password_strength;

// =============================================================================
// User
// =============================================================================

/// A registered user as returned by every read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier assigned by storage.
    pub id: i64,

    pub name: String,

    /// Unique across all users.
    pub email: String,

    pub role: String,
}

/// Inbound payload for user registration.
///
/// ## Rules
/// ```text
/// email     required, RFC-shaped
/// password  required, >= 8 characters, uppercase + digit + symbol
/// name/role free-form, default to ""
/// ```
///
/// Empty strings for `email` and `password` deserialize as `None` so that
/// `""` and a missing key both fail the `required` rule.
#[derive(Clone, Default, Deserialize, Validate)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required, email)]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(required, length(min = 8), custom(function = "check_password_strength"))]
    pub password: Option<String>,

    #[serde(default)]
    pub role: String,
}

// Manual impl keeps the password out of logs.
impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Inbound payload for category creation.
///
/// The client may pick the identifier; when omitted, storage assigns one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCategory {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product with a denormalized copy of its category.
///
/// The category is resolved by a join at read time and embedded by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub price: f64,

    pub image_url: String,

    /// Units in stock. Expected to be >= 0.
    pub stock: i64,

    /// Units sold. Expected to be >= 0.
    pub sold: i64,

    pub category: Category,
}

// =============================================================================
// Pagination
// =============================================================================

/// Default page number when the query parameter is absent or unusable.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size when the query parameter is absent or unusable.
pub const DEFAULT_PER_PAGE: i64 = 10;

/// A requested page window.
///
/// ## Parsing Rules
/// ```text
/// ?page=2&per_page=5   → page 2, per_page 5, offset 5
/// ?page=abc            → page 1 (silent fallback, never a 400)
/// ?per_page=0          → per_page 10 (non-positive falls back too)
/// (nothing)            → page 1, per_page 10
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Builds a window from raw query-string values.
    pub fn from_query(page: Option<&str>, per_page: Option<&str>) -> Self {
        Pagination {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            per_page: parse_positive(per_page).unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    /// Number of rows to skip: `(page - 1) * per_page`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Maximum number of rows in the window.
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// Metadata attached to a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub page: i64,
    pub per_page: i64,
    /// Number of rows in this page.
    pub sub_total: i64,
    /// Unfiltered row count of the whole table.
    pub total: i64,
    pub total_pages: i64,
}

impl PageMetadata {
    /// Computes metadata; `total_pages = ceil(total / per_page)`.
    pub fn new(pagination: Pagination, sub_total: usize, total: i64) -> Self {
        let per_page = pagination.per_page.max(1);
        PageMetadata {
            page: pagination.page,
            per_page: pagination.per_page,
            sub_total: sub_total as i64,
            total,
            total_pages: if total <= 0 { 0 } else { (total - 1) / per_page + 1 },
        }
    }
}

/// One page of products plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub metadata: PageMetadata,
    pub products: Vec<T>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_has_no_password() {
        let user = User {
            id: 1,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: "admin".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_new_user_empty_strings_are_absent() {
        let payload: NewUser =
            serde_json::from_str(r#"{"name":"Ada","email":"","password":""}"#).unwrap();
        assert_eq!(payload.email, None);
        assert_eq!(payload.password, None);
        assert_eq!(payload.role, "");
    }

    #[test]
    fn test_new_user_debug_redacts_password() {
        let payload = NewUser {
            password: Some("Secret1!".to_string()),
            ..NewUser::default()
        };
        let printed = format!("{:?}", payload);
        assert!(!printed.contains("Secret1!"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_product_omits_missing_description() {
        let product = Product {
            id: 7,
            name: "Mug".to_string(),
            description: None,
            price: 9.5,
            image_url: "https://cdn.example.com/mug.png".to_string(),
            stock: 3,
            sold: 0,
            category: Category {
                id: 2,
                name: "Kitchen".to_string(),
            },
        };
        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("description").is_none());
        assert_eq!(json["category"]["name"], "Kitchen");
    }

    #[test]
    fn test_pagination_defaults_and_fallbacks() {
        assert_eq!(Pagination::from_query(None, None), Pagination::default());

        let p = Pagination::from_query(Some("abc"), Some("-4"));
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 10);

        let p = Pagination::from_query(Some("2"), Some("5"));
        assert_eq!(p.offset(), 5);
        assert_eq!(p.limit(), 5);
    }

    #[test]
    fn test_page_metadata_rounds_up() {
        let meta = PageMetadata::new(Pagination { page: 2, per_page: 5 }, 5, 12);
        assert_eq!(meta.sub_total, 5);
        assert_eq!(meta.total, 12);
        assert_eq!(meta.total_pages, 3);

        let empty = PageMetadata::new(Pagination::default(), 0, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
