//! # Validation Module
//!
//! Request payload validation and wire-visible error formatting.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Decode (serde)                                               │
//! │  └── malformed JSON → 400 {"message": "invalid payload"}               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Field rules (THIS MODULE)                                    │
//! │  ├── #[validate(...)] attributes on the payload type                   │
//! │  └── RequestValidator turns failures into {field: [messages]}          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database                                                     │
//! │  └── UNIQUE / NOT NULL constraints                                     │
//! │                                                                         │
//! │  A failure in layer 2 short-circuits before any repository call.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::RequestValidator;
//! use storefront_core::NewUser;
//!
//! // Built once at startup, shared by reference afterwards.
//! let validator = RequestValidator::new();
//!
//! let payload = NewUser {
//!     email: Some("not-an-email".to_string()),
//!     password: Some("Secret1!".to_string()),
//!     ..NewUser::default()
//! };
//! let errors = validator.validate(&payload).unwrap_err();
//! assert_eq!(
//!     errors.messages("email"),
//!     ["This field must be a valid email address"]
//! );
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::password::validate_password_strength;

// =============================================================================
// Rule Codes
// =============================================================================

pub const RULE_REQUIRED: &str = "required";
pub const RULE_EMAIL: &str = "email";
pub const RULE_LENGTH: &str = "length";
pub const RULE_PASSWORD: &str = "password";
pub const RULE_UNIQUE: &str = "unique";

/// Message used for any rule without a registered template.
pub const DEFAULT_MESSAGE: &str = "Invalid value";

/// Custom `password` rule wired into `#[validate(custom(...))]`.
pub fn check_password_strength(password: &str) -> Result<(), ValidationError> {
    if validate_password_strength(password) {
        Ok(())
    } else {
        Err(ValidationError::new(RULE_PASSWORD))
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Field name → list of human-readable messages, one per failed rule.
///
/// Serializes as a plain JSON object, e.g.
/// `{"password": ["This field must be at least 8 characters"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Appends a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for a field (empty when the field passed).
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one failure.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// =============================================================================
// Request Validator
// =============================================================================

/// Runs payload rules and renders failures with a message catalogue.
///
/// ## Lifecycle
/// ```text
/// startup:   RequestValidator::new()            ← catalogue registered once
///                 │
///                 ▼
///            Arc<RequestValidator> in AppState  ← read-only from here on
///                 │
///            ┌────┴─────┬──────────┐
///            ▼          ▼          ▼
///        request 1  request 2  request N        ← shared by reference
/// ```
///
/// There is no process-wide registration state: two validators built with
/// different catalogues coexist without interfering.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    messages: HashMap<String, String>,
}

impl Default for RequestValidator {
    fn default() -> Self {
        RequestValidator::new()
    }
}

impl RequestValidator {
    /// Creates a validator with the default message catalogue.
    pub fn new() -> Self {
        RequestValidator {
            messages: HashMap::new(),
        }
        .with_message(RULE_REQUIRED, "This field is required")
        .with_message(RULE_EMAIL, "This field must be a valid email address")
        .with_message(RULE_LENGTH, "This field must be at least {min} characters")
        .with_message(
            RULE_PASSWORD,
            "This field must contain at least one uppercase letter, one number, and one special character",
        )
        .with_message(RULE_UNIQUE, "Email already exists")
    }

    /// Registers (or replaces) the template for a rule code.
    ///
    /// `{name}` placeholders are filled from the failing rule's parameters.
    pub fn with_message(mut self, rule: &str, template: &str) -> Self {
        self.messages.insert(rule.to_string(), template.to_string());
        self
    }

    /// Template for a rule code, or [`DEFAULT_MESSAGE`].
    pub fn message(&self, rule: &str) -> &str {
        self.messages
            .get(rule)
            .map(String::as_str)
            .unwrap_or(DEFAULT_MESSAGE)
    }

    /// Validates a payload, collecting every failed rule per field.
    pub fn validate<T: Validate>(&self, payload: &T) -> Result<(), FieldErrors> {
        let errors = match payload.validate() {
            Ok(()) => return Ok(()),
            Err(errors) => errors,
        };

        let mut formatted = FieldErrors::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures.iter() {
                formatted.add(field.to_string(), self.render(failure));
            }
        }

        if formatted.is_empty() {
            Ok(())
        } else {
            Err(formatted)
        }
    }

    fn render(&self, failure: &ValidationError) -> String {
        let mut message = self.message(&failure.code).to_string();

        for (name, value) in &failure.params {
            // Never echo the submitted value back.
            if name == "value" {
                continue;
            }
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            message = message.replace(&format!("{{{}}}", name), &rendered);
        }

        message
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewUser;

    fn payload(email: Option<&str>, password: Option<&str>) -> NewUser {
        NewUser {
            name: "Ada".to_string(),
            email: email.map(str::to_string),
            password: password.map(str::to_string),
            role: "customer".to_string(),
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        let validator = RequestValidator::new();
        assert!(validator
            .validate(&payload(Some("ada@example.com"), Some("Secret1!")))
            .is_ok());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let validator = RequestValidator::new();
        let errors = validator.validate(&payload(None, None)).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.messages("email"), ["This field is required"]);
        assert_eq!(errors.messages("password"), ["This field is required"]);
    }

    #[test]
    fn test_email_shape() {
        let validator = RequestValidator::new();
        let errors = validator
            .validate(&payload(Some("ada.example.com"), Some("Secret1!")))
            .unwrap_err();

        assert_eq!(
            errors.messages("email"),
            ["This field must be a valid email address"]
        );
        assert!(errors.messages("password").is_empty());
    }

    #[test]
    fn test_short_weak_password_reports_each_rule() {
        let validator = RequestValidator::new();
        let errors = validator
            .validate(&payload(Some("ada@example.com"), Some("abc")))
            .unwrap_err();

        let messages = errors.messages("password");
        assert_eq!(messages.len(), 2);
        assert!(messages.contains(&"This field must be at least 8 characters".to_string()));
        assert!(messages.contains(
            &"This field must contain at least one uppercase letter, one number, and one special character"
                .to_string()
        ));
    }

    #[test]
    fn test_strong_but_short_password_fails_length_only() {
        let validator = RequestValidator::new();
        let errors = validator
            .validate(&payload(Some("ada@example.com"), Some("Abc123!")))
            .unwrap_err();

        assert_eq!(
            errors.messages("password"),
            ["This field must be at least 8 characters"]
        );
    }

    #[test]
    fn test_message_catalogue() {
        let validator = RequestValidator::new().with_message(RULE_REQUIRED, "needed");

        assert_eq!(validator.message(RULE_REQUIRED), "needed");
        assert_eq!(validator.message(RULE_UNIQUE), "Email already exists");
        assert_eq!(validator.message("alphanum"), DEFAULT_MESSAGE);

        // The default catalogue is untouched by the override above.
        assert_eq!(
            RequestValidator::new().message(RULE_REQUIRED),
            "This field is required"
        );
    }

    #[test]
    fn test_field_errors_serialize_as_object() {
        let mut errors = FieldErrors::new();
        errors.add("email", "This field is required");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({"email": ["This field is required"]}));
    }
}
