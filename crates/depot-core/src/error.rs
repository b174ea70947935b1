//! # Error Types
//!
//! Domain-specific error types for depot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  depot-core errors (this file)                                         │
//! │  ├── CoreError        - Entity invariant violations                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  depot-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  depot-service errors                                                  │
//! │  └── ServiceError     - What callers of the facade see                 │
//! │                                                                         │
//! │  Flow: ValidationError → ServiceError ← DbError                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Messages are shown to the operator verbatim, so they read as sentences
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
///
/// Raised when an entity is constructed (or re-hydrated from storage) with
/// values that break its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An entity invariant does not hold.
    ///
    /// ## When This Occurs
    /// - Blank SKU or name on a product
    /// - Negative stock, reserved stock or minimum stock
    /// - Email without `@` on a user
    #[error("Invalid {entity}: {reason}")]
    InvalidEntity {
        entity: &'static str,
        reason: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an InvalidEntity error.
    pub fn invalid(entity: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidEntity {
            entity,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// The first failing check of a field determines the reported error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No value was supplied at all.
    #[error("{field} cannot be null")]
    Missing { field: String },

    /// A required field is empty or blank.
    #[error("{field} cannot be empty")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} is too long (max {max} characters)")]
    TooLong { field: String, max: usize },

    /// Numeric value below zero.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Numeric value above its ceiling.
    #[error("{field} is too large (max {max})")]
    TooLarge { field: String, max: String },

    /// Invalid format (pattern mismatch, missing character class, ...).
    #[error("{field} {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value does not have the expected shape as a whole (e.g. an email
    /// address).
    #[error("Invalid {field} format")]
    Malformed { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A referenced entity does not exist.
    #[error("{entity} does not exist")]
    UnknownReference { entity: String },

    /// A referenced entity exists but is switched off.
    #[error("{entity} is inactive")]
    InactiveReference { entity: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn format(field: &str, reason: &str) -> Self {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid("product", "stock cannot be negative");
        assert_eq!(err.to_string(), "Invalid product: stock cannot be negative");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "SKU".to_string(),
        };
        assert_eq!(err.to_string(), "SKU cannot be empty");

        let err = ValidationError::TooLong {
            field: "Email".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "Email is too long (max 100 characters)");

        let err = ValidationError::Malformed {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid email format");

        let err = ValidationError::UnknownReference {
            entity: "Category".to_string(),
        };
        assert_eq!(err.to_string(), "Category does not exist");

        let err = ValidationError::InactiveReference {
            entity: "Category".to_string(),
        };
        assert_eq!(err.to_string(), "Category is inactive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
