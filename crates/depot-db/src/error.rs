//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← classified by the driver's error kind         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError (depot-service) ← duplicates become ValidationError      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Operator sees a readable message                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::error::ErrorKind;
use thiserror::Error;

use depot_core::CoreError;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// Lookups return `Ok(None)` instead; this is for operations that
    /// require the row to exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate SKU
    /// - Inserting a duplicate username or category name
    #[error("Duplicate {field}: value already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Product referencing a non-existent category
    /// - Deleting a category that still has products
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK or NOT NULL constraint violation.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// A row could not be turned into an entity.
    ///
    /// ## When This Occurs
    /// - Column missing from the result set
    /// - Column holds a value of the wrong type
    /// - Stored values break an entity invariant
    #[error("Row mapping failed: {0}")]
    Mapping(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True for uniqueness violations.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }

    /// True for referential integrity violations.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, DbError::ForeignKeyViolation { .. })
    }
}

/// Pulls `table.column` out of SQLite's "UNIQUE constraint failed: ..." text.
///
/// Only used to enrich the error; the classification itself comes from
/// [`ErrorKind`].
fn unique_field(message: &str) -> String {
    message
        .rsplit_once(": ")
        .map(|(_, field)| field.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// Database + ErrorKind::UniqueViolation      → DbError::UniqueViolation
/// Database + ErrorKind::ForeignKeyViolation  → DbError::ForeignKeyViolation
/// Database + Check/NotNull                   → DbError::ConstraintViolation
/// Database (other)                           → DbError::QueryFailed
/// ColumnNotFound / ColumnDecode / Decode     → DbError::Mapping
/// Io / Tls / Configuration                   → DbError::ConnectionFailed
/// Other                                      → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation {
                        field: unique_field(&message),
                    },
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation { message },
                    ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                        DbError::ConstraintViolation { message }
                    }
                    _ => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => DbError::Mapping(err.to_string()),

            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Configuration(_) => {
                DbError::ConnectionFailed(err.to_string())
            }

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Stored rows that break entity invariants are mapping failures.
impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        DbError::Mapping(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_field_parsing() {
        assert_eq!(
            unique_field("UNIQUE constraint failed: products.sku"),
            "products.sku"
        );
        assert_eq!(unique_field("garbled"), "unknown");
    }

    #[test]
    fn test_decode_errors_are_mapping_errors() {
        let err: DbError = sqlx::Error::ColumnNotFound("price_cents".into()).into();
        assert!(matches!(err, DbError::Mapping(_)));
    }

    #[test]
    fn test_invariant_errors_are_mapping_errors() {
        let err: DbError = CoreError::invalid("product", "stock cannot be negative").into();
        assert!(matches!(err, DbError::Mapping(msg) if msg.contains("stock cannot be negative")));
    }
}
