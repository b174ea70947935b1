//! Error types for the service facade.

use depot_core::{CoreError, EntityId, ValidationError, UNSAVED_ID};
use depot_db::DbError;

/// Errors returned by every service operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad caller input. The message is meant for the operator as-is.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// An entity invariant did not hold.
    #[error("{0}")]
    Entity(CoreError),

    /// Connectivity or constraint failure in the store.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),

    /// Password hashing failed.
    #[error("Credential error: {0}")]
    Credential(String),

    /// Programmer error, e.g. updating an entity that was never saved.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ServiceError::Validation(e),
            other => ServiceError::Entity(other),
        }
    }
}

impl ServiceError {
    /// Maps a uniqueness violation on `field` to a duplicate validation
    /// error; every other storage error passes through.
    pub(crate) fn duplicate_or_storage(err: DbError, field: &str, value: &str) -> Self {
        if err.is_unique_violation() {
            ValidationError::Duplicate {
                field: field.to_string(),
                value: value.to_string(),
            }
            .into()
        } else {
            ServiceError::Storage(err)
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}

/// Rejects entities that have not been assigned an id by the store.
pub(crate) fn ensure_persisted(id: EntityId, entity: &str) -> ServiceResult<()> {
    if id == UNSAVED_ID {
        return Err(ServiceError::InvalidArgument(format!(
            "{entity} has not been saved yet"
        )));
    }
    Ok(())
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_becomes_duplicate() {
        let err = ServiceError::duplicate_or_storage(
            DbError::UniqueViolation {
                field: "products.sku".to_string(),
            },
            "SKU",
            "LAPTOP-001",
        );
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "SKU 'LAPTOP-001' already exists");
    }

    #[test]
    fn test_other_storage_errors_pass_through() {
        let err = ServiceError::duplicate_or_storage(
            DbError::ConnectionFailed("disk full".to_string()),
            "SKU",
            "X",
        );
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn test_wrapped_validation_is_unwrapped() {
        let err: ServiceError = CoreError::Validation(ValidationError::Required {
            field: "SKU".to_string(),
        })
        .into();
        assert!(err.is_validation());

        let err: ServiceError = CoreError::invalid("user", "email must contain '@'").into();
        assert!(matches!(err, ServiceError::Entity(_)));
    }

    #[test]
    fn test_unsaved_ids_are_rejected() {
        assert!(matches!(
            ensure_persisted(UNSAVED_ID, "Product"),
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(ensure_persisted(7, "Product").is_ok());
    }
}
