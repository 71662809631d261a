//! Clinic store error types.

use thiserror::Error;

/// Errors that can occur during clinic store operations.
#[derive(Debug, Error)]
pub enum ClinicStoreError {
    /// Entity not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Unique constraint violation.
    #[error("{entity_type} with this {field} already exists: {value}")]
    UniqueViolation {
        entity_type: &'static str,
        field: &'static str,
        value: String,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ClinicStoreError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a unique constraint violation error.
    pub fn unique_violation(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::UniqueViolation {
            entity_type,
            field,
            value: value.into(),
        }
    }
}

/// Result type for clinic store operations.
pub type ClinicStoreResult<T> = Result<T, ClinicStoreError>;
