//! Domain errors

use thiserror::Error;

use menu_shared::EntityId;

use crate::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: EntityId },

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("You cannot delete a {resource}. It is linked to other resources")]
    Conflict { resource: &'static str, details: String },

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: EntityId) -> Self {
        DomainError::NotFound { resource, id }
    }

    /// Shorthand for a validation failure on a single field.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        DomainError::Validation(FieldErrors::single(field, message))
    }
}

impl From<FieldErrors> for DomainError {
    fn from(errors: FieldErrors) -> Self {
        DomainError::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::Validation(FieldErrors::from(errors))
    }
}
