//! PostgreSQL repository implementations

pub mod menu_repo_impl;
pub mod dish_repo_impl;
pub mod attachment_repo_impl;
pub mod user_repo_impl;

pub use menu_repo_impl::PgMenuRepository;
pub use dish_repo_impl::PgDishRepository;
pub use attachment_repo_impl::PgAttachmentRepository;
pub use user_repo_impl::PgUserRepository;

use tracing::error;

use menu_core::error::DomainError;

/// Logs a failed statement and converts it into the generic database error.
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_foreign_key_violation())
        .unwrap_or(false)
}

/// Maps a rejected delete to a conflict, anything else to a database error.
pub(crate) fn delete_error(resource: &'static str, e: sqlx::Error) -> DomainError {
    if is_foreign_key_violation(&e) {
        let details = e
            .as_database_error()
            .map(|db| db.message().to_string())
            .unwrap_or_else(|| e.to_string());
        return DomainError::Conflict { resource, details };
    }
    db_error("deleting row", e)
}
