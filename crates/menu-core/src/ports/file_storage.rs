//! Blob storage port

use async_trait::async_trait;

use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Stores `contents` under `dir` using `file_name` (made unique if taken) and
    /// returns the stored path relative to the storage root.
    async fn save(&self, dir: &str, file_name: &str, contents: &[u8]) -> Result<String, DomainError>;
    async fn remove(&self, path: &str) -> Result<(), DomainError>;
}
