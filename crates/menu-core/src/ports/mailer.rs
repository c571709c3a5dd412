//! Mail transport port

use async_trait::async_trait;

use crate::error::DomainError;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one plain-text message. Implementations do not retry.
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DomainError>;
}
