//! Outbound ports other than persistence: mail transport and blob storage.

pub mod mailer;
pub mod file_storage;

pub use mailer::Mailer;
pub use file_storage::FileStorage;

#[cfg(any(test, feature = "mock"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "mock"))]
pub use file_storage::MockFileStorage;
