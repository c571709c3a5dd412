//! Mail transport that only writes messages to the log.

use async_trait::async_trait;
use tracing::info;

use menu_core::error::DomainError;
use menu_core::ports::Mailer;

pub struct ConsoleMailer {
    from: String,
}

impl ConsoleMailer {
    pub fn new(from: &str) -> Self {
        Self {
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        info!(
            from = %self.from,
            to = %recipient,
            subject = %subject,
            "Email message:\n{}",
            body
        );
        Ok(())
    }
}
