//! Mail transports

pub mod smtp;
pub mod console;

pub use smtp::SmtpMailer;
pub use console::ConsoleMailer;

use std::sync::Arc;

use menu_core::error::DomainError;
use menu_core::ports::Mailer;
use menu_shared::config::{EmailBackend, EmailSettings};

/// Builds the transport selected by `email.backend`.
pub fn build_mailer(settings: &EmailSettings) -> Result<Arc<dyn Mailer>, DomainError> {
    match settings.backend {
        EmailBackend::Smtp => Ok(Arc::new(SmtpMailer::new(settings)?)),
        EmailBackend::Console => Ok(Arc::new(ConsoleMailer::new(&settings.from))),
    }
}
