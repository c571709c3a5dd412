//! SMTP relay transport (lettre).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::error;

use menu_core::error::DomainError;
use menu_core::ports::Mailer;
use menu_shared::config::EmailSettings;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// `use_ssl` selects implicit TLS, `use_tls` STARTTLS; neither means a plain connection.
    pub fn new(settings: &EmailSettings) -> Result<Self, DomainError> {
        let builder = match (settings.use_ssl, settings.use_tls) {
            (true, _) => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host),
            (false, true) => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host),
            (false, false) => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &settings.host,
            )),
        }
        .map_err(|e: lettre::transport::smtp::Error| DomainError::MailError(e.to_string()))?;

        let mut builder = builder.port(settings.port);
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from_address: settings.from.clone(),
        })
    }

    fn message(&self, recipient: &str, subject: &str, body: &str) -> Result<Message, DomainError> {
        Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|e: lettre::address::AddressError| {
                        DomainError::MailError(format!("invalid from address: {}", e))
                    })?,
            )
            .to(recipient.parse().map_err(|e: lettre::address::AddressError| {
                DomainError::MailError(format!("invalid recipient address: {}", e))
            })?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DomainError::MailError(format!("failed to build email: {}", e)))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        let email = self.message(recipient, subject, body)?;
        self.transport
            .send(email)
            .await
            .map_err(|e: lettre::transport::smtp::Error| {
                error!("SMTP delivery failed: {}", e);
                DomainError::MailError(e.to_string())
            })?;
        Ok(())
    }
}
