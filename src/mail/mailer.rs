//! Mailer trait and SMTP transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;

use super::message::{BodyKind, Envelope};
use super::MailError;

/// Async mail delivery trait.
///
/// Implement this trait to provide alternative transports (e.g., SES,
/// Mailgun) or test doubles. A single call performs one complete
/// connect-transmit-close cycle and never retries internally; retry is the
/// scheduler's concern.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver one message.
    async fn send(&self, envelope: &Envelope) -> Result<(), MailError>;
}

/// SMTP connection parameters.
///
/// Immutable once a scheduler is constructed from them.
#[derive(Debug, Clone, Deserialize)]
pub struct TransportOptions {
    /// SMTP server hostname.
    #[serde(rename = "smtp_host")]
    pub host: String,

    /// SMTP server port (default: 587).
    #[serde(rename = "smtp_port", default = "default_port")]
    pub port: u16,

    /// Username for authentication.
    #[serde(rename = "smtp_username")]
    pub username: Option<String>,

    /// Credential for authentication.
    #[serde(rename = "smtp_password")]
    pub credential: Option<String>,

    /// TLS mode: "starttls" (default), "tls", or "none".
    #[serde(rename = "smtp_tls", default = "default_tls")]
    pub tls: String,

    /// Connection timeout in seconds (default: 10).
    #[serde(rename = "smtp_timeout", default = "default_timeout")]
    pub timeout: u64,
}

fn default_port() -> u16 {
    587
}

fn default_tls() -> String {
    "starttls".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl TransportOptions {
    /// Authenticated transport options with default TLS mode and timeout.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: Some(username.into()),
            credential: Some(credential.into()),
            tls: default_tls(),
            timeout: default_timeout(),
        }
    }

    /// Load transport options from environment variables.
    ///
    /// Reads `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`,
    /// `SMTP_TLS`, `SMTP_TIMEOUT`.
    pub fn from_env() -> Result<Self, MailError> {
        dotenvy::dotenv().ok();

        serde_env::from_env().map_err(|e| MailError::MissingConfig(e.to_string()))
    }
}

/// SMTP-based mailer using lettre.
///
/// Construction configures the transport but never contacts the network; the
/// first connection happens on [`Mailer::send`].
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    host: String,
}

impl SmtpMailer {
    /// Create a mailer from explicit transport options.
    pub fn new(options: TransportOptions) -> Result<Self, MailError> {
        let mut builder = match options.tls.as_str() {
            "none" => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&options.host),
            "tls" => AsyncSmtpTransport::<Tokio1Executor>::relay(&options.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
            _ => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&options.host)
                .map_err(|e| MailError::Smtp(e.to_string()))?,
        };

        builder = builder
            .port(options.port)
            .timeout(Some(Duration::from_secs(options.timeout)));

        if let (Some(username), Some(credential)) = (options.username, options.credential) {
            builder = builder.credentials(Credentials::new(username, credential));
        }

        let transport = builder.build();

        Ok(Self {
            transport: Arc::new(transport),
            host: options.host,
        })
    }

    /// Create a mailer from environment variables.
    pub fn from_env() -> Result<Self, MailError> {
        Self::new(TransportOptions::from_env()?)
    }

    /// Build a lettre Message from the envelope and its current body.
    fn build_message(&self, envelope: &Envelope) -> Result<Message, MailError> {
        let from: Mailbox = envelope
            .from()
            .parse()
            .map_err(|_| MailError::InvalidAddress(envelope.from().to_string()))?;

        let mut builder = Message::builder().from(from);

        for to in envelope.to() {
            let mailbox: Mailbox = to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.clone()))?;
            builder = builder.to(mailbox);
        }

        builder = builder.subject(envelope.subject());

        let body = envelope
            .body()
            .ok_or_else(|| MailError::Build("body not set".into()))?;

        let message = match envelope.kind() {
            BodyKind::Plain => builder
                .body(body.to_string())
                .map_err(|e| MailError::Build(e.to_string()))?,
            BodyKind::Html => builder
                .singlepart(SinglePart::html(body.to_string()))
                .map_err(|e| MailError::Build(e.to_string()))?,
        };

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, envelope: &Envelope) -> Result<(), MailError> {
        let message = self.build_message(envelope)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Smtp(e.to_string()))?;

        Ok(())
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").field("host", &self.host).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_tls_and_timeout() {
        let options = TransportOptions::new("smtp.example.com", 2525, "user", "secret");
        assert_eq!(options.tls, "starttls");
        assert_eq!(options.timeout, 10);
        assert_eq!(options.port, 2525);
    }

    #[tokio::test]
    async fn mailer_construction_is_offline() {
        // No server is listening; construction must still succeed.
        let options = TransportOptions::new("smtp.example.com", 587, "user", "secret");
        assert!(SmtpMailer::new(options).is_ok());
    }
}
