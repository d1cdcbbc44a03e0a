//! Console mailer for development.
//!
//! Logs messages instead of transmitting them. Body content is withheld from
//! the log unless explicitly enabled, since mail bodies routinely carry
//! sensitive data.

use async_trait::async_trait;

use super::mailer::Mailer;
use super::message::Envelope;
use super::MailError;

/// A mailer that logs deliveries instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct ConsoleMailer {
    show_body: bool,
}

impl ConsoleMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the full body text in the log output.
    pub fn with_body(mut self) -> Self {
        self.show_body = true;
        self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, envelope: &Envelope) -> Result<(), MailError> {
        let body = envelope
            .body()
            .ok_or_else(|| MailError::Build("body not set".into()))?;

        if self.show_body {
            tracing::info!(
                from = envelope.from(),
                recipients = ?envelope.to(),
                subject = envelope.subject(),
                kind = %envelope.kind(),
                body,
                "console delivery"
            );
        } else {
            tracing::info!(
                from = envelope.from(),
                recipients = ?envelope.to(),
                subject = envelope.subject(),
                kind = %envelope.kind(),
                body_bytes = body.len(),
                "console delivery"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{BodyKind, MailOptions};

    fn envelope_with_body() -> Envelope {
        let options = MailOptions::builder()
            .from("from@test.com")
            .to("to@test.com")
            .subject("Test")
            .producer(|| Ok("body".into()))
            .build()
            .unwrap();
        let mut envelope = Envelope::new(&options);
        envelope.set_body(BodyKind::Plain, "body");
        envelope
    }

    #[tokio::test]
    async fn delivers_without_error() {
        let mailer = ConsoleMailer::new();
        assert!(mailer.send(&envelope_with_body()).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_unset_body() {
        let options = MailOptions::builder()
            .from("from@test.com")
            .to("to@test.com")
            .subject("Test")
            .producer(|| Ok("body".into()))
            .build()
            .unwrap();
        let envelope = Envelope::new(&options);

        let result = ConsoleMailer::new().send(&envelope).await;
        assert!(matches!(result, Err(MailError::Build(_))));
    }
}
