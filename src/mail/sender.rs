//! One-shot delivery execution for normal and fallback bodies.

use super::mailer::Mailer;
use super::message::{Envelope, MailOptions};
use super::MailError;

/// Executes single delivery attempts against one shared envelope and
/// transport.
///
/// Each call independently rebuilds the body and transmits it; nothing is
/// cached between attempts. The context is not safe for concurrent use.
/// Callers serialize access through one mutual-exclusion gate so that
/// "set body, then transmit" never interleaves across senders.
pub struct SendContext<M: Mailer> {
    envelope: Envelope,
    options: MailOptions,
    mailer: M,
}

impl<M: Mailer> SendContext<M> {
    /// Fix the envelope from validated options and wrap the transport.
    /// No body producer is invoked here.
    pub fn new(options: MailOptions, mailer: M) -> Self {
        Self {
            envelope: Envelope::new(&options),
            options,
            mailer,
        }
    }

    /// Build the normal body and deliver it.
    ///
    /// A producer failure aborts before any transport work.
    pub async fn send_normal(&mut self) -> Result<(), MailError> {
        let body = (self.options.producer)().map_err(MailError::BodyBuild)?;

        self.envelope.set_body(self.options.kind, body);
        self.mailer.send(&self.envelope).await
    }

    /// Build the failure-notification body and deliver it.
    pub async fn send_fallback(&mut self) -> Result<(), MailError> {
        let producer = self.options.fallback.as_ref().ok_or(MailError::MissingFallback)?;

        let body = producer();
        self.envelope.set_body(self.options.kind, body);
        self.mailer.send(&self.envelope).await
    }

    /// The shared envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}
