//! Mail options and the reusable message envelope.

use std::fmt;
use std::sync::Arc;

use super::MailError;

/// Boxed error returned by a failed body producer.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Produces the body for a normal scheduled delivery.
///
/// Invoked once per delivery attempt so the message always carries fresh
/// content. May fail; a failure aborts the attempt before any transport work.
pub type BodyProducer = Arc<dyn Fn() -> Result<String, BoxError> + Send + Sync>;

/// Produces the body of the failure-notification message sent when every
/// normal delivery attempt has been exhausted. Cannot fail.
pub type FallbackProducer = Arc<dyn Fn() -> String + Send + Sync>;

/// Content type of the outgoing body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Plain,
    Html,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "text/plain"),
            Self::Html => write!(f, "text/html"),
        }
    }
}

/// Everything needed to compose outgoing mail: the fixed envelope fields and
/// the body producers invoked at delivery time.
#[derive(Clone)]
pub struct MailOptions {
    /// Sender address.
    pub from: String,
    /// Primary recipients. Never empty.
    pub to: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Content type used for both normal and fallback bodies.
    pub kind: BodyKind,
    /// Producer for the normal body.
    pub producer: BodyProducer,
    /// Producer for the failure-notification body, if configured.
    pub fallback: Option<FallbackProducer>,
}

impl MailOptions {
    /// Create a new options builder.
    pub fn builder() -> MailOptionsBuilder {
        MailOptionsBuilder::default()
    }
}

impl fmt::Debug for MailOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailOptions")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("subject", &self.subject)
            .field("kind", &self.kind)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Builder for [`MailOptions`].
pub struct MailOptionsBuilder {
    from: Option<String>,
    to: Vec<String>,
    subject: Option<String>,
    kind: BodyKind,
    producer: Option<BodyProducer>,
    fallback: Option<FallbackProducer>,
}

impl Default for MailOptionsBuilder {
    fn default() -> Self {
        Self {
            from: None,
            to: Vec::new(),
            subject: None,
            kind: BodyKind::Plain,
            producer: None,
            fallback: None,
        }
    }
}

impl MailOptionsBuilder {
    /// Set the sender address (required).
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    /// Add a primary recipient.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to.push(address.into());
        self
    }

    /// Add multiple primary recipients.
    pub fn to_many(mut self, addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.to.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Set the subject line (required).
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the body content type (default: plain text).
    pub fn kind(mut self, kind: BodyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the normal body producer (required).
    pub fn producer<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<String, BoxError> + Send + Sync + 'static,
    {
        self.producer = Some(Arc::new(f));
        self
    }

    /// Set the failure-notification body producer.
    pub fn fallback<F>(mut self, f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(f));
        self
    }

    /// Build the options, validating required fields.
    pub fn build(self) -> Result<MailOptions, MailError> {
        if self.to.is_empty() {
            return Err(MailError::InvalidOptions(
                "at least one recipient required".into(),
            ));
        }

        let from = self
            .from
            .ok_or_else(|| MailError::InvalidOptions("from address required".into()))?;

        let subject = self
            .subject
            .ok_or_else(|| MailError::InvalidOptions("subject required".into()))?;

        let producer = self
            .producer
            .ok_or_else(|| MailError::InvalidOptions("body producer required".into()))?;

        Ok(MailOptions {
            from,
            to: self.to,
            subject,
            kind: self.kind,
            producer,
            fallback: self.fallback,
        })
    }
}

/// A message with a fixed envelope and a body slot rewritten per delivery.
///
/// Sender, recipients, and subject are set once at construction. The body is
/// overwritten just before every transmission and never read back; no history
/// of past bodies is kept.
#[derive(Debug, Clone)]
pub struct Envelope {
    from: String,
    to: Vec<String>,
    subject: String,
    kind: BodyKind,
    body: Option<String>,
}

impl Envelope {
    /// Fix the envelope fields from validated options. The body starts unset;
    /// no producer is invoked here.
    pub fn new(options: &MailOptions) -> Self {
        Self {
            from: options.from.clone(),
            to: options.to.clone(),
            subject: options.subject.clone(),
            kind: options.kind,
            body: None,
        }
    }

    /// Overwrite the body and its content type in place.
    pub fn set_body(&mut self, kind: BodyKind, text: impl Into<String>) {
        self.kind = kind;
        self.body = Some(text.into());
    }

    /// Sender address.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Recipient addresses.
    pub fn to(&self) -> &[String] {
        &self.to
    }

    /// Subject line.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Current body content type.
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// Current body, if one has been set.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_minimal_options() {
        let options = MailOptions::builder()
            .from("sender@example.com")
            .to("user@example.com")
            .subject("Hello")
            .producer(|| Ok("body".into()))
            .build()
            .unwrap();

        assert_eq!(options.from, "sender@example.com");
        assert_eq!(options.to, vec!["user@example.com"]);
        assert_eq!(options.subject, "Hello");
        assert_eq!(options.kind, BodyKind::Plain);
        assert!(options.fallback.is_none());
    }

    #[test]
    fn build_html_with_fallback() {
        let options = MailOptions::builder()
            .from("sender@example.com")
            .to_many(["a@b.com", "c@d.com"])
            .subject("Report")
            .kind(BodyKind::Html)
            .producer(|| Ok("<p>ok</p>".into()))
            .fallback(|| "<p>report generation failed</p>".into())
            .build()
            .unwrap();

        assert_eq!(options.to.len(), 2);
        assert_eq!(options.kind, BodyKind::Html);
        assert!(options.fallback.is_some());
    }

    #[test]
    fn build_requires_from() {
        let result = MailOptions::builder()
            .to("a@b.com")
            .subject("Hi")
            .producer(|| Ok("body".into()))
            .build();
        assert!(matches!(result, Err(MailError::InvalidOptions(_))));
    }

    #[test]
    fn build_requires_recipient() {
        let result = MailOptions::builder()
            .from("a@b.com")
            .subject("Hi")
            .producer(|| Ok("body".into()))
            .build();
        assert!(matches!(result, Err(MailError::InvalidOptions(_))));
    }

    #[test]
    fn build_requires_subject() {
        let result = MailOptions::builder()
            .from("a@b.com")
            .to("a@b.com")
            .producer(|| Ok("body".into()))
            .build();
        assert!(matches!(result, Err(MailError::InvalidOptions(_))));
    }

    #[test]
    fn build_requires_producer() {
        let result = MailOptions::builder()
            .from("a@b.com")
            .to("a@b.com")
            .subject("Hi")
            .build();
        assert!(matches!(result, Err(MailError::InvalidOptions(_))));
    }

    #[test]
    fn envelope_starts_without_body() {
        let options = MailOptions::builder()
            .from("sender@example.com")
            .to("user@example.com")
            .subject("Hello")
            .producer(|| Ok("body".into()))
            .build()
            .unwrap();

        let envelope = Envelope::new(&options);
        assert_eq!(envelope.from(), "sender@example.com");
        assert_eq!(envelope.to(), ["user@example.com"]);
        assert_eq!(envelope.subject(), "Hello");
        assert!(envelope.body().is_none());
    }

    #[test]
    fn set_body_overwrites_in_place() {
        let options = MailOptions::builder()
            .from("sender@example.com")
            .to("user@example.com")
            .subject("Hello")
            .producer(|| Ok("body".into()))
            .build()
            .unwrap();

        let mut envelope = Envelope::new(&options);
        envelope.set_body(BodyKind::Plain, "first");
        assert_eq!(envelope.body(), Some("first"));

        envelope.set_body(BodyKind::Html, "second");
        assert_eq!(envelope.body(), Some("second"));
        assert_eq!(envelope.kind(), BodyKind::Html);
        assert_eq!(envelope.subject(), "Hello");
    }

    #[test]
    fn body_kind_display() {
        assert_eq!(BodyKind::Plain.to_string(), "text/plain");
        assert_eq!(BodyKind::Html.to_string(), "text/html");
    }
}
