//! Mail composition and delivery.
//!
//! This module provides a thin abstraction over [lettre](https://lettre.rs)
//! with environment-based configuration: the [`MailOptions`] describing what
//! to send, the [`Mailer`] transport seam, and the [`SendContext`] that
//! executes one delivery at a time.
//!
//! # Quick Start
//!
//! ```ignore
//! // 1. Describe the mail
//! let options = MailOptions::builder()
//!     .from("reports@example.com")
//!     .to("ops@example.com")
//!     .subject("Nightly report")
//!     .producer(|| Ok(build_report()?))
//!     .fallback(|| "report generation failed".into())
//!     .build()?;
//!
//! // 2. Initialize the transport from environment
//! let mailer = SmtpMailer::from_env()?;
//!
//! // 3. Deliver
//! let mut ctx = SendContext::new(options, mailer);
//! ctx.send_normal().await?;
//! ```
//!
//! # Environment Variables
//!
//! The [`TransportOptions::from_env`] method reads:
//!
//! | Variable | Required | Description |
//! |----------|----------|-------------|
//! | `SMTP_HOST` | Yes | SMTP server hostname |
//! | `SMTP_PORT` | No | Port (default: 587) |
//! | `SMTP_USERNAME` | No | Username for authentication |
//! | `SMTP_PASSWORD` | No | Credential for authentication |
//! | `SMTP_TLS` | No | `starttls` (default), `tls`, or `none` |
//! | `SMTP_TIMEOUT` | No | Connection timeout in seconds (default: 10) |

mod console;
mod mailer;
mod message;
mod sender;

pub use console::ConsoleMailer;
pub use mailer::{Mailer, SmtpMailer, TransportOptions};
pub use message::{
    BodyKind, BodyProducer, BoxError, Envelope, FallbackProducer, MailOptions, MailOptionsBuilder,
};
pub use sender::SendContext;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail options: {0}")]
    InvalidOptions(String),

    #[error("missing required config: {0}")]
    MissingConfig(String),

    #[error("no fallback body build function")]
    MissingFallback,

    #[error("failed to build mail body: {0}")]
    BodyBuild(#[source] BoxError),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}
