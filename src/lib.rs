//! Scheduled email delivery with bounded retry and failure notification.
//!
//! `cronmail` composes and sends an email on a cron schedule. Each firing
//! builds a fresh body, retries delivery a bounded number of times, and falls
//! back to a distinct failure-notification message when every attempt is
//! exhausted. On-demand sends bypass the schedule entirely.
//!
//! # Quick Start
//!
//! ```ignore
//! use cronmail::{MailOptions, MailScheduler, TransportOptions};
//!
//! let options = MailOptions::builder()
//!     .from("reports@example.com")
//!     .to("ops@example.com")
//!     .subject("Nightly report")
//!     .producer(|| Ok(render_report()?))
//!     .fallback(|| "nightly report could not be generated".into())
//!     .build()?;
//!
//! let transport = TransportOptions::new("smtp.example.com", 587, "reports", "secret");
//!
//! // Fires every day at 08:00.
//! let mut scheduler = MailScheduler::new("0 0 8 * * *", options, transport).await?;
//! scheduler.start().await?;
//!
//! // Manual delivery, independent of the schedule:
//! scheduler.send(false).await?;
//!
//! scheduler.stop().await?;
//! ```

pub mod mail;
pub mod schedule;

pub use mail::{
    BodyKind, ConsoleMailer, MailError, MailOptions, Mailer, SendContext, SmtpMailer,
    TransportOptions,
};
pub use schedule::{MailScheduler, OnSchedule, RetryPolicy, SchedulerError};
