//! Cron-driven delivery scheduling.
//!
//! # Architecture
//!
//! - [`MailScheduler`] — Owns the trigger service registration and the shared
//!   send gate; exposes start/stop and the manual send escape hatch.
//! - [`DeliveryController`] — Per-firing state machine: bounded normal
//!   retries, then a single fallback delivery.
//! - [`OnSchedule`] — The one-method seam between the trigger engine and the
//!   controller.
//! - [`RetryPolicy`] — Attempt bound and optional backoff.
//!
//! Scheduled failures are logged and recovered inside the trigger callback;
//! manual send failures are returned to the caller untouched.

mod retry;
mod scheduler;

pub use retry::{DeliveryController, OnSchedule, RetryPolicy};
pub use scheduler::MailScheduler;

use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

use crate::mail::MailError;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid cron schedule")]
    InvalidCron,

    #[error("trigger service error: {0}")]
    Trigger(#[from] JobSchedulerError),

    #[error(transparent)]
    Mail(#[from] MailError),
}
