//! Scheduler lifecycle: registration, start/stop, and manual sends.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use uuid::Uuid;

use super::retry::{DeliveryController, OnSchedule, RetryPolicy};
use super::SchedulerError;
use crate::mail::{
    Envelope, MailError, MailOptions, Mailer, SendContext, SmtpMailer, TransportOptions,
};

/// Scheduled mail delivery with bounded retry and failure notification.
///
/// ```ignore
/// let mut scheduler = MailScheduler::new("0 0 8 * * *", options, transport).await?;
/// scheduler.start().await?;
/// // ...
/// scheduler.stop().await?;
/// scheduler.send(false).await?; // manual sends stay available
/// ```
pub struct MailScheduler<M: Mailer = SmtpMailer> {
    ctx: Arc<Mutex<SendContext<M>>>,
    trigger: JobScheduler,
    handle: Uuid,
    schedule: cron::Schedule,
}

impl MailScheduler<SmtpMailer> {
    /// Create a scheduler delivering over SMTP.
    ///
    /// Validates the cron expression, fixes the message envelope, and
    /// configures the transport eagerly, without invoking any body producer
    /// or contacting the network. The job fires only after [`start`].
    ///
    /// [`start`]: MailScheduler::start
    pub async fn new(
        expr: &str,
        mail: MailOptions,
        transport: TransportOptions,
    ) -> Result<Self, SchedulerError> {
        let mailer = SmtpMailer::new(transport)?;
        Self::with_mailer(expr, mail, mailer).await
    }
}

impl<M: Mailer> MailScheduler<M> {
    /// Create a scheduler over any [`Mailer`] backend with the default
    /// retry policy.
    pub async fn with_mailer(expr: &str, mail: MailOptions, mailer: M) -> Result<Self, SchedulerError> {
        Self::with_policy(expr, mail, mailer, RetryPolicy::default()).await
    }

    /// Create a scheduler with an explicit retry policy.
    ///
    /// Cron expression format:
    /// ```text
    /// sec   min   hour   day_of_month   month   day_of_week   year
    /// *     *     *      *              *       *             *
    /// ```
    pub async fn with_policy(
        expr: &str,
        mail: MailOptions,
        mailer: M,
        policy: RetryPolicy,
    ) -> Result<Self, SchedulerError> {
        let schedule: cron::Schedule = expr.parse().map_err(|_| SchedulerError::InvalidCron)?;
        match schedule.upcoming(chrono::Utc).next() {
            Some(next) => tracing::debug!(%schedule, %next, "registering delivery schedule"),
            None => {
                tracing::warn!(%schedule, "cron schedule will never fire");
                return Err(SchedulerError::InvalidCron);
            }
        }

        let ctx = Arc::new(Mutex::new(SendContext::new(mail, mailer)));
        let controller = Arc::new(DeliveryController::new(ctx.clone(), policy));

        let mut trigger = JobScheduler::new().await?;

        let job = CronJob::new_async(schedule.clone(), move |_uuid, _lock| {
            let controller = controller.clone();
            Box::pin(async move {
                controller.on_schedule().await;
            })
        })?;

        let handle = trigger.add(job).await?;

        Ok(Self {
            ctx,
            trigger,
            handle,
            schedule,
        })
    }

    /// Begin firing at scheduled instants.
    pub async fn start(&mut self) -> Result<(), SchedulerError> {
        self.trigger.start().await?;
        tracing::info!(schedule = %self.schedule, "⏳ Mail scheduler running");
        Ok(())
    }

    /// Deregister the job and halt the dispatch loop.
    ///
    /// Waits until any in-flight occurrence has released the send gate before
    /// returning. Afterwards no further occurrences fire; [`send`] remains
    /// callable.
    ///
    /// [`send`]: MailScheduler::send
    pub async fn stop(&mut self) -> Result<(), SchedulerError> {
        self.trigger.remove(&self.handle).await?;
        self.trigger.shutdown().await?;

        // An occurrence dispatched before shutdown may still hold the gate.
        let _in_flight = self.ctx.lock().await;

        tracing::info!("mail scheduler stopped");
        Ok(())
    }

    /// Snapshot of the shared envelope.
    pub async fn envelope(&self) -> Envelope {
        self.ctx.lock().await.envelope().clone()
    }

    /// Deliver immediately, bypassing the schedule.
    ///
    /// With `fallback` set, sends the failure-notification body. Errors are
    /// returned to the caller directly: no retry, no fallback chaining.
    pub async fn send(&self, fallback: bool) -> Result<(), MailError> {
        let mut ctx = self.ctx.lock().await;
        if fallback {
            ctx.send_fallback().await
        } else {
            ctx.send_normal().await
        }
    }
}

impl<M: Mailer> std::fmt::Debug for MailScheduler<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailScheduler")
            .field("schedule", &self.schedule.to_string())
            .field("handle", &self.handle)
            .finish()
    }
}
