//! Bounded retry and fallback for scheduled deliveries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::mail::{Mailer, SendContext};

/// Retry policy applied to each scheduled firing.
///
/// The default reproduces a fixed, delay-free three-attempt loop. Production
/// deployments talking to rate-limited servers should set a backoff.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum normal delivery attempts per firing (including the first).
    pub max_attempts: u32,
    /// Optional delay between attempts.
    pub backoff: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: None,
        }
    }
}

/// Invoked by the trigger service at each scheduled instant.
///
/// Implementations must recover from every failure internally; the trigger
/// service has no error channel.
#[async_trait]
pub trait OnSchedule: Send + Sync + 'static {
    async fn on_schedule(&self);
}

/// Drives one scheduled occurrence: normal delivery up to the policy bound,
/// then a single fallback delivery on exhaustion.
///
/// No state persists across occurrences. The controller holds the send gate
/// for the whole occurrence, so a concurrent manual send waits until the
/// firing completes.
pub struct DeliveryController<M: Mailer> {
    ctx: Arc<Mutex<SendContext<M>>>,
    policy: RetryPolicy,
}

impl<M: Mailer> DeliveryController<M> {
    pub fn new(ctx: Arc<Mutex<SendContext<M>>>, policy: RetryPolicy) -> Self {
        Self { ctx, policy }
    }
}

#[async_trait]
impl<M: Mailer> OnSchedule for DeliveryController<M> {
    async fn on_schedule(&self) {
        let mut ctx = self.ctx.lock().await;
        let recipients = ctx.envelope().to().to_vec();

        for attempt in 1..=self.policy.max_attempts {
            tracing::info!(attempt, ?recipients, "attempting scheduled delivery");

            match ctx.send_normal().await {
                Ok(()) => {
                    tracing::info!(attempt, "mail delivered");
                    return;
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "delivery attempt failed");
                }
            }

            if attempt < self.policy.max_attempts {
                if let Some(delay) = self.policy.backoff {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        tracing::warn!(
            attempts = self.policy.max_attempts,
            ?recipients,
            "all delivery attempts failed, sending failure notification"
        );

        match ctx.send_fallback().await {
            Ok(()) => tracing::info!("failure notification delivered"),
            Err(e) => tracing::error!(error = %e, "failure notification could not be delivered"),
        }
    }
}
