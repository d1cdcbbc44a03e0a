#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cronmail::mail::{Envelope, MailError, Mailer};

/// One delivery accepted by the scripted mailer.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Mailer double that rejects a scripted number of sends with an SMTP error,
/// then accepts and records everything after.
#[derive(Clone, Default)]
pub struct ScriptedMailer {
    calls: Arc<AtomicUsize>,
    failures_remaining: Arc<AtomicUsize>,
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl ScriptedMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose first `n` sends fail.
    pub fn failing(n: usize) -> Self {
        let mailer = Self::default();
        mailer.failures_remaining.store(n, Ordering::SeqCst);
        mailer
    }

    /// Total sends attempted against this mailer, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for ScriptedMailer {
    async fn send(&self, envelope: &Envelope) -> Result<(), MailError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(MailError::Smtp("connection refused".into()));
        }

        self.deliveries.lock().unwrap().push(Delivery {
            from: envelope.from().to_string(),
            to: envelope.to().to_vec(),
            subject: envelope.subject().to_string(),
            body: envelope.body().unwrap_or_default().to_string(),
        });

        Ok(())
    }
}
