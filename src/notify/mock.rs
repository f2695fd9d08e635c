//! Mock mailer for testing
//!
//! Records every message instead of delivering it, and can be told to fail.

use super::{Mail, Mailer};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mailer that keeps sent messages in memory
#[derive(Clone, Default)]
pub struct MockMailer {
    sent: Arc<Mutex<Vec<Mail>>>,
    /// When set, every send fails with this message
    failure: Option<String>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mailer whose deliveries always fail
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            sent: Arc::default(),
            failure: Some(message.into()),
        }
    }

    /// Messages accepted so far
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().clone()
    }

    pub fn last(&self) -> Option<Mail> {
        self.sent.lock().last().cloned()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, mail: Mail) -> Result<()> {
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        self.sent.lock().push(mail);
        Ok(())
    }
}
