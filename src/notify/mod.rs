//! # Notification Trigger
//!
//! After a submission is committed, the operator gets an e-mail naming the
//! event and its protocol.
//!
//! - [`Mailer`] - Core trait for delivering one message
//! - [`SmtpMailer`] - Production mailer (SMTP relay with credentials)
//! - [`MockMailer`] - Test mailer that records messages and can fail on demand
//! - [`Notifier`] - Builds the message and dispatches it on a background task
//!
//! Delivery never affects the write that triggered it: the record is already
//! in the registry when [`Notifier::notify`] runs, the send happens on a
//! detached tokio task, and failures end up in the [`EventLog`] and the
//! tracing output. Without mail credentials the notifier is a no-op.

mod mock;
mod smtp;

pub use mock::MockMailer;
pub use smtp::SmtpMailer;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::config::MailConfig;
use crate::error::{Collaborator, RegistryError};
use crate::event_log::{EventKind, EventLog};
use crate::record::EventRecord;

/// One outbound plain-text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Fire-and-forget mail delivery capability
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns the mailer name (e.g., "smtp", "mock")
    fn name(&self) -> &str;

    /// Deliver one message
    async fn send(&self, mail: Mail) -> Result<()>;
}

/// What `notify` did with a record
#[derive(Debug)]
pub enum NotifyOutcome {
    /// Mail not configured
    Skipped,
    /// Delivery running in the background
    Dispatched(JoinHandle<()>),
}

impl NotifyOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }

    /// Wait for a dispatched delivery to finish (tests, graceful shutdown)
    pub async fn join(self) {
        if let Self::Dispatched(handle) = self {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "notification task aborted");
            }
        }
    }
}

/// Build the operator notification for a committed record
pub fn notification_mail(record: &EventRecord, from: &str, to: &str) -> Mail {
    let protocol = record.protocol();
    let event_name = record.event_name();

    Mail {
        from: from.to_string(),
        to: to.to_string(),
        subject: format!("🔔 IBR: {} ({})", event_name, protocol),
        body: format!(
            "Protocolo: {}\nEvento: {}\nEvento salvo com sucesso.",
            protocol, event_name
        ),
    }
}

/// Dispatches notifications for committed records
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<Arc<dyn Mailer>>,
    from: String,
    to: String,
    log: EventLog,
}

impl Notifier {
    /// Notifier that skips every record
    pub fn disabled(log: EventLog) -> Self {
        Self {
            mailer: None,
            from: String::new(),
            to: String::new(),
            log,
        }
    }

    pub fn new(
        mailer: Arc<dyn Mailer>,
        from: impl Into<String>,
        to: impl Into<String>,
        log: EventLog,
    ) -> Self {
        Self {
            mailer: Some(mailer),
            from: from.into(),
            to: to.into(),
            log,
        }
    }

    /// SMTP notifier when mail is configured, disabled otherwise
    pub fn from_config(mail: Option<&MailConfig>, log: EventLog) -> crate::error::Result<Self> {
        let Some(mail) = mail else {
            return Ok(Self::disabled(log));
        };

        let mailer = SmtpMailer::new(mail)
            .map_err(|e| RegistryError::collaborator(Collaborator::Mail, format!("{:#}", e)))?;
        Ok(Self::new(Arc::new(mailer), &mail.user, &mail.notify_to, log))
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Notify the operator about a committed record
    ///
    /// Must be called from within a tokio runtime when enabled. The returned
    /// handle may be dropped; the delivery keeps running.
    pub fn notify(&self, record: &EventRecord) -> NotifyOutcome {
        let protocol: Arc<str> = Arc::from(record.protocol());

        let Some(mailer) = &self.mailer else {
            tracing::debug!(protocol = %protocol, "mail not configured, notification skipped");
            self.log.emit(EventKind::NotificationSkipped { protocol });
            return NotifyOutcome::Skipped;
        };

        let mail = notification_mail(record, &self.from, &self.to);
        let mailer = Arc::clone(mailer);
        let log = self.log.clone();

        let handle = tokio::spawn(async move {
            let to = mail.to.clone();
            match mailer.send(mail).await {
                Ok(()) => {
                    tracing::info!(protocol = %protocol, to = %to, mailer = mailer.name(), "notification sent");
                    log.emit(EventKind::NotificationSent { protocol, to });
                }
                Err(e) => {
                    tracing::warn!(protocol = %protocol, error = %format!("{:#}", e), "notification failed (ignored)");
                    log.emit(EventKind::NotificationFailed {
                        protocol,
                        error: format!("{:#}", e),
                    });
                }
            }
        });

        NotifyOutcome::Dispatched(handle)
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("mailer", &self.mailer.as_ref().map(|m| m.name().to_string()))
            .field("to", &self.to)
            .finish()
    }
}
