//! EventService - control flow over one registry instance
//!
//! ```text
//! submission ──normalize──► EventRecord ──upsert──► EventRegistry
//!                                            │
//!                                            └──notify (background)──► Mailer
//! ```
//!
//! The service owns its registry (no global state), so every test can build
//! an isolated instance. Lookups and exports read the same registry; the
//! AI-assist calls never touch it.

use std::sync::Arc;

use serde_json::Value;

use crate::assist::{self, Caption, CaptionRequest, IdeaRequest, IdeaSuggestion};
use crate::config::AppConfig;
use crate::error::{Collaborator, RegistryError, Result};
use crate::event_log::{EventKind, EventLog};
use crate::notify::{Notifier, NotifyOutcome};
use crate::provider::{create_provider, Provider};
use crate::record::{normalize, FlatReportRow};
use crate::registry::{EventRegistry, UpsertOutcome};
use crate::report::{project, to_xlsx};
use crate::submission::Submission;

/// Result of a committed submission
#[derive(Debug)]
pub struct SubmitReceipt {
    /// Canonical protocol the record was stored under
    pub protocol: String,
    pub outcome: UpsertOutcome,
    /// Background notification; dropping it does not cancel delivery
    pub notification: NotifyOutcome,
}

#[derive(Clone)]
pub struct EventService {
    registry: EventRegistry,
    notifier: Notifier,
    assist: Option<Arc<dyn Provider>>,
    log: EventLog,
}

impl EventService {
    pub fn new(
        registry: EventRegistry,
        notifier: Notifier,
        assist: Option<Arc<dyn Provider>>,
        log: EventLog,
    ) -> Self {
        Self {
            registry,
            notifier,
            assist,
            log,
        }
    }

    /// Service with an empty registry, no mail and no AI
    pub fn offline() -> Self {
        let log = EventLog::new();
        Self::new(EventRegistry::new(), Notifier::disabled(log.clone()), None, log)
    }

    /// Wire collaborators from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let log = EventLog::new();
        let notifier = Notifier::from_config(config.mail.as_ref(), log.clone())?;
        let assist = create_provider(config.assist.as_ref())
            .map_err(|e| RegistryError::collaborator(Collaborator::Assist, format!("{:#}", e)))?;

        Ok(Self::new(EventRegistry::new(), notifier, assist, log))
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    /// Normalize, commit, then fire the notification
    ///
    /// The registry write is complete before the notification is attempted;
    /// the notification outcome never changes the result.
    pub fn submit(&self, submission: Value) -> Result<SubmitReceipt> {
        let record = match normalize(submission) {
            Ok(record) => record,
            Err(e) => {
                tracing::info!(error = %e, "submission rejected");
                return Err(e);
            }
        };

        let protocol: Arc<str> = Arc::from(record.protocol());
        let outcome = self.registry.upsert(record.clone());

        self.log.emit(match outcome {
            UpsertOutcome::Created => EventKind::RecordCreated {
                protocol: Arc::clone(&protocol),
            },
            UpsertOutcome::Replaced => EventKind::RecordReplaced {
                protocol: Arc::clone(&protocol),
            },
        });
        tracing::info!(protocol = %protocol, outcome = ?outcome, "event saved");

        let notification = self.notifier.notify(&record);

        Ok(SubmitReceipt {
            protocol: protocol.to_string(),
            outcome,
            notification,
        })
    }

    /// Original submission for a protocol (case-insensitive)
    pub fn lookup(&self, protocol: &str) -> Result<Submission> {
        self.registry.find_by_protocol(protocol)
    }

    /// Current registry as export rows
    pub fn report(&self) -> Vec<FlatReportRow> {
        project(&self.registry.list_all())
    }

    /// Current registry as an xlsx workbook
    pub fn export_xlsx(&self) -> Result<Vec<u8>> {
        let rows = self.report();
        tracing::info!(rows = rows.len(), "exporting report");
        to_xlsx(&rows)
    }

    fn assist_provider(&self) -> Result<&dyn Provider> {
        self.assist
            .as_deref()
            .ok_or(RegistryError::AssistNotConfigured)
    }

    fn record_assist_failure(&self, operation: &str, error: &RegistryError) {
        if let RegistryError::Collaborator { .. } = error {
            tracing::warn!(operation, error = %error, "AI assist failed");
            self.log.emit(EventKind::AssistFailed {
                operation: operation.to_string(),
                error: error.to_string(),
            });
        }
    }

    pub async fn suggest_ideas(&self, request: &IdeaRequest) -> Result<IdeaSuggestion> {
        let provider = self.assist_provider()?;
        let result = assist::suggest_ideas(provider, request).await;
        if let Err(e) = &result {
            self.record_assist_failure("ideas", e);
        }
        result
    }

    pub async fn social_caption(&self, request: &CaptionRequest) -> Result<Caption> {
        let provider = self.assist_provider()?;
        let result = assist::social_caption(provider, request).await;
        if let Err(e) = &result {
            self.record_assist_failure("social", e);
        }
        result
    }
}

impl std::fmt::Debug for EventService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventService")
            .field("registry", &self.registry)
            .field("notifier", &self.notifier)
            .field("assist", &self.assist.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}
