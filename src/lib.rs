//! Event registry - registration backend for organization events
//!
//! Submissions are normalized into flat reporting records, kept in an
//! in-memory registry keyed by protocol, and exported as a spreadsheet.
//! Operators are notified by mail on every save; an AI collaborator can
//! draft event copy.

pub mod assist;
pub mod config;
pub mod error;
pub mod event_log;
pub mod notify;
pub mod provider;
pub mod record;
pub mod registry;
pub mod report;
pub mod server;
pub mod service;
pub mod submission;
pub mod util;

pub use config::AppConfig;
pub use error::{RegistryError, Result};
pub use event_log::{Event, EventKind, EventLog};
pub use notify::{Mail, Mailer, MockMailer, Notifier, NotifyOutcome};
pub use record::{normalize, EventRecord, FlatReportRow};
pub use registry::{EventRegistry, UpsertOutcome};
pub use report::{project, to_xlsx};
pub use service::{EventService, SubmitReceipt};
pub use submission::Submission;
