//! EventLog - audit trail for registry writes and collaborator outcomes
//!
//! - Event: envelope with id + UTC timestamp + kind
//! - EventKind: record writes, notification outcomes, assist failures
//! - EventLog: thread-safe, bounded log shared by the service and the
//!   background notification tasks
//!
//! The log lives as long as the process, so it keeps only the most recent
//! [`MAX_EVENTS`] entries. Ids keep counting across evictions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::constants::MAX_EVENTS;

/// Single entry in the log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic sequence ID (for ordering)
    pub id: u64,
    pub at: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    // ═══════════════════════════════════════════
    // REGISTRY
    // ═══════════════════════════════════════════
    RecordCreated {
        protocol: Arc<str>,
    },
    RecordReplaced {
        protocol: Arc<str>,
    },

    // ═══════════════════════════════════════════
    // NOTIFICATION
    // ═══════════════════════════════════════════
    /// Mail credentials absent
    NotificationSkipped {
        protocol: Arc<str>,
    },
    NotificationSent {
        protocol: Arc<str>,
        to: String,
    },
    NotificationFailed {
        protocol: Arc<str>,
        error: String,
    },

    // ═══════════════════════════════════════════
    // AI ASSIST
    // ═══════════════════════════════════════════
    AssistFailed {
        operation: String,
        error: String,
    },
}

impl EventKind {
    /// Protocol the event refers to, if any
    pub fn protocol(&self) -> Option<&str> {
        match self {
            Self::RecordCreated { protocol }
            | Self::RecordReplaced { protocol }
            | Self::NotificationSkipped { protocol }
            | Self::NotificationSent { protocol, .. }
            | Self::NotificationFailed { protocol, .. } => Some(protocol),
            Self::AssistFailed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::NotificationFailed { .. } | Self::AssistFailed { .. }
        )
    }
}

/// Thread-safe ring of recent events
#[derive(Clone)]
pub struct EventLog {
    events: Arc<RwLock<VecDeque<Event>>>,
    next_id: Arc<AtomicU64>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(MAX_EVENTS)
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log keeping at most `capacity` events (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Arc::default(),
            next_id: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    /// Append an event, dropping the oldest when full (returns event ID)
    pub fn emit(&self, kind: EventKind) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let event = Event {
            id,
            at: Utc::now(),
            kind,
        };

        let mut events = self.events.write();
        if events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
        id
    }

    /// Get retained events, oldest first (cloned)
    pub fn events(&self) -> Vec<Event> {
        self.events.read().iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events about one protocol (canonical form)
    pub fn filter_protocol(&self, protocol: &str) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.protocol() == Some(protocol))
            .collect()
    }

    /// Collaborator failures only
    pub fn failures(&self) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.is_failure())
            .collect()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self.events()).unwrap_or(Value::Null)
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
