//! EventRegistry - in-memory store keyed by protocol
//!
//! Insertion-ordered map behind a `parking_lot` RwLock. Replacing a record
//! keeps its slot, so exports list events in first-registration order.
//!
//! `upsert` does its lookup and write under one write guard with no await
//! point in between, so concurrent submissions for the same protocol can
//! never both append.
//!
//! Nothing is persisted: the registry lives as long as the process.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::error::{RegistryError, Result};
use crate::record::EventRecord;
use crate::submission::{canonical_protocol, Submission};

/// Whether an upsert created a new slot or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Replaced,
}

/// Shared, cloneable handle to one registry instance
#[derive(Clone, Default)]
pub struct EventRegistry {
    /// protocol → record, in insertion order
    records: Arc<RwLock<IndexMap<String, EventRecord>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, or fully replace the one with the same protocol
    ///
    /// The record's protocol is already canonical (see [`crate::record::normalize`]),
    /// so matching is exact.
    pub fn upsert(&self, record: EventRecord) -> UpsertOutcome {
        let mut records = self.records.write();
        // IndexMap::insert keeps the existing index on replace
        match records.insert(record.protocol().to_string(), record) {
            Some(_) => UpsertOutcome::Replaced,
            None => UpsertOutcome::Created,
        }
    }

    /// Look up a record by protocol, ignoring case and surrounding spaces
    pub fn get(&self, protocol: &str) -> Option<EventRecord> {
        self.records
            .read()
            .get(&canonical_protocol(protocol))
            .cloned()
    }

    /// Preserved submission for a protocol
    ///
    /// A missing protocol is an expected outcome and comes back as
    /// [`RegistryError::NotFound`].
    pub fn find_by_protocol(&self, protocol: &str) -> Result<Submission> {
        self.get(protocol)
            .map(|record| record.submission().clone())
            .ok_or_else(|| RegistryError::NotFound {
                protocol: canonical_protocol(protocol),
            })
    }

    /// Snapshot of all records in registry order
    ///
    /// Later mutations are not reflected in a snapshot already taken.
    pub fn list_all(&self) -> Vec<EventRecord> {
        self.records.read().values().cloned().collect()
    }

    pub fn contains(&self, protocol: &str) -> bool {
        self.records.read().contains_key(&canonical_protocol(protocol))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("len", &self.len())
            .finish()
    }
}
