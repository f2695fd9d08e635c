//! EventRecord and its flat reporting projection
//!
//! [`normalize`] turns a posted submission into an [`EventRecord`]: the nine
//! reporting fields copied by value, plus the untouched submission. Records
//! can only be built through `normalize`, so the flat fields always match a
//! fresh derivation from the preserved submission.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::submission::{
    FieldSpec, Submission, DEADLINE_STATUS, EVENT_DATE, EVENT_NAME, EVENT_TYPE, IS_PAID, OBJECTIVE,
    REGISTERED_AT, RESPONSIBLE,
};

/// Export-ready row: reporting fields only, serialized with the column names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlatReportRow {
    #[serde(rename = "Protocolo")]
    pub protocol: String,
    #[serde(rename = "Data_Registro")]
    pub registered_at: Value,
    #[serde(rename = "Status_Prazo")]
    pub deadline_status: Value,
    #[serde(rename = "Nome_Evento")]
    pub event_name: Value,
    #[serde(rename = "Tipo")]
    pub event_type: Value,
    #[serde(rename = "Responsavel")]
    pub responsible: Value,
    #[serde(rename = "Data_Evento")]
    pub event_date: Value,
    #[serde(rename = "Objetivo")]
    pub objective: Value,
    #[serde(rename = "Pagante")]
    pub is_paid: Value,
}

impl FlatReportRow {
    /// Derive the reporting fields from a submission
    pub fn derive(submission: &Submission) -> Result<Self> {
        let scalar = |spec: &FieldSpec| -> Result<Value> {
            Ok(submission.field(spec)?.cloned().unwrap_or(Value::Null))
        };

        Ok(Self {
            protocol: submission.protocol()?,
            registered_at: scalar(&REGISTERED_AT)?,
            deadline_status: scalar(&DEADLINE_STATUS)?,
            event_name: scalar(&EVENT_NAME)?,
            event_type: scalar(&EVENT_TYPE)?,
            responsible: scalar(&RESPONSIBLE)?,
            event_date: scalar(&EVENT_DATE)?,
            objective: scalar(&OBJECTIVE)?,
            is_paid: scalar(&IS_PAID)?,
        })
    }

    /// Cell values in column order (see [`crate::submission::FIELDS`])
    pub fn cells(&self) -> [Value; 9] {
        [
            Value::String(self.protocol.clone()),
            self.registered_at.clone(),
            self.deadline_status.clone(),
            self.event_name.clone(),
            self.event_type.clone(),
            self.responsible.clone(),
            self.event_date.clone(),
            self.objective.clone(),
            self.is_paid.clone(),
        ]
    }
}

/// Canonical internal record
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    flat: FlatReportRow,
    /// Arc so registry snapshots stay cheap to clone
    submission: Arc<Submission>,
}

impl EventRecord {
    pub fn protocol(&self) -> &str {
        &self.flat.protocol
    }

    pub fn flat(&self) -> &FlatReportRow {
        &self.flat
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    /// Event name as plain text (empty when absent)
    pub fn event_name(&self) -> String {
        display_value(&self.flat.event_name)
    }

    /// Re-derive the flat fields and compare with the stored ones
    pub fn is_consistent(&self) -> bool {
        FlatReportRow::derive(&self.submission).is_ok_and(|flat| flat == self.flat)
    }
}

/// Build an EventRecord from a posted submission
pub fn normalize(submission: Value) -> Result<EventRecord> {
    let submission = Submission::from_value(submission)?;
    submission.validate()?;
    let flat = FlatReportRow::derive(&submission)?;

    Ok(EventRecord {
        flat,
        submission: Arc::new(submission),
    })
}

/// Render a scalar cell as text: strings verbatim, null as empty
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
