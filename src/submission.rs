//! Submission schema
//!
//! A Submission is the nested JSON object posted by the registration form.
//! Five sections are mandatory; inside them, only `cabecalho.protocolo` is a
//! required leaf. Every other reporting field is optional and projects to an
//! empty cell when absent.
//!
//! The raw JSON is kept verbatim (extra sections and keys included) so the
//! edit form can be repopulated with exactly what was sent.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{RegistryError, Result};

/// Sections every submission must carry, as JSON objects
pub const SECTIONS: [&str; 5] = [
    "cabecalho",
    "informacoesGerais",
    "dataLocal",
    "publico",
    "financeiro",
];

/// Whether a leaf field may be absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// One flat reporting field: where it lives in the submission and which
/// export column it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub section: &'static str,
    pub key: &'static str,
    pub column: &'static str,
    pub presence: Presence,
}

impl FieldSpec {
    const fn optional(section: &'static str, key: &'static str, column: &'static str) -> Self {
        Self {
            section,
            key,
            column,
            presence: Presence::Optional,
        }
    }

    /// Dotted path, e.g. `cabecalho.protocolo`
    pub fn path(&self) -> String {
        format!("{}.{}", self.section, self.key)
    }
}

pub const PROTOCOL: FieldSpec = FieldSpec {
    section: "cabecalho",
    key: "protocolo",
    column: "Protocolo",
    presence: Presence::Required,
};
pub const REGISTERED_AT: FieldSpec = FieldSpec::optional("cabecalho", "dataRegistro", "Data_Registro");
pub const DEADLINE_STATUS: FieldSpec = FieldSpec::optional("cabecalho", "statusPrazo", "Status_Prazo");
pub const EVENT_NAME: FieldSpec = FieldSpec::optional("informacoesGerais", "evento", "Nome_Evento");
pub const EVENT_TYPE: FieldSpec = FieldSpec::optional("informacoesGerais", "tipo", "Tipo");
pub const RESPONSIBLE: FieldSpec = FieldSpec::optional("informacoesGerais", "responsavel", "Responsavel");
pub const EVENT_DATE: FieldSpec = FieldSpec::optional("dataLocal", "data", "Data_Evento");
pub const OBJECTIVE: FieldSpec = FieldSpec::optional("publico", "objetivo", "Objetivo");
pub const IS_PAID: FieldSpec = FieldSpec::optional("financeiro", "pago", "Pagante");

/// All reporting fields in export column order
pub const FIELDS: [FieldSpec; 9] = [
    PROTOCOL,
    REGISTERED_AT,
    DEADLINE_STATUS,
    EVENT_NAME,
    EVENT_TYPE,
    RESPONSIBLE,
    EVENT_DATE,
    OBJECTIVE,
    IS_PAID,
];

/// Canonical form of a protocol identifier (trimmed, uppercased)
pub fn canonical_protocol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Original nested submission, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Submission(Value);

impl Submission {
    /// Wrap a JSON value; the top level must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(RegistryError::malformed(
                "$",
                format!("expected a JSON object, got {}", type_name(&value)),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn section(&self, name: &str) -> Result<&Map<String, Value>> {
        match self.0.get(name) {
            Some(Value::Object(map)) => Ok(map),
            None | Some(Value::Null) => Err(RegistryError::malformed(
                name,
                "required section is missing",
            )),
            Some(other) => Err(RegistryError::malformed(
                name,
                format!("expected an object, got {}", type_name(other)),
            )),
        }
    }

    /// Scalar value of a reporting field, `None` when an optional field is
    /// absent or null
    pub fn field(&self, spec: &FieldSpec) -> Result<Option<&Value>> {
        let section = self.section(spec.section)?;
        match section.get(spec.key) {
            None | Some(Value::Null) => match spec.presence {
                Presence::Required => Err(RegistryError::malformed(
                    spec.path(),
                    "required field is missing",
                )),
                Presence::Optional => Ok(None),
            },
            Some(v @ (Value::Object(_) | Value::Array(_))) => Err(RegistryError::malformed(
                spec.path(),
                format!("expected a scalar, got {}", type_name(v)),
            )),
            Some(v) => Ok(Some(v)),
        }
    }

    /// Canonical protocol of this submission
    pub fn protocol(&self) -> Result<String> {
        let raw = match self.field(&PROTOCOL)? {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(RegistryError::malformed(
                    PROTOCOL.path(),
                    format!("expected a string, got {}", type_name(other)),
                ))
            }
            // Required fields never come back as None
            None => {
                return Err(RegistryError::malformed(
                    PROTOCOL.path(),
                    "required field is missing",
                ))
            }
        };

        let protocol = canonical_protocol(raw);
        if protocol.is_empty() {
            return Err(RegistryError::malformed(PROTOCOL.path(), "protocol is empty"));
        }
        Ok(protocol)
    }

    /// Check every section and reporting field without building a record
    pub fn validate(&self) -> Result<()> {
        for section in SECTIONS {
            self.section(section)?;
        }
        for spec in &FIELDS[1..] {
            self.field(spec)?;
        }
        self.protocol().map(|_| ())
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
