//! Registry invariants
//!
//! - one record per canonical protocol, whatever the submission sequence
//! - newest submission wins, slot position is kept
//! - lookups are case-insensitive and return the submission verbatim
//! - projection drops the preserved submission and keeps registry order

use event_registry::{normalize, project, EventRegistry, RegistryError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// HELPERS
// ============================================================================

fn submission(protocol: &str, name: &str) -> Value {
    json!({
        "cabecalho": { "protocolo": protocol, "dataRegistro": "2024-03-01", "statusPrazo": "No prazo" },
        "informacoesGerais": { "evento": name, "tipo": "Retiro", "responsavel": "Marta" },
        "dataLocal": { "data": "2024-07-20", "local": "Chácara" },
        "publico": { "objetivo": "Comunhão", "faixaEtaria": "15-29" },
        "financeiro": { "pago": true, "valor": 150 },
        "divulgacao": { "instagram": true }
    })
}

fn upsert(registry: &EventRegistry, protocol: &str, name: &str) {
    registry.upsert(normalize(submission(protocol, name)).unwrap());
}

// ============================================================================
// EXAMPLES
// ============================================================================

#[test]
fn resubmission_replaces_the_exported_row() {
    let registry = EventRegistry::new();

    upsert(&registry, "P1", "Retreat");
    let rows = project(&registry.list_all());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].protocol, "P1");
    assert_eq!(rows[0].event_name, json!("Retreat"));

    upsert(&registry, "P1", "Retreat (updated)");
    let rows = project(&registry.list_all());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].event_name, json!("Retreat (updated)"));
}

#[test]
fn unknown_protocol_is_not_found() {
    let registry = EventRegistry::new();
    let result = registry.find_by_protocol("P404");
    assert!(matches!(result, Err(RegistryError::NotFound { .. })));
}

#[test]
fn lookup_returns_the_submission_verbatim() {
    let registry = EventRegistry::new();
    let sent = submission("ibr-2024-001", "Congresso");
    registry.upsert(normalize(sent.clone()).unwrap());

    let found = registry.find_by_protocol("IBR-2024-001").unwrap();
    assert_eq!(found.into_value(), sent);
}

#[test]
fn lookup_ignores_case() {
    let registry = EventRegistry::new();
    upsert(&registry, "ABC123", "Culto");

    let a = registry.find_by_protocol("abc123").unwrap();
    let b = registry.find_by_protocol("ABC123").unwrap();
    assert_eq!(a, b);
}

#[test]
fn projection_has_only_reporting_columns() {
    let registry = EventRegistry::new();
    upsert(&registry, "P1", "Culto");

    let rows = serde_json::to_value(project(&registry.list_all())).unwrap();
    let row = rows[0].as_object().unwrap();
    let mut keys: Vec<_> = row.keys().cloned().collect();
    keys.sort();

    assert_eq!(
        keys,
        [
            "Data_Evento",
            "Data_Registro",
            "Nome_Evento",
            "Objetivo",
            "Pagante",
            "Protocolo",
            "Responsavel",
            "Status_Prazo",
            "Tipo"
        ]
    );
}

// ============================================================================
// PROPERTIES
// ============================================================================

fn arb_protocol() -> impl Strategy<Value = String> {
    // Small alphabet so sequences repeat protocols, in mixed case
    prop::sample::select(vec!["p1", "P1", "p2", "P3", "ibr-9", "IBR-9", " p2 "])
        .prop_map(str::to_string)
}

fn arb_submissions() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((arb_protocol(), "[A-Za-z ]{1,12}"), 0..40)
}

proptest! {
    #[test]
    fn one_record_per_protocol(subs in arb_submissions()) {
        let registry = EventRegistry::new();
        for (protocol, name) in &subs {
            upsert(&registry, protocol, name);
        }

        let mut distinct: Vec<String> = Vec::new();
        for (protocol, _) in &subs {
            let canonical = protocol.trim().to_uppercase();
            if !distinct.contains(&canonical) {
                distinct.push(canonical);
            }
        }

        let listed: Vec<String> = registry
            .list_all()
            .iter()
            .map(|r| r.protocol().to_string())
            .collect();

        // Same set, in first-submission order
        prop_assert_eq!(listed, distinct);
    }

    #[test]
    fn newest_submission_wins(subs in arb_submissions()) {
        let registry = EventRegistry::new();
        for (protocol, name) in &subs {
            upsert(&registry, protocol, name);
        }

        for record in registry.list_all() {
            let last_name = subs
                .iter()
                .rev()
                .find(|(p, _)| p.trim().to_uppercase() == record.protocol())
                .map(|(_, n)| n.clone())
                .unwrap();
            prop_assert_eq!(record.event_name(), last_name);
            prop_assert!(record.is_consistent());
        }
    }

    #[test]
    fn projection_preserves_registry_order(subs in arb_submissions()) {
        let registry = EventRegistry::new();
        for (protocol, name) in &subs {
            upsert(&registry, protocol, name);
        }

        let records = registry.list_all();
        let rows = project(&records);
        prop_assert_eq!(rows.len(), records.len());
        for (row, record) in rows.iter().zip(&records) {
            prop_assert_eq!(row, record.flat());
        }
    }
}
