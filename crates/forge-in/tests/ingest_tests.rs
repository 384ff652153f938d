//! Integration tests for forge-in against the CSV fixtures.
//!
//! These decode real files, reconcile their headers and normalize every row.

use forge_core::{DiagnosticCategory, RawRow, Severity};
use forge_in::{decode_by_extension, ingest, ingest_dataset, Client, RawDataset, Task, Worker};

const DATASETS: &str = "testing/fixtures/datasets";

fn fixture(name: &str) -> Vec<RawRow> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    let path = workspace_root.join(DATASETS).join(name);
    let text = std::fs::read_to_string(&path).unwrap();
    decode_by_extension(name, &text).unwrap()
}

// =============================================================================
// Clients
// =============================================================================

#[test]
fn test_clients_headers_are_reconciled() {
    let outcome = ingest::<Client>(&fixture("clients.csv"));
    assert_eq!(outcome.records.len(), 4);

    let mapped: Vec<&str> = outcome
        .diagnostics
        .iter()
        .filter(|d| d.category == DiagnosticCategory::Mapping)
        .map(|d| d.message.as_str())
        .collect();
    assert!(mapped.contains(&"Mapped column \"Client ID\" to \"ClientID\""));
    assert!(mapped.contains(&"Mapped column \"Tasks\" to \"RequestedTaskIDs\""));
    assert!(mapped.contains(&"Unknown column \"Region\" - keeping as-is"));

    let acme = &outcome.records[0];
    assert_eq!(acme.client_name, "Acme Corp");
    assert_eq!(acme.requested_task_ids, vec!["T1", "T2"]);
    assert_eq!(acme.attributes["tier"], "gold");
    assert!(acme.extra.contains_key("Region"));
}

#[test]
fn test_clients_row_findings() {
    let outcome = ingest::<Client>(&fixture("clients.csv"));
    let structural: Vec<(Severity, &str)> = outcome
        .diagnostics
        .iter()
        .filter(|d| d.category == DiagnosticCategory::Structural)
        .map(|d| (d.severity, d.message.as_str()))
        .collect();

    assert!(structural.contains(&(Severity::Error, "Row 2: PriorityLevel must be between 1-5")));
    assert!(structural
        .iter()
        .any(|(severity, message)| *severity == Severity::Warning && message.starts_with("Row 4: PriorityLevel")));

    // unparseable priority falls back
    assert_eq!(outcome.records[3].priority_level, 1);
    // duplicates are kept for the validation engine
    assert_eq!(outcome.records[2].client_id, "C1");
}

// =============================================================================
// Workers and tasks
// =============================================================================

#[test]
fn test_workers_slot_formats() {
    let outcome = ingest::<Worker>(&fixture("workers.csv"));
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.records[0].available_slots, vec![1, 2, 3]);
    assert_eq!(outcome.records[1].available_slots, vec![2, 4]);
    assert_eq!(outcome.records[0].skills, vec!["rust", "sql"]);
    assert_eq!(outcome.records[0].qualification_level, 4);
}

#[test]
fn test_tasks_assignments() {
    let outcome = ingest::<Task>(&fixture("tasks.csv"));
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].message, "Mapped column \"AssignedTo\" to \"AssignedWorkers\"");
    assert_eq!(outcome.records[1].assigned_workers, vec!["W2;W7"]);
    assert_eq!(outcome.records[0].preferred_phases, vec![1, 2]);
    assert_eq!(outcome.records[1].duration, 30);
}

// =============================================================================
// Whole dataset
// =============================================================================

#[test]
fn test_json_dataset_is_clean() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = std::path::Path::new(&manifest_dir).parent().unwrap().parent().unwrap();
    let text = std::fs::read_to_string(workspace_root.join(DATASETS).join("clean.json")).unwrap();
    let dataset: RawDataset = serde_json::from_str(&text).unwrap();

    let (collections, diagnostics) = ingest_dataset(&dataset);
    assert!(diagnostics.is_empty(), "unexpected: {:?}", diagnostics);
    assert_eq!(collections.total_records(), 3);
    assert_eq!(collections.workers[0].available_slots, vec![1, 2]);
    assert_eq!(collections.tasks[0].assigned_workers, vec!["W1"]);
}
