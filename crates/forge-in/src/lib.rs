//! Forge-IN: Spreadsheet rows to canonical records
//!
//! This crate turns loosely-typed rows, as handed over by a file decoder,
//! into canonical client, worker and task records.
//!
//! # Pipeline
//!
//! ```text
//! RawRow[] → reconcile headers → rewrite rows → normalize per kind → records
//!                  ↓                                    ↓
//!          mapping advisories                 structural diagnostics
//! ```
//!
//! # Example
//!
//! ```
//! use forge_in::{ingest, Client};
//! use forge_core::RawRow;
//!
//! let rows: Vec<RawRow> = serde_json::from_str(
//!     r#"[{"id": "C1", "name": "Acme", "priority": "2", "tasks": "T1,T2"}]"#,
//! ).unwrap();
//!
//! let outcome = ingest::<Client>(&rows);
//! assert_eq!(outcome.records[0].client_id, "C1");
//! assert_eq!(outcome.records[0].requested_task_ids, vec!["T1", "T2"]);
//! ```

pub mod coerce;
pub mod decode;
pub mod entities;
pub mod headers;
pub mod normalizer;

pub use decode::{decode_by_extension, decode_csv_rows, decode_json_rows, DecodeError};
pub use entities::{CanonicalRecord, Client, ExtraColumns, ParseStatus, Task, Worker};
pub use headers::{reconcile_headers, HeaderMapping};
pub use normalizer::RowOutcome;

use forge_core::{Diagnostic, DiagnosticCategory, EntityKind, RawRow, UNKNOWN_ENTITY_ID};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, warn};

/// Records and diagnostics from ingesting one dataset.
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome<T> {
    pub records: Vec<T>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The three raw uploads, one row array per kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDataset {
    #[serde(default)]
    pub clients: Vec<RawRow>,
    #[serde(default)]
    pub workers: Vec<RawRow>,
    #[serde(default)]
    pub tasks: Vec<RawRow>,
}

/// Normalized collections, the input shape of the validation engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityCollections {
    pub clients: Vec<Client>,
    pub workers: Vec<Worker>,
    pub tasks: Vec<Task>,
}

impl EntityCollections {
    pub fn total_records(&self) -> usize {
        self.clients.len() + self.workers.len() + self.tasks.len()
    }
}

/// Reconcile headers and normalize every row of one dataset.
///
/// The first row's keys define the header set. Empty input yields an empty
/// outcome. A row whose processing panics is dropped and reported as a
/// single structural error; the remaining rows are still processed.
pub fn ingest<T: CanonicalRecord>(rows: &[RawRow]) -> IngestOutcome<T> {
    let kind = T::KIND;
    let mut diagnostics = Vec::new();
    let mut records = Vec::with_capacity(rows.len());

    // Nothing uploaded for this kind. A file that decodes to zero rows is
    // rejected earlier, by `DecodeError::Empty`.
    let Some(first) = rows.first() else {
        return IngestOutcome { records, diagnostics };
    };

    let mapping = reconcile_headers(kind, first.keys().map(String::as_str));
    diagnostics.extend(mapping.diagnostics.iter().cloned());

    for (index, row) in rows.iter().enumerate() {
        let reconciled = mapping.apply(row);
        match panic::catch_unwind(AssertUnwindSafe(|| T::normalize(&reconciled, index))) {
            Ok(outcome) => {
                records.push(outcome.record);
                diagnostics.extend(outcome.diagnostics);
            }
            Err(_) => {
                warn!(%kind, row = index + 1, "row processing panicked");
                diagnostics.push(processing_error(kind, index));
            }
        }
    }

    info!(
        %kind,
        rows = rows.len(),
        records = records.len(),
        issues = diagnostics.len(),
        "ingested dataset"
    );
    IngestOutcome { records, diagnostics }
}

/// Ingest all three datasets. Diagnostics come back in client, worker,
/// task order.
pub fn ingest_dataset(dataset: &RawDataset) -> (EntityCollections, Vec<Diagnostic>) {
    let clients = ingest::<Client>(&dataset.clients);
    let workers = ingest::<Worker>(&dataset.workers);
    let tasks = ingest::<Task>(&dataset.tasks);

    let mut diagnostics = clients.diagnostics;
    diagnostics.extend(workers.diagnostics);
    diagnostics.extend(tasks.diagnostics);

    let collections = EntityCollections {
        clients: clients.records,
        workers: workers.records,
        tasks: tasks.records,
    };
    (collections, diagnostics)
}

fn processing_error(kind: EntityKind, index: usize) -> Diagnostic {
    let row_number = index + 1;
    Diagnostic::error(
        DiagnosticCategory::Structural,
        kind,
        UNKNOWN_ENTITY_ID,
        "row",
        &format!("row{}-processing", row_number),
        format!("Row {}: Processing error", row_number),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(json: &str) -> Vec<RawRow> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ingest_maps_headers_then_normalizes() {
        let outcome = ingest::<Worker>(&rows(
            r#"[{"worker_id": "W1", "Name": "Ann", "skill": "rust, sql", "slots": "1-3", "capacity": "2"}]"#,
        ));
        let worker = &outcome.records[0];
        assert_eq!(worker.worker_id, "W1");
        assert_eq!(worker.skills, vec!["rust", "sql"]);
        assert_eq!(worker.available_slots, vec![1, 2, 3]);
        assert_eq!(worker.max_load_per_phase, 2);
        assert!(outcome.diagnostics.iter().all(|d| d.category == DiagnosticCategory::Mapping));
    }

    #[test]
    fn test_empty_dataset_is_not_an_error() {
        let outcome = ingest::<Task>(&[]);
        assert!(outcome.records.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_bad_rows_do_not_stop_later_rows() {
        let outcome = ingest::<Client>(&rows(
            r#"[{"ClientID": "", "ClientName": ""}, {"ClientID": "C2", "ClientName": "Globex"}]"#,
        ));
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[1].client_id, "C2");
        let errors: Vec<&str> = outcome.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(errors, vec!["Row 1: Missing ClientID", "Row 1: Missing ClientName"]);
    }

    /// Task record whose normalization blows up on a marker id.
    #[derive(Debug, Serialize)]
    struct Brittle(Task);

    impl CanonicalRecord for Brittle {
        const KIND: EntityKind = EntityKind::Task;
        const COLUMNS: &'static [&'static str] = Task::COLUMNS;

        fn normalize(row: &RawRow, index: usize) -> RowOutcome<Self> {
            let outcome = Task::normalize(row, index);
            if outcome.record.task_id == "BOOM" {
                panic!("cannot normalize row {}", index);
            }
            RowOutcome {
                record: Brittle(outcome.record),
                diagnostics: outcome.diagnostics,
            }
        }

        fn id(&self) -> &str {
            self.0.id()
        }

        fn cells(&self) -> Vec<String> {
            self.0.cells()
        }

        fn extra(&self) -> &ExtraColumns {
            self.0.extra()
        }
    }

    #[test]
    fn test_panicking_row_becomes_processing_error() {
        let outcome = ingest::<Brittle>(&rows(
            r#"[
                {"TaskID": "T1", "TaskName": "Build", "Duration": "2"},
                {"TaskID": "BOOM", "TaskName": "Explode", "Duration": "2"},
                {"TaskID": "T3", "TaskName": "Ship", "Duration": "1"}
            ]"#,
        ));

        let ids: Vec<&str> = outcome.records.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["T1", "T3"]);

        assert_eq!(outcome.diagnostics.len(), 1);
        let d = &outcome.diagnostics[0];
        assert_eq!(d.message, "Row 2: Processing error");
        assert_eq!(d.entity, EntityKind::Task);
        assert_eq!(d.entity_id, UNKNOWN_ENTITY_ID);
        assert_eq!(d.field, "row");
        assert!(d.is_error());
    }
}
