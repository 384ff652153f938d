//! Entity normalization.
//!
//! Turns one reconciled row into one canonical record plus the structural
//! diagnostics found on the way:
//! - missing identifier or name
//! - numeric cells that were present but unreadable (fallback applied)
//! - the declared range of each kind (PriorityLevel, MaxLoadPerPhase, Duration)

use crate::coerce::{to_array_field, to_int_field, to_number_array_field, to_structured_field, to_text_field, IntCoercion};
use crate::entities::{CanonicalRecord, Client, ExtraColumns, ParseStatus, Task, Worker};
use forge_core::{Diagnostic, DiagnosticCategory, EntityKind, RawRow, RawValue};
use std::ops::RangeInclusive;

/// Allowed client priority levels
pub const PRIORITY_LEVELS: RangeInclusive<i64> = 1..=5;

pub const DEFAULT_PRIORITY_LEVEL: i64 = 1;
pub const DEFAULT_MAX_LOAD_PER_PHASE: i64 = 0;
pub const DEFAULT_QUALIFICATION_LEVEL: i64 = 1;
pub const DEFAULT_DURATION: i64 = 1;
pub const DEFAULT_MAX_CONCURRENT: i64 = 1;

/// A normalized record and the diagnostics raised while building it.
#[derive(Debug, Clone)]
pub struct RowOutcome<T> {
    pub record: T,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-row cursor over a reconciled row.
struct RowReader<'a> {
    row: &'a RawRow,
    kind: EntityKind,
    row_number: usize,
    entity_id: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RowReader<'a> {
    fn new(row: &'a RawRow, kind: EntityKind, index: usize) -> Self {
        let mut reader = Self {
            row,
            kind,
            row_number: index + 1,
            entity_id: String::new(),
            diagnostics: Vec::new(),
        };
        reader.entity_id = reader.text(kind.id_field());
        reader
    }

    fn cell(&self, field: &str) -> &RawValue {
        self.row.get(field).unwrap_or(&RawValue::Absent)
    }

    fn text(&self, field: &str) -> String {
        to_text_field(self.cell(field)).trim().to_string()
    }

    fn list(&self, field: &str) -> Vec<String> {
        to_array_field(self.cell(field))
    }

    fn numbers(&self, field: &str) -> Vec<i64> {
        to_number_array_field(self.cell(field))
    }

    /// Read an integer, falling back on absent or invalid cells. Invalid
    /// cells also raise a warning.
    fn int(&mut self, field: &str, fallback: i64) -> (i64, ParseStatus) {
        match to_int_field(self.cell(field)) {
            IntCoercion::Value(v) => (v, ParseStatus::Parsed),
            IntCoercion::Absent => (fallback, ParseStatus::Absent),
            IntCoercion::Invalid(raw) => {
                let message = format!(
                    "Row {}: {} value \"{}\" is not a number; using {}",
                    self.row_number, field, raw, fallback
                );
                self.warn(field, "parse", message);
                (fallback, ParseStatus::Invalid(raw))
            }
        }
    }

    fn require(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            let message = format!("Row {}: Missing {}", self.row_number, field);
            self.error(field, "missing", message);
        }
    }

    fn error(&mut self, field: &str, check: &str, message: String) {
        let check = format!("row{}-{}", self.row_number, check);
        self.diagnostics.push(Diagnostic::error(
            DiagnosticCategory::Structural,
            self.kind,
            &self.entity_id,
            field,
            &check,
            message,
        ));
    }

    fn warn(&mut self, field: &str, check: &str, message: String) {
        let check = format!("row{}-{}", self.row_number, check);
        self.diagnostics.push(Diagnostic::warning(
            DiagnosticCategory::Structural,
            self.kind,
            &self.entity_id,
            field,
            &check,
            message,
        ));
    }

    /// Columns outside the canonical set, in row order.
    fn extra(&self, columns: &[&str]) -> ExtraColumns {
        self.row
            .iter()
            .filter(|(key, _)| !columns.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

pub fn normalize_client(row: &RawRow, index: usize) -> RowOutcome<Client> {
    let mut reader = RowReader::new(row, EntityKind::Client, index);
    let (priority_level, _) = reader.int("PriorityLevel", DEFAULT_PRIORITY_LEVEL);

    let client = Client {
        client_id: reader.entity_id.clone(),
        client_name: reader.text("ClientName"),
        priority_level,
        requested_task_ids: reader.list("RequestedTaskIDs"),
        group_tag: reader.text("GroupTag"),
        attributes: to_structured_field(reader.cell("AttributesJSON")),
        extra: reader.extra(Client::COLUMNS),
    };

    reader.require("ClientID", &client.client_id);
    reader.require("ClientName", &client.client_name);
    if !PRIORITY_LEVELS.contains(&client.priority_level) {
        let message = format!(
            "Row {}: PriorityLevel must be between {}-{}",
            reader.row_number,
            PRIORITY_LEVELS.start(),
            PRIORITY_LEVELS.end()
        );
        reader.error("PriorityLevel", "range", message);
    }

    RowOutcome { record: client, diagnostics: reader.diagnostics }
}

pub fn normalize_worker(row: &RawRow, index: usize) -> RowOutcome<Worker> {
    let mut reader = RowReader::new(row, EntityKind::Worker, index);
    let (max_load_per_phase, _) = reader.int("MaxLoadPerPhase", DEFAULT_MAX_LOAD_PER_PHASE);
    let (qualification_level, _) = reader.int("QualificationLevel", DEFAULT_QUALIFICATION_LEVEL);

    let worker = Worker {
        worker_id: reader.entity_id.clone(),
        worker_name: reader.text("WorkerName"),
        skills: reader.list("Skills"),
        available_slots: reader.numbers("AvailableSlots"),
        max_load_per_phase,
        worker_group: reader.text("WorkerGroup"),
        qualification_level,
        extra: reader.extra(Worker::COLUMNS),
    };

    reader.require("WorkerID", &worker.worker_id);
    reader.require("WorkerName", &worker.worker_name);
    if worker.max_load_per_phase < 0 {
        let message = format!("Row {}: MaxLoadPerPhase must be non-negative", reader.row_number);
        reader.error("MaxLoadPerPhase", "range", message);
    }

    RowOutcome { record: worker, diagnostics: reader.diagnostics }
}

pub fn normalize_task(row: &RawRow, index: usize) -> RowOutcome<Task> {
    let mut reader = RowReader::new(row, EntityKind::Task, index);
    let (duration, duration_status) = reader.int("Duration", DEFAULT_DURATION);
    let (max_concurrent, _) = reader.int("MaxConcurrent", DEFAULT_MAX_CONCURRENT);

    let task = Task {
        task_id: reader.entity_id.clone(),
        task_name: reader.text("TaskName"),
        category: reader.text("Category"),
        duration,
        required_skills: reader.list("RequiredSkills"),
        preferred_phases: reader.numbers("PreferredPhases"),
        max_concurrent,
        assigned_workers: reader.list("AssignedWorkers"),
        duration_status,
        extra: reader.extra(Task::COLUMNS),
    };

    reader.require("TaskID", &task.task_id);
    reader.require("TaskName", &task.task_name);
    if task.duration < 1 {
        let message = format!("Row {}: Duration must be at least 1", reader.row_number);
        reader.error("Duration", "range", message);
    }

    RowOutcome { record: task, diagnostics: reader.diagnostics }
}
