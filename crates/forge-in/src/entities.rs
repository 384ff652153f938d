//! Canonical entity records.
//!
//! One struct per entity kind, serialized with the canonical column names.
//! Columns the header reconciler kept as-is ride along in `extra`.

use crate::normalizer::{self, RowOutcome};
use forge_core::{EntityKind, RawRow, RawValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pass-through columns, in header order
pub type ExtraColumns = IndexMap<String, RawValue>;

/// How a numeric cell was read during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParseStatus {
    #[default]
    Parsed,
    Absent,
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ClientID")]
    pub client_id: String,
    #[serde(rename = "ClientName")]
    pub client_name: String,
    #[serde(rename = "PriorityLevel")]
    pub priority_level: i64,
    #[serde(rename = "RequestedTaskIDs")]
    pub requested_task_ids: Vec<String>,
    #[serde(rename = "GroupTag")]
    pub group_tag: String,
    #[serde(rename = "AttributesJSON")]
    pub attributes: Value,
    #[serde(flatten)]
    pub extra: ExtraColumns,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Worker {
    #[serde(rename = "WorkerID")]
    pub worker_id: String,
    #[serde(rename = "WorkerName")]
    pub worker_name: String,
    #[serde(rename = "Skills")]
    pub skills: Vec<String>,
    #[serde(rename = "AvailableSlots")]
    pub available_slots: Vec<i64>,
    #[serde(rename = "MaxLoadPerPhase")]
    pub max_load_per_phase: i64,
    #[serde(rename = "WorkerGroup")]
    pub worker_group: String,
    #[serde(rename = "QualificationLevel")]
    pub qualification_level: i64,
    #[serde(flatten)]
    pub extra: ExtraColumns,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "TaskID")]
    pub task_id: String,
    #[serde(rename = "TaskName")]
    pub task_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Duration")]
    pub duration: i64,
    #[serde(rename = "RequiredSkills")]
    pub required_skills: Vec<String>,
    #[serde(rename = "PreferredPhases")]
    pub preferred_phases: Vec<i64>,
    #[serde(rename = "MaxConcurrent")]
    pub max_concurrent: i64,
    #[serde(rename = "AssignedWorkers", default)]
    pub assigned_workers: Vec<String>,
    /// How Duration was read; checked by the declared-type pass
    #[serde(skip)]
    pub duration_status: ParseStatus,
    #[serde(flatten)]
    pub extra: ExtraColumns,
}

/// Behaviour shared by the three canonical records.
pub trait CanonicalRecord: Sized + Serialize {
    const KIND: EntityKind;

    /// Canonical column names in export order
    const COLUMNS: &'static [&'static str];

    /// Build a record from a reconciled row. `index` is 0-based.
    fn normalize(row: &RawRow, index: usize) -> RowOutcome<Self>;

    fn id(&self) -> &str;

    /// Canonical cells, aligned with `COLUMNS`
    fn cells(&self) -> Vec<String>;

    fn extra(&self) -> &ExtraColumns;
}

impl CanonicalRecord for Client {
    const KIND: EntityKind = EntityKind::Client;
    const COLUMNS: &'static [&'static str] = &[
        "ClientID",
        "ClientName",
        "PriorityLevel",
        "RequestedTaskIDs",
        "GroupTag",
        "AttributesJSON",
    ];

    fn normalize(row: &RawRow, index: usize) -> RowOutcome<Self> {
        normalizer::normalize_client(row, index)
    }

    fn id(&self) -> &str {
        &self.client_id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.client_id.clone(),
            self.client_name.clone(),
            self.priority_level.to_string(),
            self.requested_task_ids.join(","),
            self.group_tag.clone(),
            self.attributes.to_string(),
        ]
    }

    fn extra(&self) -> &ExtraColumns {
        &self.extra
    }
}

impl CanonicalRecord for Worker {
    const KIND: EntityKind = EntityKind::Worker;
    const COLUMNS: &'static [&'static str] = &[
        "WorkerID",
        "WorkerName",
        "Skills",
        "AvailableSlots",
        "MaxLoadPerPhase",
        "WorkerGroup",
        "QualificationLevel",
    ];

    fn normalize(row: &RawRow, index: usize) -> RowOutcome<Self> {
        normalizer::normalize_worker(row, index)
    }

    fn id(&self) -> &str {
        &self.worker_id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.worker_id.clone(),
            self.worker_name.clone(),
            self.skills.join(","),
            join_numbers(&self.available_slots),
            self.max_load_per_phase.to_string(),
            self.worker_group.clone(),
            self.qualification_level.to_string(),
        ]
    }

    fn extra(&self) -> &ExtraColumns {
        &self.extra
    }
}

impl CanonicalRecord for Task {
    const KIND: EntityKind = EntityKind::Task;
    const COLUMNS: &'static [&'static str] = &[
        "TaskID",
        "TaskName",
        "Category",
        "Duration",
        "RequiredSkills",
        "PreferredPhases",
        "MaxConcurrent",
        "AssignedWorkers",
    ];

    fn normalize(row: &RawRow, index: usize) -> RowOutcome<Self> {
        normalizer::normalize_task(row, index)
    }

    fn id(&self) -> &str {
        &self.task_id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.task_id.clone(),
            self.task_name.clone(),
            self.category.clone(),
            self.duration.to_string(),
            self.required_skills.join(","),
            join_numbers(&self.preferred_phases),
            self.max_concurrent.to_string(),
            self.assigned_workers.join(","),
        ]
    }

    fn extra(&self) -> &ExtraColumns {
        &self.extra
    }
}

fn join_numbers(values: &[i64]) -> String {
    values.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_serializes_canonical_names() {
        let mut client = Client {
            client_id: "C1".to_string(),
            client_name: "Acme".to_string(),
            priority_level: 3,
            requested_task_ids: vec!["T1".to_string()],
            attributes: json!({"tier": "gold"}),
            ..Default::default()
        };
        client.extra.insert("Region".to_string(), "EU".into());

        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(value["ClientID"], "C1");
        assert_eq!(value["RequestedTaskIDs"], json!(["T1"]));
        assert_eq!(value["AttributesJSON"]["tier"], "gold");
        assert_eq!(value["Region"], "EU");
    }

    #[test]
    fn test_cells_follow_columns() {
        let task = Task {
            task_id: "T1".to_string(),
            duration: 2,
            preferred_phases: vec![1, 2],
            assigned_workers: vec!["W1".to_string(), "W2".to_string()],
            ..Default::default()
        };
        let cells = task.cells();
        assert_eq!(cells.len(), Task::COLUMNS.len());
        assert_eq!(cells[3], "2");
        assert_eq!(cells[5], "1,2");
        assert_eq!(cells[7], "W1,W2");
    }
}
