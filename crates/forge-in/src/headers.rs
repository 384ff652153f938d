//! Header reconciliation.
//!
//! Maps arbitrary or misspelled column names onto the canonical field set of
//! an entity kind:
//! - lower-case the header and strip every non-alphanumeric character
//! - look the result up in the kind's synonym table
//! - unknown headers pass through unchanged with an advisory

use forge_core::{Diagnostic, DiagnosticCategory, EntityKind, RawRow, UNKNOWN_ENTITY_ID};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

lazy_static! {
    /// Client synonyms (normalized key → canonical field)
    static ref CLIENT_SYNONYMS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("clientid", "ClientID");
        m.insert("id", "ClientID");
        m.insert("clientname", "ClientName");
        m.insert("name", "ClientName");
        m.insert("prioritylevel", "PriorityLevel");
        m.insert("priority", "PriorityLevel");
        m.insert("requestedtaskids", "RequestedTaskIDs");
        m.insert("tasks", "RequestedTaskIDs");
        m.insert("taskids", "RequestedTaskIDs");
        m.insert("grouptag", "GroupTag");
        m.insert("group", "GroupTag");
        m.insert("attributesjson", "AttributesJSON");
        m.insert("attributes", "AttributesJSON");
        m.insert("metadata", "AttributesJSON");
        m
    };

    /// Worker synonyms
    static ref WORKER_SYNONYMS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("workerid", "WorkerID");
        m.insert("id", "WorkerID");
        m.insert("workername", "WorkerName");
        m.insert("name", "WorkerName");
        m.insert("skills", "Skills");
        m.insert("skill", "Skills");
        m.insert("availableslots", "AvailableSlots");
        m.insert("slots", "AvailableSlots");
        m.insert("availability", "AvailableSlots");
        m.insert("maxloadperphase", "MaxLoadPerPhase");
        m.insert("maxload", "MaxLoadPerPhase");
        m.insert("capacity", "MaxLoadPerPhase");
        m.insert("workergroup", "WorkerGroup");
        m.insert("group", "WorkerGroup");
        m.insert("qualificationlevel", "QualificationLevel");
        m.insert("qualification", "QualificationLevel");
        m.insert("level", "QualificationLevel");
        m
    };

    /// Task synonyms
    static ref TASK_SYNONYMS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("taskid", "TaskID");
        m.insert("id", "TaskID");
        m.insert("taskname", "TaskName");
        m.insert("name", "TaskName");
        m.insert("category", "Category");
        m.insert("type", "Category");
        m.insert("duration", "Duration");
        m.insert("length", "Duration");
        m.insert("time", "Duration");
        m.insert("requiredskills", "RequiredSkills");
        m.insert("skills", "RequiredSkills");
        m.insert("skillrequirements", "RequiredSkills");
        m.insert("preferredphases", "PreferredPhases");
        m.insert("phases", "PreferredPhases");
        m.insert("preferredslots", "PreferredPhases");
        m.insert("maxconcurrent", "MaxConcurrent");
        m.insert("concurrency", "MaxConcurrent");
        m.insert("parallel", "MaxConcurrent");
        m.insert("assignedworkers", "AssignedWorkers");
        m.insert("assignedworkerid", "AssignedWorkers");
        m.insert("assignedworkerids", "AssignedWorkers");
        m.insert("assignedto", "AssignedWorkers");
        m.insert("workers", "AssignedWorkers");
        m
    };

    /// Anything that is not a lower-case letter or digit
    static ref NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]").unwrap();
}

/// Normalize a header for synonym lookup.
pub fn normalize_header(header: &str) -> String {
    NON_ALNUM.replace_all(&header.to_lowercase(), "").to_string()
}

/// Canonical field for a header, if the kind's synonym table knows it.
pub fn canonical_field(kind: EntityKind, header: &str) -> Option<&'static str> {
    let table: &HashMap<&'static str, &'static str> = match kind {
        EntityKind::Client => &CLIENT_SYNONYMS,
        EntityKind::Worker => &WORKER_SYNONYMS,
        EntityKind::Task => &TASK_SYNONYMS,
    };
    table.get(normalize_header(header).as_str()).copied()
}

/// Result of reconciling a header set.
#[derive(Debug, Clone, Default)]
pub struct HeaderMapping {
    /// Original header → resolved header, in column order
    pub columns: IndexMap<String, String>,
    /// Mapping advisories (always warnings)
    pub diagnostics: Vec<Diagnostic>,
}

impl HeaderMapping {
    /// Resolved name for a header; headers outside the mapping pass through.
    pub fn resolve<'a>(&'a self, header: &'a str) -> &'a str {
        self.columns.get(header).map(String::as_str).unwrap_or(header)
    }

    /// Rewrite a row's keys. When two columns resolve to the same field
    /// the later column wins.
    pub fn apply(&self, row: &RawRow) -> RawRow {
        let mut out = RawRow::with_capacity(row.len());
        for (key, value) in row {
            out.insert(self.resolve(key).to_string(), value.clone());
        }
        out
    }
}

/// Reconcile a header set against the synonym table of `kind`.
pub fn reconcile_headers<'a>(
    kind: EntityKind,
    headers: impl IntoIterator<Item = &'a str>,
) -> HeaderMapping {
    let mut mapping = HeaderMapping::default();
    let mut claimed: HashMap<&'static str, String> = HashMap::new();

    for header in headers {
        let resolved = match canonical_field(kind, header) {
            Some(field) => {
                if header != field {
                    debug!(%kind, header, field, "mapped column");
                    mapping.diagnostics.push(mapping_note(
                        kind,
                        field,
                        "mapped",
                        format!("Mapped column \"{}\" to \"{}\"", header, field),
                    ));
                }
                if let Some(previous) = claimed.insert(field, header.to_string()) {
                    mapping.diagnostics.push(mapping_note(
                        kind,
                        field,
                        "collision",
                        format!(
                            "Columns \"{}\" and \"{}\" both map to \"{}\"; using \"{}\"",
                            previous, header, field, header
                        ),
                    ));
                }
                field.to_string()
            }
            None => {
                debug!(%kind, header, "unknown column kept as-is");
                mapping.diagnostics.push(mapping_note(
                    kind,
                    header,
                    "unknown",
                    format!("Unknown column \"{}\" - keeping as-is", header),
                ));
                header.to_string()
            }
        };
        mapping.columns.insert(header.to_string(), resolved);
    }

    mapping
}

fn mapping_note(kind: EntityKind, field: &str, check: &str, message: String) -> Diagnostic {
    Diagnostic::warning(DiagnosticCategory::Mapping, kind, UNKNOWN_ENTITY_ID, field, check, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Client_ID"), "clientid");
        assert_eq!(normalize_header(" Max Load / Phase "), "maxloadphase");
        assert_eq!(normalize_header("Requested-Task IDs"), "requestedtaskids");
    }

    #[test]
    fn test_synonyms_are_per_kind() {
        assert_eq!(canonical_field(EntityKind::Client, "group"), Some("GroupTag"));
        assert_eq!(canonical_field(EntityKind::Worker, "Group"), Some("WorkerGroup"));
        assert_eq!(canonical_field(EntityKind::Task, "skills"), Some("RequiredSkills"));
        assert_eq!(canonical_field(EntityKind::Worker, "skills"), Some("Skills"));
        assert_eq!(canonical_field(EntityKind::Task, "Assigned Worker ID"), Some("AssignedWorkers"));
        assert_eq!(canonical_field(EntityKind::Client, "colour"), None);
    }

    #[test]
    fn test_reconcile_reports_mapped_and_unknown() {
        let mapping = reconcile_headers(EntityKind::Client, ["id", "Name", "ClientName2", "Priority Level"]);
        assert_eq!(mapping.resolve("id"), "ClientID");
        assert_eq!(mapping.resolve("Name"), "ClientName");
        assert_eq!(mapping.resolve("ClientName2"), "ClientName2");
        assert_eq!(mapping.resolve("Priority Level"), "PriorityLevel");

        let messages: Vec<&str> = mapping.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert!(messages.contains(&"Mapped column \"id\" to \"ClientID\""));
        assert!(messages.contains(&"Unknown column \"ClientName2\" - keeping as-is"));
        assert!(mapping.diagnostics.iter().all(|d| !d.is_error()));
    }

    #[test]
    fn test_canonical_headers_produce_no_mapping_notes() {
        let mapping = reconcile_headers(
            EntityKind::Task,
            ["TaskID", "TaskName", "Category", "Duration", "RequiredSkills", "PreferredPhases", "MaxConcurrent"],
        );
        assert!(mapping.diagnostics.is_empty());
    }

    #[test]
    fn test_apply_rewrites_keys() {
        let mapping = reconcile_headers(EntityKind::Worker, ["worker_id", "capacity", "notes"]);
        let mut row = RawRow::new();
        row.insert("worker_id".to_string(), "W1".into());
        row.insert("capacity".to_string(), "3".into());
        row.insert("notes".to_string(), "night shift".into());

        let rewritten = mapping.apply(&row);
        let keys: Vec<&str> = rewritten.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["WorkerID", "MaxLoadPerPhase", "notes"]);
    }

    #[test]
    fn test_collision_is_reported() {
        let mapping = reconcile_headers(EntityKind::Client, ["id", "ClientID"]);
        assert!(mapping.diagnostics.iter().any(|d| d.message.contains("both map to \"ClientID\"")));
    }
}
