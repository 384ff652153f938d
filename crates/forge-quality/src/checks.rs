//! Validation passes
//!
//! Each pass reads the normalized collections and returns its own findings.
//! Passes never see or modify each other's output.

use crate::profile::ValidationProfile;
use forge_core::{Diagnostic, DiagnosticCategory, EntityKind};
use forge_in::{EntityCollections, ParseStatus};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// A single validation pass over the normalized collections
pub trait ValidationPass: Send + Sync {
    /// Stable pass name (e.g. "duplicate_identifiers")
    fn name(&self) -> &'static str;

    /// Run the pass
    fn run(&self, data: &EntityCollections, profile: &ValidationProfile) -> Vec<Diagnostic>;
}

/// Split reference lists on comma or semicolon, trimmed, empties dropped.
pub fn reference_tokens(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split([',', ';']))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// (1) Every record carries its identifier.
pub struct RequiredIdentifiers;

impl ValidationPass for RequiredIdentifiers {
    fn name(&self) -> &'static str {
        "required_identifiers"
    }

    fn run(&self, data: &EntityCollections, _profile: &ValidationProfile) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        missing_ids(&mut out, EntityKind::Client, data.clients.iter().map(|c| c.client_id.as_str()));
        missing_ids(&mut out, EntityKind::Worker, data.workers.iter().map(|w| w.worker_id.as_str()));
        missing_ids(&mut out, EntityKind::Task, data.tasks.iter().map(|t| t.task_id.as_str()));
        out
    }
}

fn missing_ids<'a>(out: &mut Vec<Diagnostic>, kind: EntityKind, ids: impl Iterator<Item = &'a str>) {
    for (index, id) in ids.enumerate() {
        if id.is_empty() {
            let field = kind.id_field();
            out.push(Diagnostic::error(
                DiagnosticCategory::Structural,
                kind,
                id,
                field,
                &format!("required-{}", index + 1),
                format!("Missing {}", field),
            ));
        }
    }
}

/// (2) Declared-type checks. Task Duration must be present and numeric.
pub struct DeclaredTypes;

impl ValidationPass for DeclaredTypes {
    fn name(&self) -> &'static str {
        "declared_types"
    }

    fn run(&self, data: &EntityCollections, _profile: &ValidationProfile) -> Vec<Diagnostic> {
        data.tasks
            .iter()
            .filter_map(|task| {
                let message = match &task.duration_status {
                    ParseStatus::Parsed => return None,
                    ParseStatus::Absent => "Duration is required and must be a number".to_string(),
                    ParseStatus::Invalid(raw) => format!("Duration must be a number (got \"{}\")", raw),
                };
                Some(Diagnostic::error(
                    DiagnosticCategory::Structural,
                    EntityKind::Task,
                    &task.task_id,
                    "Duration",
                    "type",
                    message,
                ))
            })
            .collect()
    }
}

/// (3) Identifiers are unique within their collection. One finding per
/// duplicated id, however many rows share it.
pub struct DuplicateIdentifiers;

impl ValidationPass for DuplicateIdentifiers {
    fn name(&self) -> &'static str {
        "duplicate_identifiers"
    }

    fn run(&self, data: &EntityCollections, _profile: &ValidationProfile) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        duplicates(&mut out, EntityKind::Client, data.clients.iter().map(|c| c.client_id.as_str()));
        duplicates(&mut out, EntityKind::Worker, data.workers.iter().map(|w| w.worker_id.as_str()));
        duplicates(&mut out, EntityKind::Task, data.tasks.iter().map(|t| t.task_id.as_str()));
        out
    }
}

fn duplicates<'a>(out: &mut Vec<Diagnostic>, kind: EntityKind, ids: impl Iterator<Item = &'a str>) {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for id in ids.filter(|id| !id.is_empty()) {
        *counts.entry(id).or_insert(0) += 1;
    }

    let field = kind.id_field();
    for (id, count) in counts {
        if count > 1 {
            out.push(
                Diagnostic::error(
                    DiagnosticCategory::Structural,
                    kind,
                    id,
                    field,
                    "dup",
                    format!("Duplicate {}: {}", field, id),
                )
                .with_suggestion("Each ID must be unique"),
            );
        }
    }
}

/// Legacy singular reference column some exports still carry
pub const LEGACY_TASK_REFERENCE: &str = "RequestedTaskID";

/// (4) A client's singular `RequestedTaskID` column, when an export still
/// carries one, must name a known task. The list-valued field is covered by
/// the cross-reference checker.
pub struct LegacyTaskReference;

impl ValidationPass for LegacyTaskReference {
    fn name(&self) -> &'static str {
        "legacy_task_reference"
    }

    fn run(&self, data: &EntityCollections, _profile: &ValidationProfile) -> Vec<Diagnostic> {
        let task_ids: HashSet<&str> = data.tasks.iter().map(|t| t.task_id.as_str()).collect();

        data.clients
            .iter()
            .filter_map(|client| {
                let raw = client.extra.get(LEGACY_TASK_REFERENCE)?;
                let task_id = forge_in::coerce::to_text_field(raw);
                let task_id = task_id.trim();
                if task_id.is_empty() || task_ids.contains(task_id) {
                    return None;
                }
                Some(
                    Diagnostic::error(
                        DiagnosticCategory::Reference,
                        EntityKind::Client,
                        &client.client_id,
                        LEGACY_TASK_REFERENCE,
                        "ref",
                        format!("Invalid Task reference: {}", task_id),
                    )
                    .with_suggestion("Reference a valid TaskID"),
                )
            })
            .collect()
    }
}

/// (5) Task Duration within the profile's expected window.
pub struct ValueRanges;

impl ValidationPass for ValueRanges {
    fn name(&self) -> &'static str {
        "value_ranges"
    }

    fn run(&self, data: &EntityCollections, profile: &ValidationProfile) -> Vec<Diagnostic> {
        let window = profile.min_duration..=profile.max_duration;
        data.tasks
            .iter()
            .filter(|task| !window.contains(&task.duration))
            .map(|task| {
                Diagnostic::warning(
                    DiagnosticCategory::Advisory,
                    EntityKind::Task,
                    &task.task_id,
                    "Duration",
                    "range",
                    format!(
                        "Duration out of expected range ({}-{})",
                        profile.min_duration, profile.max_duration
                    ),
                )
                .with_suggestion("Adjust duration to a valid range")
            })
            .collect()
    }
}

/// (6) Every required skill is held by at least one worker.
pub struct SkillCoverage;

impl ValidationPass for SkillCoverage {
    fn name(&self) -> &'static str {
        "skill_coverage"
    }

    fn run(&self, data: &EntityCollections, profile: &ValidationProfile) -> Vec<Diagnostic> {
        if !profile.check_skill_coverage {
            return Vec::new();
        }

        let available: HashSet<&str> = data
            .workers
            .iter()
            .flat_map(|w| w.skills.iter())
            .map(|s| s.trim())
            .collect();

        data.tasks
            .iter()
            .filter_map(|task| {
                let mut seen = HashSet::new();
                let missing: Vec<&str> = task
                    .required_skills
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty() && !available.contains(s) && seen.insert(*s))
                    .collect();
                if missing.is_empty() {
                    return None;
                }
                Some(
                    Diagnostic::warning(
                        DiagnosticCategory::Advisory,
                        EntityKind::Task,
                        &task.task_id,
                        "RequiredSkills",
                        "skills",
                        format!("Missing skill coverage: {}", missing.join(", ")),
                    )
                    .with_suggestion("Ensure workers have all required skills"),
                )
            })
            .collect()
    }
}

/// (7) Assigned work per worker stays within MaxLoadPerPhase.
pub struct WorkerCapacity;

impl ValidationPass for WorkerCapacity {
    fn name(&self) -> &'static str {
        "worker_capacity"
    }

    fn run(&self, data: &EntityCollections, profile: &ValidationProfile) -> Vec<Diagnostic> {
        if !profile.check_worker_capacity {
            return Vec::new();
        }

        let mut load: HashMap<String, i64> = HashMap::new();
        for task in &data.tasks {
            let assigned: HashSet<String> = reference_tokens(&task.assigned_workers).into_iter().collect();
            for worker_id in assigned {
                let total = load.entry(worker_id).or_insert(0);
                *total = total.saturating_add(task.duration);
            }
        }

        data.workers
            .iter()
            .filter_map(|worker| {
                let assigned = load.get(&worker.worker_id).copied().unwrap_or(0);
                if assigned <= worker.max_load_per_phase {
                    return None;
                }
                Some(
                    Diagnostic::warning(
                        DiagnosticCategory::Advisory,
                        EntityKind::Worker,
                        &worker.worker_id,
                        "MaxLoadPerPhase",
                        "load",
                        format!(
                            "Overload: assigned {} vs. max {} per phase",
                            assigned, worker.max_load_per_phase
                        ),
                    )
                    .with_suggestion("Reassign tasks or increase MaxLoadPerPhase"),
                )
            })
            .collect()
    }
}

/// (8) Slot for heuristic passes. Finds nothing yet.
pub struct Heuristics;

impl ValidationPass for Heuristics {
    fn name(&self) -> &'static str {
        "heuristics"
    }

    fn run(&self, _data: &EntityCollections, _profile: &ValidationProfile) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// The built-in passes in their fixed order
pub fn standard_passes() -> Vec<Box<dyn ValidationPass>> {
    vec![
        Box::new(RequiredIdentifiers),
        Box::new(DeclaredTypes),
        Box::new(DuplicateIdentifiers),
        Box::new(LegacyTaskReference),
        Box::new(ValueRanges),
        Box::new(SkillCoverage),
        Box::new(WorkerCapacity),
        Box::new(Heuristics),
    ]
}
