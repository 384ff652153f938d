//! Referential integrity across the three collections.

use crate::checks::reference_tokens;
use forge_core::{Diagnostic, DiagnosticCategory, EntityKind};
use forge_in::EntityCollections;
use std::collections::HashSet;
use tracing::debug;

/// Checks that client task requests and task worker assignments resolve.
///
/// Authoritative for the list-valued reference fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossReferenceChecker;

impl CrossReferenceChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, data: &EntityCollections) -> Vec<Diagnostic> {
        let task_ids: HashSet<&str> = data.tasks.iter().map(|t| t.task_id.as_str()).collect();
        let worker_ids: HashSet<&str> = data.workers.iter().map(|w| w.worker_id.as_str()).collect();
        let mut out = Vec::new();

        for client in &data.clients {
            for token in reference_tokens(&client.requested_task_ids) {
                if task_ids.contains(token.as_str()) {
                    continue;
                }
                out.push(
                    Diagnostic::error(
                        DiagnosticCategory::Reference,
                        EntityKind::Client,
                        &client.client_id,
                        "RequestedTaskIDs",
                        &format!("ref-{}", token),
                        format!("Task ID {} not found in uploaded Tasks", token),
                    )
                    .with_suggestion("Reference a valid TaskID"),
                );
            }
        }

        for task in &data.tasks {
            for token in reference_tokens(&task.assigned_workers) {
                if worker_ids.contains(token.as_str()) {
                    continue;
                }
                out.push(
                    Diagnostic::error(
                        DiagnosticCategory::Reference,
                        EntityKind::Task,
                        &task.task_id,
                        "AssignedWorkers",
                        &format!("ref-{}", token),
                        format!("Assigned Worker ID {} not found in uploaded Workers", token),
                    )
                    .with_suggestion("Reference a valid WorkerID"),
                );
            }
        }

        debug!(dangling = out.len(), "cross-reference check complete");
        out
    }
}
