//! Diagnostics grouped by entity kind for grid display.

use forge_core::{Diagnostic, EntityKind};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiagnosticGroups {
    pub clients: Vec<Diagnostic>,
    pub workers: Vec<Diagnostic>,
    pub tasks: Vec<Diagnostic>,
}

impl DiagnosticGroups {
    /// Group by entity, keeping the first diagnostic for each id.
    pub fn from_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        let mut groups = Self::default();
        let mut seen = HashSet::new();

        for diagnostic in diagnostics {
            if !seen.insert(diagnostic.id.as_str()) {
                continue;
            }
            groups.group_mut(diagnostic.entity).push(diagnostic.clone());
        }
        groups
    }

    pub fn for_kind(&self, kind: EntityKind) -> &[Diagnostic] {
        match kind {
            EntityKind::Client => &self.clients,
            EntityKind::Worker => &self.workers,
            EntityKind::Task => &self.tasks,
        }
    }

    pub fn total(&self) -> usize {
        self.clients.len() + self.workers.len() + self.tasks.len()
    }

    /// Findings attached to one record, for highlighting a grid row
    pub fn for_record<'a>(&'a self, kind: EntityKind, entity_id: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.for_kind(kind).iter().filter(move |d| d.entity_id == entity_id)
    }

    fn group_mut(&mut self, kind: EntityKind) -> &mut Vec<Diagnostic> {
        match kind {
            EntityKind::Client => &mut self.clients,
            EntityKind::Worker => &mut self.workers,
            EntityKind::Task => &mut self.tasks,
        }
    }
}
