//! Ordered rule collection
//!
//! Held by the caller and passed by value to export; nothing is persisted.

use crate::error::RuleError;
use crate::rule::{RuleDescriptor, RuleDraft, RuleKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<RuleDescriptor>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<RuleDescriptor>) -> Self {
        Self { rules }
    }

    /// Add a draft, stamping it with the current time.
    pub fn add(&mut self, draft: RuleDraft) -> Result<&RuleDescriptor, RuleError> {
        self.add_at(draft, Utc::now())
    }

    /// Add a draft with an explicit creation time. Priority is the count
    /// before insertion plus one.
    pub fn add_at(&mut self, draft: RuleDraft, now: DateTime<Utc>) -> Result<&RuleDescriptor, RuleError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(RuleError::MissingName);
        }

        let rule = RuleDescriptor {
            id: format!("rule-{}", now.timestamp_millis()),
            kind: draft.kind,
            name: name.to_string(),
            description: draft.description,
            parameters: draft.parameters,
            priority: self.rules.len() as u32 + 1,
        };
        debug!(id = %rule.id, kind = %rule.kind, priority = rule.priority, "rule added");

        self.rules.push(rule);
        Ok(&self.rules[self.rules.len() - 1])
    }

    /// Remove the first rule with this id. Remaining priorities are kept.
    pub fn remove(&mut self, id: &str) -> Result<RuleDescriptor, RuleError> {
        let index = self
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RuleError::UnknownRule(id.to_string()))?;
        debug!(id, "rule removed");
        Ok(self.rules.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&RuleDescriptor> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rules(&self) -> &[RuleDescriptor] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<RuleDescriptor> {
        self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct kinds present, first-seen order
    pub fn kinds(&self) -> Vec<RuleKind> {
        let mut kinds = Vec::new();
        for rule in &self.rules {
            if !kinds.contains(&rule.kind) {
                kinds.push(rule.kind);
            }
        }
        kinds
    }
}
