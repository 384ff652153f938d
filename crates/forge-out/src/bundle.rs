//! Export gate and export bundles
//!
//! Exports are blocked while error-severity findings remain, unless the
//! caller has switched enforcement off.

use crate::csv_export::entities_to_csv;
use crate::ExportError;
use forge_quality::PipelineReport;
use forge_rules::{RuleSet, RulesConfig};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub struct ExportGate;

impl ExportGate {
    /// `Err(Blocked)` when `enforce` is on and any error remains.
    pub fn check(error_count: usize, enforce: bool) -> Result<(), ExportError> {
        if enforce && error_count > 0 {
            warn!(errors = error_count, "export blocked");
            return Err(ExportError::Blocked(error_count));
        }
        Ok(())
    }
}

/// Which categories to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSelection {
    pub clients: bool,
    pub workers: bool,
    pub tasks: bool,
    pub rules: bool,
}

impl Default for ExportSelection {
    fn default() -> Self {
        Self {
            clients: true,
            workers: true,
            tasks: true,
            rules: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub include: ExportSelection,
    /// Validate-before-export toggle
    pub enforce_gate: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include: ExportSelection::default(),
            enforce_gate: true,
        }
    }
}

/// One downloadable file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub name: String,
    pub mime_type: String,
    pub content: String,
}

impl Artifact {
    fn csv(name: &str, content: String) -> Self {
        Self {
            name: name.to_string(),
            mime_type: "text/csv".to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub artifacts: Vec<Artifact>,
}

impl ExportBundle {
    /// Build the selected artifacts, skipping empty categories.
    pub fn build(report: &PipelineReport, rules: &RuleSet, options: &ExportOptions) -> Result<Self, ExportError> {
        ExportGate::check(report.error_count(), options.enforce_gate)?;

        let data = &report.collections;
        let include = options.include;
        let mut artifacts = Vec::new();

        if include.clients && !data.clients.is_empty() {
            artifacts.push(Artifact::csv("clients.csv", entities_to_csv(&data.clients)?));
        }
        if include.workers && !data.workers.is_empty() {
            artifacts.push(Artifact::csv("workers.csv", entities_to_csv(&data.workers)?));
        }
        if include.tasks && !data.tasks.is_empty() {
            artifacts.push(Artifact::csv("tasks.csv", entities_to_csv(&data.tasks)?));
        }
        if include.rules && !rules.is_empty() {
            artifacts.push(Artifact {
                name: "rules.json".to_string(),
                mime_type: "application/json".to_string(),
                content: RulesConfig::new(rules).to_json_pretty()?,
            });
        }

        info!(artifacts = artifacts.len(), "export bundle built");
        Ok(Self { artifacts })
    }

    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.name.as_str()).collect()
    }
}
