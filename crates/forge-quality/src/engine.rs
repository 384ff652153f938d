//! Validation engine
//!
//! Runs the ordered passes and folds their findings into one report.

use crate::checks::{standard_passes, ValidationPass};
use crate::metrics::QualitySummary;
use crate::profile::ValidationProfile;
use forge_core::Diagnostic;
use forge_in::EntityCollections;
use serde::Serialize;
use tracing::{debug, info};

/// Findings from one validation run
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: QualitySummary,
}

/// Ordered set of validation passes
pub struct ValidationEngine {
    profile: ValidationProfile,
    passes: Vec<Box<dyn ValidationPass>>,
}

impl ValidationEngine {
    /// Engine with the built-in passes
    pub fn new(profile: ValidationProfile) -> Self {
        Self {
            profile,
            passes: standard_passes(),
        }
    }

    /// Append a custom pass; it runs after the built-in ones.
    pub fn with_pass(mut self, pass: Box<dyn ValidationPass>) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn profile(&self) -> &ValidationProfile {
        &self.profile
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass, in order, over the collections.
    pub fn validate(&self, data: &EntityCollections) -> ValidationReport {
        let mut diagnostics = Vec::new();

        for pass in &self.passes {
            let found = pass.run(data, &self.profile);
            debug!(pass = pass.name(), found = found.len(), "validation pass complete");
            diagnostics.extend(found);
        }

        let summary = QualitySummary::compute(data.total_records(), diagnostics.len());
        info!(
            profile = %self.profile.name,
            records = summary.total_records,
            issues = summary.issues,
            quality = %summary.data_quality,
            "validation complete"
        );

        ValidationReport { diagnostics, summary }
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(ValidationProfile::standard())
    }
}
