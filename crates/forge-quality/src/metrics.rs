//! Quality summary for dashboard display
//!
//! Recomputed from scratch on every run, never updated incrementally.

use forge_core::{Diagnostic, Severity};
use serde::{Deserialize, Serialize};

/// Aggregate quality figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySummary {
    pub total_records: usize,
    pub issues: usize,
    /// Integer percentage with a trailing `%`, e.g. "80%"
    pub data_quality: String,
}

impl QualitySummary {
    /// Summarize `issues` diagnostics over `total_records` records.
    pub fn compute(total_records: usize, issues: usize) -> Self {
        Self {
            total_records,
            issues,
            data_quality: format!("{}%", quality_score(total_records, issues)),
        }
    }

    /// Numeric score, 0-100
    pub fn score(&self) -> u32 {
        quality_score(self.total_records, self.issues)
    }
}

/// `round(max(0, 100 - issues / records * 100))`, or 100 with no records.
pub fn quality_score(total_records: usize, issues: usize) -> u32 {
    if total_records == 0 {
        return 100;
    }
    let ratio = issues as f64 / total_records as f64;
    (100.0 - ratio * 100.0).max(0.0).round() as u32
}

/// Error and warning tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
}

impl SeverityCounts {
    pub fn tally<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        diagnostics
            .into_iter()
            .fold(Self::default(), |mut counts, d| {
                match d.severity {
                    Severity::Error => counts.errors += 1,
                    Severity::Warning => counts.warnings += 1,
                }
                counts
            })
    }
}
