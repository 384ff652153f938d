//! End-to-end run: ingest, validate, cross-check, summarize.

use crate::cross_ref::CrossReferenceChecker;
use crate::engine::ValidationEngine;
use crate::metrics::{QualitySummary, SeverityCounts};
use crate::profile::ValidationProfile;
use forge_core::Diagnostic;
use forge_in::{ingest_dataset, EntityCollections, RawDataset};
use serde::Serialize;

/// Everything one pipeline run produces
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub collections: EntityCollections,
    /// Mapping notes and per-row structural findings from normalization
    pub ingest_diagnostics: Vec<Diagnostic>,
    pub validation_diagnostics: Vec<Diagnostic>,
    pub cross_reference_diagnostics: Vec<Diagnostic>,
    /// Scored over validation and cross-reference findings
    pub summary: QualitySummary,
    pub counts: SeverityCounts,
}

impl PipelineReport {
    /// All findings, ingest first.
    pub fn all_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.ingest_diagnostics
            .iter()
            .chain(&self.validation_diagnostics)
            .chain(&self.cross_reference_diagnostics)
    }

    pub fn error_count(&self) -> usize {
        self.counts.errors
    }
}

/// Validate already-normalized collections. The summary counts engine and
/// cross-reference findings, each once.
pub fn validate_collections(
    collections: &EntityCollections,
    profile: &ValidationProfile,
) -> (Vec<Diagnostic>, Vec<Diagnostic>, QualitySummary) {
    let validation = ValidationEngine::new(profile.clone()).validate(collections).diagnostics;
    let cross_reference = CrossReferenceChecker::new().check(collections);
    let summary = QualitySummary::compute(
        collections.total_records(),
        validation.len() + cross_reference.len(),
    );
    (validation, cross_reference, summary)
}

/// Run the whole pipeline over three raw uploads.
pub fn run_pipeline(dataset: &RawDataset, profile: &ValidationProfile) -> PipelineReport {
    let (collections, ingest_diagnostics) = ingest_dataset(dataset);
    let (validation_diagnostics, cross_reference_diagnostics, summary) =
        validate_collections(&collections, profile);

    let counts = SeverityCounts::tally(
        ingest_diagnostics
            .iter()
            .chain(&validation_diagnostics)
            .chain(&cross_reference_diagnostics),
    );

    PipelineReport {
        collections,
        ingest_diagnostics,
        validation_diagnostics,
        cross_reference_diagnostics,
        summary,
        counts,
    }
}
