//! Forge Quality: validation, cross-references and scoring
//!
//! Runs an ordered battery of passes over normalized client, worker and
//! task collections and reduces the findings to a quality summary.
//!
//! # Example
//!
//! ```
//! use forge_quality::{validate, ValidationProfile};
//! use forge_in::{Client, EntityCollections};
//!
//! let data = EntityCollections {
//!     clients: vec![Client { client_id: "C1".into(), client_name: "Acme".into(), ..Default::default() }],
//!     ..Default::default()
//! };
//!
//! let report = validate(&data, &ValidationProfile::standard());
//! assert_eq!(report.summary.data_quality, "100%");
//! ```

pub mod checks;
pub mod cross_ref;
pub mod engine;
pub mod metrics;
pub mod pipeline;
pub mod profile;

pub use checks::{reference_tokens, standard_passes, ValidationPass};
pub use cross_ref::CrossReferenceChecker;
pub use engine::{ValidationEngine, ValidationReport};
pub use metrics::{quality_score, QualitySummary, SeverityCounts};
pub use pipeline::{run_pipeline, validate_collections, PipelineReport};
pub use profile::{ProfileError, ValidationProfile};

use forge_in::EntityCollections;

/// Engine passes plus cross-references, scored together.
pub fn validate(data: &EntityCollections, profile: &ValidationProfile) -> ValidationReport {
    let (mut diagnostics, cross_reference, summary) = validate_collections(data, profile);
    diagnostics.extend(cross_reference);
    ValidationReport { diagnostics, summary }
}

/// True when a report carries no error-severity findings
pub fn would_export(report: &ValidationReport) -> bool {
    forge_core::count_errors(&report.diagnostics) == 0
}
