//! Forge-OUT: display and export surfaces
//!
//! Groups diagnostics for grid display and turns a validated dataset and its
//! rules into downloadable files.
//!
//! ```text
//! PipelineReport ─┬─ DiagnosticGroups          (grid)
//!                 └─ ExportGate → ExportBundle (clients.csv, workers.csv, tasks.csv, rules.json)
//! ```

pub mod bundle;
pub mod csv_export;
pub mod grouping;

pub use bundle::{Artifact, ExportBundle, ExportGate, ExportOptions, ExportSelection};
pub use csv_export::entities_to_csv;
pub use grouping::DiagnosticGroups;

use forge_core::ForgeError;
use forge_rules::RuleError;
use thiserror::Error;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Carries the number of blocking errors
    #[error("Cannot export while validation errors exist. Please fix them first.")]
    Blocked(usize),
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Encoding failed: {0}")]
    Encoding(String),
    #[error(transparent)]
    Rules(#[from] RuleError),
}

impl From<ExportError> for ForgeError {
    fn from(err: ExportError) -> Self {
        ForgeError::ExportError(err.to_string())
    }
}
