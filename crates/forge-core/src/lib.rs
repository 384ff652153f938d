//! Forge Core: shared value types
//!
//! Raw spreadsheet values, entity kinds and the diagnostic record that every
//! ingestion and validation stage appends to.

pub mod data_model;
pub mod diagnostic;
pub mod error;

pub use data_model::{EntityKind, RawRow, RawValue};
pub use diagnostic::{count_errors, Diagnostic, DiagnosticCategory, Severity, UNKNOWN_ENTITY_ID};
pub use error::ForgeError;

/// Engine version reported by exports and the API
pub const FORGE_VERSION: &str = "1.0.0";
