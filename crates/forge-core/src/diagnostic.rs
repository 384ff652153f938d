//! Diagnostics: the single finding type shared by ingestion and validation.

use crate::data_model::EntityKind;
use serde::{Deserialize, Serialize};

/// Placeholder entity id when the record has no identifier.
pub const UNKNOWN_ENTITY_ID: &str = "unknown";

/// Errors block export, warnings never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Where a finding comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    /// Missing or invalid required field, duplicate identifier
    Structural,
    /// Dangling reference between collections
    Reference,
    /// Range, coverage and capacity concerns
    Advisory,
    /// Header reconciliation notes
    Mapping,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Deterministic id: `{entity}-{entityId}-{field}-{check}`, lower-cased
    pub id: String,
    pub severity: Severity,
    pub category: DiagnosticCategory,
    pub entity: EntityKind,
    pub entity_id: String,
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic. `check` names the rule that produced it and only
    /// feeds the id.
    pub fn new(
        severity: Severity,
        category: DiagnosticCategory,
        entity: EntityKind,
        entity_id: &str,
        field: impl Into<String>,
        check: &str,
        message: impl Into<String>,
    ) -> Self {
        let entity_id = if entity_id.trim().is_empty() {
            UNKNOWN_ENTITY_ID.to_string()
        } else {
            entity_id.to_string()
        };
        let field = field.into();
        let id = format!("{}-{}-{}-{}", entity, entity_id, field, check).to_lowercase();

        Self {
            id,
            severity,
            category,
            entity,
            entity_id,
            field,
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(
        category: DiagnosticCategory,
        entity: EntityKind,
        entity_id: &str,
        field: impl Into<String>,
        check: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, category, entity, entity_id, field, check, message)
    }

    pub fn warning(
        category: DiagnosticCategory,
        entity: EntityKind,
        entity_id: &str,
        field: impl Into<String>,
        check: &str,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, category, entity, entity_id, field, check, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Count the error-severity diagnostics in a list.
pub fn count_errors<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> usize {
    diagnostics.into_iter().filter(|d| d.is_error()).count()
}
