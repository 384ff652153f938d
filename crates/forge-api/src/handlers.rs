//! API Handlers
//!
//! Every handler is stateless apart from metric counters: the request
//! carries the full dataset and rule list, the response carries the result.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use forge_core::{EntityKind, RawRow, FORGE_VERSION};
use forge_in::{decode_by_extension, ingest, CanonicalRecord, Client, RawDataset, Task, Worker};
use forge_out::{DiagnosticGroups, ExportBundle, ExportError, ExportOptions};
use forge_quality::{run_pipeline, PipelineReport};
use forge_rules::{catalog, suggest_rule, RuleDescriptor, RuleDraft, RuleKindInfo, RuleSet, RulesConfig};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": FORGE_VERSION }))
}

// === Ingestion ===

/// Either decoded rows, or a file name plus its text content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[serde(default)]
    pub rows: Option<Vec<RawRow>>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl IngestRequest {
    fn into_rows(self) -> ApiResult<Vec<RawRow>> {
        match (self.rows, self.file_name, self.content) {
            (Some(rows), _, _) => Ok(rows),
            (None, Some(file_name), Some(content)) => Ok(decode_by_extension(&file_name, &content)?),
            _ => Err(ApiError::BadRequest(
                "Provide either rows or fileName and content".to_string(),
            )),
        }
    }
}

pub async fn ingest_kind(
    Path(kind): Path<String>,
    Json(request): Json<IngestRequest>,
) -> ApiResult<Json<Value>> {
    let kind: EntityKind = kind.parse()?;
    let rows = request.into_rows()?;

    let body = match kind {
        EntityKind::Client => ingest_as::<Client>(&rows)?,
        EntityKind::Worker => ingest_as::<Worker>(&rows)?,
        EntityKind::Task => ingest_as::<Task>(&rows)?,
    };
    Ok(Json(body))
}

fn ingest_as<T: CanonicalRecord>(rows: &[RawRow]) -> ApiResult<Value> {
    Ok(serde_json::to_value(ingest::<T>(rows))?)
}

// === Validation ===

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    #[serde(flatten)]
    pub report: PipelineReport,
    /// All findings by entity kind, for grid display
    pub grouped: DiagnosticGroups,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(dataset): Json<RawDataset>,
) -> Json<ValidateResponse> {
    let report = run_pipeline(&dataset, &state.profile);
    state.metrics.record_report(&report);

    let grouped = DiagnosticGroups::from_diagnostics(report.all_diagnostics());
    Json(ValidateResponse { report, grouped })
}

// === Rules ===

pub async fn rules_catalog() -> Json<Vec<RuleKindInfo>> {
    Json(catalog())
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestion: Option<RuleDraft>,
}

pub async fn rules_suggest(Json(request): Json<SuggestRequest>) -> Json<SuggestResponse> {
    Json(SuggestResponse {
        suggestion: suggest_rule(&request.text),
    })
}

#[derive(Debug, Deserialize)]
pub struct AddRuleRequest {
    #[serde(default)]
    pub rules: Vec<RuleDescriptor>,
    /// Form JSON; checked by `RuleDraft::from_value`
    #[serde(default)]
    pub rule: Value,
}

/// Append a draft to the caller's rule list and hand the list back.
pub async fn rules_add(Json(request): Json<AddRuleRequest>) -> ApiResult<(StatusCode, Json<Value>)> {
    let draft = RuleDraft::from_value(request.rule)?;
    let mut rules = RuleSet::from_rules(request.rules);
    rules.add(draft)?;
    Ok((StatusCode::CREATED, Json(json!({ "rules": rules }))))
}

#[derive(Debug, Deserialize)]
pub struct RemoveRuleRequest {
    #[serde(default)]
    pub rules: Vec<RuleDescriptor>,
    pub id: String,
}

/// Drop a rule by id; the others keep their priorities.
pub async fn rules_remove(Json(request): Json<RemoveRuleRequest>) -> ApiResult<Json<Value>> {
    let mut rules = RuleSet::from_rules(request.rules);
    rules.remove(&request.id)?;
    Ok(Json(json!({ "rules": rules })))
}

#[derive(Debug, Deserialize)]
pub struct RulesExportRequest {
    #[serde(default)]
    pub rules: Vec<RuleDescriptor>,
}

pub async fn rules_export(Json(request): Json<RulesExportRequest>) -> Json<RulesConfig> {
    Json(RulesConfig::new(&RuleSet::from_rules(request.rules)))
}

// === Export ===

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    #[serde(flatten)]
    pub dataset: RawDataset,
    #[serde(default)]
    pub rules: Vec<RuleDescriptor>,
    #[serde(flatten)]
    pub options: ExportOptions,
}

pub async fn export(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> ApiResult<Json<ExportBundle>> {
    let report = run_pipeline(&request.dataset, &state.profile);
    state.metrics.record_report(&report);

    let rules = RuleSet::from_rules(request.rules);
    match ExportBundle::build(&report, &rules, &request.options) {
        Ok(bundle) => Ok(Json(bundle)),
        Err(err) => {
            if matches!(err, ExportError::Blocked(_)) {
                state.metrics.exports_blocked.inc();
            }
            Err(err.into())
        }
    }
}

// === Metrics ===

pub async fn metrics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let body = state
        .metrics
        .encode()
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
