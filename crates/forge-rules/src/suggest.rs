//! Keyword rule suggestions
//!
//! Best-effort: maps free text onto one of three rule kinds by keyword and
//! fills in default parameters. The result is a draft, not a validated rule.

use crate::rule::{RuleDraft, RuleKind, RuleParameters};

const CO_RUN_KEYWORDS: &[&str] = &["together", "same time", "co-run"];
const LOAD_LIMIT_KEYWORDS: &[&str] = &["not work more than", "limit", "maximum"];
const PHASE_WINDOW_KEYWORDS: &[&str] = &["only in phase", "restrict to"];

const DEFAULT_MAX_SLOTS_PER_PHASE: i64 = 2;
const DEFAULT_ALLOWED_PHASES: [i64; 3] = [1, 2, 3];

/// Characters of the input echoed into the description
const ECHO_CHARS: usize = 100;

/// Suggest a rule for free text, or `None` when no keyword matches.
/// Buckets are tried in order: co-run, load limit, phase window.
pub fn suggest_rule(text: &str) -> Option<RuleDraft> {
    let lower = text.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
    let echo: String = text.chars().take(ECHO_CHARS).collect();

    let draft = if matches(CO_RUN_KEYWORDS) {
        RuleDraft::new(RuleKind::CoRun, "AI Generated Co-Run Rule")
            .with_description(format!("Tasks should run together based on: {}...", echo))
    } else if matches(LOAD_LIMIT_KEYWORDS) {
        RuleDraft::new(RuleKind::LoadLimit, "AI Generated Load Limit")
            .with_description(format!("Load limit based on: {}...", echo))
            .with_parameters(RuleParameters::load_limit(None, Some(DEFAULT_MAX_SLOTS_PER_PHASE)))
    } else if matches(PHASE_WINDOW_KEYWORDS) {
        RuleDraft::new(RuleKind::PhaseWindow, "AI Generated Phase Window")
            .with_description(format!("Phase restriction based on: {}...", echo))
            .with_parameters(RuleParameters::phase_window(None, DEFAULT_ALLOWED_PHASES.to_vec()))
    } else {
        return None;
    };

    Some(draft)
}
