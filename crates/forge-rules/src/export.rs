//! Rules configuration document

use crate::error::RuleError;
use crate::rule::{RuleDescriptor, RuleKind};
use crate::rule_set::RuleSet;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const RULES_CONFIG_VERSION: &str = "1.0";
pub const GENERATED_BY: &str = "Resource Forge AI";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesMetadata {
    pub total_rules: usize,
    /// Distinct kinds, first-seen order
    pub rule_types: Vec<RuleKind>,
    pub generated_by: String,
}

/// The exported rules document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    pub version: String,
    /// RFC 3339, millisecond precision
    pub timestamp: String,
    pub rules: Vec<RuleDescriptor>,
    pub metadata: RulesMetadata,
}

impl RulesConfig {
    pub fn new(rules: &RuleSet) -> Self {
        Self::at(rules, Utc::now())
    }

    pub fn at(rules: &RuleSet, now: DateTime<Utc>) -> Self {
        Self {
            version: RULES_CONFIG_VERSION.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            rules: rules.rules().to_vec(),
            metadata: RulesMetadata {
                total_rules: rules.len(),
                rule_types: rules.kinds(),
                generated_by: GENERATED_BY.to_string(),
            },
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, RuleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleDraft;
    use chrono::TimeZone;

    #[test]
    fn test_metadata() {
        let mut set = RuleSet::new();
        let t = |ms| Utc.timestamp_millis_opt(ms).unwrap();
        set.add_at(RuleDraft::new(RuleKind::CoRun, "a"), t(1)).unwrap();
        set.add_at(RuleDraft::new(RuleKind::LoadLimit, "b"), t(2)).unwrap();
        set.add_at(RuleDraft::new(RuleKind::CoRun, "c"), t(3)).unwrap();

        let config = RulesConfig::at(&set, t(1_700_000_000_123));
        assert_eq!(config.timestamp, "2023-11-14T22:13:20.123Z");

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["metadata"]["totalRules"], 3);
        assert_eq!(json["metadata"]["ruleTypes"], serde_json::json!(["coRun", "loadLimit"]));
        assert_eq!(json["metadata"]["generatedBy"], "Resource Forge AI");
        assert_eq!(json["rules"][1]["priority"], 2);
    }

    #[test]
    fn test_empty_set() {
        let config = RulesConfig::new(&RuleSet::new());
        assert_eq!(config.metadata.total_rules, 0);
        assert!(config.metadata.rule_types.is_empty());
        assert!(config.to_json_pretty().unwrap().contains("\"rules\": []"));
    }
}
