//! Forge Rules: declarative scheduling constraints
//!
//! Rules are captured and exported as configuration. Nothing here solves or
//! executes them.
//!
//! # Example
//!
//! ```
//! use forge_rules::{suggest_rule, RuleSet, RulesConfig, RuleKind};
//!
//! let mut rules = RuleSet::new();
//! let draft = suggest_rule("T1 and T2 must run together").unwrap();
//! assert_eq!(draft.kind, RuleKind::CoRun);
//!
//! rules.add(draft).unwrap();
//! let config = RulesConfig::new(&rules);
//! assert_eq!(config.metadata.total_rules, 1);
//! ```

pub mod error;
pub mod export;
pub mod rule;
pub mod rule_set;
pub mod suggest;

pub use error::RuleError;
pub use export::{RulesConfig, RulesMetadata};
pub use rule::{catalog, RuleDescriptor, RuleDraft, RuleKind, RuleKindInfo, RuleParameters};
pub use rule_set::RuleSet;
pub use suggest::suggest_rule;
