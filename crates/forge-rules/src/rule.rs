//! Rule descriptors
//!
//! A rule is configuration, never executed here. The kind is a closed set;
//! parameters are read leniently and never rejected.

use crate::error::RuleError;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The six recognized rule kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    CoRun,
    SlotRestriction,
    LoadLimit,
    PhaseWindow,
    PatternMatch,
    PrecedenceOverride,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::CoRun,
        RuleKind::SlotRestriction,
        RuleKind::LoadLimit,
        RuleKind::PhaseWindow,
        RuleKind::PatternMatch,
        RuleKind::PrecedenceOverride,
    ];

    /// Wire name, as used in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoRun => "coRun",
            Self::SlotRestriction => "slotRestriction",
            Self::LoadLimit => "loadLimit",
            Self::PhaseWindow => "phaseWindow",
            Self::PatternMatch => "patternMatch",
            Self::PrecedenceOverride => "precedenceOverride",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CoRun => "Co-Run Tasks",
            Self::SlotRestriction => "Slot Restriction",
            Self::LoadLimit => "Load Limit",
            Self::PhaseWindow => "Phase Window",
            Self::PatternMatch => "Pattern Match",
            Self::PrecedenceOverride => "Precedence Override",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CoRun => "Tasks that must run together",
            Self::SlotRestriction => "Limit common time slots",
            Self::LoadLimit => "Maximum workload per phase",
            Self::PhaseWindow => "Restrict tasks to specific phases",
            Self::PatternMatch => "Rule based on patterns",
            Self::PrecedenceOverride => "Override rule priorities",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RuleError::UnknownKind(s.to_string()))
    }
}

/// Catalog entry for a rule kind
#[derive(Debug, Clone, Serialize)]
pub struct RuleKindInfo {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub label: &'static str,
    pub description: &'static str,
}

/// All rule kinds with their labels, in catalog order
pub fn catalog() -> Vec<RuleKindInfo> {
    RuleKind::ALL
        .into_iter()
        .map(|kind| RuleKindInfo {
            kind,
            label: kind.label(),
            description: kind.description(),
        })
        .collect()
}

/// Kind-specific parameters.
///
/// The typed kinds keep keys they do not recognize, and values of the wrong
/// type, in `extra`, so a form's parameters survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleParameters {
    CoRun {
        tasks: Vec<String>,
        extra: Map<String, Value>,
    },
    LoadLimit {
        worker_group: Option<String>,
        max_slots_per_phase: Option<i64>,
        extra: Map<String, Value>,
    },
    PhaseWindow {
        task_id: Option<String>,
        allowed_phases: Vec<i64>,
        extra: Map<String, Value>,
    },
    /// slotRestriction, patternMatch and precedenceOverride
    Open(Map<String, Value>),
}

impl RuleParameters {
    pub fn co_run(tasks: Vec<String>) -> Self {
        Self::CoRun { tasks, extra: Map::new() }
    }

    pub fn load_limit(worker_group: Option<String>, max_slots_per_phase: Option<i64>) -> Self {
        Self::LoadLimit {
            worker_group,
            max_slots_per_phase,
            extra: Map::new(),
        }
    }

    pub fn phase_window(task_id: Option<String>, allowed_phases: Vec<i64>) -> Self {
        Self::PhaseWindow {
            task_id,
            allowed_phases,
            extra: Map::new(),
        }
    }

    /// Empty parameters of the right shape for `kind`
    pub fn empty(kind: RuleKind) -> Self {
        Self::from_value(kind, Value::Null)
    }

    /// Read parameters for `kind` from loose JSON. Anything that is not an
    /// object reads as empty.
    pub fn from_value(kind: RuleKind, value: Value) -> Self {
        let mut map = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        match kind {
            RuleKind::CoRun => Self::CoRun {
                tasks: take(&mut map, "tasks", text_list).unwrap_or_default(),
                extra: map,
            },
            RuleKind::LoadLimit => Self::LoadLimit {
                worker_group: take(&mut map, "workerGroup", text),
                max_slots_per_phase: take(&mut map, "maxSlotsPerPhase", int),
                extra: map,
            },
            RuleKind::PhaseWindow => Self::PhaseWindow {
                task_id: take(&mut map, "taskId", text),
                allowed_phases: take(&mut map, "allowedPhases", int_list).unwrap_or_default(),
                extra: map,
            },
            RuleKind::SlotRestriction | RuleKind::PatternMatch | RuleKind::PrecedenceOverride => {
                Self::Open(map)
            }
        }
    }

    /// JSON object form. Keys in `extra` override the typed fields.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        let extra = match self {
            Self::CoRun { tasks, extra } => {
                map.insert("tasks".to_string(), Value::from(tasks.clone()));
                extra
            }
            Self::LoadLimit {
                worker_group,
                max_slots_per_phase,
                extra,
            } => {
                if let Some(group) = worker_group {
                    map.insert("workerGroup".to_string(), Value::from(group.clone()));
                }
                if let Some(max) = max_slots_per_phase {
                    map.insert("maxSlotsPerPhase".to_string(), Value::from(*max));
                }
                extra
            }
            Self::PhaseWindow {
                task_id,
                allowed_phases,
                extra,
            } => {
                if let Some(task) = task_id {
                    map.insert("taskId".to_string(), Value::from(task.clone()));
                }
                map.insert("allowedPhases".to_string(), Value::from(allowed_phases.clone()));
                extra
            }
            Self::Open(open) => return Value::Object(open.clone()),
        };

        for (key, value) in extra {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }
}

impl Serialize for RuleParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Remove and read `key`. A value that does not read stays in `map`.
fn take<T>(map: &mut Map<String, Value>, key: &str, read: fn(&Value) -> Option<T>) -> Option<T> {
    let value = map.remove(key)?;
    let parsed = read(&value);
    if parsed.is_none() {
        map.insert(key.to_string(), value);
    }
    parsed
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Every item must read, or the whole list is left as-is.
fn text_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => items.iter().map(text).collect(),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn int_list(value: &Value) -> Option<Vec<i64>> {
    match value {
        Value::Array(items) => items.iter().map(int).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse().ok())
            .collect(),
        _ => None,
    }
}

/// A rule before it joins a rule set: no id, no priority yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DraftWire", into = "DraftWire")]
pub struct RuleDraft {
    pub kind: RuleKind,
    pub name: String,
    pub description: String,
    pub parameters: RuleParameters,
}

impl RuleDraft {
    pub fn new(kind: RuleKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            description: String::new(),
            parameters: RuleParameters::empty(kind),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_parameters(mut self, parameters: RuleParameters) -> Self {
        self.parameters = parameters;
        self
    }

    /// Read a draft from form JSON. Kind and name are required.
    pub fn from_value(value: Value) -> Result<Self, RuleError> {
        let wire: DraftWire = serde_json::from_value(value)?;
        Self::try_from(wire)
    }
}

/// A rule as held in a rule set and exported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorWire", into = "DescriptorWire")]
pub struct RuleDescriptor {
    /// Time-derived, not guaranteed unique
    pub id: String,
    pub kind: RuleKind,
    pub name: String,
    pub description: String,
    pub parameters: RuleParameters,
    /// 1-based insertion rank; gaps are allowed
    pub priority: u32,
}

// === Wire shapes ===

#[derive(Serialize, Deserialize)]
struct DraftWire {
    #[serde(rename = "type")]
    kind: Option<RuleKind>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: Value,
}

impl TryFrom<DraftWire> for RuleDraft {
    type Error = RuleError;

    fn try_from(wire: DraftWire) -> Result<Self, Self::Error> {
        let kind = wire.kind.ok_or(RuleError::MissingKind)?;
        let name = wire
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(RuleError::MissingName)?;
        Ok(Self {
            kind,
            name,
            description: wire.description,
            parameters: RuleParameters::from_value(kind, wire.parameters),
        })
    }
}

impl From<RuleDraft> for DraftWire {
    fn from(draft: RuleDraft) -> Self {
        Self {
            kind: Some(draft.kind),
            name: Some(draft.name),
            description: draft.description,
            parameters: draft.parameters.to_value(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DescriptorWire {
    id: String,
    #[serde(rename = "type")]
    kind: RuleKind,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    parameters: Value,
    priority: u32,
}

impl TryFrom<DescriptorWire> for RuleDescriptor {
    type Error = RuleError;

    fn try_from(wire: DescriptorWire) -> Result<Self, Self::Error> {
        if wire.name.trim().is_empty() {
            return Err(RuleError::MissingName);
        }
        Ok(Self {
            parameters: RuleParameters::from_value(wire.kind, wire.parameters),
            id: wire.id,
            kind: wire.kind,
            name: wire.name,
            description: wire.description,
            priority: wire.priority,
        })
    }
}

impl From<RuleDescriptor> for DescriptorWire {
    fn from(rule: RuleDescriptor) -> Self {
        Self {
            parameters: rule.parameters.to_value(),
            id: rule.id,
            kind: rule.kind,
            name: rule.name,
            description: rule.description,
            priority: rule.priority,
        }
    }
}
