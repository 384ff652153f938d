//! Data Model: RawValue, RawRow, EntityKind
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::str::FromStr;

/// A single spreadsheet cell as handed over by the decoder.
///
/// Closed over the shapes a decoder can produce so every coercer has to
/// match exhaustively instead of relying on implicit conversion.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RawValue {
    #[default]
    Absent,
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<RawValue>),
    Structured(Map<String, Value>),
}

impl RawValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }

    /// Absent, or text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Absent => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawValue::Absent,
            Value::Bool(b) => RawValue::Bool(b),
            Value::Number(n) => n.as_f64().map(RawValue::Number).unwrap_or(RawValue::Absent),
            Value::String(s) => RawValue::Text(s),
            Value::Array(items) => RawValue::List(items.into_iter().map(RawValue::from).collect()),
            Value::Object(map) => RawValue::Structured(map),
        }
    }
}

impl From<RawValue> for Value {
    fn from(value: RawValue) -> Self {
        match value {
            RawValue::Absent => Value::Null,
            RawValue::Bool(b) => Value::Bool(b),
            RawValue::Number(n) => number_to_value(n),
            RawValue::Text(s) => Value::String(s),
            RawValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            RawValue::Structured(map) => Value::Object(map),
        }
    }
}

fn number_to_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

/// One decoded spreadsheet row. Keeps column order so the first row
/// defines the header order seen in advisories and exports.
pub type RawRow = IndexMap<String, RawValue>;

/// The three record kinds the forge ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Client,
    Worker,
    Task,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Client, EntityKind::Worker, EntityKind::Task];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Client => "client",
            EntityKind::Worker => "worker",
            EntityKind::Task => "task",
        }
    }

    /// Collection name used for uploads and export files.
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Client => "clients",
            EntityKind::Worker => "workers",
            EntityKind::Task => "tasks",
        }
    }

    pub fn id_field(&self) -> &'static str {
        match self {
            EntityKind::Client => "ClientID",
            EntityKind::Worker => "WorkerID",
            EntityKind::Task => "TaskID",
        }
    }

    pub fn name_field(&self) -> &'static str {
        match self {
            EntityKind::Client => "ClientName",
            EntityKind::Worker => "WorkerName",
            EntityKind::Task => "TaskName",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = crate::error::ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" | "clients" => Ok(EntityKind::Client),
            "worker" | "workers" => Ok(EntityKind::Worker),
            "task" | "tasks" => Ok(EntityKind::Task),
            other => Err(crate::error::ForgeError::SchemaError(format!(
                "unknown entity kind '{}'",
                other
            ))),
        }
    }
}
