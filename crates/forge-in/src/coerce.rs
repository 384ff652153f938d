//! Field coercers.
//!
//! Pure, total conversions from raw spreadsheet cells into canonical typed
//! fields. Malformed input degrades to an empty or partial result, never to
//! an error.

use forge_core::RawValue;
use serde_json::{json, Map, Value};

/// Widest `a-b` range that is expanded in place. Wider ranges fall through
/// to the JSON / comma-split path.
pub const MAX_RANGE_SPAN: i64 = 10_000;

/// Outcome of coercing a cell to an integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntCoercion {
    Value(i64),
    /// Cell missing or blank
    Absent,
    /// Cell present but not numeric; carries the cell's text form
    Invalid(String),
}

impl IntCoercion {
    /// The parsed value, or `fallback` when absent or invalid.
    pub fn or(&self, fallback: i64) -> i64 {
        match self {
            IntCoercion::Value(v) => *v,
            _ => fallback,
        }
    }
}

/// Render a cell as plain text.
pub fn to_text_field(raw: &RawValue) -> String {
    match raw {
        RawValue::Absent => String::new(),
        RawValue::Text(s) => s.clone(),
        RawValue::Number(n) => format_number(*n),
        RawValue::Bool(b) => b.to_string(),
        RawValue::List(items) => items.iter().map(to_text_field).collect::<Vec<_>>().join(","),
        RawValue::Structured(map) => Value::Object(map.clone()).to_string(),
    }
}

/// Coerce a cell to a list of strings.
pub fn to_array_field(raw: &RawValue) -> Vec<String> {
    match raw {
        RawValue::Absent => Vec::new(),
        RawValue::Text(s) => split_list(s),
        RawValue::List(items) => items.iter().map(to_text_field).collect(),
        other => vec![to_text_field(other)],
    }
}

/// Coerce a cell to a list of integers.
///
/// Accepts inclusive ranges (`"2-4"`), JSON arrays (`"[1, 2]"`) and comma
/// lists (`"5,6,7"`), in that order of preference.
pub fn to_number_array_field(raw: &RawValue) -> Vec<i64> {
    match raw {
        RawValue::Absent => Vec::new(),
        RawValue::Text(s) => {
            if let Some(range) = expand_range(s) {
                return range;
            }
            match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => items.iter().filter_map(json_to_int).collect(),
                _ => s.split(',').filter_map(parse_int_token).collect(),
            }
        }
        RawValue::List(items) => items
            .iter()
            .filter_map(|item| match item {
                RawValue::Number(n) => truncate(*n),
                RawValue::Text(s) => parse_int_token(s),
                _ => None,
            })
            .collect(),
        RawValue::Number(n) => truncate(*n).into_iter().collect(),
        RawValue::Bool(_) | RawValue::Structured(_) => Vec::new(),
    }
}

/// Coerce a cell to a structured JSON value.
pub fn to_structured_field(raw: &RawValue) -> Value {
    match raw {
        RawValue::Absent => Value::Object(Map::new()),
        RawValue::Structured(map) => Value::Object(map.clone()),
        RawValue::List(_) => Value::from(raw.clone()),
        RawValue::Text(s) if s.trim().is_empty() => Value::Object(Map::new()),
        RawValue::Text(s) => serde_json::from_str(s).unwrap_or_else(|_| json!({ "raw": s })),
        RawValue::Number(_) | RawValue::Bool(_) => json!({ "value": Value::from(raw.clone()) }),
    }
}

/// Coerce a cell to a single integer.
///
/// Decimal input truncates toward zero (`"2.7"` is 2).
pub fn to_int_field(raw: &RawValue) -> IntCoercion {
    match raw {
        RawValue::Absent => IntCoercion::Absent,
        RawValue::Text(s) if s.trim().is_empty() => IntCoercion::Absent,
        RawValue::Text(s) => parse_int_token(s)
            .map(IntCoercion::Value)
            .unwrap_or_else(|| IntCoercion::Invalid(s.trim().to_string())),
        RawValue::Number(n) => truncate(*n)
            .map(IntCoercion::Value)
            .unwrap_or_else(|| IntCoercion::Invalid(format_number(*n))),
        other => IntCoercion::Invalid(to_text_field(other)),
    }
}

/// Split on commas, trim, drop empties.
pub fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn expand_range(s: &str) -> Option<Vec<i64>> {
    if s.matches('-').count() != 1 {
        return None;
    }
    let (start, end) = s.split_once('-')?;
    let start: i64 = start.trim().parse().ok()?;
    let end: i64 = end.trim().parse().ok()?;
    if start > end || end - start >= MAX_RANGE_SPAN {
        return None;
    }
    Some((start..=end).collect())
}

fn parse_int_token(token: &str) -> Option<i64> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    token
        .parse::<i64>()
        .ok()
        .or_else(|| token.parse::<f64>().ok().and_then(truncate))
}

fn json_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => parse_int_token(s),
        _ => None,
    }
}

fn truncate(n: f64) -> Option<i64> {
    if n.is_finite() && n.abs() < i64::MAX as f64 {
        Some(n.trunc() as i64)
    } else {
        None
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_array_field() {
        assert_eq!(to_array_field(&text("a, b ,c")), vec!["a", "b", "c"]);
        assert_eq!(to_array_field(&text(" , ,")), Vec::<String>::new());
        assert_eq!(to_array_field(&RawValue::Absent), Vec::<String>::new());
        assert_eq!(
            to_array_field(&RawValue::List(vec![text("x"), RawValue::Number(2.0)])),
            vec!["x", "2"]
        );
        assert_eq!(to_array_field(&RawValue::Number(7.0)), vec!["7"]);
        assert_eq!(to_array_field(&RawValue::Bool(true)), vec!["true"]);
    }

    #[test]
    fn test_number_array_ranges() {
        assert_eq!(to_number_array_field(&text("2-4")), vec![2, 3, 4]);
        assert_eq!(to_number_array_field(&text(" 1 - 3 ")), vec![1, 2, 3]);
        // Reversed range falls through to comma parsing of a single token
        assert_eq!(to_number_array_field(&text("4-2")), Vec::<i64>::new());
        assert_eq!(to_number_array_field(&text("1-100000")), Vec::<i64>::new());
    }

    #[test]
    fn test_number_array_lists() {
        assert_eq!(to_number_array_field(&text("5,6,7")), vec![5, 6, 7]);
        assert_eq!(to_number_array_field(&text("[1, \"2\", \"x\", 3.9]")), vec![1, 2, 3]);
        assert_eq!(to_number_array_field(&text("1, two, 3")), vec![1, 3]);
        assert_eq!(to_number_array_field(&text("5")), vec![5]);
        assert_eq!(
            to_number_array_field(&RawValue::List(vec![RawValue::Number(2.0), text("b"), text("4")])),
            vec![2, 4]
        );
        assert_eq!(to_number_array_field(&RawValue::Number(3.0)), vec![3]);
    }

    #[test]
    fn test_coercers_are_total() {
        let awkward = vec![
            RawValue::Absent,
            RawValue::Bool(false),
            RawValue::Number(f64::NAN),
            RawValue::Structured(serde_json::Map::new()),
            text("[1,"),
            text("{not json"),
            text("---"),
            text("-"),
            RawValue::List(vec![RawValue::Absent, RawValue::List(vec![])]),
        ];
        for raw in &awkward {
            let _ = to_array_field(raw);
            let _ = to_number_array_field(raw);
            let _ = to_structured_field(raw);
            let _ = to_int_field(raw);
        }
        assert!(to_number_array_field(&RawValue::Structured(serde_json::Map::new())).is_empty());
    }

    #[test]
    fn test_structured_field() {
        assert_eq!(to_structured_field(&RawValue::Absent), json!({}));
        assert_eq!(to_structured_field(&text("{\"tier\": 2}")), json!({"tier": 2}));
        assert_eq!(to_structured_field(&text("vip")), json!({"raw": "vip"}));
        assert_eq!(to_structured_field(&RawValue::Number(4.0)), json!({"value": 4}));
    }

    #[test]
    fn test_int_field() {
        assert_eq!(to_int_field(&text("9")), IntCoercion::Value(9));
        assert_eq!(to_int_field(&text("0")), IntCoercion::Value(0));
        assert_eq!(to_int_field(&text("2.7")), IntCoercion::Value(2));
        assert_eq!(to_int_field(&text("  ")), IntCoercion::Absent);
        assert_eq!(to_int_field(&text("high")), IntCoercion::Invalid("high".to_string()));
        assert_eq!(to_int_field(&RawValue::Number(-3.0)), IntCoercion::Value(-3));
        assert_eq!(to_int_field(&text("abc")).or(1), 1);
    }
}
