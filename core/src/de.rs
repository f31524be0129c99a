//! Lenient deserializers for values the engine encodes inconsistently.
//!
//! The `_cat` APIs render every column as a string, and older servers report
//! hit totals as a bare integer instead of an object.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accept a number, a numeric string, or null (as 0).
pub fn int_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(0),
        Value::String(ref s) if s.is_empty() => Ok(0),
        ref v => value_to_i64(v)
            .ok_or_else(|| serde::de::Error::custom(format!("expected integer, got {v}"))),
    }
}

/// Accept a number, a numeric string, or null/empty (as `None`).
pub fn opt_int_from_any<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(ref s)) if s.is_empty() => Ok(None),
        Some(ref v) => value_to_i64(v)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("expected integer, got {v}"))),
    }
}

/// Accept a bool or the strings `"true"`/`"false"`.
pub fn bool_from_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::String(s) => match s.as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("expected boolean, got {other}"))),
        },
        other => Err(serde::de::Error::custom(format!("expected boolean, got {other}"))),
    }
}

/// Total hit count of a search, with its accuracy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotalHits {
    pub value: i64,
    /// `"eq"` when exact, `"gte"` when a lower bound.
    pub relation: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTotalHits {
    Count(i64),
    Object {
        value: i64,
        #[serde(default = "default_relation")]
        relation: String,
    },
}

fn default_relation() -> String {
    "eq".to_string()
}

impl<'de> Deserialize<'de> for TotalHits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawTotalHits::deserialize(deserializer)? {
            RawTotalHits::Count(value) => TotalHits {
                value,
                relation: default_relation(),
            },
            RawTotalHits::Object { value, relation } => TotalHits { value, relation },
        })
    }
}
