//! Tolerant decoding for fields written by older clients
//!
//! Owner documents in the realtime store were written by several generations
//! of the dashboard. Numbers sometimes arrive as strings, mappings as null.
//! Anything that cannot be read as the expected shape decodes as absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Coerce a JSON value to a finite number
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Coerce a JSON value to text (numbers are rendered, other shapes dropped)
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_text))
}

pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

/// Keyed mapping where `null` means empty
///
/// Entries are decoded one at a time; an entry that does not fit `T` is
/// skipped with a warning instead of failing the whole document.
pub fn map<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            warn!("Ignoring mapping of unexpected shape: {}", other);
            return Ok(BTreeMap::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((key, entry)),
            Err(e) => {
                warn!("Skipping unreadable entry '{}': {}", key, e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(200)), Some(200.0));
        assert_eq!(coerce_number(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(coerce_number(&json!("abc")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
    }

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text(&json!("2024-01")), Some("2024-01".to_string()));
        assert_eq!(coerce_text(&json!(1712)), Some("1712".to_string()));
        assert_eq!(coerce_text(&json!({"a": 1})), None);
    }

    #[derive(Debug, Deserialize)]
    struct Entry {
        value: u32,
    }

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "map")]
        entries: BTreeMap<String, Entry>,
    }

    fn holder(body: Value) -> Holder {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_map_skips_unreadable_entries() {
        let h = holder(json!({"entries": {"a": {"value": 1}, "b": "junk", "c": {"value": 3}}}));
        assert_eq!(h.entries.keys().collect::<Vec<_>>(), ["a", "c"]);
        assert_eq!(h.entries["c"].value, 3);
    }

    #[test]
    fn test_map_null_and_wrong_shape_are_empty() {
        assert!(holder(json!({"entries": null})).entries.is_empty());
        assert!(holder(json!({"entries": [1, 2]})).entries.is_empty());
        assert!(holder(json!({})).entries.is_empty());
    }
}
