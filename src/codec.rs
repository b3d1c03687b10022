//! Encoding of list-valued and timestamp fields at the storage boundary.
//!
//! Older store files hold the same logical field in several shapes (JSON
//! list, JSON scalar, legacy scalar column, comma text, nothing at all).
//! Everything here decodes defensively: a value that cannot be read becomes
//! an empty list or a default timestamp and is logged, never raised.

use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::Value;

/// ISO-8601 layout written to every timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Current local time, as stored in `created_at`/`updated_at`
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

/// Decode an audit timestamp column; unreadable values fall back to the epoch.
pub fn decode_timestamp(raw: Option<&str>) -> NaiveDateTime {
    match raw {
        Some(s) if !s.trim().is_empty() => parse_timestamp(s).unwrap_or_else(|| {
            tracing::warn!("Unreadable timestamp {:?}, using epoch", s);
            NaiveDateTime::default()
        }),
        _ => NaiveDateTime::default(),
    }
}

/// Decode an optional date column (installation/measurement dates).
pub fn decode_optional_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse_timestamp(raw).or_else(|| {
        chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    });
    if parsed.is_none() {
        tracing::warn!("Unreadable date {:?}, dropping it", raw);
    }
    parsed
}

/// Encode a string list as JSON text.
pub fn encode_strings(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}

/// Encode an id list as JSON text.
pub fn encode_ids(ids: &[i64]) -> String {
    Value::from(ids.to_vec()).to_string()
}

/// Decode a JSON string list; `null`, blank and malformed text give `[]`.
pub fn decode_strings(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Ok(Value::Null) => Vec::new(),
        Ok(Value::String(s)) => vec![s],
        Ok(other) => {
            tracing::warn!("Expected a list, found {}; using empty list", other);
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Malformed list text {:?}: {}; using empty list", raw, e);
            Vec::new()
        }
    }
}

/// Decode the `product_ids` column.
///
/// Accepts a JSON list of integers (numeric strings included), a JSON
/// scalar, or nothing. When the encoded column is absent or blank the
/// legacy scalar `product_id` becomes a one-element list.
pub fn decode_product_ids(raw: Option<&str>, legacy: Option<i64>) -> Vec<i64> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return legacy.into_iter().collect();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items.iter().filter_map(id_from_value).collect(),
        Ok(Value::Null) => legacy.into_iter().collect(),
        Ok(scalar) => id_from_value(&scalar).into_iter().collect(),
        Err(e) => {
            tracing::warn!("Malformed product_ids {:?}: {}; using empty list", raw, e);
            Vec::new()
        }
    }
}

fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Encode catalog lists (colors, textures) as comma text.
pub fn encode_comma_list(items: &[String]) -> String {
    items.join(",")
}

pub fn decode_comma_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_ids_encodings() {
        assert_eq!(decode_product_ids(Some("[1, 2, 3]"), None), vec![1, 2, 3]);
        assert_eq!(decode_product_ids(Some("[\"4\", 5]"), None), vec![4, 5]);
        assert_eq!(decode_product_ids(Some("7"), None), vec![7]);
        assert_eq!(decode_product_ids(None, Some(9)), vec![9]);
        assert_eq!(decode_product_ids(Some(""), Some(9)), vec![9]);
        assert_eq!(decode_product_ids(None, None), Vec::<i64>::new());
    }

    #[test]
    fn test_malformed_product_ids_degrade_to_empty() {
        assert!(decode_product_ids(Some("[1,2"), Some(3)).is_empty());
        assert!(decode_product_ids(Some("not json"), None).is_empty());
        assert!(decode_product_ids(Some("{\"a\": 1}"), None).is_empty());
    }

    #[test]
    fn test_string_lists() {
        let items = vec!["Rollladen".to_string(), "Insektenschutz".to_string()];
        assert_eq!(decode_strings(Some(&encode_strings(&items))), items);
        assert!(decode_strings(Some("[\"open")).is_empty());
        assert!(decode_strings(Some("null")).is_empty());
        assert!(decode_strings(None).is_empty());
    }

    #[test]
    fn test_comma_lists() {
        assert_eq!(
            decode_comma_list(Some("Weiß, Braun,,Anthrazit")),
            vec!["Weiß", "Braun", "Anthrazit"]
        );
        assert!(decode_comma_list(Some("")).is_empty());
    }

    #[test]
    fn test_timestamps() {
        let ts = parse_timestamp("2024-03-01T08:15:30.123456").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-03-01T08:15:30.123456");
        assert!(parse_timestamp("2024-03-01T08:15:30").is_some());
        assert!(parse_timestamp("2024-03-01T08:15:30+02:00").is_some());
        assert_eq!(decode_timestamp(Some("garbage")), NaiveDateTime::default());
        assert!(decode_optional_timestamp(Some("2024-05-06")).is_some());
        assert!(decode_optional_timestamp(Some("")).is_none());
    }
}
