//! Deserialization helpers that normalize loosely typed records coming back from storage.
//!
//! Stored records predate several schema changes: collections show up as `null` or objects,
//! numbers arrive as strings, dates carry time components or are left blank. Every helper here
//! substitutes a neutral default instead of failing so evaluation always receives a usable record.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date from `YYYY-MM-DD`, an RFC 3339 timestamp, or a string starting with a date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.date_naive());
    }

    trimmed
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

pub(crate) fn value_to_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(raw) => raw.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

fn value_to_flag(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(raw) => matches!(
            raw.trim().to_lowercase().as_str(),
            "true" | "1" | "si" | "sí" | "yes"
        ),
        _ => false,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

pub(crate) fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_f64).unwrap_or(0.0))
}

pub(crate) fn numbers_or_empty<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items.iter().map(value_to_f64).collect()),
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn flag_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_flag).unwrap_or(false))
}

pub(crate) fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(value_to_flag(&value))),
    }
}

pub(crate) fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_text).unwrap_or_default())
}

pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_to_text)
        .filter(|text| !text.trim().is_empty()))
}

pub(crate) fn texts_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(items.iter().filter_map(value_to_text).collect()),
        _ => Ok(Vec::new()),
    }
}

pub(crate) fn date_or_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => Ok(parse_calendar_date(&raw)),
        _ => Ok(None),
    }
}

/// Deserialize a nested record, replacing `null`, scalars, and mistyped objects with the default.
pub(crate) fn record_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(T::default()),
        Some(value) => value,
    };

    match serde_json::from_value::<T>(value) {
        Ok(record) => Ok(record),
        Err(error) => {
            warn!(%error, "replacing unreadable stored record with defaults");
            Ok(T::default())
        }
    }
}

/// Deserialize a unit enum, mapping `null`, blank, and unrecognised values to its default variant.
pub(crate) fn variant_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => raw,
        _ => return Ok(T::default()),
    };

    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Ok(T::default());
    }

    Ok(serde_json::from_value::<T>(Value::String(raw.trim().to_string()))
        .or_else(|_| serde_json::from_value::<T>(Value::String(normalized)))
        .unwrap_or_default())
}

/// Deserialize a string-valued map whose keys may not all be recognised.
pub(crate) fn text_map_or_empty<'de, D, K>(deserializer: D) -> Result<BTreeMap<K, String>, D::Error>
where
    D: Deserializer<'de>,
    K: DeserializeOwned + Ord,
{
    let entries = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(entries)) => entries,
        _ => return Ok(BTreeMap::new()),
    };

    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| {
            let key = serde_json::from_value::<K>(Value::String(key)).ok()?;
            Some((key, value_to_text(&value)?))
        })
        .collect())
}

/// Deserialize an array of records, treating anything that is not an array as empty and
/// skipping elements that cannot be read.
pub(crate) fn records_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item) {
            Ok(record) => records.push(record),
            Err(error) => warn!(position, %error, "skipping unreadable stored record"),
        }
    }

    Ok(records)
}
