//! Forgiving deserializers for upstream properties.
//!
//! The hex payload is produced by an external Gi* job and may carry `null`,
//! strings, or nothing at all where a number is expected. These helpers map
//! anything that is not a finite JSON number to `None` instead of failing.
//! The same applies one level up: a feature whose geometry or properties
//! are malformed keeps its place in the collection.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::HexProperties;

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite()))
}

pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_i64))
}

pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Like [`number`] but defaults to zero and never goes negative.
pub fn count<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.unwrap_or(0.0).max(0.0))
}

/// `null` and non-object values read as default properties.
pub fn properties<'de, D>(deserializer: D) -> Result<HexProperties, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .inspect_err(|e| log::debug!("Ignoring malformed hex properties: {e}"))
            .unwrap_or_default(),
        Some(Value::Null) | None => HexProperties::default(),
        Some(other) => {
            log::debug!("Ignoring non-object hex properties: {other}");
            HexProperties::default()
        }
    })
}

/// A geometry that `geojson` rejects reads as `None`.
pub fn geometry<'de, D>(deserializer: D) -> Result<Option<geojson::Geometry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()).and_then(|v| {
        serde_json::from_value(v)
            .inspect_err(|e| log::debug!("Ignoring malformed hex geometry: {e}"))
            .ok()
    }))
}
