//! Serde helpers for the backend's JSON conventions
//!
//! The backend sends money as JSON numbers (sometimes as strings) and
//! timestamps either as full ISO date-times, with or without offset, or as
//! plain dates. These modules are used through `#[serde(with = "...")]`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::Value as JsonValue;

const DATETIME_OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a decimal, accepting plain and scientific notation
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Parse a backend timestamp leniently
pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn decimal_from_json<E: serde::de::Error>(value: JsonValue) -> Result<Decimal, E> {
    match value {
        JsonValue::Number(n) => {
            let s = n.to_string();
            parse_decimal(&s).ok_or_else(|| E::custom(format!("invalid decimal: {}", s)))
        }
        JsonValue::String(s) => {
            parse_decimal(&s).ok_or_else(|| E::custom(format!("invalid decimal: {}", s)))
        }
        _ => Err(E::custom("expected number or string for amount")),
    }
}

/// Write the decimal's own digits as a JSON number, never through `f64`
fn serialize_decimal<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let raw = RawValue::from_string(value.to_string()).map_err(S::Error::custom)?;
    raw.serialize(serializer)
}

/// Money as a JSON number
pub mod amount {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_decimal(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        decimal_from_json(value)
    }
}

/// Optional money as a JSON number, `null` or absent
pub mod amount_opt {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serialize_decimal(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        match Option::<JsonValue>::deserialize(deserializer)? {
            None | Some(JsonValue::Null) => Ok(None),
            Some(value) => decimal_from_json(value).map(Some),
        }
    }
}

/// Backend timestamp
pub mod datetime {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(DATETIME_OUTPUT_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw)))
    }
}

/// Optional backend timestamp
pub mod datetime_opt {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.format(DATETIME_OUTPUT_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_datetime(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
        }
    }
}

/// Optional calendar date; a full timestamp is truncated to its date
pub mod date_opt {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse_datetime(&raw)
                .map(|dt| Some(dt.date()))
                .ok_or_else(|| D::Error::custom(format!("invalid date: {}", raw))),
        }
    }
}
