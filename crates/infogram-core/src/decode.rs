//! Per-field readers for hand-written `Deserialize` impls.
//!
//! Each reader pulls the next map value as a concrete type and replaces the
//! deserializer's own error with a [`FieldError`] naming the field and the
//! expected type or format.

use crate::errors::FieldError;
use chrono::{DateTime, Utc};
use serde::de::{Error, MapAccess};
use serde_json::Number;
use url::Url;

fn invalid<E: Error>(field: &'static str, expected: &'static str) -> E {
    E::custom(FieldError::new(field, expected))
}

/// A JSON number with no fractional part. `7` and `7.0` both read as 7.
pub fn int<'de, A: MapAccess<'de>>(map: &mut A, field: &'static str) -> Result<i64, A::Error> {
    let number = map
        .next_value::<Number>()
        .map_err(|_| invalid(field, "an int"))?;

    number
        .as_i64()
        .or_else(|| number.as_f64().and_then(integral))
        .ok_or_else(|| invalid(field, "an int"))
}

fn integral(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then_some(value as i64)
}

pub fn string<'de, A: MapAccess<'de>>(
    map: &mut A,
    field: &'static str,
) -> Result<String, A::Error> {
    map.next_value::<String>()
        .map_err(|_| invalid(field, "a string"))
}

pub fn boolean<'de, A: MapAccess<'de>>(
    map: &mut A,
    field: &'static str,
) -> Result<bool, A::Error> {
    map.next_value::<bool>()
        .map_err(|_| invalid(field, "a boolean"))
}

/// An absolute URL carried as a JSON string.
pub fn url<'de, A: MapAccess<'de>>(map: &mut A, field: &'static str) -> Result<Url, A::Error> {
    let raw = string(map, field)?;
    Url::parse(&raw).map_err(|_| invalid(field, "a parsable URL"))
}

/// An RFC 3339 timestamp carried as a JSON string, normalized to UTC.
pub fn timestamp<'de, A: MapAccess<'de>>(
    map: &mut A,
    field: &'static str,
) -> Result<DateTime<Utc>, A::Error> {
    let raw = string(map, field)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| invalid(field, "a parsable RFC 3339 time"))
}
