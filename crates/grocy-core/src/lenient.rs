//! # Lenient Decoding
//!
//! Grocy releases before 4.0 serialize every database column as a string
//! (`"amount": "2.5"`, `"id": "7"`); newer releases emit real JSON numbers.
//! These helpers are used through `#[serde(deserialize_with = ...)]` so the
//! records in [`crate::types`] decode both shapes.
//!
//! Empty strings and `null` mean "absent" for the optional variants.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Unsigned(u64),
    Float(f64),
    Bool(bool),
    Text(String),
}

fn to_f64<E: serde::de::Error>(raw: Raw) -> Result<Option<f64>, E> {
    match raw {
        Raw::Unsigned(n) => Ok(Some(n as f64)),
        Raw::Float(n) => Ok(Some(n)),
        Raw::Bool(b) => Ok(Some(if b { 1.0 } else { 0.0 })),
        Raw::Text(s) if s.trim().is_empty() => Ok(None),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
    }
}

fn to_u64<E: serde::de::Error>(raw: Raw) -> Result<Option<u64>, E> {
    match raw {
        Raw::Unsigned(n) => Ok(Some(n)),
        Raw::Float(n) if n >= 0.0 && n.fract() == 0.0 => Ok(Some(n as u64)),
        Raw::Float(n) => Err(E::custom(format!("expected an id, got {n}"))),
        Raw::Bool(_) => Err(E::custom("expected an id, got a boolean")),
        Raw::Text(s) if s.trim().is_empty() => Ok(None),
        Raw::Text(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| E::custom(format!("expected an id, got {s:?}"))),
    }
}

/// Decode a required number.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    to_f64(Raw::deserialize(deserializer)?)?.ok_or_else(|| D::Error::custom("missing number"))
}

/// Decode an optional number; `null` and `""` become `None`.
pub fn optional_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    match Option::<Raw>::deserialize(deserializer)? {
        Some(raw) => to_f64(raw),
        None => Ok(None),
    }
}

/// Decode a required id.
pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    to_u64(Raw::deserialize(deserializer)?)?.ok_or_else(|| D::Error::custom("missing id"))
}

/// Decode an optional id; `null` and `""` become `None`.
pub fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<Raw>::deserialize(deserializer)? {
        Some(raw) => to_u64(raw),
        None => Ok(None),
    }
}

/// Decode a flag stored as `true`/`false`, `0`/`1` or `"0"`/`"1"`.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Raw::Bool(b)) => Ok(b),
        Some(raw) => Ok(to_f64::<D::Error>(raw)?.is_some_and(|n| n != 0.0)),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "super::id")]
        id: u64,
        #[serde(deserialize_with = "super::number")]
        amount: f64,
        #[serde(default, deserialize_with = "super::optional_id")]
        group: Option<u64>,
        #[serde(default, deserialize_with = "super::flag")]
        aggregated: bool,
    }

    fn parse(json: &str) -> Result<Row, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let typed = parse(r#"{"id": 7, "amount": 3.5, "group": 2, "aggregated": true}"#)
            .expect("typed row");
        let stringly = parse(r#"{"id": "7", "amount": "3.5", "group": "2", "aggregated": "1"}"#)
            .expect("string row");

        assert_eq!(typed.id, stringly.id);
        assert_eq!(typed.amount, stringly.amount);
        assert_eq!(typed.group, stringly.group);
        assert_eq!(typed.aggregated, stringly.aggregated);
    }

    #[test]
    fn empty_strings_and_nulls_are_absent() {
        let row = parse(r#"{"id": 1, "amount": 1, "group": ""}"#).expect("row");
        assert_eq!(row.group, None);
        assert!(!row.aggregated);

        let row = parse(r#"{"id": 1, "amount": 1, "group": null, "aggregated": 0}"#).expect("row");
        assert_eq!(row.group, None);
        assert!(!row.aggregated);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse(r#"{"id": "seven", "amount": 1}"#).is_err());
        assert!(parse(r#"{"id": 1, "amount": "lots"}"#).is_err());
        assert!(parse(r#"{"id": 1.5, "amount": 1}"#).is_err());
    }
}
