//! Content fingerprints for calculation records
//!
//! Local and remote copies of the same calculation carry different ids, so
//! they are matched by content: SHA-256 over a canonical JSON rendering,
//! base64url encoded. Keys are sorted and every decimal is normalized, so
//! `"2.50"`, `"2.5"` and `2.5` fingerprint alike.

use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rust_decimal::Decimal;
use serde_json::Value;
use sha2::{Digest, Sha256};
use shared::CalculationRecord;

use crate::error::AppResult;

pub fn fingerprint(record: &CalculationRecord) -> AppResult<String> {
    let canonical = canonicalize(serde_json::to_value(record)?);
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(&bytes)))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, canonicalize(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Number(n) => match Decimal::from_str(&n.to_string()) {
            Ok(d) => Value::String(d.normalize().to_string()),
            Err(_) => Value::Number(n),
        },
        Value::String(s) => match Decimal::from_str(&s) {
            Ok(d) => Value::String(d.normalize().to_string()),
            Err(_) => Value::String(s),
        },
        other => other,
    }
}
