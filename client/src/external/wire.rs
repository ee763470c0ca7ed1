//! Wire formats of the calculator-results API
//!
//! The endpoints grew per calculator: fertilizer posts its input fields at the
//! top level next to `result_data`, pesticide and profit post nested
//! `inputs`/`results`. Listings mix `input_data`/`inputs` and
//! `result_data`/`results`, and ids come back as numbers or strings. Everything
//! here normalizes to [`CalculationRecord`] and [`HistoryEntry`].

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{CalculationRecord, CalculatorType, HistoryEntry, HistoryId, SyncStatus};

use crate::error::{AppError, AppResult};

/// Identity the remote assigned to a saved record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSaved {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct FlattenedBody<'a, I, R> {
    #[serde(flatten)]
    input: &'a I,
    result_data: &'a R,
}

#[derive(Serialize)]
struct NestedBody<'a, I, R> {
    inputs: &'a I,
    results: &'a R,
}

/// Request body for `POST /calculator-results/{type}`
pub fn save_body(record: &CalculationRecord) -> AppResult<Value> {
    let body = match record {
        CalculationRecord::Fertilizer {
            input_data,
            result_data,
        } => serde_json::to_value(FlattenedBody {
            input: input_data,
            result_data,
        })?,
        CalculationRecord::Pesticide {
            input_data,
            result_data,
        } => serde_json::to_value(NestedBody {
            inputs: input_data,
            results: result_data,
        })?,
        CalculationRecord::Profit {
            input_data,
            result_data,
        } => serde_json::to_value(NestedBody {
            inputs: input_data,
            results: result_data,
        })?,
    };
    Ok(body)
}

/// Read the id and timestamp from a save response
pub fn parse_saved(body: &Value) -> AppResult<RemoteSaved> {
    let saved = body
        .get("saved_result")
        .filter(|v| v.is_object())
        .unwrap_or(body);

    let id = saved
        .get("id")
        .and_then(id_string)
        .ok_or_else(|| AppError::RemoteProtocol("Save response carries no id".to_string()))?;

    Ok(RemoteSaved {
        id,
        created_at: saved.get("created_at").and_then(parse_timestamp),
    })
}

/// Decode a list response, skipping rows that cannot be read
pub fn parse_listing(calculator_type: CalculatorType, body: Value) -> AppResult<Vec<HistoryEntry>> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(AppError::RemoteProtocol(
                    "List response has no results array".to_string(),
                ))
            }
        },
        _ => {
            return Err(AppError::RemoteProtocol(
                "List response is not a JSON object".to_string(),
            ))
        }
    };

    let mut entries = Vec::with_capacity(rows.len());
    for row in &rows {
        match parse_row(calculator_type, row) {
            Ok(entry) => entries.push(entry),
            Err(reason) => {
                tracing::warn!(
                    calculator_type = %calculator_type,
                    reason = %reason,
                    "Skipping undecodable history row"
                );
            }
        }
    }
    Ok(entries)
}

fn parse_row(calculator_type: CalculatorType, row: &Value) -> Result<HistoryEntry, String> {
    let obj = row.as_object().ok_or_else(|| "row is not an object".to_string())?;

    if let Some(tag) = obj.get("calculator_type").and_then(Value::as_str) {
        if CalculatorType::from_str(tag) != Some(calculator_type) {
            return Err(format!("row belongs to calculator {}", tag));
        }
    }

    let id = obj
        .get("id")
        .and_then(id_string)
        .ok_or_else(|| "missing id".to_string())?;
    let created_at = obj
        .get("created_at")
        .or_else(|| obj.get("timestamp"))
        .and_then(parse_timestamp)
        .ok_or_else(|| format!("row {} has no readable created_at", id))?;

    // Older fertilizer rows keep the input fields at the top level.
    let input = obj
        .get("input_data")
        .or_else(|| obj.get("inputs"))
        .cloned()
        .or_else(|| (calculator_type == CalculatorType::Fertilizer).then(|| row.clone()))
        .ok_or_else(|| format!("row {} has no input data", id))?;
    let result = obj
        .get("result_data")
        .or_else(|| obj.get("results"))
        .cloned()
        .ok_or_else(|| format!("row {} has no result data", id))?;

    let record = record_from_parts(calculator_type, input, result)
        .map_err(|e| format!("row {}: {}", id, e))?;

    Ok(HistoryEntry {
        id: HistoryId::Remote(id),
        record,
        created_at,
        sync: SyncStatus::Synced,
    })
}

/// Assemble a canonical record from loose input and result values
pub fn record_from_parts(
    calculator_type: CalculatorType,
    input: Value,
    result: Value,
) -> Result<CalculationRecord, serde_json::Error> {
    let mut map = Map::new();
    map.insert(
        "calculator_type".to_string(),
        Value::String(calculator_type.as_str().to_string()),
    );
    map.insert("input_data".to_string(), input);
    map.insert("result_data".to_string(), result);
    serde_json::from_value(Value::Object(map))
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    // Naive timestamps are stored in UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
