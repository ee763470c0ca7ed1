//! WebAssembly module for the farm calculators
//!
//! Provides client-side computation for:
//! - Fertilizer, pesticide and profit calculations
//! - Input validation before submit
//! - Area unit conversion
//! - History summaries

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Calculate from a JSON input and return the record to save
#[wasm_bindgen]
pub fn calculate_json(input_json: &str) -> Result<String, JsValue> {
    api::calculate(input_json).map_err(|e| JsValue::from_str(&e))
}

/// Validate a JSON input, returning `{"valid": bool, "field"?, "message"?}`
#[wasm_bindgen]
pub fn validate_input_json(input_json: &str) -> String {
    api::validate(input_json)
}

/// Convert an area between "acre" and "hectare"
#[wasm_bindgen]
pub fn convert_area_value(value: f64, from: &str, to: &str) -> Result<f64, JsValue> {
    api::convert(value, from, to).map_err(|e| JsValue::from_str(&e))
}

/// Summary and detail lines for a stored record
#[wasm_bindgen]
pub fn summarize_record_json(record_json: &str, currency_symbol: &str) -> Result<String, JsValue> {
    api::summarize(record_json, currency_symbol).map_err(|e| JsValue::from_str(&e))
}

/// Target-independent implementations behind the bindings
mod api {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::Serialize;
    use shared::calculators::calculate_record;
    use shared::reference::ReferenceTables;
    use shared::summary::{summarize as summary_of, DisplayContext};
    use shared::units::convert_area;
    use shared::validation::validate_input;
    use shared::{AreaUnit, CalculationInput, CalculationRecord};

    #[derive(Serialize)]
    struct Validation {
        valid: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    }

    pub fn calculate(input_json: &str) -> Result<String, String> {
        let input: CalculationInput =
            serde_json::from_str(input_json).map_err(|e| format!("Invalid input JSON: {}", e))?;
        validate_input(&input).map_err(|e| e.to_string())?;

        let record = calculate_record(input, &ReferenceTables::default());
        serde_json::to_string(&record).map_err(|e| e.to_string())
    }

    pub fn validate(input_json: &str) -> String {
        let outcome = match serde_json::from_str::<CalculationInput>(input_json) {
            Ok(input) => match validate_input(&input) {
                Ok(()) => Validation {
                    valid: true,
                    field: None,
                    message: None,
                },
                Err(e) => Validation {
                    valid: false,
                    field: Some(e.field.to_string()),
                    message: Some(e.message.to_string()),
                },
            },
            Err(e) => Validation {
                valid: false,
                field: Some("input".to_string()),
                message: Some(e.to_string()),
            },
        };
        serde_json::to_string(&outcome).unwrap_or_else(|_| r#"{"valid":false}"#.to_string())
    }

    pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, String> {
        let from = AreaUnit::from_str(from).ok_or_else(|| format!("Unknown area unit: {}", from))?;
        let to = AreaUnit::from_str(to).ok_or_else(|| format!("Unknown area unit: {}", to))?;
        let value = Decimal::try_from(value).map_err(|e| format!("Invalid area: {}", e))?;

        convert_area(value, from, to)
            .to_f64()
            .ok_or_else(|| "Area out of range".to_string())
    }

    pub fn summarize(record_json: &str, currency_symbol: &str) -> Result<String, String> {
        let record: CalculationRecord =
            serde_json::from_str(record_json).map_err(|e| format!("Invalid record JSON: {}", e))?;
        let ctx = if currency_symbol.is_empty() {
            DisplayContext::default()
        } else {
            DisplayContext {
                currency_symbol: currency_symbol.to_string(),
            }
        };
        serde_json::to_string(&summary_of(&record, &ctx)).map_err(|e| e.to_string())
    }

}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_bindings_round_trip() {
        let input = r#"{"calculator_type":"profit","crop":"wheat","area":{"value":"5","unit":"acre"},"market_price":"2200","input_cost":"50000"}"#;
        let record = calculate_json(input).unwrap();
        assert!(summarize_record_json(&record, "").is_ok());
        assert!((convert_area_value(1.0, "hectare", "acre").unwrap() - 2.47105).abs() < 1e-9);
        assert!(calculate_json("{}").is_err());
    }
}
