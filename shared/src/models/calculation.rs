//! Canonical calculation shapes shared by every calculator

use serde::{Deserialize, Serialize};

use super::{
    FertilizerInput, FertilizerResult, PesticideInput, PesticideResult, ProfitInput, ProfitResult,
};
use crate::types::{CalculatorType, CropChoice};

/// Validated input of any calculator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "calculator_type", rename_all = "snake_case")]
pub enum CalculationInput {
    Fertilizer(FertilizerInput),
    Pesticide(PesticideInput),
    Profit(ProfitInput),
}

impl CalculationInput {
    pub fn calculator_type(&self) -> CalculatorType {
        match self {
            CalculationInput::Fertilizer(_) => CalculatorType::Fertilizer,
            CalculationInput::Pesticide(_) => CalculatorType::Pesticide,
            CalculationInput::Profit(_) => CalculatorType::Profit,
        }
    }

    pub fn crop(&self) -> &CropChoice {
        match self {
            CalculationInput::Fertilizer(input) => &input.crop,
            CalculationInput::Pesticide(input) => &input.crop,
            CalculationInput::Profit(input) => &input.crop,
        }
    }
}

/// Output of any calculator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "calculator_type", rename_all = "snake_case")]
pub enum CalculationResult {
    Fertilizer(FertilizerResult),
    Pesticide(PesticideResult),
    Profit(ProfitResult),
}

impl CalculationResult {
    pub fn calculator_type(&self) -> CalculatorType {
        match self {
            CalculationResult::Fertilizer(_) => CalculatorType::Fertilizer,
            CalculationResult::Pesticide(_) => CalculatorType::Pesticide,
            CalculationResult::Profit(_) => CalculatorType::Profit,
        }
    }
}

/// An input paired with the result computed from it
///
/// This is the storage shape used by the local store, the remote adapter and
/// the history reader: `{calculator_type, input_data, result_data}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "calculator_type", rename_all = "snake_case")]
pub enum CalculationRecord {
    Fertilizer {
        input_data: FertilizerInput,
        result_data: FertilizerResult,
    },
    Pesticide {
        input_data: PesticideInput,
        result_data: PesticideResult,
    },
    Profit {
        input_data: ProfitInput,
        result_data: ProfitResult,
    },
}

impl CalculationRecord {
    /// Pair an input with its result; `None` when their calculator types differ
    pub fn from_parts(input: CalculationInput, result: CalculationResult) -> Option<Self> {
        match (input, result) {
            (CalculationInput::Fertilizer(input_data), CalculationResult::Fertilizer(result_data)) => {
                Some(CalculationRecord::Fertilizer {
                    input_data,
                    result_data,
                })
            }
            (CalculationInput::Pesticide(input_data), CalculationResult::Pesticide(result_data)) => {
                Some(CalculationRecord::Pesticide {
                    input_data,
                    result_data,
                })
            }
            (CalculationInput::Profit(input_data), CalculationResult::Profit(result_data)) => {
                Some(CalculationRecord::Profit {
                    input_data,
                    result_data,
                })
            }
            _ => None,
        }
    }

    pub fn calculator_type(&self) -> CalculatorType {
        match self {
            CalculationRecord::Fertilizer { .. } => CalculatorType::Fertilizer,
            CalculationRecord::Pesticide { .. } => CalculatorType::Pesticide,
            CalculationRecord::Profit { .. } => CalculatorType::Profit,
        }
    }

    pub fn input(&self) -> CalculationInput {
        match self {
            CalculationRecord::Fertilizer { input_data, .. } => {
                CalculationInput::Fertilizer(input_data.clone())
            }
            CalculationRecord::Pesticide { input_data, .. } => {
                CalculationInput::Pesticide(input_data.clone())
            }
            CalculationRecord::Profit { input_data, .. } => CalculationInput::Profit(input_data.clone()),
        }
    }

    pub fn result(&self) -> CalculationResult {
        match self {
            CalculationRecord::Fertilizer { result_data, .. } => {
                CalculationResult::Fertilizer(result_data.clone())
            }
            CalculationRecord::Pesticide { result_data, .. } => {
                CalculationResult::Pesticide(result_data.clone())
            }
            CalculationRecord::Profit { result_data, .. } => {
                CalculationResult::Profit(result_data.clone())
            }
        }
    }

    pub fn crop_name(&self) -> String {
        match self {
            CalculationRecord::Fertilizer { result_data, .. } => result_data.crop_name.clone(),
            CalculationRecord::Pesticide { result_data, .. } => result_data.crop_name.clone(),
            CalculationRecord::Profit { result_data, .. } => result_data.crop_name.clone(),
        }
    }
}
