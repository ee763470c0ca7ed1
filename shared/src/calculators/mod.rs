//! Calculation engine
//!
//! One strategy per calculator type. Every strategy is a pure function of a
//! validated input and the reference tables; identical inputs always produce
//! identical results.

pub mod fertilizer;
pub mod pesticide;
pub mod profit;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{CalculationInput, CalculationRecord, CalculationResult};
use crate::reference::ReferenceTables;

/// Run the strategy matching the input's calculator type
pub fn calculate(input: &CalculationInput, tables: &ReferenceTables) -> CalculationResult {
    match input {
        CalculationInput::Fertilizer(input) => {
            CalculationResult::Fertilizer(fertilizer::calculate(input, &tables.fertilizer))
        }
        CalculationInput::Pesticide(input) => {
            CalculationResult::Pesticide(pesticide::calculate(input, &tables.pesticide))
        }
        CalculationInput::Profit(input) => {
            CalculationResult::Profit(profit::calculate(input, &tables.profit))
        }
    }
}

/// Calculate and pair the result with its input
pub fn calculate_record(input: CalculationInput, tables: &ReferenceTables) -> CalculationRecord {
    match input {
        CalculationInput::Fertilizer(input_data) => {
            let result_data = fertilizer::calculate(&input_data, &tables.fertilizer);
            CalculationRecord::Fertilizer {
                input_data,
                result_data,
            }
        }
        CalculationInput::Pesticide(input_data) => {
            let result_data = pesticide::calculate(&input_data, &tables.pesticide);
            CalculationRecord::Pesticide {
                input_data,
                result_data,
            }
        }
        CalculationInput::Profit(input_data) => {
            let result_data = profit::calculate(&input_data, &tables.profit);
            CalculationRecord::Profit {
                input_data,
                result_data,
            }
        }
    }
}

/// Round half away from zero to whole units
pub(crate) fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}
