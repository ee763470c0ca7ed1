//! Profit estimate models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Area, CropChoice, YieldUnit};

/// Inputs of a profit calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitInput {
    pub crop: CropChoice,
    pub area: Area,
    /// Price per yield unit
    pub market_price: Decimal,
    /// Total cost of inputs for the whole area
    pub input_cost: Decimal,
    /// Expected yield per acre, replacing the reference value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_override: Option<Decimal>,
}

/// Computed profit estimate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfitResult {
    pub crop_name: String,
    pub yield_unit: YieldUnit,
    pub area_acres: Decimal,
    pub yield_per_acre: Decimal,
    pub total_yield: Decimal,
    pub market_price: Decimal,
    pub input_cost: Decimal,
    pub revenue: Decimal,
    pub profit: Decimal,
    pub profit_per_acre: Decimal,
    /// Percentage of revenue; undefined when revenue is zero
    pub profit_margin: Option<Decimal>,
    /// Price per unit that covers the input cost; undefined when yield is zero
    pub break_even_price: Option<Decimal>,
    pub is_profit: bool,
}
