//! Validation utilities for calculator inputs
//!
//! Every check returns a [`ValidationError`] naming the offending field so the
//! wizard can show the message next to it. Engines only ever receive input
//! that passed these checks.
//!
//! Numeric fields are bounded so that no combination of accepted values can
//! overflow the engines' decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use crate::models::{CalculationInput, FertilizerInput, PesticideInput, ProfitInput};
use crate::types::{Area, CropChoice};

/// A missing or invalid input field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

pub type ValidationResult = Result<(), ValidationError>;

// ============================================================================
// Limits
// ============================================================================

/// Smallest field or plot size, in the unit it was entered in
pub const MIN_AREA: Decimal = dec!(0.0001);
/// Largest field or plot size, in the unit it was entered in
pub const MAX_AREA: Decimal = dec!(1000000);
/// Largest market price per yield unit
pub const MAX_MARKET_PRICE: Decimal = dec!(1000000000);
/// Largest total input cost
pub const MAX_INPUT_COST: Decimal = dec!(1000000000000);
/// Largest expected yield per acre
pub const MAX_YIELD_PER_ACRE: Decimal = dec!(1000000);
pub const MAX_GALLONS_PER_ACRE: Decimal = dec!(1000);
pub const MIN_TANK_CAPACITY: Decimal = dec!(1);
pub const MAX_TANK_CAPACITY: Decimal = dec!(100000);

// ============================================================================
// Field Validations
// ============================================================================

/// Require a value that is present and strictly positive
pub fn validate_positive(field: &'static str, value: Option<Decimal>) -> Result<Decimal, ValidationError> {
    match value {
        None => Err(ValidationError::new(field, "This field is required")),
        Some(v) if v <= Decimal::ZERO => Err(ValidationError::new(field, "Must be greater than zero")),
        Some(v) => Ok(v),
    }
}

/// An optional value, when given, must be strictly positive
pub fn validate_optional_positive(field: &'static str, value: Option<Decimal>) -> ValidationResult {
    match value {
        Some(v) if v <= Decimal::ZERO => Err(ValidationError::new(field, "Must be greater than zero")),
        _ => Ok(()),
    }
}

/// Require a value that is present and not negative
pub fn validate_non_negative(
    field: &'static str,
    value: Option<Decimal>,
) -> Result<Decimal, ValidationError> {
    match value {
        None => Err(ValidationError::new(field, "This field is required")),
        Some(v) if v < Decimal::ZERO => Err(ValidationError::new(field, "Cannot be negative")),
        Some(v) => Ok(v),
    }
}

/// Require `min <= value <= max`
pub fn validate_within(
    field: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> ValidationResult {
    if value < min {
        return Err(ValidationError::new(field, "Value is too small"));
    }
    if value > max {
        return Err(ValidationError::new(field, "Value is too large"));
    }
    Ok(())
}

/// A required, positive and bounded area
pub fn validate_area_value(field: &'static str, value: Option<Decimal>) -> Result<Decimal, ValidationError> {
    let value = validate_positive(field, value)?;
    validate_within(field, value, MIN_AREA, MAX_AREA)?;
    Ok(value)
}

pub fn validate_area(area: &Area) -> ValidationResult {
    validate_area_value("area", Some(area.value)).map(|_| ())
}

pub fn validate_market_price(value: Option<Decimal>) -> Result<Decimal, ValidationError> {
    let value = validate_positive("market_price", value)?;
    validate_within("market_price", value, Decimal::ZERO, MAX_MARKET_PRICE)?;
    Ok(value)
}

pub fn validate_input_cost(value: Option<Decimal>) -> Result<Decimal, ValidationError> {
    let value = validate_non_negative("input_cost", value)?;
    validate_within("input_cost", value, Decimal::ZERO, MAX_INPUT_COST)?;
    Ok(value)
}

/// Yield per acre; `required` for custom crops
pub fn validate_yield_override(
    value: Option<Decimal>,
    required: bool,
) -> Result<Option<Decimal>, ValidationError> {
    let value = if required {
        Some(validate_positive("yield_override", value)?)
    } else {
        validate_optional_positive("yield_override", value)?;
        value
    };
    if let Some(v) = value {
        validate_within("yield_override", v, Decimal::ZERO, MAX_YIELD_PER_ACRE)?;
    }
    Ok(value)
}

pub fn validate_gallons_per_acre(value: Option<Decimal>) -> ValidationResult {
    validate_optional_positive("gallons_per_acre", value)?;
    match value {
        Some(v) => validate_within("gallons_per_acre", v, Decimal::ZERO, MAX_GALLONS_PER_ACRE),
        None => Ok(()),
    }
}

pub fn validate_tank_capacity(value: Option<Decimal>) -> ValidationResult {
    validate_optional_positive("tank_capacity", value)?;
    match value {
        Some(v) => validate_within("tank_capacity", v, MIN_TANK_CAPACITY, MAX_TANK_CAPACITY),
        None => Ok(()),
    }
}

pub fn validate_custom_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return Err(ValidationError::new("custom_crop_name", "Enter the name of your crop"));
    }
    if name.trim().chars().count() > 64 {
        return Err(ValidationError::new("custom_crop_name", "Crop name is too long"));
    }
    Ok(())
}

pub fn validate_crop(crop: &CropChoice) -> ValidationResult {
    match crop {
        CropChoice::Catalog(_) => Ok(()),
        CropChoice::Custom(custom) => validate_custom_name(&custom.name),
    }
}

// ============================================================================
// Calculator Validations
// ============================================================================

pub fn validate_fertilizer(input: &FertilizerInput) -> ValidationResult {
    validate_crop(&input.crop)?;
    validate_area(&input.area)
}

pub fn validate_pesticide(input: &PesticideInput) -> ValidationResult {
    validate_crop(&input.crop)?;
    validate_area_value("plot_size", Some(input.plot.value))?;
    validate_gallons_per_acre(input.gallons_per_acre)?;
    validate_tank_capacity(input.tank_capacity)
}

pub fn validate_profit(input: &ProfitInput) -> ValidationResult {
    validate_crop(&input.crop)?;
    validate_area(&input.area)?;
    validate_market_price(Some(input.market_price))?;
    validate_input_cost(Some(input.input_cost))?;
    validate_yield_override(input.yield_override, input.crop.is_custom())?;
    Ok(())
}

/// Validate a finalized input of any calculator
pub fn validate_input(input: &CalculationInput) -> ValidationResult {
    match input {
        CalculationInput::Fertilizer(input) => validate_fertilizer(input),
        CalculationInput::Pesticide(input) => validate_pesticide(input),
        CalculationInput::Profit(input) => validate_profit(input),
    }
}
