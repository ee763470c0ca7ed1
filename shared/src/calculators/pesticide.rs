//! Pesticide dose and spray-mix strategy

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::round_dp;
use crate::models::{Formulation, PesticideInput, PesticideResult, RateSource, SprayPlan};
use crate::reference::{
    advice::{ENVIRONMENTAL_NOTE, PESTICIDE_ADVICE},
    PesticideReference, DEFAULT_TANK_CAPACITY, FALLBACK_GALLONS_PER_ACRE,
};

/// Quantities are reported to two decimal places
const QUANTITY_DP: u32 = 2;

pub fn calculate(input: &PesticideInput, reference: &PesticideReference) -> PesticideResult {
    let formulation = input.effective_formulation();

    let (base_rate, rate_source) = match input
        .crop
        .catalog()
        .and_then(|crop| reference.base_rate(crop, input.pest))
    {
        Some(rate) => (rate, RateSource::CropPestTable),
        None => (reference.default_rate(formulation), RateSource::FormulationDefault),
    };

    let adjusted_rate = base_rate
        * reference.severity_factor(input.severity)
        * reference.method_factor(input.application_method);

    // Both bases come straight from the entered value.
    let hectares = input.plot.in_unit(reference.dose_basis());
    let acres = input.plot.in_unit(reference.spray_basis());

    let total = adjusted_rate * hectares;

    let spray = match formulation {
        Formulation::Granular => None,
        Formulation::Liquid => spray_plan(input, reference, acres, total),
    };

    PesticideResult {
        crop_name: input.crop.display_name(),
        pest: input.pest,
        severity: input.severity,
        application_method: input.application_method,
        formulation,
        recommended_product: reference.recommended_product(input.pest).to_string(),
        base_rate,
        rate_source,
        adjusted_rate: round_dp(adjusted_rate, QUANTITY_DP),
        plot_size_ha: round_dp(hectares, QUANTITY_DP),
        plot_size_acres: round_dp(acres, QUANTITY_DP),
        total_pesticide: round_dp(total, QUANTITY_DP),
        unit: formulation.quantity_unit(),
        spray,
        schedule: reference.schedule(input.severity).to_string(),
        environmental_note: ENVIRONMENTAL_NOTE.to_string(),
        general_advice: PESTICIDE_ADVICE.to_string(),
    }
}

/// Mixing plan; `None` when there is nothing to spray
fn spray_plan(
    input: &PesticideInput,
    reference: &PesticideReference,
    acres: Decimal,
    total: Decimal,
) -> Option<SprayPlan> {
    let gallons_per_acre = input
        .gallons_per_acre
        .filter(|gpa| *gpa > Decimal::ZERO)
        .unwrap_or_else(|| {
            let default = reference.default_gallons_per_acre(input.application_method);
            if default.is_zero() {
                FALLBACK_GALLONS_PER_ACRE
            } else {
                default
            }
        });
    let tank_capacity = input
        .tank_capacity
        .filter(|tank| *tank > Decimal::ZERO)
        .unwrap_or(DEFAULT_TANK_CAPACITY);

    let volume = acres * gallons_per_acre;
    if volume <= Decimal::ZERO {
        return None;
    }

    let tanks = (volume / tank_capacity).ceil();
    let tanks_needed = tanks.to_u32()?;
    if tanks_needed == 0 {
        return None;
    }

    Some(SprayPlan {
        gallons_per_acre,
        spray_volume_gal: round_dp(volume, QUANTITY_DP),
        tank_capacity_gal: tank_capacity,
        tanks_needed,
        pesticide_per_tank: round_dp(total / tanks, QUANTITY_DP),
    })
}
