//! Unit conversion library
//!
//! Pure conversions between the units the calculators accept and the basis
//! each reference table is declared in. Every engine converts through these
//! functions so no call site carries its own magic factor.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::AreaUnit;

/// Acres in one hectare
pub const HECTARE_TO_ACRE: Decimal = dec!(2.47105);

/// Hectares in one acre
pub const ACRE_TO_HECTARE: Decimal = dec!(0.404686);

/// Liters in one US gallon
pub const GALLON_TO_LITER: Decimal = dec!(3.78541);

/// Kilograms in one quintal
pub const KG_PER_QUINTAL: Decimal = dec!(100);

// ============================================================================
// Area
// ============================================================================

/// Express an area in acres
pub fn to_acres(value: Decimal, unit: AreaUnit) -> Decimal {
    match unit {
        AreaUnit::Acre => value,
        AreaUnit::Hectare => value * HECTARE_TO_ACRE,
    }
}

/// Express an area in hectares
pub fn to_hectares(value: Decimal, unit: AreaUnit) -> Decimal {
    match unit {
        AreaUnit::Hectare => value,
        AreaUnit::Acre => value * ACRE_TO_HECTARE,
    }
}

/// Inverse of [`to_acres`]: express an acre quantity in `unit`
pub fn from_acres(acres: Decimal, unit: AreaUnit) -> Decimal {
    match unit {
        AreaUnit::Acre => acres,
        AreaUnit::Hectare => acres / HECTARE_TO_ACRE,
    }
}

pub fn convert_area(value: Decimal, from: AreaUnit, to: AreaUnit) -> Decimal {
    match (from, to) {
        (a, b) if a == b => value,
        (_, AreaUnit::Acre) => to_acres(value, from),
        (_, AreaUnit::Hectare) => to_hectares(value, from),
    }
}

// ============================================================================
// Volume
// ============================================================================

pub fn gallons_to_liters(gallons: Decimal) -> Decimal {
    gallons * GALLON_TO_LITER
}

pub fn liters_to_gallons(liters: Decimal) -> Decimal {
    liters / GALLON_TO_LITER
}

// ============================================================================
// Mass and concentration
// ============================================================================

pub fn kg_to_quintals(kg: Decimal) -> Decimal {
    kg / KG_PER_QUINTAL
}

pub fn quintals_to_kg(quintals: Decimal) -> Decimal {
    quintals * KG_PER_QUINTAL
}

/// Kilograms of product needed to deliver `nutrient_kg` of a nutrient the
/// product contains at `content_percent`
///
/// Returns `None` for a non-positive content percentage.
pub fn product_for_nutrient(nutrient_kg: Decimal, content_percent: Decimal) -> Option<Decimal> {
    if content_percent <= Decimal::ZERO {
        return None;
    }
    Some(nutrient_kg / (content_percent / dec!(100)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hectare_to_acre() {
        assert_eq!(to_acres(dec!(1), AreaUnit::Hectare), dec!(2.47105));
        assert_eq!(to_acres(dec!(3), AreaUnit::Acre), dec!(3));
    }

    #[test]
    fn test_acre_to_hectare() {
        assert_eq!(to_hectares(dec!(1), AreaUnit::Acre), dec!(0.404686));
        assert_eq!(to_hectares(dec!(2), AreaUnit::Hectare), dec!(2));
    }

    #[test]
    fn test_convert_area_identity() {
        assert_eq!(convert_area(dec!(7.5), AreaUnit::Acre, AreaUnit::Acre), dec!(7.5));
        assert_eq!(
            convert_area(dec!(2), AreaUnit::Hectare, AreaUnit::Acre),
            dec!(4.94210)
        );
    }

    #[test]
    fn test_volume_conversions() {
        assert_eq!(gallons_to_liters(dec!(100)), dec!(378.541));
        let back = liters_to_gallons(gallons_to_liters(dec!(20)));
        assert!((back - dec!(20)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_product_for_nutrient() {
        assert_eq!(product_for_nutrient(dec!(46), dec!(46)), Some(dec!(100)));
        assert_eq!(product_for_nutrient(dec!(60), dec!(60)), Some(dec!(100)));
        assert_eq!(product_for_nutrient(dec!(10), Decimal::ZERO), None);
    }

    #[test]
    fn test_quintal_conversions() {
        assert_eq!(quintals_to_kg(dec!(2.5)), dec!(250.0));
        assert_eq!(kg_to_quintals(dec!(250)), dec!(2.5));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Converting to acres and back returns the original value
        #[test]
        fn prop_area_round_trip(raw in 1u32..10_000_000u32, hectare in any::<bool>()) {
            let value = Decimal::new(raw as i64, 3);
            let unit = if hectare { AreaUnit::Hectare } else { AreaUnit::Acre };
            let back = from_acres(to_acres(value, unit), unit);
            prop_assert!((back - value).abs() < dec!(0.000000000001));
        }

        /// Larger areas never convert to smaller ones
        #[test]
        fn prop_conversion_is_monotonic(a in 1u32..1_000_000u32, b in 1u32..1_000_000u32) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = Decimal::from(lo);
            let hi = Decimal::from(hi);
            prop_assert!(to_acres(lo, AreaUnit::Hectare) <= to_acres(hi, AreaUnit::Hectare));
            prop_assert!(to_hectares(lo, AreaUnit::Acre) <= to_hectares(hi, AreaUnit::Acre));
        }
    }
}
