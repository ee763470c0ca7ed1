//! Profit estimate strategy

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{round_dp, round_whole};
use crate::models::{ProfitInput, ProfitResult};
use crate::reference::{ProfitReference, FALLBACK_YIELD_PER_ACRE};
use crate::types::{CropChoice, YieldUnit};

pub fn calculate(input: &ProfitInput, reference: &ProfitReference) -> ProfitResult {
    let acres = input.area.in_unit(reference.basis());
    let economics = input.crop.catalog().and_then(|crop| reference.economics(crop));

    let yield_per_acre = match input.yield_override {
        Some(value) => value.max(Decimal::ZERO),
        None => economics
            .map(|e| e.yield_per_acre)
            .unwrap_or(FALLBACK_YIELD_PER_ACRE),
    };
    let yield_unit = match &input.crop {
        CropChoice::Custom(custom) => custom.unit,
        CropChoice::Catalog(_) => economics.map(|e| e.unit).unwrap_or(YieldUnit::Quintal),
    };

    let total_yield = round_whole(yield_per_acre * acres);
    let input_cost = round_whole(input.input_cost);
    let revenue = round_whole(total_yield * input.market_price);
    let profit = revenue - input_cost;

    let profit_per_acre = if acres > Decimal::ZERO {
        round_whole(profit / acres)
    } else {
        Decimal::ZERO
    };
    let profit_margin = if revenue.is_zero() {
        None
    } else {
        Some(round_dp(profit / revenue * dec!(100), 1))
    };
    let break_even_price = if total_yield.is_zero() {
        None
    } else {
        Some(round_whole(input_cost / total_yield))
    };

    ProfitResult {
        crop_name: input.crop.display_name(),
        yield_unit,
        area_acres: acres,
        yield_per_acre,
        total_yield,
        market_price: input.market_price,
        input_cost,
        revenue,
        profit,
        profit_per_acre,
        profit_margin,
        break_even_price,
        is_profit: profit > Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Area, Crop};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn wheat(area: Area, price: Decimal, cost: Decimal) -> ProfitInput {
        ProfitInput {
            crop: Crop::Wheat.into(),
            area,
            market_price: price,
            input_cost: cost,
            yield_override: None,
        }
    }

    /// Wheat on 5 acres at 2200 per quintal with 50000 input cost
    #[test]
    fn test_wheat_five_acres() {
        let result = calculate(
            &wheat(Area::acres(dec!(5)), dec!(2200), dec!(50000)),
            &ProfitReference,
        );

        assert_eq!(result.total_yield, dec!(100));
        assert_eq!(result.revenue, dec!(220000));
        assert_eq!(result.profit, dec!(170000));
        assert!(result.is_profit);
        assert_eq!(result.profit_margin, Some(dec!(77.3)));
        assert_eq!(result.break_even_price, Some(dec!(500)));
        assert_eq!(result.profit_per_acre, dec!(34000));
        assert_eq!(result.yield_unit, YieldUnit::Quintal);
    }

    #[test]
    fn test_loss_is_reported() {
        let result = calculate(
            &wheat(Area::acres(dec!(1)), dec!(1000), dec!(30000)),
            &ProfitReference,
        );
        assert_eq!(result.profit, dec!(-10000));
        assert!(!result.is_profit);
        assert_eq!(result.profit_margin, Some(dec!(-50.0)));
    }

    #[test]
    fn test_hectares_normalized_to_acres() {
        let result = calculate(
            &wheat(Area::hectares(dec!(2)), dec!(2200), dec!(0)),
            &ProfitReference,
        );
        // 20 q/acre x 4.9421 acres
        assert_eq!(result.total_yield, dec!(99));
        assert_eq!(result.area_acres, dec!(4.94210));
    }

    #[test]
    fn test_custom_crop_uses_override_and_unit() {
        let input = ProfitInput {
            crop: CropChoice::custom("Saffron", YieldUnit::Kg),
            area: Area::acres(dec!(2)),
            market_price: dec!(150),
            input_cost: dec!(10000),
            yield_override: Some(dec!(40)),
        };
        let result = calculate(&input, &ProfitReference);
        assert_eq!(result.total_yield, dec!(80));
        assert_eq!(result.yield_unit, YieldUnit::Kg);
        assert_eq!(result.revenue, dec!(12000));
        assert_eq!(result.crop_name, "Saffron");
    }

    #[test]
    fn test_zero_price_gives_null_margin() {
        let result = calculate(
            &wheat(Area::acres(dec!(3)), Decimal::ZERO, dec!(5000)),
            &ProfitReference,
        );
        assert_eq!(result.revenue, Decimal::ZERO);
        assert_eq!(result.profit_margin, None);
        assert!(result.break_even_price.is_some());
    }

    #[test]
    fn test_zero_yield_gives_null_break_even() {
        let mut input = wheat(Area::acres(dec!(3)), dec!(2000), dec!(5000));
        input.yield_override = Some(Decimal::ZERO);
        let result = calculate(&input, &ProfitReference);
        assert_eq!(result.total_yield, Decimal::ZERO);
        assert_eq!(result.break_even_price, None);
        assert_eq!(result.profit_margin, None);
    }

    #[test]
    fn test_catalog_crop_without_reference_uses_fallback_yield() {
        let mut input = wheat(Area::acres(dec!(1)), dec!(100), Decimal::ZERO);
        input.crop = Crop::Cotton.into();
        let result = calculate(&input, &ProfitReference);
        assert_eq!(result.yield_per_acre, FALLBACK_YIELD_PER_ACRE);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Margin is undefined whenever revenue is zero, for any cost
        #[test]
        fn prop_zero_revenue_margin_is_none(cost in 0u64..10_000_000u64, area in 1u32..10_000u32) {
            let result = calculate(
                &wheat(Area::acres(Decimal::from(area)), Decimal::ZERO, Decimal::from(cost)),
                &ProfitReference,
            );
            prop_assert!(result.profit_margin.is_none());
            prop_assert_eq!(result.profit, -Decimal::from(cost));
        }

        /// is_profit agrees with the sign of profit
        #[test]
        fn prop_is_profit_matches_sign(price in 0u32..5000u32, cost in 0u64..1_000_000u64) {
            let result = calculate(
                &wheat(Area::acres(dec!(5)), Decimal::from(price), Decimal::from(cost)),
                &ProfitReference,
            );
            prop_assert_eq!(result.is_profit, result.profit > Decimal::ZERO);
            prop_assert_eq!(result.profit, result.revenue - result.input_cost);
        }
    }
}
