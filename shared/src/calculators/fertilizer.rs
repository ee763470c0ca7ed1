//! Fertilizer requirement strategy

use rust_decimal::Decimal;

use super::round_whole;
use crate::models::{
    FertilizerInput, FertilizerResult, Nutrient, NutrientTotals, ProductRecommendation,
};
use crate::reference::{
    advice::FERTILIZER_ADVICE, FertilizerReference, DEFAULT_PROFILE, NUTRIENT_FOCUS_FACTOR,
};
use crate::units;

/// Compute the N/P/K requirement and the product plan for a field
///
/// Nutrient totals are rounded to whole kilograms before they are converted
/// into product quantities, which are rounded in turn.
pub fn calculate(input: &FertilizerInput, reference: &FertilizerReference) -> FertilizerResult {
    let profile = input
        .crop
        .catalog()
        .and_then(|crop| reference.profile(crop))
        .unwrap_or(DEFAULT_PROFILE);

    let area = input.area.in_unit(reference.basis());
    let stage_factor = profile.stages.get(input.growth_stage);
    let soil = reference.soil_factors(input.soil_type);

    let requirement = |nutrient: Nutrient| {
        let mut kg = profile.get(nutrient) * stage_factor * soil.get(nutrient) * area;
        if input.nutrient_focus == Some(nutrient) {
            kg *= NUTRIENT_FOCUS_FACTOR;
        }
        round_whole(kg)
    };

    let nutrients = NutrientTotals::new(
        requirement(Nutrient::Nitrogen),
        requirement(Nutrient::Phosphorus),
        requirement(Nutrient::Potassium),
    );

    let mut unrounded_cost = Decimal::ZERO;
    let products = reference
        .products()
        .iter()
        .map(|product| {
            let amount_kg = units::product_for_nutrient(
                nutrients.get(product.nutrient),
                product.content_percent,
            )
            .map(round_whole)
            .unwrap_or(Decimal::ZERO);
            let cost = amount_kg * product.price_per_kg;
            unrounded_cost += cost;

            ProductRecommendation {
                name: product.name.clone(),
                nutrient: product.nutrient,
                amount_kg,
                cost: round_whole(cost),
                application: product.application.clone(),
            }
        })
        .collect();

    FertilizerResult {
        crop_name: input.crop.display_name(),
        growth_stage: input.growth_stage,
        soil_type: input.soil_type,
        nutrients,
        products,
        total_cost: round_whole(unrounded_cost),
        advice: FERTILIZER_ADVICE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GrowthStage, SoilType};
    use crate::reference::{default_products, FertilizerProduct};
    use crate::types::{Area, Crop, CropChoice, YieldUnit};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn input(crop: CropChoice, area: Area, stage: GrowthStage) -> FertilizerInput {
        FertilizerInput {
            crop,
            area,
            growth_stage: stage,
            soil_type: SoilType::Loamy,
            nutrient_focus: None,
        }
    }

    fn amount_of(result: &FertilizerResult, name: &str) -> Decimal {
        result
            .products
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.amount_kg)
            .unwrap()
    }

    /// Wheat on 2 acres at flowering: per-acre baseline x 0.2 x 2
    #[test]
    fn test_wheat_two_acres_flowering() {
        let result = calculate(
            &input(Crop::Wheat.into(), Area::acres(dec!(2)), GrowthStage::Flowering),
            &FertilizerReference::default(),
        );

        assert_eq!(result.nutrients, NutrientTotals::new(dec!(48), dec!(24), dec!(16)));
        assert_eq!(amount_of(&result, "Urea"), dec!(104));
        assert_eq!(amount_of(&result, "DAP"), dec!(52));
        assert_eq!(amount_of(&result, "MOP"), dec!(27));
        assert_eq!(result.total_cost, dec!(5230));
        assert_eq!(result.crop_name, "Wheat");
    }

    #[test]
    fn test_hectares_are_converted_to_table_basis() {
        let reference = FertilizerReference::default();
        let by_hectare = calculate(
            &input(Crop::Rice.into(), Area::hectares(dec!(1)), GrowthStage::Planting),
            &reference,
        );
        let by_acre = calculate(
            &input(Crop::Rice.into(), Area::acres(dec!(2.47105)), GrowthStage::Planting),
            &reference,
        );
        assert_eq!(by_hectare.nutrients, by_acre.nutrients);
        // 100 kg N x 0.4 x 2.47105 acres
        assert_eq!(by_hectare.nutrients.nitrogen, dec!(99));
    }

    #[test]
    fn test_soil_and_focus_adjustments() {
        let mut sandy = input(Crop::Maize.into(), Area::acres(dec!(1)), GrowthStage::Vegetative);
        sandy.soil_type = SoilType::Sandy;
        sandy.nutrient_focus = Some(Nutrient::Potassium);
        let result = calculate(&sandy, &FertilizerReference::default());

        // N: 140 x 0.5 x 1.2 = 84, P: 70 x 0.5 x 1.1 = 38.5, K: 60 x 0.5 x 1.1 = 33
        assert_eq!(result.nutrients, NutrientTotals::new(dec!(84), dec!(39), dec!(33)));
    }

    #[test]
    fn test_custom_crop_uses_default_profile() {
        let custom = input(
            CropChoice::custom("Quinoa", YieldUnit::Kg),
            Area::acres(dec!(1)),
            GrowthStage::Vegetative,
        );
        let result = calculate(&custom, &FertilizerReference::default());
        assert_eq!(result.nutrients, NutrientTotals::new(dec!(50), dec!(30), dec!(40)));
        assert_eq!(result.crop_name, "Quinoa");
    }

    #[test]
    fn test_catalog_crop_without_profile_falls_back() {
        let coffee = input(Crop::Coffee.into(), Area::acres(dec!(1)), GrowthStage::Vegetative);
        let result = calculate(&coffee, &FertilizerReference::default());
        assert_eq!(result.nutrients, NutrientTotals::new(dec!(50), dec!(30), dec!(40)));
    }

    #[test]
    fn test_alternate_product_set() {
        let mut products = default_products();
        products[0] = FertilizerProduct {
            name: "CAN".to_string(),
            nutrient: Nutrient::Nitrogen,
            content_percent: dec!(25),
            price_per_kg: dec!(20),
            application: String::new(),
        };
        let reference = FertilizerReference::with_products(products).unwrap();
        let result = calculate(
            &input(Crop::Wheat.into(), Area::acres(dec!(2)), GrowthStage::Flowering),
            &reference,
        );
        // 48 kg N at 25% content
        assert_eq!(amount_of(&result, "CAN"), dec!(192));
        assert_eq!(result.products.len(), 3);
    }

    #[test]
    fn test_identical_inputs_identical_results() {
        let reference = FertilizerReference::default();
        let i = input(Crop::Banana.into(), Area::hectares(dec!(3.3)), GrowthStage::Flowering);
        assert_eq!(calculate(&i, &reference), calculate(&i, &reference));
    }

    fn stage_strategy() -> impl Strategy<Value = GrowthStage> {
        prop_oneof![
            Just(GrowthStage::Planting),
            Just(GrowthStage::Vegetative),
            Just(GrowthStage::Flowering),
        ]
    }

    fn soil_strategy() -> impl Strategy<Value = SoilType> {
        prop_oneof![Just(SoilType::Sandy), Just(SoilType::Loamy), Just(SoilType::Clay)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Adding at least one acre strictly increases every nutrient
        #[test]
        fn prop_nutrients_increase_with_area(
            crop_idx in 0usize..18,
            base in 1u32..500u32,
            extra in 1u32..500u32,
            stage in stage_strategy(),
            soil in soil_strategy(),
        ) {
            let reference = FertilizerReference::default();
            let crop = reference.crops()[crop_idx];
            let mut small = input(crop.into(), Area::acres(Decimal::from(base)), stage);
            small.soil_type = soil;
            let mut large = small.clone();
            large.area = Area::acres(Decimal::from(base + extra));

            let a = calculate(&small, &reference).nutrients;
            let b = calculate(&large, &reference).nutrients;
            prop_assert!(b.nitrogen > a.nitrogen);
            prop_assert!(b.phosphorus > a.phosphorus);
            prop_assert!(b.potassium > a.potassium);
        }

        /// Cost never decreases as area grows
        #[test]
        fn prop_cost_non_decreasing(base in 1u32..1000u32, extra in 0u32..1000u32) {
            let reference = FertilizerReference::default();
            let small = input(Crop::Tomato.into(), Area::acres(Decimal::new(base as i64, 1)), GrowthStage::Vegetative);
            let mut large = small.clone();
            large.area = Area::acres(Decimal::new((base + extra) as i64, 1));
            prop_assert!(calculate(&large, &reference).total_cost >= calculate(&small, &reference).total_cost);
        }
    }
}
