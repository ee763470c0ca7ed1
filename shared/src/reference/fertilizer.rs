//! Fertilizer reference data: nutrient baselines, stage and soil factors,
//! and the commercial product set

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::ReferenceError;
use crate::models::{GrowthStage, Nutrient, SoilType};
use crate::types::{AreaUnit, Crop};

/// Share of the seasonal requirement applied at each growth stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageFactors {
    pub planting: Decimal,
    pub vegetative: Decimal,
    pub flowering: Decimal,
}

impl StageFactors {
    const fn new(planting: Decimal, vegetative: Decimal, flowering: Decimal) -> Self {
        Self {
            planting,
            vegetative,
            flowering,
        }
    }

    pub fn get(&self, stage: GrowthStage) -> Decimal {
        match stage {
            GrowthStage::Planting => self.planting,
            GrowthStage::Vegetative => self.vegetative,
            GrowthStage::Flowering => self.flowering,
        }
    }
}

const CEREAL_STAGES: StageFactors = StageFactors::new(dec!(0.3), dec!(0.5), dec!(0.2));
const LATE_FEEDER_STAGES: StageFactors = StageFactors::new(dec!(0.2), dec!(0.5), dec!(0.3));
const PADDY_STAGES: StageFactors = StageFactors::new(dec!(0.4), dec!(0.4), dec!(0.2));

/// Seasonal N/P/K requirement of a crop per unit of the table basis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropNutrientProfile {
    pub nitrogen: Decimal,
    pub phosphorus: Decimal,
    pub potassium: Decimal,
    pub stages: StageFactors,
}

impl CropNutrientProfile {
    const fn new(n: Decimal, p: Decimal, k: Decimal, stages: StageFactors) -> Self {
        Self {
            nitrogen: n,
            phosphorus: p,
            potassium: k,
            stages,
        }
    }

    pub fn get(&self, nutrient: Nutrient) -> Decimal {
        match nutrient {
            Nutrient::Nitrogen => self.nitrogen,
            Nutrient::Phosphorus => self.phosphorus,
            Nutrient::Potassium => self.potassium,
        }
    }
}

/// Baseline for custom crops and catalog crops without a profile
pub const DEFAULT_PROFILE: CropNutrientProfile =
    CropNutrientProfile::new(dec!(100), dec!(60), dec!(80), CEREAL_STAGES);

/// Multiplier applied to the nutrient the grower chose to emphasise
pub const NUTRIENT_FOCUS_FACTOR: Decimal = dec!(1.1);

pub const GENERAL_ADVICE: &str = "Apply fertilizers when soil has adequate moisture. \
Split nitrogen applications to reduce losses. Incorporate phosphorus fertilizers into the soil. \
Avoid applying fertilizers before heavy rain to prevent runoff.";

/// Per-nutrient multipliers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutrientFactors {
    pub nitrogen: Decimal,
    pub phosphorus: Decimal,
    pub potassium: Decimal,
}

impl NutrientFactors {
    pub fn get(&self, nutrient: Nutrient) -> Decimal {
        match nutrient {
            Nutrient::Nitrogen => self.nitrogen,
            Nutrient::Phosphorus => self.phosphorus,
            Nutrient::Potassium => self.potassium,
        }
    }
}

const MIN_CONTENT_PERCENT: Decimal = dec!(1);
const MAX_PRICE_PER_KG: Decimal = dec!(100000);

/// A commercial fertilizer supplying one primary nutrient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerProduct {
    pub name: String,
    pub nutrient: Nutrient,
    /// Nutrient content by weight, percent
    pub content_percent: Decimal,
    /// Price per kilogram in the display currency
    pub price_per_kg: Decimal,
    #[serde(default)]
    pub application: String,
}

/// Fertilizer tables plus the configurable product set
#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerReference {
    products: Vec<FertilizerProduct>,
}

impl FertilizerReference {
    /// Build with a custom product set
    ///
    /// A product set may name each nutrient at most once and every content
    /// percentage must lie in [1, 100] and every price in [0, 100000].
    pub fn with_products(products: Vec<FertilizerProduct>) -> Result<Self, ReferenceError> {
        if products.is_empty() {
            return Err(ReferenceError::EmptyProductSet);
        }
        for (i, product) in products.iter().enumerate() {
            if product.content_percent < MIN_CONTENT_PERCENT || product.content_percent > dec!(100) {
                return Err(ReferenceError::InvalidContent(product.name.clone()));
            }
            if product.price_per_kg < Decimal::ZERO || product.price_per_kg > MAX_PRICE_PER_KG {
                return Err(ReferenceError::InvalidPrice(product.name.clone()));
            }
            if products[..i].iter().any(|p| p.nutrient == product.nutrient) {
                return Err(ReferenceError::DuplicateNutrient(product.nutrient));
            }
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[FertilizerProduct] {
        &self.products
    }

    /// Area unit the nutrient baselines are expressed per
    pub fn basis(&self) -> AreaUnit {
        AreaUnit::Acre
    }

    /// Nutrient profile of a catalog crop
    pub fn profile(&self, crop: Crop) -> Option<CropNutrientProfile> {
        let entry = |n, p, k, stages| Some(CropNutrientProfile::new(n, p, k, stages));
        match crop {
            Crop::Wheat => entry(dec!(120), dec!(60), dec!(40), CEREAL_STAGES),
            Crop::Rice => entry(dec!(100), dec!(50), dec!(50), PADDY_STAGES),
            Crop::Maize => entry(dec!(140), dec!(70), dec!(60), CEREAL_STAGES),
            Crop::Tomato => entry(dec!(150), dec!(80), dec!(100), LATE_FEEDER_STAGES),
            Crop::Potato => entry(dec!(100), dec!(50), dec!(80), CEREAL_STAGES),
            Crop::Cotton => entry(dec!(120), dec!(60), dec!(80), LATE_FEEDER_STAGES),
            Crop::Sugarcane => entry(dec!(200), dec!(100), dec!(120), CEREAL_STAGES),
            Crop::Soybean => entry(dec!(80), dec!(60), dec!(70), CEREAL_STAGES),
            Crop::Chickpea => entry(dec!(60), dec!(40), dec!(50), CEREAL_STAGES),
            Crop::Onion => entry(dec!(120), dec!(80), dec!(100), CEREAL_STAGES),
            Crop::Garlic => entry(dec!(100), dec!(70), dec!(80), CEREAL_STAGES),
            Crop::Banana => entry(dec!(180), dec!(120), dec!(150), LATE_FEEDER_STAGES),
            Crop::Mango => entry(dec!(150), dec!(100), dec!(120), LATE_FEEDER_STAGES),
            Crop::Coconut => entry(dec!(130), dec!(80), dec!(140), LATE_FEEDER_STAGES),
            Crop::Chili => entry(dec!(130), dec!(90), dec!(110), LATE_FEEDER_STAGES),
            Crop::Cabbage => entry(dec!(120), dec!(80), dec!(90), CEREAL_STAGES),
            Crop::Cauliflower => entry(dec!(140), dec!(100), dec!(110), CEREAL_STAGES),
            Crop::Okra => entry(dec!(110), dec!(70), dec!(90), LATE_FEEDER_STAGES),
            Crop::Coffee | Crop::Apple | Crop::Grapes | Crop::Citrus | Crop::Vegetables => None,
        }
    }

    pub fn soil_factors(&self, soil: SoilType) -> NutrientFactors {
        match soil {
            SoilType::Sandy => NutrientFactors {
                nitrogen: dec!(1.2),
                phosphorus: dec!(1.1),
                potassium: dec!(1.0),
            },
            SoilType::Loamy => NutrientFactors {
                nitrogen: dec!(1.0),
                phosphorus: dec!(1.0),
                potassium: dec!(1.0),
            },
            SoilType::Clay => NutrientFactors {
                nitrogen: dec!(0.9),
                phosphorus: dec!(1.1),
                potassium: dec!(1.0),
            },
        }
    }

    /// Catalog crops with a nutrient profile
    pub fn crops(&self) -> Vec<Crop> {
        Crop::ALL
            .into_iter()
            .filter(|c| self.profile(*c).is_some())
            .collect()
    }
}

impl Default for FertilizerReference {
    fn default() -> Self {
        Self {
            products: default_products(),
        }
    }
}

pub fn default_products() -> Vec<FertilizerProduct> {
    vec![
        FertilizerProduct {
            name: "Urea".to_string(),
            nutrient: Nutrient::Nitrogen,
            content_percent: dec!(46),
            price_per_kg: dec!(25),
            application: "Apply 50% at planting and 50% during vegetative growth".to_string(),
        },
        FertilizerProduct {
            name: "DAP".to_string(),
            nutrient: Nutrient::Phosphorus,
            content_percent: dec!(46),
            price_per_kg: dec!(35),
            application: "Apply 100% at planting or early growth stage".to_string(),
        },
        FertilizerProduct {
            name: "MOP".to_string(),
            nutrient: Nutrient::Potassium,
            content_percent: dec!(60),
            price_per_kg: dec!(30),
            application: "Apply 50% at planting and 50% before flowering".to_string(),
        },
    ]
}
