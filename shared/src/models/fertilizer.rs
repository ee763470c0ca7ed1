//! Fertilizer plan models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Area, CropChoice};

/// Growth stage the plan targets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Planting,
    #[serde(alias = "growing")]
    Vegetative,
    Flowering,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 3] = [
        GrowthStage::Planting,
        GrowthStage::Vegetative,
        GrowthStage::Flowering,
    ];
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrowthStage::Planting => write!(f, "Planting/Early"),
            GrowthStage::Vegetative => write!(f, "Growing/Vegetative"),
            GrowthStage::Flowering => write!(f, "Flowering/Fruiting"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SoilType {
    Sandy,
    #[default]
    Loamy,
    Clay,
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilType::Sandy => write!(f, "Sandy"),
            SoilType::Loamy => write!(f, "Loamy"),
            SoilType::Clay => write!(f, "Clay"),
        }
    }
}

/// Primary nutrient
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    #[serde(alias = "N")]
    Nitrogen,
    #[serde(alias = "P")]
    Phosphorus,
    #[serde(alias = "K")]
    Potassium,
}

impl Nutrient {
    pub const ALL: [Nutrient; 3] = [Nutrient::Nitrogen, Nutrient::Phosphorus, Nutrient::Potassium];

    pub fn symbol(&self) -> &'static str {
        match self {
            Nutrient::Nitrogen => "N",
            Nutrient::Phosphorus => "P",
            Nutrient::Potassium => "K",
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Nutrient::Nitrogen => write!(f, "Nitrogen"),
            Nutrient::Phosphorus => write!(f, "Phosphorus"),
            Nutrient::Potassium => write!(f, "Potassium"),
        }
    }
}

/// Inputs of a fertilizer calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerInput {
    pub crop: CropChoice,
    pub area: Area,
    pub growth_stage: GrowthStage,
    #[serde(default)]
    pub soil_type: SoilType,
    /// Nutrient the grower wants to emphasise (+10%)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrient_focus: Option<Nutrient>,
}

/// Total nutrient requirement in kilograms
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NutrientTotals {
    pub nitrogen: Decimal,
    pub phosphorus: Decimal,
    pub potassium: Decimal,
}

impl NutrientTotals {
    pub fn new(nitrogen: Decimal, phosphorus: Decimal, potassium: Decimal) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
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

/// Quantity of one commercial product in the plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecommendation {
    pub name: String,
    pub nutrient: Nutrient,
    pub amount_kg: Decimal,
    pub cost: Decimal,
    pub application: String,
}

/// Computed fertilizer plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerResult {
    pub crop_name: String,
    pub growth_stage: GrowthStage,
    pub soil_type: SoilType,
    pub nutrients: NutrientTotals,
    pub products: Vec<ProductRecommendation>,
    pub total_cost: Decimal,
    pub advice: String,
}
