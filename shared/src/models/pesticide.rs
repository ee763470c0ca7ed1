//! Pesticide application models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Area, CropChoice};

/// Target pest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Pest {
    Aphids,
    Caterpillars,
    Whiteflies,
    Mites,
    Thrips,
    Fruitflies,
    Beetles,
    Leafhoppers,
    Stinkbugs,
    Borers,
}

impl Pest {
    pub const ALL: [Pest; 10] = [
        Pest::Aphids,
        Pest::Caterpillars,
        Pest::Whiteflies,
        Pest::Mites,
        Pest::Thrips,
        Pest::Fruitflies,
        Pest::Beetles,
        Pest::Leafhoppers,
        Pest::Stinkbugs,
        Pest::Borers,
    ];

    /// Column of this pest in the crop rate table
    pub fn index(&self) -> usize {
        match self {
            Pest::Aphids => 0,
            Pest::Caterpillars => 1,
            Pest::Whiteflies => 2,
            Pest::Mites => 3,
            Pest::Thrips => 4,
            Pest::Fruitflies => 5,
            Pest::Beetles => 6,
            Pest::Leafhoppers => 7,
            Pest::Stinkbugs => 8,
            Pest::Borers => 9,
        }
    }
}

impl std::fmt::Display for Pest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Pest::Aphids => "Aphids",
            Pest::Caterpillars => "Caterpillars",
            Pest::Whiteflies => "Whiteflies",
            Pest::Mites => "Spider Mites",
            Pest::Thrips => "Thrips",
            Pest::Fruitflies => "Fruit Flies",
            Pest::Beetles => "Beetles",
            Pest::Leafhoppers => "Leafhoppers",
            Pest::Stinkbugs => "Stink Bugs",
            Pest::Borers => "Borers",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationMethod {
    #[default]
    Foliar,
    Soil,
    Granular,
    Drip,
}

impl std::fmt::Display for ApplicationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationMethod::Foliar => write!(f, "Foliar Spray"),
            ApplicationMethod::Soil => write!(f, "Soil Application"),
            ApplicationMethod::Granular => write!(f, "Granular Broadcast"),
            ApplicationMethod::Drip => write!(f, "Drip Irrigation"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Formulation {
    #[default]
    Liquid,
    Granular,
}

impl Formulation {
    pub fn quantity_unit(&self) -> QuantityUnit {
        match self {
            Formulation::Liquid => QuantityUnit::Liters,
            Formulation::Granular => QuantityUnit::Kilograms,
        }
    }
}

/// Unit a pesticide quantity is measured in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuantityUnit {
    #[serde(rename = "L")]
    Liters,
    #[serde(rename = "kg")]
    Kilograms,
}

impl std::fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantityUnit::Liters => write!(f, "L"),
            QuantityUnit::Kilograms => write!(f, "kg"),
        }
    }
}

/// Inputs of a pesticide calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PesticideInput {
    pub crop: CropChoice,
    pub pest: Pest,
    pub plot: Area,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub application_method: ApplicationMethod,
    #[serde(default)]
    pub formulation: Formulation,
    /// Spray volume override, gallons per acre
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallons_per_acre: Option<Decimal>,
    /// Sprayer tank capacity override, gallons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tank_capacity: Option<Decimal>,
}

impl PesticideInput {
    /// Granular broadcast can only carry a granular formulation
    pub fn effective_formulation(&self) -> Formulation {
        if self.application_method == ApplicationMethod::Granular {
            Formulation::Granular
        } else {
            self.formulation
        }
    }
}

/// Where the base rate came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    CropPestTable,
    FormulationDefault,
}

/// Spray mixing plan for liquid formulations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SprayPlan {
    pub gallons_per_acre: Decimal,
    pub spray_volume_gal: Decimal,
    pub tank_capacity_gal: Decimal,
    pub tanks_needed: u32,
    pub pesticide_per_tank: Decimal,
}

/// Computed pesticide application plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PesticideResult {
    pub crop_name: String,
    pub pest: Pest,
    pub severity: Severity,
    pub application_method: ApplicationMethod,
    pub formulation: Formulation,
    pub recommended_product: String,
    pub base_rate: Decimal,
    pub rate_source: RateSource,
    pub adjusted_rate: Decimal,
    pub plot_size_ha: Decimal,
    pub plot_size_acres: Decimal,
    pub total_pesticide: Decimal,
    pub unit: QuantityUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spray: Option<SprayPlan>,
    pub schedule: String,
    pub environmental_note: String,
    pub general_advice: String,
}
