//! Pesticide reference data

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{ApplicationMethod, Formulation, Pest, Severity};
use crate::types::{AreaUnit, Crop};

/// Fallback spray volume when no method default applies, gallons per acre
pub const FALLBACK_GALLONS_PER_ACRE: Decimal = dec!(20);

/// Default sprayer tank capacity, gallons
pub const DEFAULT_TANK_CAPACITY: Decimal = dec!(100);

pub const HIGH_SEVERITY_SCHEDULE: &str = "Apply half immediately and the remaining half after 5-7 days. \
Monitor regularly for pest resurgence.";

pub const STANDARD_SCHEDULE: &str =
    "Apply at first signs of infestation. If needed, reapply after 10-14 days.";

pub const ENVIRONMENTAL_NOTE: &str = "Be mindful of weather conditions when applying pesticides. \
Apply during calm weather to prevent drift. Avoid application before rain to prevent runoff into water bodies. \
Consider the impact on beneficial insects and follow local environmental guidelines.";

pub const GENERAL_ADVICE: &str = "For most effective results, ensure thorough coverage of the plant surfaces. \
Apply pesticides early in the morning or late afternoon to avoid peak sun hours. \
Follow recommended water volume to ensure proper dilution and coverage.";

// Columns follow `Pest::index`. A zero means no registered rate.
type RateRow = [Decimal; 10];

const RICE: RateRow = [dec!(0.75), dec!(1.0), dec!(0.5), dec!(0.8), dec!(0.6), dec!(0.9), dec!(1.2), dec!(0.7), dec!(0.8), dec!(1.5)];
const WHEAT: RateRow = [dec!(0.6), dec!(0.9), dec!(0.5), dec!(0.7), dec!(0.5), dec!(0), dec!(1.0), dec!(0.6), dec!(0.7), dec!(1.2)];
const MAIZE: RateRow = [dec!(0.8), dec!(1.2), dec!(0.6), dec!(0.7), dec!(0.7), dec!(0), dec!(1.3), dec!(0.8), dec!(0.9), dec!(1.8)];
const TOMATO: RateRow = [dec!(0.7), dec!(1.5), dec!(0.8), dec!(1.0), dec!(0.9), dec!(1.2), dec!(1.1), dec!(0.8), dec!(1.0), dec!(1.3)];
const POTATO: RateRow = [dec!(0.6), dec!(1.3), dec!(0.7), dec!(1.1), dec!(0.8), dec!(0), dec!(1.5), dec!(0.7), dec!(0.9), dec!(1.2)];
const COTTON: RateRow = [dec!(0.9), dec!(1.6), dec!(1.0), dec!(1.2), dec!(0.9), dec!(0), dec!(1.3), dec!(0.8), dec!(1.1), dec!(1.5)];
const SOYBEAN: RateRow = [dec!(0.7), dec!(1.1), dec!(0.6), dec!(0.9), dec!(0.7), dec!(0), dec!(1.2), dec!(0.7), dec!(1.0), dec!(1.3)];
const COFFEE: RateRow = [dec!(0.8), dec!(1.3), dec!(0.8), dec!(1.0), dec!(0.9), dec!(1.1), dec!(1.1), dec!(0.8), dec!(0.9), dec!(1.6)];
const APPLE: RateRow = [dec!(0.8), dec!(1.4), dec!(0.7), dec!(1.2), dec!(0.8), dec!(1.3), dec!(1.1), dec!(0.8), dec!(0.9), dec!(1.4)];
const GRAPES: RateRow = [dec!(0.7), dec!(1.3), dec!(0.8), dec!(1.1), dec!(0.9), dec!(1.2), dec!(1.0), dec!(0.8), dec!(0.8), dec!(1.3)];
const CITRUS: RateRow = [dec!(0.8), dec!(1.5), dec!(0.9), dec!(1.3), dec!(0.9), dec!(1.4), dec!(1.2), dec!(0.9), dec!(1.0), dec!(1.5)];
const VEGETABLES: RateRow = [dec!(0.7), dec!(1.4), dec!(0.8), dec!(1.0), dec!(0.8), dec!(1.1), dec!(1.2), dec!(0.8), dec!(1.0), dec!(1.3)];

/// Pesticide dose tables and factors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PesticideReference;

impl PesticideReference {
    /// Area unit the dose table is expressed per
    pub fn dose_basis(&self) -> AreaUnit {
        AreaUnit::Hectare
    }

    /// Area unit spray volumes are expressed per
    pub fn spray_basis(&self) -> AreaUnit {
        AreaUnit::Acre
    }

    fn rate_row(&self, crop: Crop) -> Option<&'static RateRow> {
        match crop {
            Crop::Rice => Some(&RICE),
            Crop::Wheat => Some(&WHEAT),
            Crop::Maize => Some(&MAIZE),
            Crop::Tomato => Some(&TOMATO),
            Crop::Potato => Some(&POTATO),
            Crop::Cotton => Some(&COTTON),
            Crop::Soybean => Some(&SOYBEAN),
            Crop::Coffee => Some(&COFFEE),
            Crop::Apple => Some(&APPLE),
            Crop::Grapes => Some(&GRAPES),
            Crop::Citrus => Some(&CITRUS),
            Crop::Vegetables => Some(&VEGETABLES),
            _ => None,
        }
    }

    /// Registered base rate per hectare for a crop and pest
    pub fn base_rate(&self, crop: Crop, pest: Pest) -> Option<Decimal> {
        self.rate_row(crop)
            .map(|row| row[pest.index()])
            .filter(|rate| !rate.is_zero())
    }

    /// Rate used when the table has no entry
    pub fn default_rate(&self, formulation: Formulation) -> Decimal {
        match formulation {
            Formulation::Liquid => dec!(0.8),
            Formulation::Granular => dec!(1.2),
        }
    }

    pub fn severity_factor(&self, severity: Severity) -> Decimal {
        match severity {
            Severity::Low => dec!(0.8),
            Severity::Medium => dec!(1.0),
            Severity::High => dec!(1.2),
        }
    }

    pub fn method_factor(&self, method: ApplicationMethod) -> Decimal {
        match method {
            ApplicationMethod::Foliar => dec!(1.0),
            ApplicationMethod::Soil => dec!(0.9),
            ApplicationMethod::Granular => dec!(1.2),
            ApplicationMethod::Drip => dec!(0.8),
        }
    }

    /// Default spray volume for a method, gallons per acre
    pub fn default_gallons_per_acre(&self, method: ApplicationMethod) -> Decimal {
        match method {
            ApplicationMethod::Foliar => dec!(20),
            ApplicationMethod::Soil => dec!(15),
            ApplicationMethod::Granular => Decimal::ZERO,
            ApplicationMethod::Drip => dec!(10),
        }
    }

    pub fn recommended_product(&self, pest: Pest) -> &'static str {
        match pest {
            Pest::Aphids => "Imidacloprid",
            Pest::Caterpillars => "Bacillus thuringiensis (Bt)",
            Pest::Whiteflies => "Pyrethroids",
            Pest::Mites => "Abamectin",
            Pest::Thrips => "Spinosad",
            Pest::Fruitflies => "Malathion",
            Pest::Beetles => "Carbaryl",
            Pest::Leafhoppers => "Neonicotinoid",
            Pest::Stinkbugs => "Bifenthrin",
            Pest::Borers => "Chlorpyrifos",
        }
    }

    pub fn schedule(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::High => HIGH_SEVERITY_SCHEDULE,
            Severity::Low | Severity::Medium => STANDARD_SCHEDULE,
        }
    }

    /// Catalog crops with a dose table
    pub fn crops(&self) -> Vec<Crop> {
        Crop::ALL
            .into_iter()
            .filter(|c| self.rate_row(*c).is_some())
            .collect()
    }
}
