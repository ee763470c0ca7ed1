//! Reference tables for the calculators
//!
//! Static agronomic data plus the configurable fertilizer product set. The
//! engines only read tables through [`ReferenceTables`], which callers build
//! once and pass in.

mod fertilizer;
mod pesticide;
mod profit;

pub use fertilizer::*;
pub use pesticide::{
    PesticideReference, DEFAULT_TANK_CAPACITY, FALLBACK_GALLONS_PER_ACRE, HIGH_SEVERITY_SCHEDULE,
    STANDARD_SCHEDULE,
};
pub use profit::*;

use thiserror::Error;

use crate::models::Nutrient;

pub mod advice {
    pub use super::fertilizer::GENERAL_ADVICE as FERTILIZER_ADVICE;
    pub use super::pesticide::{ENVIRONMENTAL_NOTE, GENERAL_ADVICE as PESTICIDE_ADVICE};
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Fertilizer product set is empty")]
    EmptyProductSet,

    #[error("Product {0} must contain between 1 and 100 percent of its nutrient")]
    InvalidContent(String),

    #[error("Product {0} must cost between 0 and 100000 per kg")]
    InvalidPrice(String),

    #[error("More than one product supplies {0}")]
    DuplicateNutrient(Nutrient),
}

/// All reference data an engine may consult
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTables {
    pub fertilizer: FertilizerReference,
    pub pesticide: PesticideReference,
    pub profit: ProfitReference,
}

impl ReferenceTables {
    pub fn with_fertilizer_products(products: Vec<FertilizerProduct>) -> Result<Self, ReferenceError> {
        Ok(Self {
            fertilizer: FertilizerReference::with_products(products)?,
            ..Self::default()
        })
    }
}
