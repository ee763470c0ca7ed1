//! Profit wizard: crop, area, then input costs and market price

use rust_decimal::Decimal;

use super::{CropDraft, CropPick, WizardForm};
use crate::models::{CalculationInput, ProfitInput};
use crate::reference::ProfitReference;
use crate::types::{Area, AreaUnit};
use crate::validation::{
    validate_area_value, validate_input_cost, validate_market_price, validate_yield_override,
    ValidationError, ValidationResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfitStep {
    Crop,
    CustomCrop,
    Area,
    CostsAndPrices,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitForm {
    pub crop: CropDraft,
    pub area: Option<Decimal>,
    pub area_unit: AreaUnit,
    pub market_price: Option<Decimal>,
    pub input_cost: Option<Decimal>,
    /// Replace the reference yield of a catalog crop
    pub use_custom_yield: bool,
    pub custom_yield: Option<Decimal>,
}

impl Default for ProfitForm {
    fn default() -> Self {
        Self {
            crop: CropDraft::default(),
            area: None,
            area_unit: AreaUnit::Acre,
            market_price: None,
            input_cost: None,
            use_custom_yield: false,
            custom_yield: None,
        }
    }
}

impl ProfitForm {
    fn needs_yield(&self) -> bool {
        self.use_custom_yield || self.crop.needs_custom_step()
    }

    /// Indicative price to pre-fill for the selected catalog crop
    pub fn suggested_price(&self, reference: &ProfitReference) -> Option<Decimal> {
        match self.crop.selection {
            Some(CropPick::Catalog(crop)) => reference.economics(crop).map(|e| e.suggested_price),
            _ => None,
        }
    }
}

impl WizardForm for ProfitForm {
    type Step = ProfitStep;

    fn steps(&self) -> Vec<ProfitStep> {
        let mut steps = vec![ProfitStep::Crop];
        if self.crop.needs_custom_step() {
            steps.push(ProfitStep::CustomCrop);
        }
        steps.extend([ProfitStep::Area, ProfitStep::CostsAndPrices]);
        steps
    }

    fn validate_step(&self, step: ProfitStep) -> ValidationResult {
        match step {
            ProfitStep::Crop => self.crop.validate_selection(),
            ProfitStep::CustomCrop => self.crop.validate_custom(),
            ProfitStep::Area => validate_area_value("area", self.area).map(|_| ()),
            ProfitStep::CostsAndPrices => {
                validate_input_cost(self.input_cost)?;
                validate_market_price(self.market_price)?;
                if self.needs_yield() {
                    validate_yield_override(self.custom_yield, true)?;
                }
                Ok(())
            }
        }
    }

    fn finalize(&self) -> Result<CalculationInput, ValidationError> {
        let area = validate_area_value("area", self.area)?;
        let market_price = validate_market_price(self.market_price)?;
        let input_cost = validate_input_cost(self.input_cost)?;
        let yield_override = if self.needs_yield() {
            validate_yield_override(self.custom_yield, true)?
        } else {
            None
        };

        Ok(CalculationInput::Profit(ProfitInput {
            crop: self.crop.to_choice()?,
            area: Area::new(area, self.area_unit),
            market_price,
            input_cost,
            yield_override,
        }))
    }
}
