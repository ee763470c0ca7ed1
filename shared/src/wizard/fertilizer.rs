//! Fertilizer wizard: crop, area and growth stage, then soil and nutrient focus

use rust_decimal::Decimal;

use super::{CropDraft, WizardForm};
use crate::models::{CalculationInput, FertilizerInput, GrowthStage, Nutrient, SoilType};
use crate::types::{Area, AreaUnit};
use crate::validation::{validate_area_value, ValidationError, ValidationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FertilizerStep {
    Crop,
    CustomCrop,
    Area,
    GrowthStage,
    /// Soil type and nutrient focus, both with defaults
    Review,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerForm {
    pub crop: CropDraft,
    pub area: Option<Decimal>,
    pub area_unit: AreaUnit,
    pub growth_stage: Option<GrowthStage>,
    pub soil_type: SoilType,
    pub nutrient_focus: Option<Nutrient>,
}

impl Default for FertilizerForm {
    fn default() -> Self {
        Self {
            crop: CropDraft::default(),
            area: None,
            area_unit: AreaUnit::Acre,
            growth_stage: None,
            soil_type: SoilType::Loamy,
            nutrient_focus: None,
        }
    }
}

impl WizardForm for FertilizerForm {
    type Step = FertilizerStep;

    fn steps(&self) -> Vec<FertilizerStep> {
        let mut steps = vec![FertilizerStep::Crop];
        if self.crop.needs_custom_step() {
            steps.push(FertilizerStep::CustomCrop);
        }
        steps.extend([
            FertilizerStep::Area,
            FertilizerStep::GrowthStage,
            FertilizerStep::Review,
        ]);
        steps
    }

    fn validate_step(&self, step: FertilizerStep) -> ValidationResult {
        match step {
            FertilizerStep::Crop => self.crop.validate_selection(),
            FertilizerStep::CustomCrop => self.crop.validate_custom(),
            FertilizerStep::Area => validate_area_value("area", self.area).map(|_| ()),
            FertilizerStep::GrowthStage => match self.growth_stage {
                Some(_) => Ok(()),
                None => Err(ValidationError::new("growth_stage", "Select a growth stage")),
            },
            FertilizerStep::Review => Ok(()),
        }
    }

    fn finalize(&self) -> Result<CalculationInput, ValidationError> {
        let area = validate_area_value("area", self.area)?;
        let growth_stage = self
            .growth_stage
            .ok_or_else(|| ValidationError::new("growth_stage", "Select a growth stage"))?;

        Ok(CalculationInput::Fertilizer(FertilizerInput {
            crop: self.crop.to_choice()?,
            area: Area::new(area, self.area_unit),
            growth_stage,
            soil_type: self.soil_type,
            nutrient_focus: self.nutrient_focus,
        }))
    }
}
