//! Pesticide wizard steps and form
//!
//! Spray volume and tank capacity only apply when neither the method nor the
//! formulation is granular.

use rust_decimal::Decimal;

use super::{CropDraft, WizardForm};
use crate::models::{ApplicationMethod, CalculationInput, Formulation, Pest, PesticideInput, Severity};
use crate::types::{Area, AreaUnit};
use crate::validation::{
    validate_area_value, validate_gallons_per_acre, validate_tank_capacity, ValidationError,
    ValidationResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PesticideStep {
    CropAndPest,
    CustomCrop,
    PlotSize,
    /// Severity, application method and formulation
    Treatment,
    /// Optional spray volume and tank capacity
    SprayVolume,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PesticideForm {
    pub crop: CropDraft,
    pub pest: Option<Pest>,
    pub plot_size: Option<Decimal>,
    pub plot_unit: AreaUnit,
    pub severity: Option<Severity>,
    pub application_method: ApplicationMethod,
    pub formulation: Formulation,
    pub gallons_per_acre: Option<Decimal>,
    pub tank_capacity: Option<Decimal>,
}

impl Default for PesticideForm {
    fn default() -> Self {
        Self {
            crop: CropDraft::default(),
            pest: None,
            plot_size: None,
            plot_unit: AreaUnit::Hectare,
            severity: Some(Severity::Medium),
            application_method: ApplicationMethod::Foliar,
            formulation: Formulation::Liquid,
            gallons_per_acre: None,
            tank_capacity: None,
        }
    }
}

impl PesticideForm {
    /// Choose a method; granular broadcast also switches the formulation
    pub fn set_application_method(&mut self, method: ApplicationMethod) {
        self.application_method = method;
        if method == ApplicationMethod::Granular {
            self.formulation = Formulation::Granular;
        }
    }

    pub fn is_spray(&self) -> bool {
        self.application_method != ApplicationMethod::Granular
            && self.formulation != Formulation::Granular
    }
}

impl WizardForm for PesticideForm {
    type Step = PesticideStep;

    fn steps(&self) -> Vec<PesticideStep> {
        let mut steps = vec![PesticideStep::CropAndPest];
        if self.crop.needs_custom_step() {
            steps.push(PesticideStep::CustomCrop);
        }
        steps.extend([
            PesticideStep::PlotSize,
            PesticideStep::Treatment,
            PesticideStep::SprayVolume,
        ]);
        steps
    }

    fn validate_step(&self, step: PesticideStep) -> ValidationResult {
        match step {
            PesticideStep::CropAndPest => {
                self.crop.validate_selection()?;
                match self.pest {
                    Some(_) => Ok(()),
                    None => Err(ValidationError::new("pest", "Select the target pest")),
                }
            }
            PesticideStep::CustomCrop => self.crop.validate_custom(),
            PesticideStep::PlotSize => validate_area_value("plot_size", self.plot_size).map(|_| ()),
            PesticideStep::Treatment => match self.severity {
                Some(_) => Ok(()),
                None => Err(ValidationError::new("severity", "Select the infestation severity")),
            },
            PesticideStep::SprayVolume if !self.is_spray() => Ok(()),
            PesticideStep::SprayVolume => {
                validate_gallons_per_acre(self.gallons_per_acre)?;
                validate_tank_capacity(self.tank_capacity)
            }
        }
    }

    fn finalize(&self) -> Result<CalculationInput, ValidationError> {
        let plot = validate_area_value("plot_size", self.plot_size)?;
        let pest = self
            .pest
            .ok_or_else(|| ValidationError::new("pest", "Select the target pest"))?;
        let severity = self
            .severity
            .ok_or_else(|| ValidationError::new("severity", "Select the infestation severity"))?;

        let (gallons_per_acre, tank_capacity) = if self.is_spray() {
            (self.gallons_per_acre, self.tank_capacity)
        } else {
            (None, None)
        };

        Ok(CalculationInput::Pesticide(PesticideInput {
            crop: self.crop.to_choice()?,
            pest,
            plot: Area::new(plot, self.plot_unit),
            severity,
            application_method: self.application_method,
            formulation: if self.application_method == ApplicationMethod::Granular {
                Formulation::Granular
            } else {
                self.formulation
            },
            gallons_per_acre,
            tank_capacity,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Crop;
    use crate::wizard::{CropPick, Wizard, WizardState};
    use rust_decimal_macros::dec;

    #[test]
    fn test_pest_required_on_first_step() {
        let mut form = PesticideForm::default();
        form.crop.selection = Some(CropPick::Catalog(Crop::Rice));
        assert_eq!(
            form.validate_step(PesticideStep::CropAndPest).unwrap_err().field,
            "pest"
        );
        form.pest = Some(Pest::Aphids);
        assert!(form.validate_step(PesticideStep::CropAndPest).is_ok());
    }

    #[test]
    fn test_spray_step_ignores_values_for_granular() {
        let mut form = PesticideForm::default();
        form.gallons_per_acre = Some(dec!(-5));
        assert!(form.validate_step(PesticideStep::SprayVolume).is_err());

        form.set_application_method(ApplicationMethod::Granular);
        assert_eq!(form.formulation, Formulation::Granular);
        assert!(form.validate_step(PesticideStep::SprayVolume).is_ok());
    }

    #[test]
    fn test_full_run() {
        let mut wizard = Wizard::<PesticideForm>::new();
        {
            let form = wizard.edit().unwrap();
            form.crop.selection = Some(CropPick::Catalog(Crop::Rice));
            form.pest = Some(Pest::Aphids);
        }
        wizard.next().unwrap();
        wizard.edit().unwrap().plot_size = Some(dec!(1));
        wizard.next().unwrap();
        wizard.edit().unwrap().severity = Some(Severity::High);
        wizard.next().unwrap();
        wizard.edit().unwrap().tank_capacity = Some(dec!(0));
        assert!(wizard.begin_submit().is_err());
        assert_eq!(wizard.state(), &WizardState::Editing(PesticideStep::SprayVolume));

        wizard.edit().unwrap().tank_capacity = None;
        let CalculationInput::Pesticide(input) = wizard.begin_submit().unwrap() else {
            panic!("expected pesticide input");
        };
        assert_eq!(input.plot, Area::hectares(dec!(1)));
        assert_eq!(input.severity, Severity::High);
    }
}
