//! Wizard state machine
//!
//! A calculator wizard walks through an ordered list of steps, each guarded by
//! a validation check, then submits exactly once:
//!
//! ```text
//! Editing(step 1) -> ... -> Editing(step N) -> Submitting -> Completed
//!        ^                                                      |
//!        +-------------------------- reset ---------------------+
//! ```
//!
//! The step list is recomputed from the draft, so the custom-crop sub-step
//! appears right after crop selection only when "other" is picked.

mod fertilizer;
mod pesticide;
mod profit;

pub use fertilizer::*;
pub use pesticide::*;
pub use profit::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CalculationInput, CalculationResult};
use crate::types::{Crop, CropChoice, CustomCrop, YieldUnit};
use crate::validation::{validate_custom_name, ValidationError, ValidationResult};

/// A calculator-specific draft driven by [`Wizard`]
pub trait WizardForm: Default + Clone + std::fmt::Debug {
    type Step: Copy + Eq + std::fmt::Debug;

    /// Ordered steps for the current draft
    fn steps(&self) -> Vec<Self::Step>;

    /// Guard for leaving `step`
    fn validate_step(&self, step: Self::Step) -> ValidationResult;

    /// Build the engine input; only called after every step validated
    fn finalize(&self) -> Result<CalculationInput, ValidationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState<S> {
    Editing(S),
    Submitting,
    Completed,
}

impl<S> WizardState<S> {
    pub fn name(&self) -> &'static str {
        match self {
            WizardState::Editing(_) => "editing",
            WizardState::Submitting => "submitting",
            WizardState::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Wizard<F: WizardForm> {
    form: F,
    state: WizardState<F::Step>,
    result: Option<CalculationResult>,
}

impl<F: WizardForm> Default for Wizard<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: WizardForm> Wizard<F> {
    pub fn new() -> Self {
        Self::with_form(F::default())
    }

    /// Start from a pre-filled draft
    pub fn with_form(form: F) -> Self {
        let first = form.steps()[0];
        Self {
            form,
            state: WizardState::Editing(first),
            result: None,
        }
    }

    pub fn state(&self) -> &WizardState<F::Step> {
        &self.state
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn result(&self) -> Option<&CalculationResult> {
        self.result.as_ref()
    }

    /// Mutable access to the draft, only while editing
    pub fn edit(&mut self) -> Result<&mut F, WizardError> {
        match self.state {
            WizardState::Editing(_) => Ok(&mut self.form),
            _ => Err(self.invalid("edit the form")),
        }
    }

    pub fn current_step(&self) -> Option<F::Step> {
        match self.state {
            WizardState::Editing(step) => Some(step),
            _ => None,
        }
    }

    /// One-based position of the current step and the number of steps
    pub fn position(&self) -> Option<(usize, usize)> {
        let step = self.current_step()?;
        let steps = self.form.steps();
        Some((self.index_of(step, &steps) + 1, steps.len()))
    }

    pub fn is_last_step(&self) -> bool {
        matches!(self.position(), Some((i, n)) if i == n)
    }

    /// Whether the current step's guard passes
    pub fn can_proceed(&self) -> bool {
        self.current_step()
            .map(|step| self.form.validate_step(step).is_ok())
            .unwrap_or(false)
    }

    /// Validate the current step and advance to the next one
    pub fn next(&mut self) -> Result<F::Step, WizardError> {
        let step = self
            .current_step()
            .ok_or_else(|| self.invalid("advance"))?;
        let steps = self.form.steps();
        let index = self.index_of(step, &steps);
        if index + 1 >= steps.len() {
            return Err(self.invalid("advance past the last step"));
        }
        self.form.validate_step(steps[index])?;

        let next = steps[index + 1];
        self.state = WizardState::Editing(next);
        Ok(next)
    }

    pub fn back(&mut self) -> Result<F::Step, WizardError> {
        let step = self.current_step().ok_or_else(|| self.invalid("go back"))?;
        let steps = self.form.steps();
        let index = self.index_of(step, &steps);
        if index == 0 {
            return Err(self.invalid("go back from the first step"));
        }
        let previous = steps[index - 1];
        self.state = WizardState::Editing(previous);
        Ok(previous)
    }

    /// Validate every step, finalize the input and enter `Submitting`
    ///
    /// Only allowed from the last step. On a failing guard the wizard moves
    /// to that step and stays editable.
    pub fn begin_submit(&mut self) -> Result<CalculationInput, WizardError> {
        if !self.is_last_step() {
            return Err(self.invalid("submit"));
        }
        for step in self.form.steps() {
            if let Err(err) = self.form.validate_step(step) {
                self.state = WizardState::Editing(step);
                return Err(err.into());
            }
        }
        let input = self.form.finalize()?;
        self.state = WizardState::Submitting;
        Ok(input)
    }

    /// Record the computed result and finish
    pub fn complete(&mut self, result: CalculationResult) -> Result<(), WizardError> {
        if self.state != WizardState::Submitting {
            return Err(self.invalid("complete"));
        }
        self.result = Some(result);
        self.state = WizardState::Completed;
        Ok(())
    }

    /// Return to the last step without a result
    pub fn abort_submit(&mut self) -> Result<(), WizardError> {
        if self.state != WizardState::Submitting {
            return Err(self.invalid("abort"));
        }
        let steps = self.form.steps();
        self.state = WizardState::Editing(steps[steps.len() - 1]);
        Ok(())
    }

    /// Start a new calculation with a cleared draft
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn index_of(&self, step: F::Step, steps: &[F::Step]) -> usize {
        // A sub-step that disappeared after an edit maps back to the start.
        steps.iter().position(|s| *s == step).unwrap_or(0)
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}

// ============================================================================
// Crop selection shared by every calculator
// ============================================================================

/// What the user picked on the crop step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropPick {
    Catalog(Crop),
    Other,
}

/// Crop step plus the optional custom-crop sub-form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropDraft {
    pub selection: Option<CropPick>,
    pub custom_name: String,
    pub custom_unit: Option<YieldUnit>,
}

impl CropDraft {
    pub fn needs_custom_step(&self) -> bool {
        self.selection == Some(CropPick::Other)
    }

    pub fn validate_selection(&self) -> ValidationResult {
        match self.selection {
            Some(_) => Ok(()),
            None => Err(ValidationError::new("crop", "Select a crop")),
        }
    }

    pub fn validate_custom(&self) -> ValidationResult {
        validate_custom_name(&self.custom_name)?;
        if self.custom_unit.is_none() {
            return Err(ValidationError::new("custom_crop_unit", "Select a unit for your crop"));
        }
        Ok(())
    }

    pub fn to_choice(&self) -> Result<CropChoice, ValidationError> {
        self.validate_selection()?;
        match self.selection {
            Some(CropPick::Catalog(crop)) => Ok(CropChoice::Catalog(crop)),
            _ => {
                self.validate_custom()?;
                Ok(CropChoice::Custom(CustomCrop {
                    name: self.custom_name.trim().to_string(),
                    unit: self.custom_unit.unwrap_or_default(),
                }))
            }
        }
    }
}
