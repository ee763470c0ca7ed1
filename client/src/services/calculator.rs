//! Calculation service: validate, compute, then persist
//!
//! Computation is synchronous and always completes; only the history write
//! is asynchronous, and its failures come back inside [`SaveOutcome`].

use std::sync::Arc;

use serde::Serialize;
use shared::calculators::calculate_record;
use shared::reference::ReferenceTables;
use shared::validation::validate_input;
use shared::wizard::{Wizard, WizardForm};
use shared::{CalculationInput, CalculationRecord};
use tokio::task::JoinHandle;

use super::history::{HistoryService, SaveOutcome};
use crate::error::AppResult;

/// A computed calculation and what happened when saving it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationOutcome {
    pub record: CalculationRecord,
    pub save: SaveOutcome,
}

#[derive(Clone)]
pub struct CalculatorService {
    tables: Arc<ReferenceTables>,
    history: HistoryService,
}

impl CalculatorService {
    pub fn new(tables: Arc<ReferenceTables>, history: HistoryService) -> Self {
        Self { tables, history }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn history(&self) -> &HistoryService {
        &self.history
    }

    /// Validate and compute without saving
    pub fn compute(&self, input: CalculationInput) -> AppResult<CalculationRecord> {
        validate_input(&input)?;
        Ok(calculate_record(input, &self.tables))
    }

    pub async fn calculate_and_save(&self, input: CalculationInput) -> AppResult<CalculationOutcome> {
        let record = self.compute(input)?;
        let save = self.history.save(&record).await;
        Ok(CalculationOutcome { record, save })
    }

    /// Submit a wizard: compute, complete it, then wait for the save
    pub async fn submit<F: WizardForm>(&self, wizard: &mut Wizard<F>) -> AppResult<CalculationOutcome> {
        let record = self.compute_for(wizard)?;
        let save = self.history.save(&record).await;
        Ok(CalculationOutcome { record, save })
    }

    /// Submit a wizard and save in the background
    ///
    /// The wizard completes immediately. The save keeps running even if the
    /// returned handle is dropped.
    pub fn submit_detached<F: WizardForm>(
        &self,
        wizard: &mut Wizard<F>,
    ) -> AppResult<(CalculationRecord, JoinHandle<SaveOutcome>)> {
        let record = self.compute_for(wizard)?;
        let history = self.history.clone();
        let to_save = record.clone();
        let handle = tokio::spawn(async move { history.save(&to_save).await });
        Ok((record, handle))
    }

    fn compute_for<F: WizardForm>(&self, wizard: &mut Wizard<F>) -> AppResult<CalculationRecord> {
        let input = wizard.begin_submit()?;
        let record = match self.compute(input) {
            Ok(record) => record,
            Err(err) => {
                wizard.abort_submit()?;
                return Err(err);
            }
        };
        wizard.complete(record.result())?;
        Ok(record)
    }
}
