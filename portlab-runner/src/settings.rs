//! Serializable optimization settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(String),
    #[error("start date {start} is not before end date {end}")]
    InvalidDates { start: NaiveDate, end: NaiveDate },
    #[error("initial deposit must be positive, got {0}")]
    NonPositiveDeposit(f64),
    #[error("drawdown weight must be non-negative, got {0}")]
    NegativeDrawdownWeight(f64),
}

/// Everything needed to reproduce a grid search, TOML-loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeSettings {
    /// Simulation window, inclusive on both ends.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Cash deposited into each run's account.
    pub initial_deposit: f64,

    /// Drawdown penalty passed to the scorer.
    pub drawdown_weight: f64,

    /// Evaluate candidates on the rayon pool.
    pub parallel: bool,

    /// Perturbation rounds applied to the grid winner; 0 disables refinement.
    pub refine_rounds: usize,

    /// Master seed for the refinement RNG hierarchy.
    pub seed: u64,
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            initial_deposit: 100_000.0,
            drawdown_weight: 1.0,
            parallel: true,
            refine_rounds: 0,
            seed: 42,
        }
    }
}

impl OptimizeSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            toml::from_str(text).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.start_date >= self.end_date {
            return Err(SettingsError::InvalidDates {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !(self.initial_deposit > 0.0) {
            return Err(SettingsError::NonPositiveDeposit(self.initial_deposit));
        }
        if !(self.drawdown_weight >= 0.0) {
            return Err(SettingsError::NegativeDrawdownWeight(self.drawdown_weight));
        }
        Ok(())
    }
}
