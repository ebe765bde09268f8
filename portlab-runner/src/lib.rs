//! PortLab Runner — simulation replay, parameter scanning, optimization.
//!
//! This crate builds on `portlab-core` to provide:
//! - Window replay of a predictor against aligned price series
//! - Mixed-radix parameter scanning over config grids
//! - Return-series scoring (annualized growth vs. max drawdown)
//! - Exhaustive grid search with optional parallel evaluation
//! - Randomized refinement of the grid winner
//! - TOML-loadable settings and a one-call driver

pub mod driver;
pub mod metrics;
pub mod optimizer;
pub mod scan;
pub mod settings;
pub mod sim;

pub use driver::run_grid_search;
pub use metrics::{annualized_growth, max_drawdown, GrowthDrawdownScorer, Scorer};
pub use optimizer::{Evaluation, Optimizer, RunFailure, SearchReport};
pub use scan::{CandidateFactory, ConfigScanner, ParamScanner};
pub use settings::{OptimizeSettings, SettingsError};
pub use sim::{SimError, SimulationOutcome, SimulationRunner, Simulator};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn simulator_is_send_sync() {
        assert_send::<Simulator>();
        assert_sync::<Simulator>();
    }

    #[test]
    fn outcome_is_send_sync() {
        assert_send::<SimulationOutcome>();
        assert_sync::<SimulationOutcome>();
    }

    #[test]
    fn evaluation_is_send_sync() {
        assert_send::<Evaluation>();
        assert_sync::<Evaluation>();
    }

    #[test]
    fn report_is_send_sync() {
        assert_send::<SearchReport>();
        assert_sync::<SearchReport>();
    }

    #[test]
    fn scorer_is_send_sync() {
        assert_send::<GrowthDrawdownScorer>();
        assert_sync::<GrowthDrawdownScorer>();
    }

    #[test]
    fn settings_are_send_sync() {
        assert_send::<OptimizeSettings>();
        assert_sync::<OptimizeSettings>();
    }
}
