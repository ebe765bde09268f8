//! Buy-and-hold: always pick the same asset.

use super::{Distribution, Feedback, FeedbackClock, FeedbackError, Predictor};
use crate::domain::PriceSeries;

/// Stateless single-asset predictor. The baseline every other predictor is
/// measured against.
#[derive(Debug, Clone)]
pub struct HoldPredictor {
    asset_index: usize,
    clock: FeedbackClock,
}

impl HoldPredictor {
    pub fn new(asset_index: usize) -> Self {
        Self {
            asset_index,
            clock: FeedbackClock::default(),
        }
    }

    pub fn asset_index(&self) -> usize {
        self.asset_index
    }
}

impl Predictor for HoldPredictor {
    fn name(&self) -> &str {
        "hold"
    }

    fn predicts_single_asset(&self) -> bool {
        true
    }

    fn allows_replay(&self) -> bool {
        true
    }

    fn select_distribution(&self, series: &[PriceSeries], _index: usize) -> Distribution {
        Distribution::one_hot(series.len(), self.asset_index)
    }

    fn select_asset(&self, _series: &[PriceSeries], _index: usize) -> usize {
        self.asset_index
    }

    fn feedback(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        self.clock.observe(feedback.time, self.allows_replay())
    }

    fn reset(&mut self) {
        self.clock.reset();
    }
}
