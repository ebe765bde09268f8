//! Predictor abstraction — decision functions over asset histories.
//!
//! A predictor maps a set of aligned price series to either one chosen asset
//! or a probability distribution over assets. Predictors are deterministic
//! given identical input series and call order; that determinism is what
//! makes grid-search comparisons reproducible.
//!
//! Lookahead discipline: `select_distribution(series, index)` may only read
//! data from `series[..][0..=index]`.

pub mod adaptive;
pub mod hold;
pub mod mixture;
pub mod momentum;

pub use adaptive::AdaptivePredictor;
pub use hold::HoldPredictor;
pub use mixture::MixturePredictor;
pub use momentum::MomentumPredictor;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::PriceSeries;

/// Tolerance for distribution normalization checks.
pub const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// Non-negative weights over the asset universe, summing to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution(Vec<f64>);

impl Distribution {
    /// Equal weight on every asset.
    pub fn uniform(len: usize) -> Self {
        Distribution(vec![1.0 / len as f64; len])
    }

    /// Full weight on a single asset.
    pub fn one_hot(len: usize, index: usize) -> Self {
        let mut weights = vec![0.0; len];
        weights[index] = 1.0;
        Distribution(weights)
    }

    /// Clamp negatives to zero and renormalize. A zero or non-finite sum
    /// falls back to uniform so the simplex invariant always holds.
    pub fn from_weights(mut weights: Vec<f64>) -> Self {
        for w in &mut weights {
            if !w.is_finite() || *w < 0.0 {
                *w = 0.0;
            }
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Self::uniform(weights.len());
        }
        for w in &mut weights {
            *w /= sum;
        }
        Distribution(weights)
    }

    pub fn weights(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the largest weight; ties break toward the lowest index.
    pub fn arg_max(&self) -> usize {
        let mut best = 0;
        for (i, &w) in self.0.iter().enumerate().skip(1) {
            if w > self.0[best] {
                best = i;
            }
        }
        best
    }

    /// True when every entry is non-negative and the sum is 1 within tolerance.
    pub fn is_normalized(&self) -> bool {
        if self.0.iter().any(|&w| w < 0.0 || !w.is_finite()) {
            return false;
        }
        let sum: f64 = self.0.iter().sum();
        (sum - 1.0).abs() <= DISTRIBUTION_TOLERANCE
    }
}

/// Observed outcome delivered to a predictor after each simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feedback {
    pub time: NaiveDate,
    /// Index of the asset that actually performed best over the step.
    pub best_asset: usize,
    /// Realized step return of that asset.
    pub observed_return: f64,
}

/// Feedback delivered out of chronological order — caller misuse, fail fast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("feedback at {time} does not advance past previous feedback at {last}")]
    OutOfOrder { time: NaiveDate, last: NaiveDate },
}

/// Monotonic guard against replaying feedback.
///
/// Non-replay-safe predictors require strictly increasing times; replay-safe
/// ones tolerate repeats at the same instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackClock {
    last: Option<NaiveDate>,
}

impl FeedbackClock {
    pub fn observe(&mut self, time: NaiveDate, allows_replay: bool) -> Result<(), FeedbackError> {
        if let Some(last) = self.last {
            let in_order = if allows_replay { time >= last } else { time > last };
            if !in_order {
                return Err(FeedbackError::OutOfOrder { time, last });
            }
        }
        self.last = Some(time);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.last
    }
}

/// A stateful decision function over the asset universe.
pub trait Predictor: std::fmt::Debug + Send {
    fn name(&self) -> &str;

    /// Whether this predictor chooses one asset (vs. a full distribution).
    fn predicts_single_asset(&self) -> bool;

    /// Stateless predictors may be queried repeatedly at the same instant.
    fn allows_replay(&self) -> bool {
        false
    }

    /// Distribution over assets given history up to and including `index`.
    ///
    /// Single-asset predictors return a one-hot distribution.
    fn select_distribution(&self, series: &[PriceSeries], index: usize) -> Distribution;

    /// Chosen asset index. Default: arg-max of the distribution, ties broken
    /// by lowest index.
    fn select_asset(&self, series: &[PriceSeries], index: usize) -> usize {
        self.select_distribution(series, index).arg_max()
    }

    /// Incorporate an observed outcome. Stateless predictors still enforce
    /// the feedback clock.
    fn feedback(&mut self, feedback: Feedback) -> Result<(), FeedbackError>;

    /// Restore initial state, cascading depth-first through owned
    /// sub-predictors. Lets the optimizer reuse one instance across runs.
    fn reset(&mut self);
}
