//! Adaptive predictor config.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{ensure_valid, jitter, BuildError, PredictorConfig, PERTURB_SIGMA};
use crate::domain::AssetUniverse;
use crate::strategy::{AdaptivePredictor, Predictor};

/// Learning rate floor applied after perturbation so a neighbor stays valid.
const MIN_LEARNING_RATE: f64 = 1e-3;

/// Learning rate for the multiplicative-weights predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    pub learning_rate: f64,
}

impl AdaptiveConfig {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl PredictorConfig for AdaptiveConfig {
    fn name(&self) -> &str {
        "adaptive"
    }

    fn is_valid(&self) -> bool {
        self.learning_rate.is_finite() && self.learning_rate > 0.0 && self.learning_rate <= 1.0
    }

    fn build(&self, universe: &AssetUniverse) -> Result<Box<dyn Predictor>, BuildError> {
        ensure_valid(self)?;
        if universe.is_empty() {
            return Err(BuildError::EmptyUniverse);
        }
        Ok(Box::new(AdaptivePredictor::new(
            universe.len(),
            self.learning_rate,
        )))
    }

    fn perturbed(&self, rng: &mut StdRng) -> Box<dyn PredictorConfig> {
        let jittered = jitter(self.learning_rate, PERTURB_SIGMA, rng);
        Box::new(AdaptiveConfig::new(jittered.clamp(MIN_LEARNING_RATE, 1.0)))
    }

    fn clone_box(&self) -> Box<dyn PredictorConfig> {
        Box::new(*self)
    }

    fn summary(&self) -> String {
        format!("adaptive(lr={:.4})", self.learning_rate)
    }
}
