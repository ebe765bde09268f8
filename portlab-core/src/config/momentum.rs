//! Momentum config.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{ensure_valid, BuildError, PredictorConfig};
use crate::domain::AssetUniverse;
use crate::strategy::{MomentumPredictor, Predictor};

/// Window pair for the momentum predictor. Valid iff `0 < short < long`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumConfig {
    pub short_window: usize,
    pub long_window: usize,
}

impl MomentumConfig {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl PredictorConfig for MomentumConfig {
    fn name(&self) -> &str {
        "momentum"
    }

    fn is_valid(&self) -> bool {
        self.short_window > 0 && self.short_window < self.long_window
    }

    fn build(&self, universe: &AssetUniverse) -> Result<Box<dyn Predictor>, BuildError> {
        ensure_valid(self)?;
        if universe.is_empty() {
            return Err(BuildError::EmptyUniverse);
        }
        Ok(Box::new(MomentumPredictor::new(
            self.short_window,
            self.long_window,
        )))
    }

    /// Windows are discrete grid parameters; perturbation is identity.
    fn perturbed(&self, _rng: &mut StdRng) -> Box<dyn PredictorConfig> {
        Box::new(*self)
    }

    fn clone_box(&self) -> Box<dyn PredictorConfig> {
        Box::new(*self)
    }

    fn summary(&self) -> String {
        format!("momentum({}/{})", self.short_window, self.long_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_ordering_validation() {
        assert!(MomentumConfig::new(10, 50).is_valid());
        assert!(!MomentumConfig::new(50, 50).is_valid());
        assert!(!MomentumConfig::new(60, 50).is_valid());
        assert!(!MomentumConfig::new(0, 50).is_valid());
    }

    #[test]
    fn invalid_config_fails_build() {
        let universe = AssetUniverse::new(vec!["SPY".into()]);
        let err = MomentumConfig::new(50, 20).build(&universe).unwrap_err();
        assert_eq!(err, BuildError::Invalid("momentum(50/20)".into()));
    }

    #[test]
    fn empty_universe_fails_build() {
        let universe = AssetUniverse::new(vec![]);
        assert_eq!(
            MomentumConfig::new(10, 50).build(&universe).unwrap_err(),
            BuildError::EmptyUniverse
        );
    }

    #[test]
    fn builds_a_momentum_predictor() {
        let universe = AssetUniverse::new(vec!["SPY".into(), "TLT".into()]);
        let predictor = MomentumConfig::new(10, 50).build(&universe).unwrap();
        assert_eq!(predictor.name(), "momentum");
    }
}
