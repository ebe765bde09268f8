//! Buy-and-hold config.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::{ensure_valid, BuildError, PredictorConfig};
use crate::domain::AssetUniverse;
use crate::strategy::{HoldPredictor, Predictor};

/// Hold one named asset for the whole simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldConfig {
    pub asset: String,
}

impl HoldConfig {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
        }
    }
}

impl PredictorConfig for HoldConfig {
    fn name(&self) -> &str {
        "hold"
    }

    fn is_valid(&self) -> bool {
        !self.asset.is_empty()
    }

    fn build(&self, universe: &AssetUniverse) -> Result<Box<dyn Predictor>, BuildError> {
        ensure_valid(self)?;
        let index = universe
            .index_of(&self.asset)
            .ok_or_else(|| BuildError::UnknownAsset(self.asset.clone()))?;
        Ok(Box::new(HoldPredictor::new(index)))
    }

    /// Purely discrete; perturbation is identity.
    fn perturbed(&self, _rng: &mut StdRng) -> Box<dyn PredictorConfig> {
        Box::new(self.clone())
    }

    fn clone_box(&self) -> Box<dyn PredictorConfig> {
        Box::new(self.clone())
    }

    fn summary(&self) -> String {
        format!("hold({})", self.asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn builds_against_the_universe() {
        let universe = AssetUniverse::new(vec!["SPY".into(), "TLT".into()]);
        let predictor = HoldConfig::new("TLT").build(&universe).unwrap();
        assert_eq!(predictor.name(), "hold");
        assert!(predictor.predicts_single_asset());
    }

    #[test]
    fn unknown_asset_fails_build() {
        let universe = AssetUniverse::new(vec!["SPY".into()]);
        assert_eq!(
            HoldConfig::new("GLD").build(&universe).unwrap_err(),
            BuildError::UnknownAsset("GLD".into())
        );
    }

    #[test]
    fn empty_asset_is_invalid() {
        let config = HoldConfig::new("");
        assert!(!config.is_valid());
        let universe = AssetUniverse::new(vec!["SPY".into()]);
        assert!(matches!(
            config.build(&universe),
            Err(BuildError::Invalid(_))
        ));
    }

    #[test]
    fn perturbation_is_identity() {
        let config = HoldConfig::new("SPY");
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(config.perturbed(&mut rng).summary(), config.summary());
    }
}
