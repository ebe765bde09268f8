//! Mixture config — a weighted blend of sub-configs.

use rand::rngs::StdRng;

use super::{ensure_valid, jitter, BuildError, PredictorConfig, PERTURB_SIGMA};
use crate::domain::AssetUniverse;
use crate::strategy::{MixturePredictor, Predictor, DISTRIBUTION_TOLERANCE};

/// Composite config pairing child configs with blend weights.
///
/// Weights must be a simplex (non-negative, summing to one) and every child
/// must itself be valid. Perturbation jitters the weight vector back onto the
/// simplex and perturbs each child recursively.
#[derive(Debug)]
pub struct MixtureConfig {
    pub components: Vec<Box<dyn PredictorConfig>>,
    pub weights: Vec<f64>,
}

impl MixtureConfig {
    pub fn new(components: Vec<Box<dyn PredictorConfig>>, weights: Vec<f64>) -> Self {
        Self {
            components,
            weights,
        }
    }

    /// Equal-weight blend of the given components.
    pub fn uniform(components: Vec<Box<dyn PredictorConfig>>) -> Self {
        let n = components.len().max(1);
        let weights = vec![1.0 / n as f64; components.len()];
        Self {
            components,
            weights,
        }
    }
}

impl Clone for MixtureConfig {
    fn clone(&self) -> Self {
        Self {
            components: self.components.iter().map(|c| c.clone_box()).collect(),
            weights: self.weights.clone(),
        }
    }
}

impl PredictorConfig for MixtureConfig {
    fn name(&self) -> &str {
        "mixture"
    }

    fn is_valid(&self) -> bool {
        if self.components.is_empty() || self.components.len() != self.weights.len() {
            return false;
        }
        if !self
            .weights
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
        {
            return false;
        }
        let total: f64 = self.weights.iter().sum();
        if (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return false;
        }
        self.components.iter().all(|c| c.is_valid())
    }

    fn build(&self, universe: &AssetUniverse) -> Result<Box<dyn Predictor>, BuildError> {
        ensure_valid(self)?;
        let children = self
            .components
            .iter()
            .map(|c| c.build(universe))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Box::new(MixturePredictor::new(
            children,
            self.weights.clone(),
        )))
    }

    fn perturbed(&self, rng: &mut StdRng) -> Box<dyn PredictorConfig> {
        let mut jittered: Vec<f64> = self
            .weights
            .iter()
            .map(|&w| jitter(w, PERTURB_SIGMA, rng).max(0.0))
            .collect();
        let total: f64 = jittered.iter().sum();
        if total > 0.0 {
            for w in &mut jittered {
                *w /= total;
            }
        } else {
            // All weights jittered to zero; fall back to an even split.
            jittered = vec![1.0 / self.weights.len() as f64; self.weights.len()];
        }
        let components = self
            .components
            .iter()
            .map(|c| c.perturbed(rng))
            .collect();
        Box::new(MixtureConfig::new(components, jittered))
    }

    fn clone_box(&self) -> Box<dyn PredictorConfig> {
        Box::new(self.clone())
    }

    fn summary(&self) -> String {
        let parts: Vec<String> = self
            .components
            .iter()
            .zip(&self.weights)
            .map(|(c, w)| format!("{:.2}*{}", w, c.summary()))
            .collect();
        format!("mixture[{}]", parts.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdaptiveConfig, HoldConfig, MomentumConfig};
    use rand::SeedableRng;

    fn two_way() -> MixtureConfig {
        MixtureConfig::new(
            vec![
                Box::new(HoldConfig::new("SPY")),
                Box::new(MomentumConfig::new(10, 50)),
            ],
            vec![0.6, 0.4],
        )
    }

    #[test]
    fn simplex_validation() {
        assert!(two_way().is_valid());

        let unbalanced = MixtureConfig::new(
            vec![
                Box::new(HoldConfig::new("SPY")),
                Box::new(HoldConfig::new("TLT")),
            ],
            vec![0.6, 0.6],
        );
        assert!(!unbalanced.is_valid());

        let negative = MixtureConfig::new(
            vec![
                Box::new(HoldConfig::new("SPY")),
                Box::new(HoldConfig::new("TLT")),
            ],
            vec![1.4, -0.4],
        );
        assert!(!negative.is_valid());

        let mismatched = MixtureConfig::new(vec![Box::new(HoldConfig::new("SPY"))], vec![0.5, 0.5]);
        assert!(!mismatched.is_valid());

        assert!(!MixtureConfig::new(vec![], vec![]).is_valid());
    }

    #[test]
    fn invalid_child_invalidates_the_mixture() {
        let config = MixtureConfig::new(
            vec![
                Box::new(HoldConfig::new("SPY")),
                Box::new(MomentumConfig::new(50, 10)),
            ],
            vec![0.5, 0.5],
        );
        assert!(!config.is_valid());
    }

    #[test]
    fn build_propagates_child_errors() {
        let universe = AssetUniverse::new(vec!["SPY".into()]);
        let config = MixtureConfig::new(
            vec![
                Box::new(HoldConfig::new("SPY")),
                Box::new(HoldConfig::new("GLD")),
            ],
            vec![0.5, 0.5],
        );
        assert_eq!(
            config.build(&universe).unwrap_err(),
            BuildError::UnknownAsset("GLD".into())
        );
    }

    #[test]
    fn builds_a_blended_predictor() {
        let universe = AssetUniverse::new(vec!["SPY".into(), "TLT".into()]);
        let predictor = two_way().build(&universe).unwrap();
        assert_eq!(predictor.name(), "mixture");
        assert!(!predictor.predicts_single_asset());
    }

    #[test]
    fn perturbed_weights_stay_on_the_simplex() {
        let config = MixtureConfig::new(
            vec![
                Box::new(AdaptiveConfig::new(0.1)),
                Box::new(HoldConfig::new("SPY")),
                Box::new(MomentumConfig::new(5, 20)),
            ],
            vec![0.2, 0.3, 0.5],
        );
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let neighbor = config.perturbed(&mut rng);
            assert!(neighbor.is_valid(), "neighbor: {}", neighbor.summary());
        }
    }

    #[test]
    fn uniform_constructor_splits_evenly() {
        let config = MixtureConfig::uniform(vec![
            Box::new(HoldConfig::new("SPY")),
            Box::new(HoldConfig::new("TLT")),
        ]);
        assert_eq!(config.weights, vec![0.5, 0.5]);
        assert!(config.is_valid());
    }

    #[test]
    fn summary_lists_components() {
        assert_eq!(
            two_way().summary(),
            "mixture[0.60*hold(SPY) + 0.40*momentum(10/50)]"
        );
    }
}
