//! Config abstraction — immutable, validated predictor descriptors.
//!
//! A config is the searchable/perturbable unit of the optimizer: it can
//! check its own feasibility, instantiate a predictor against an asset
//! universe, and produce a Gaussian-jittered neighbor for randomized local
//! search. Randomness is threaded in explicitly so perturbation is
//! reproducible and parallel-safe.

pub mod adaptive;
pub mod hold;
pub mod mixture;
pub mod momentum;

pub use adaptive::AdaptiveConfig;
pub use hold::HoldConfig;
pub use mixture::MixtureConfig;
pub use momentum::MomentumConfig;

use rand::rngs::StdRng;
use rand_distr::{Distribution as _, Normal};
use std::fmt;
use thiserror::Error;

use crate::domain::AssetUniverse;
use crate::strategy::Predictor;

/// Standard deviation of the Gaussian jitter applied by `perturbed()`.
pub const PERTURB_SIGMA: f64 = 0.05;

/// Errors from `build()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("asset '{0}' is not in the universe")]
    UnknownAsset(String),
    #[error("universe is empty")]
    EmptyUniverse,
    #[error("config failed validation: {0}")]
    Invalid(String),
}

/// Immutable parameter bundle that can instantiate a predictor.
pub trait PredictorConfig: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Pure feasibility predicate over this config's own fields; must not
    /// consult external state. Used by the scanner to discard infeasible
    /// grid points and after perturbation to discard infeasible neighbors.
    fn is_valid(&self) -> bool;

    /// Pure factory. Fails on an invalid config or on asset names absent
    /// from the universe; the scanner never presents an invalid config here.
    fn build(&self, universe: &AssetUniverse) -> Result<Box<dyn Predictor>, BuildError>;

    /// A neighbor with Gaussian-jittered continuous parameters, renormalized
    /// to satisfy this config's invariants. Purely discrete configs return
    /// an unchanged copy.
    fn perturbed(&self, rng: &mut StdRng) -> Box<dyn PredictorConfig>;

    fn clone_box(&self) -> Box<dyn PredictorConfig>;

    /// Stable one-line description used in reports and fingerprints.
    fn summary(&self) -> String;
}

impl Clone for Box<dyn PredictorConfig> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Add zero-mean Gaussian noise with deviation `sigma`.
pub(crate) fn jitter(value: f64, sigma: f64, rng: &mut StdRng) -> f64 {
    // Normal::new only fails for a non-finite or negative sigma; callers
    // pass the fixed PERTURB_SIGMA constant.
    let normal = Normal::new(0.0, sigma).expect("jitter sigma must be positive");
    value + normal.sample(rng)
}

/// Shared guard for `build()`: reject invalid configs up front.
pub(crate) fn ensure_valid(config: &dyn PredictorConfig) -> Result<(), BuildError> {
    if config.is_valid() {
        Ok(())
    } else {
        Err(BuildError::Invalid(config.summary()))
    }
}
