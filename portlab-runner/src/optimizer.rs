//! Grid-search optimization over predictor configs.
//!
//! The optimizer drains a `ConfigScanner`, evaluates every candidate
//! (build, run, score) with no pruning, and reports the best error-free
//! score. A failed candidate is recorded rather than propagated: its row
//! carries the error text and the worst possible score, and it can never
//! win. Parallel evaluation preserves candidate order, so the best pick is
//! identical to the sequential one.

use rayon::prelude::*;
use thiserror::Error;

use portlab_core::config::{BuildError, PredictorConfig};
use portlab_core::domain::AssetUniverse;
use portlab_core::rng::SeedHierarchy;

use crate::metrics::Scorer;
use crate::scan::ConfigScanner;
use crate::sim::{SimError, SimulationRunner};

/// Why a single candidate's evaluation failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunFailure {
    #[error("build failed: {0}")]
    Build(#[from] BuildError),
    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
}

/// One scored candidate.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Position in evaluation order; the tie-break key for `best`.
    pub candidate: usize,
    pub config: Box<dyn PredictorConfig>,
    pub score: f64,
    /// Present iff the run failed; such rows never win.
    pub error: Option<String>,
}

impl Evaluation {
    pub fn summary(&self) -> String {
        self.config.summary()
    }

    /// Content hash of the config summary, for cross-run row identity.
    pub fn fingerprint(&self) -> String {
        blake3::hash(self.config.summary().as_bytes())
            .to_hex()
            .to_string()
    }

    fn json_row(&self) -> serde_json::Value {
        let score = if self.error.is_some() {
            serde_json::Value::Null
        } else {
            self.score.into()
        };
        serde_json::json!({
            "candidate": self.candidate,
            "config": self.summary(),
            "fingerprint": self.fingerprint(),
            "score": score,
            "error": self.error,
        })
    }
}

/// Every evaluation from one search, plus the winner's index.
#[derive(Debug, Clone)]
pub struct SearchReport {
    evaluations: Vec<Evaluation>,
    best: Option<usize>,
}

impl SearchReport {
    /// Renumber the rows and pick the best: highest score among error-free
    /// rows, ties broken by the earliest candidate.
    pub fn new(mut evaluations: Vec<Evaluation>) -> Self {
        for (position, row) in evaluations.iter_mut().enumerate() {
            row.candidate = position;
        }
        let mut best: Option<usize> = None;
        for row in &evaluations {
            if row.error.is_some() {
                continue;
            }
            match best {
                Some(current) if evaluations[current].score >= row.score => {}
                _ => best = Some(row.candidate),
            }
        }
        Self { evaluations, best }
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    pub fn best(&self) -> Option<usize> {
        self.best
    }

    pub fn best_evaluation(&self) -> Option<&Evaluation> {
        self.best.map(|i| &self.evaluations[i])
    }

    /// One JSON object per evaluation row.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let rows: Vec<serde_json::Value> =
            self.evaluations.iter().map(Evaluation::json_row).collect();
        serde_json::to_string_pretty(&rows)
    }
}

/// Exhaustive grid search with an optional randomized refinement phase.
pub struct Optimizer {
    runner: Box<dyn SimulationRunner>,
    scorer: Box<dyn Scorer>,
    universe: AssetUniverse,
    parallel: bool,
}

impl Optimizer {
    pub fn new(
        runner: Box<dyn SimulationRunner>,
        scorer: Box<dyn Scorer>,
        universe: AssetUniverse,
    ) -> Self {
        Self {
            runner,
            scorer,
            universe,
            parallel: true,
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Evaluate every valid combination the scanner yields.
    pub fn search(&self, scanner: &mut ConfigScanner) -> SearchReport {
        let mut candidates = Vec::new();
        while let Some(config) = scanner.next_valid() {
            candidates.push(config);
        }

        let evaluations: Vec<Evaluation> = if self.parallel {
            candidates
                .into_par_iter()
                .enumerate()
                .map(|(index, config)| self.evaluate(index, config))
                .collect()
        } else {
            candidates
                .into_iter()
                .enumerate()
                .map(|(index, config)| self.evaluate(index, config))
                .collect()
        };

        SearchReport::new(evaluations)
    }

    /// Randomized local search around `start`: each round perturbs the
    /// incumbent with a round-specific RNG and keeps the neighbor only if
    /// it scores strictly better. Invalid neighbors are discarded unscored.
    pub fn refine(
        &self,
        start: Box<dyn PredictorConfig>,
        rounds: usize,
        seeds: &SeedHierarchy,
    ) -> SearchReport {
        let mut evaluations = vec![self.evaluate(0, start.clone())];
        let mut incumbent = start;
        let mut incumbent_score = if evaluations[0].error.is_none() {
            evaluations[0].score
        } else {
            f64::NEG_INFINITY
        };

        for round in 0..rounds {
            let mut rng = seeds.rng_for("refine", round as u64);
            let neighbor = incumbent.perturbed(&mut rng);
            if !neighbor.is_valid() {
                continue;
            }
            let row = self.evaluate(evaluations.len(), neighbor.clone());
            if row.error.is_none() && row.score > incumbent_score {
                incumbent_score = row.score;
                incumbent = neighbor;
            }
            evaluations.push(row);
        }

        SearchReport::new(evaluations)
    }

    fn evaluate(&self, candidate: usize, config: Box<dyn PredictorConfig>) -> Evaluation {
        match self.try_run(&*config) {
            Ok(score) => Evaluation {
                candidate,
                config,
                score,
                error: None,
            },
            Err(failure) => Evaluation {
                candidate,
                config,
                score: f64::NEG_INFINITY,
                error: Some(failure.to_string()),
            },
        }
    }

    fn try_run(&self, config: &dyn PredictorConfig) -> Result<f64, RunFailure> {
        let mut predictor = config.build(&self.universe)?;
        let outcome = self.runner.run(&mut *predictor)?;
        Ok(self.scorer.score(&outcome.returns))
    }
}
