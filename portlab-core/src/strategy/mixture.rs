//! Mixture predictor — a weighted blend of sub-predictor distributions.

use super::{Distribution, Feedback, FeedbackClock, FeedbackError, Predictor};
use crate::domain::PriceSeries;

/// Composite predictor owning a list of children and their blend weights.
///
/// The published distribution is the weight-averaged child distribution,
/// renormalized. Reset cascades depth-first; feedback is forwarded to every
/// child after this predictor's own clock check.
#[derive(Debug)]
pub struct MixturePredictor {
    children: Vec<Box<dyn Predictor>>,
    weights: Vec<f64>,
    clock: FeedbackClock,
}

impl MixturePredictor {
    /// `children` and `weights` must have equal, nonzero length; weights are
    /// normalized on construction.
    pub fn new(children: Vec<Box<dyn Predictor>>, weights: Vec<f64>) -> Self {
        debug_assert_eq!(children.len(), weights.len());
        let normalized = Distribution::from_weights(weights).weights().to_vec();
        Self {
            children,
            weights: normalized,
            clock: FeedbackClock::default(),
        }
    }

    pub fn children(&self) -> &[Box<dyn Predictor>] {
        &self.children
    }

    pub fn blend_weights(&self) -> &[f64] {
        &self.weights
    }
}

impl Predictor for MixturePredictor {
    fn name(&self) -> &str {
        "mixture"
    }

    fn predicts_single_asset(&self) -> bool {
        false
    }

    /// Replay-safe only when every child is.
    fn allows_replay(&self) -> bool {
        self.children.iter().all(|c| c.allows_replay())
    }

    fn select_distribution(&self, series: &[PriceSeries], index: usize) -> Distribution {
        let mut blended = vec![0.0; series.len()];
        for (child, &weight) in self.children.iter().zip(&self.weights) {
            let child_dist = child.select_distribution(series, index);
            for (acc, &w) in blended.iter_mut().zip(child_dist.weights()) {
                *acc += weight * w;
            }
        }
        Distribution::from_weights(blended)
    }

    fn feedback(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        self.clock.observe(feedback.time, self.allows_replay())?;
        for child in &mut self.children {
            child.feedback(feedback)?;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.clock.reset();
        for child in &mut self.children {
            child.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{AdaptivePredictor, HoldPredictor};
    use chrono::NaiveDate;

    fn series(name: &str, values: &[f64]) -> PriceSeries {
        let times: Vec<NaiveDate> = (1..=values.len() as u32)
            .map(|d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap())
            .collect();
        PriceSeries::new(name, times, values.to_vec()).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn blends_child_distributions() {
        let mix = MixturePredictor::new(
            vec![
                Box::new(HoldPredictor::new(0)),
                Box::new(HoldPredictor::new(1)),
            ],
            vec![0.75, 0.25],
        );
        let universe = [series("A", &[1.0]), series("B", &[2.0])];
        let d = mix.select_distribution(&universe, 0);
        assert!(d.is_normalized());
        assert!((d.weights()[0] - 0.75).abs() < 1e-12);
        assert!((d.weights()[1] - 0.25).abs() < 1e-12);
        assert_eq!(mix.select_asset(&universe, 0), 0);
    }

    #[test]
    fn replay_safety_requires_all_children() {
        let stateless = MixturePredictor::new(
            vec![
                Box::new(HoldPredictor::new(0)),
                Box::new(HoldPredictor::new(1)),
            ],
            vec![0.5, 0.5],
        );
        assert!(stateless.allows_replay());

        let mixed = MixturePredictor::new(
            vec![
                Box::new(HoldPredictor::new(0)),
                Box::new(AdaptivePredictor::new(2, 0.1)),
            ],
            vec![0.5, 0.5],
        );
        assert!(!mixed.allows_replay());
    }

    #[test]
    fn feedback_cascades_to_children() {
        let mut mix = MixturePredictor::new(
            vec![
                Box::new(AdaptivePredictor::new(2, 0.5)),
                Box::new(HoldPredictor::new(0)),
            ],
            vec![0.5, 0.5],
        );
        let universe = [series("A", &[1.0]), series("B", &[2.0])];
        for d in 2..8 {
            mix.feedback(Feedback {
                time: date(d),
                best_asset: 1,
                observed_return: 0.05,
            })
            .unwrap();
        }
        // The adaptive child now leans toward asset 1, so the blend gives
        // asset 1 more than its untrained share of 0.25.
        let dist = mix.select_distribution(&universe, 0);
        assert!(dist.is_normalized());
        assert!(dist.weights()[1] > 0.25);
    }

    #[test]
    fn reset_cascades_depth_first() {
        let inner = MixturePredictor::new(
            vec![Box::new(AdaptivePredictor::new(2, 0.5))],
            vec![1.0],
        );
        let mut outer = MixturePredictor::new(vec![Box::new(inner)], vec![1.0]);
        outer
            .feedback(Feedback {
                time: date(5),
                best_asset: 1,
                observed_return: 0.10,
            })
            .unwrap();
        outer.reset();
        // After reset the nested adaptive child is uniform again.
        let d = outer.select_distribution(&[series("A", &[1.0]), series("B", &[2.0])], 0);
        assert_eq!(d.weights(), &[0.5, 0.5]);
        // And feedback clocks all restarted.
        outer
            .feedback(Feedback {
                time: date(2),
                best_asset: 0,
                observed_return: 0.0,
            })
            .unwrap();
    }
}
