//! Adaptive multiplicative-weights predictor.
//!
//! Maintains one weight per asset; each feedback multiplies the weight of the
//! asset that actually won the step. The published distribution is the
//! normalized weight vector, so assets that keep winning accumulate mass.

use super::{Distribution, Feedback, FeedbackClock, FeedbackError, Predictor};
use crate::domain::PriceSeries;

/// Stateful distribution predictor trained online by feedback.
#[derive(Debug, Clone)]
pub struct AdaptivePredictor {
    learning_rate: f64,
    weights: Vec<f64>,
    clock: FeedbackClock,
}

impl AdaptivePredictor {
    pub fn new(universe_size: usize, learning_rate: f64) -> Self {
        Self {
            learning_rate,
            weights: vec![1.0; universe_size],
            clock: FeedbackClock::default(),
        }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Predictor for AdaptivePredictor {
    fn name(&self) -> &str {
        "adaptive"
    }

    fn predicts_single_asset(&self) -> bool {
        false
    }

    fn select_distribution(&self, _series: &[PriceSeries], _index: usize) -> Distribution {
        Distribution::from_weights(self.weights.clone())
    }

    fn feedback(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        self.clock.observe(feedback.time, self.allows_replay())?;
        if feedback.best_asset < self.weights.len() {
            // Multiplicative update, floored so a large negative return
            // cannot zero the weight out permanently.
            let gain = (1.0 + self.learning_rate * (1.0 + feedback.observed_return)).max(0.01);
            self.weights[feedback.best_asset] *= gain;

            // Renormalize to total mass n to keep weights bounded.
            let sum: f64 = self.weights.iter().sum();
            if sum > 0.0 {
                let n = self.weights.len() as f64;
                for w in &mut self.weights {
                    *w *= n / sum;
                }
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        for w in &mut self.weights {
            *w = 1.0;
        }
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    #[test]
    fn starts_uniform() {
        let p = AdaptivePredictor::new(3, 0.1);
        let d = p.select_distribution(&[], 0);
        assert!(d.is_normalized());
        assert_eq!(d.weights(), &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]);
    }

    #[test]
    fn feedback_shifts_mass_to_the_winner() {
        let mut p = AdaptivePredictor::new(2, 0.5);
        for d in 2..10 {
            p.feedback(Feedback {
                time: date(d),
                best_asset: 1,
                observed_return: 0.02,
            })
            .unwrap();
        }
        let dist = p.select_distribution(&[], 0);
        assert!(dist.is_normalized());
        assert!(dist.weights()[1] > dist.weights()[0]);
        assert_eq!(dist.arg_max(), 1);
    }

    #[test]
    fn rejects_out_of_order_feedback() {
        let mut p = AdaptivePredictor::new(2, 0.1);
        p.feedback(Feedback {
            time: date(5),
            best_asset: 0,
            observed_return: 0.0,
        })
        .unwrap();
        let err = p
            .feedback(Feedback {
                time: date(5),
                best_asset: 0,
                observed_return: 0.0,
            })
            .unwrap_err();
        assert!(matches!(err, FeedbackError::OutOfOrder { .. }));
    }

    #[test]
    fn reset_restores_uniform_and_clock() {
        let mut p = AdaptivePredictor::new(2, 0.5);
        p.feedback(Feedback {
            time: date(5),
            best_asset: 1,
            observed_return: 0.10,
        })
        .unwrap();
        p.reset();
        let d = p.select_distribution(&[], 0);
        assert_eq!(d.weights(), &[0.5, 0.5]);
        // Clock forgot the old time: feedback at an earlier date is fine.
        p.feedback(Feedback {
            time: date(2),
            best_asset: 0,
            observed_return: 0.0,
        })
        .unwrap();
    }
}
