//! Cross-sectional momentum: hold whichever asset has the strongest
//! short-window average price relative to its long-window average.

use super::{Distribution, Feedback, FeedbackClock, FeedbackError, Predictor};
use crate::domain::PriceSeries;

/// Stateless single-asset momentum predictor.
///
/// Score per asset = mean(last `short_window` prices) / mean(last
/// `long_window` prices). Before `long_window` samples exist the predictor
/// has no opinion and returns a uniform distribution.
#[derive(Debug, Clone)]
pub struct MomentumPredictor {
    short_window: usize,
    long_window: usize,
    clock: FeedbackClock,
}

impl MomentumPredictor {
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
            clock: FeedbackClock::default(),
        }
    }

    /// Momentum score for one series at `index`, or None during warmup.
    fn score(&self, series: &PriceSeries, index: usize) -> Option<f64> {
        if index + 1 < self.long_window {
            return None;
        }
        let short = window_mean(series.values(), index, self.short_window);
        let long = window_mean(series.values(), index, self.long_window);
        if long <= 0.0 {
            return None;
        }
        Some(short / long)
    }

    fn best_asset(&self, series: &[PriceSeries], index: usize) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, s) in series.iter().enumerate() {
            let score = self.score(s, index)?;
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Mean of `values[index + 1 - window ..= index]`.
fn window_mean(values: &[f64], index: usize, window: usize) -> f64 {
    let start = index + 1 - window;
    values[start..=index].iter().sum::<f64>() / window as f64
}

impl Predictor for MomentumPredictor {
    fn name(&self) -> &str {
        "momentum"
    }

    fn predicts_single_asset(&self) -> bool {
        true
    }

    fn allows_replay(&self) -> bool {
        true
    }

    fn select_distribution(&self, series: &[PriceSeries], index: usize) -> Distribution {
        match self.best_asset(series, index) {
            Some(best) => Distribution::one_hot(series.len(), best),
            None => Distribution::uniform(series.len()),
        }
    }

    fn select_asset(&self, series: &[PriceSeries], index: usize) -> usize {
        self.best_asset(series, index).unwrap_or(0)
    }

    fn feedback(&mut self, feedback: Feedback) -> Result<(), FeedbackError> {
        self.clock.observe(feedback.time, self.allows_replay())
    }

    fn reset(&mut self) {
        self.clock.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(name: &str, values: &[f64]) -> PriceSeries {
        let times: Vec<NaiveDate> = (1..=values.len() as u32)
            .map(|d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap())
            .collect();
        PriceSeries::new(name, times, values.to_vec()).unwrap()
    }

    #[test]
    fn picks_the_rising_asset() {
        let p = MomentumPredictor::new(1, 3);
        let rising = series("UP", &[100.0, 105.0, 110.0, 115.0]);
        let flat = series("FLAT", &[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(p.select_asset(&[rising, flat], 3), 0);
    }

    #[test]
    fn picks_the_less_falling_asset() {
        let p = MomentumPredictor::new(1, 3);
        let falling = series("DOWN", &[100.0, 95.0, 90.0, 85.0]);
        let flat = series("FLAT", &[100.0, 100.0, 100.0, 100.0]);
        assert_eq!(p.select_asset(&[falling, flat], 3), 1);
    }

    #[test]
    fn uniform_before_warmup() {
        let p = MomentumPredictor::new(2, 4);
        let a = series("A", &[1.0, 2.0]);
        let b = series("B", &[2.0, 1.0]);
        let d = p.select_distribution(&[a, b], 1);
        assert_eq!(d.weights(), &[0.5, 0.5]);
    }

    #[test]
    fn ties_break_toward_lowest_index() {
        let p = MomentumPredictor::new(1, 2);
        let a = series("A", &[100.0, 100.0]);
        let b = series("B", &[50.0, 50.0]);
        // Identical scores (1.0): first asset wins.
        assert_eq!(p.select_asset(&[a, b], 1), 0);
    }
}
