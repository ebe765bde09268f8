//! Performance scoring over periodic return series.

/// Collapses a return series to a single comparable scalar.
///
/// Scores form a total order: implementations never return NaN, mapping
/// degenerate inputs to `f64::MIN` instead.
pub trait Scorer: Send + Sync {
    fn score(&self, returns: &[f64]) -> f64;
}

/// Annualized growth penalized by maximum drawdown.
///
/// `score = annualized_growth + drawdown_weight * max_drawdown`; the
/// drawdown term is non-positive, so larger weights punish volatile
/// candidates harder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthDrawdownScorer {
    pub drawdown_weight: f64,
    pub periods_per_year: f64,
}

impl Default for GrowthDrawdownScorer {
    fn default() -> Self {
        Self {
            drawdown_weight: 1.0,
            periods_per_year: 252.0,
        }
    }
}

impl Scorer for GrowthDrawdownScorer {
    fn score(&self, returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return f64::MIN;
        }
        let growth = annualized_growth(returns, self.periods_per_year);
        let score = growth + self.drawdown_weight * max_drawdown(returns);
        if score.is_finite() {
            score
        } else {
            f64::MIN
        }
    }
}

/// Compound the returns and rescale the total growth to one year.
///
/// An empty series or a wiped-out curve (total growth <= 0) yields -1.0,
/// i.e. total loss.
pub fn annualized_growth(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let total: f64 = returns.iter().map(|r| 1.0 + r).product();
    if total <= 0.0 {
        return -1.0;
    }
    total.powf(periods_per_year / returns.len() as f64) - 1.0
}

/// Largest peak-to-trough loss of the compounded curve, as a non-positive
/// fraction (0.0 means the curve never fell below a prior peak).
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut value = 1.0;
    let mut peak = 1.0;
    let mut worst = 0.0_f64;
    for r in returns {
        value *= 1.0 + r;
        if value > peak {
            peak = value;
        }
        let drawdown = value / peak - 1.0;
        if drawdown < worst {
            worst = drawdown;
        }
    }
    worst
}
