//! Simulation replay: drive one predictor through a price window.
//!
//! Each run owns a fresh account and the predictor it is handed; the replay
//! is single-threaded and strictly forward in time. At sample `t` the
//! predictor decides on history up to `t - 1`, the rotation trades at the
//! price of `t`, and feedback then reveals which asset actually won the step.

use chrono::NaiveDate;
use thiserror::Error;

use portlab_core::domain::{check_aligned, Account, AssetUniverse, LedgerError, PriceSeries, SeriesError};
use portlab_core::fixed::Fixed;
use portlab_core::strategy::{Feedback, FeedbackError, Predictor};

/// A condition that aborts a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error("{series} price series provided for a universe of {universe} assets")]
    UniverseMismatch { series: usize, universe: usize },
    #[error("window {start}..={end} covers fewer than two samples")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },
}

/// Everything a run produces: the ledger plus per-step curves.
#[derive(Debug, Clone)]
pub struct SimulationOutcome {
    pub account: Account,
    /// Mark-to-market equity at every window sample, deposit included.
    pub equity: Vec<f64>,
    /// Step returns of the equity curve (one fewer entry than `equity`).
    pub returns: Vec<f64>,
    /// The asset index chosen at each trading step.
    pub decisions: Vec<usize>,
}

/// Seam between the optimizer and the replay machinery.
pub trait SimulationRunner: Send + Sync {
    fn run(&self, predictor: &mut dyn Predictor) -> Result<SimulationOutcome, SimError>;
}

/// Replays a validated, aligned set of series over a date window.
#[derive(Debug, Clone)]
pub struct Simulator {
    series: Vec<PriceSeries>,
    universe: AssetUniverse,
    first: usize,
    last: usize,
    initial_deposit: Fixed,
}

/// The held position between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Holding {
    asset: usize,
    shares: Fixed,
}

impl Simulator {
    /// Validate inputs and locate the window. The window spans the samples
    /// with `start <= time <= end` and must contain at least two of them.
    pub fn new(
        series: Vec<PriceSeries>,
        universe: AssetUniverse,
        start: NaiveDate,
        end: NaiveDate,
        initial_deposit: Fixed,
    ) -> Result<Self, SimError> {
        if series.len() != universe.len() {
            return Err(SimError::UniverseMismatch {
                series: series.len(),
                universe: universe.len(),
            });
        }
        let len = check_aligned(&series)?;

        let times = series[0].times();
        let first = times.iter().position(|t| *t >= start);
        let last = times.iter().rposition(|t| *t <= end);
        match (first, last) {
            (Some(first), Some(last)) if last > first && last < len => Ok(Self {
                series,
                universe,
                first,
                last,
                initial_deposit,
            }),
            _ => Err(SimError::EmptyWindow { start, end }),
        }
    }

    pub fn universe(&self) -> &AssetUniverse {
        &self.universe
    }

    /// Number of trading steps in the window.
    pub fn steps(&self) -> usize {
        self.last - self.first
    }

    fn price_at(&self, asset: usize, index: usize) -> Fixed {
        Fixed::from_f64(self.series[asset].value(index))
    }

    /// All-in position size: the largest whole-tick share count whose cost
    /// fits in `cash`. Rounding in the cost product can overshoot by one
    /// tick, hence the single correction.
    fn affordable_shares(cash: Fixed, price: Fixed) -> Fixed {
        let mut shares = cash.div_floor(price);
        if shares.mul(price) > cash {
            shares = shares - Fixed::from_raw(1);
        }
        shares
    }

    /// The asset with the highest realized return over the step ending at
    /// `index`, with its return. Ties break toward the lowest index.
    fn step_winner(&self, index: usize) -> (usize, f64) {
        let mut best = 0;
        let mut best_return = self.series[0].step_return(index);
        for (asset, series) in self.series.iter().enumerate().skip(1) {
            let r = series.step_return(index);
            if r > best_return {
                best = asset;
                best_return = r;
            }
        }
        (best, best_return)
    }
}

impl SimulationRunner for Simulator {
    fn run(&self, predictor: &mut dyn Predictor) -> Result<SimulationOutcome, SimError> {
        predictor.reset();

        let open_date = self.series[0].time(self.first);
        let mut account = Account::open(open_date);
        account.deposit(open_date, self.initial_deposit, "initial deposit")?;

        let mut holding: Option<Holding> = None;
        let mut equity = vec![self.initial_deposit.to_f64()];
        let mut decisions = Vec::with_capacity(self.steps());

        for t in (self.first + 1)..=self.last {
            let today = self.series[0].time(t);
            let decision = predictor.select_asset(&self.series, t - 1);
            decisions.push(decision);

            let rotate = holding.map_or(true, |h| h.asset != decision);
            if rotate {
                if let Some(h) = holding.take() {
                    let name = self.universe.name(h.asset);
                    let price = self.price_at(h.asset, t);
                    account.sell(today, name, h.shares, h.shares, price, "rotate out")?;
                }
                let price = self.price_at(decision, t);
                if !price.is_positive() {
                    // Sizing divides by the price; reject bad data before it
                    // can reach the division.
                    return Err(LedgerError::NonPositivePrice(price).into());
                }
                let shares = Self::affordable_shares(account.cash(), price);
                if shares.is_positive() {
                    let name = self.universe.name(decision);
                    account.buy(today, name, shares, price, "rotate in")?;
                    holding = Some(Holding {
                        asset: decision,
                        shares,
                    });
                }
            }

            let position_value = holding
                .map(|h| h.shares.mul(self.price_at(h.asset, t)))
                .unwrap_or(Fixed::ZERO);
            equity.push((account.cash() + position_value).to_f64());

            let (best_asset, observed_return) = self.step_winner(t);
            predictor.feedback(Feedback {
                time: today,
                best_asset,
                observed_return,
            })?;
        }

        let returns = equity
            .windows(2)
            .map(|w| if w[0] > 0.0 { w[1] / w[0] - 1.0 } else { 0.0 })
            .collect();

        Ok(SimulationOutcome {
            account,
            equity,
            returns,
            decisions,
        })
    }
}
