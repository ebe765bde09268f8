//! Wires settings, market data, and a scanner into one optimization run.

use anyhow::{Context, Result};

use portlab_core::domain::{AssetUniverse, PriceSeries};
use portlab_core::fixed::Fixed;
use portlab_core::rng::SeedHierarchy;

use crate::metrics::GrowthDrawdownScorer;
use crate::optimizer::{Optimizer, SearchReport};
use crate::scan::ConfigScanner;
use crate::settings::OptimizeSettings;
use crate::sim::Simulator;

/// Run a full grid search (and the configured refinement rounds) over the
/// given market data.
pub fn run_grid_search(
    settings: &OptimizeSettings,
    series: Vec<PriceSeries>,
    universe: AssetUniverse,
    scanner: &mut ConfigScanner,
) -> Result<SearchReport> {
    settings.validate().context("invalid settings")?;

    let simulator = Simulator::new(
        series,
        universe.clone(),
        settings.start_date,
        settings.end_date,
        Fixed::from_f64(settings.initial_deposit),
    )
    .context("failed to set up the simulation window")?;

    let scorer = GrowthDrawdownScorer {
        drawdown_weight: settings.drawdown_weight,
        ..GrowthDrawdownScorer::default()
    };

    let optimizer = Optimizer::new(Box::new(simulator), Box::new(scorer), universe)
        .with_parallelism(settings.parallel);

    let report = optimizer.search(scanner);
    if settings.refine_rounds == 0 {
        return Ok(report);
    }

    // Refinement only makes sense with a grid winner to start from.
    let Some(best) = report.best_evaluation() else {
        return Ok(report);
    };
    let seeds = SeedHierarchy::new(settings.seed);
    let refined = optimizer.refine(best.config.clone(), settings.refine_rounds, &seeds);

    // Merge both phases into one report; renumbering keeps the tie-break
    // order as grid first, refinement after.
    let mut rows = report.evaluations().to_vec();
    rows.extend(refined.evaluations().iter().cloned());
    Ok(SearchReport::new(rows))
}
