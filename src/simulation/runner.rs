//! Concurrent execution of several simulation variants over one feed.

use rayon::prelude::*;
use tracing::info;

use super::controller::{SimulationController, SimulationReport};
use crate::config::{BacktestRequest, SimulationConfig};
use crate::error::PoolError;
use crate::feed::HistoricalSeries;
use crate::traits::PriceFeed;

/// Runs every configuration against `feed` in parallel.
///
/// Reports come back in the order of `configs`.  The first failure aborts
/// the whole batch.
///
/// # Errors
///
/// Any error from [`SimulationController::new`] or
/// [`SimulationController::run`].
pub fn run_backtest<F>(
    feed: &F,
    configs: &[SimulationConfig],
) -> Result<Vec<SimulationReport>, PoolError>
where
    F: PriceFeed + Sync + ?Sized,
{
    if configs.is_empty() {
        return Err(PoolError::InvalidConfiguration("no simulation configured"));
    }
    info!(variants = configs.len(), steps = feed.len(), "backtest started");
    configs
        .par_iter()
        .map(|config| SimulationController::new(feed, config.clone())?.run())
        .collect()
}

/// Expands `request` and runs its variants over the request's tokens.
///
/// # Errors
///
/// - Any error from [`BacktestRequest::simulation_configs`].
/// - [`PoolError::MissingPrice`] if a requested token has no price at the
///   first step.
/// - Any error from [`run_backtest`].
pub fn run_request(
    series: &HistoricalSeries,
    request: &BacktestRequest,
) -> Result<Vec<SimulationReport>, PoolError> {
    let configs = request.simulation_configs()?;
    let universe = series.restrict_to(&request.tokens);
    for symbol in &request.tokens {
        universe.price_at(0, symbol.as_str())?;
    }
    run_backtest(&universe, &configs)
}
