//! Target-weight history of an ideal index, without any pool.
//!
//! Replays the rebalance cadence of a [`RebalanceSchedule`] over a feed
//! and records the square-root market-cap weight every token of the
//! universe would have had at each event.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RebalanceSchedule;
use crate::domain::Symbol;
use crate::error::PoolError;
use crate::traits::PriceFeed;

/// Weights of every universe token at every scheduled event.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightSchedule {
    /// Event timestamps; the first is the feed's first step.
    pub timestamps: Vec<u64>,
    /// Per-token weights aligned with `timestamps`; zero outside the
    /// basket.
    pub weights: BTreeMap<Symbol, Vec<f64>>,
}

impl WeightSchedule {
    /// Weight of `symbol` at every event, if it belongs to the universe.
    #[must_use]
    pub fn weights_of(&self, symbol: &str) -> Option<&[f64]> {
        self.weights.get(symbol).map(Vec::as_slice)
    }
}

fn record(
    schedule: &mut WeightSchedule,
    timestamp: u64,
    basket: &[Symbol],
    weights: &[f64],
) {
    schedule.timestamps.push(timestamp);
    for (symbol, history) in &mut schedule.weights {
        let weight = basket
            .iter()
            .position(|s| s == symbol)
            .and_then(|i| weights.get(i).copied())
            .unwrap_or(0.0);
        history.push(weight);
    }
}

/// Computes the weight history of a `size`-token index over `universe`.
///
/// The basket starts as the top `size` tokens at step 0.  Each time
/// `reweigh_delay` seconds have elapsed since the last event, the event
/// counter increments; every `reindex_every`-th event re-ranks the basket,
/// the others only recompute weights of the current basket.
///
/// # Errors
///
/// - [`PoolError::EmptyTokenSet`] for an empty feed or universe.
/// - Any feed lookup error.
pub fn weight_schedule<F: PriceFeed + ?Sized>(
    feed: &F,
    universe: &[Symbol],
    size: usize,
    cadence: &RebalanceSchedule,
) -> Result<WeightSchedule, PoolError> {
    if feed.is_empty() || universe.is_empty() || size == 0 {
        return Err(PoolError::EmptyTokenSet);
    }
    cadence.validate()?;

    let top = |step: usize| -> Result<Vec<Symbol>, PoolError> {
        Ok(feed
            .top_symbols(step, usize::MAX)?
            .into_iter()
            .map(|t| t.symbol)
            .filter(|s| universe.contains(s))
            .take(size)
            .collect())
    };

    let mut out = WeightSchedule {
        timestamps: Vec::new(),
        weights: universe.iter().map(|s| (s.clone(), Vec::new())).collect(),
    };
    let mut basket = top(0)?;
    let mut last = feed.timestamp_at(0)?;
    let weights = feed.weights_for(0, &basket)?;
    record(&mut out, last, &basket, &weights);

    let mut counter = 0u64;
    for step in 1..feed.len() {
        let timestamp = feed.timestamp_at(step)?;
        if timestamp.saturating_sub(last) < cadence.reweigh_delay {
            continue;
        }
        counter += 1;
        if cadence.is_reindex(counter) {
            basket = top(step)?;
        }
        last = timestamp;
        let weights = feed.weights_for(step, &basket)?;
        record(&mut out, timestamp, &basket, &weights);
    }
    Ok(out)
}
