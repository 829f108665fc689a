//! Historical price source consumed by the simulation.
//!
//! A [`PriceFeed`] is an already-materialized, read-only series of
//! per-step token prices and time-weighted market caps.  Fetching,
//! caching and retrying belong to whoever builds the feed; the engine
//! only reads from it and treats every gap as fatal.
//!
//! Steps are dense indices `0..len()`.  Timestamps are Unix seconds and
//! non-decreasing.

use serde::{Deserialize, Serialize};

use crate::domain::{Decimals, Symbol};
use crate::error::PoolError;

/// Price and precision of one token at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuote {
    /// USD price.
    pub usd_price: f64,
    /// Token precision.
    pub decimals: Decimals,
}

/// A token selected by market-cap ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedToken {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// USD price at the ranking step.
    pub usd_price: f64,
    /// Token precision.
    pub decimals: Decimals,
}

/// Read-only historical price series.
///
/// Implementations must be deterministic: the same query always yields
/// the same answer.  Concurrent simulations share one feed, so runners
/// additionally require `Sync`.
pub trait PriceFeed {
    /// Number of steps in the series.
    fn len(&self) -> usize;

    /// Returns `true` if the series has no steps.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Unix timestamp of `step`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::StepOutOfRange`] past the end of the series.
    fn timestamp_at(&self, step: usize) -> Result<u64, PoolError>;

    /// Price of `symbol` at `step`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::MissingPrice`] if the series has no entry and
    /// [`PoolError::StepOutOfRange`] past the end.
    fn price_at(&self, step: usize, symbol: &str) -> Result<TokenQuote, PoolError>;

    /// Up to `count` tokens ranked by time-weighted market cap at `step`,
    /// largest first.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::StepOutOfRange`] past the end.
    fn top_symbols(&self, step: usize, count: usize) -> Result<Vec<RankedToken>, PoolError>;

    /// Square-root market-cap weights of `symbols` at `step`, in the
    /// same order, summing to one.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::MissingPrice`] for an unknown symbol and
    /// [`PoolError::InvalidPrice`] if no symbol has positive market cap.
    fn weights_for(&self, step: usize, symbols: &[Symbol]) -> Result<Vec<f64>, PoolError>;
}
