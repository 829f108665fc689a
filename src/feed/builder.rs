//! Alignment of raw per-token price histories into a [`HistoricalSeries`].
//!
//! Raw histories arrive with irregular gaps and different start and end
//! times.  The builder:
//!
//! 1. sorts each history and fills hourly gaps by linear interpolation;
//! 2. trims every history to the common range
//!    `max(first timestamp) ..= min(last timestamp)`;
//! 3. derives `market_cap = price × supply` and the time-weighted market
//!    cap as the mean of the last `twap_window + 1` prices times supply;
//! 4. groups the points into frames by timestamp.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::series::{Frame, HistoricalSeries, PricePoint};
use crate::domain::{Decimals, Symbol};
use crate::error::PoolError;

/// Seconds between interpolated points.
pub const HOUR: u64 = 3_600;

/// Default moving-average window: one week of hourly points.
pub const DEFAULT_TWAP_WINDOW: usize = 7 * 24;

/// One observed price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrice {
    /// Unix seconds.
    pub timestamp: u64,
    /// USD price.
    pub usd_price: f64,
}

/// Raw price history of one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenHistory {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Token precision.
    #[serde(default)]
    pub decimals: Decimals,
    /// Circulating supply in whole tokens.
    pub total_supply: f64,
    /// Observations, in any order.
    pub prices: Vec<RawPrice>,
}

/// Builds a [`HistoricalSeries`] from [`TokenHistory`] values.
///
/// # Example
///
/// ```
/// use index_backtest::domain::{Decimals, Symbol};
/// use index_backtest::feed::{RawPrice, SeriesBuilder, TokenHistory};
/// use index_backtest::traits::PriceFeed;
///
/// let history = TokenHistory {
///     symbol: Symbol::from("AAA"),
///     decimals: Decimals::MAX,
///     total_supply: 1_000.0,
///     prices: vec![
///         RawPrice { timestamp: 0, usd_price: 1.0 },
///         RawPrice { timestamp: 7_200, usd_price: 3.0 },
///     ],
/// };
/// let series = SeriesBuilder::new().token(history).build().unwrap();
/// assert_eq!(series.len(), 3);
/// assert!((series.price_at(1, "AAA").unwrap().usd_price - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBuilder {
    histories: Vec<TokenHistory>,
    twap_window: usize,
}

impl Default for SeriesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesBuilder {
    /// Creates an empty builder with the default moving-average window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            histories: Vec::new(),
            twap_window: DEFAULT_TWAP_WINDOW,
        }
    }

    /// Sets the moving-average window, in points.
    #[must_use]
    pub const fn twap_window(mut self, points: usize) -> Self {
        self.twap_window = points;
        self
    }

    /// Adds one token history.
    #[must_use]
    pub fn token(mut self, history: TokenHistory) -> Self {
        self.histories.push(history);
        self
    }

    /// Adds several token histories.
    #[must_use]
    pub fn tokens(mut self, histories: impl IntoIterator<Item = TokenHistory>) -> Self {
        self.histories.extend(histories);
        self
    }

    /// Aligns the histories and builds the series.
    ///
    /// # Errors
    ///
    /// - [`PoolError::EmptyTokenSet`] without histories.
    /// - [`PoolError::InvalidConfiguration`] for a history without
    ///   prices, duplicate symbols, or histories with no common range.
    /// - [`PoolError::InvalidPrice`] for a non-positive price or supply.
    pub fn build(self) -> Result<HistoricalSeries, PoolError> {
        if self.histories.is_empty() {
            return Err(PoolError::EmptyTokenSet);
        }
        let mut decimals = BTreeMap::new();
        let mut filled = Vec::with_capacity(self.histories.len());
        for history in &self.histories {
            if decimals.insert(history.symbol.clone(), history.decimals).is_some() {
                return Err(PoolError::InvalidConfiguration("duplicate token history"));
            }
            if !history.total_supply.is_finite() || history.total_supply <= 0.0 {
                return Err(PoolError::InvalidPrice("total supply must be finite and positive"));
            }
            filled.push(interpolate_hourly(&history.prices)?);
        }

        let start = filled
            .iter()
            .filter_map(|p| p.first().map(|f| f.timestamp))
            .max()
            .unwrap_or_default();
        let end = filled
            .iter()
            .filter_map(|p| p.last().map(|l| l.timestamp))
            .min()
            .unwrap_or_default();
        if start > end {
            return Err(PoolError::InvalidConfiguration("price histories do not overlap"));
        }

        let mut frames: BTreeMap<u64, BTreeMap<Symbol, PricePoint>> = BTreeMap::new();
        for (history, prices) in self.histories.iter().zip(filled) {
            let trimmed: Vec<RawPrice> = prices
                .into_iter()
                .filter(|p| p.timestamp >= start && p.timestamp <= end)
                .collect();
            for (i, price) in trimmed.iter().enumerate() {
                let from = i.saturating_sub(self.twap_window);
                let twap = moving_average(&trimmed[from..=i]);
                frames.entry(price.timestamp).or_default().insert(
                    history.symbol.clone(),
                    PricePoint {
                        usd_price: price.usd_price,
                        market_cap: price.usd_price * history.total_supply,
                        twap_market_cap: twap * history.total_supply,
                    },
                );
            }
        }
        debug!(
            tokens = self.histories.len(),
            frames = frames.len(),
            start,
            end,
            "price series aligned"
        );
        let frames = frames
            .into_iter()
            .map(|(timestamp, prices)| Frame { timestamp, prices })
            .collect();
        HistoricalSeries::new(frames, decimals)
    }
}

#[allow(clippy::cast_precision_loss)]
fn moving_average(window: &[RawPrice]) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().map(|p| p.usd_price).sum::<f64>() / window.len() as f64
}

/// Sorts `raw` and inserts linearly interpolated points every hour
/// between consecutive observations.
#[allow(clippy::cast_precision_loss)]
fn interpolate_hourly(raw: &[RawPrice]) -> Result<Vec<RawPrice>, PoolError> {
    let mut sorted = raw.to_vec();
    sorted.sort_by_key(|p| p.timestamp);
    sorted.dedup_by_key(|p| p.timestamp);
    if sorted.is_empty() {
        return Err(PoolError::InvalidConfiguration("token history has no prices"));
    }
    for p in &sorted {
        if !p.usd_price.is_finite() || p.usd_price <= 0.0 {
            return Err(PoolError::InvalidPrice("usd price must be finite and positive"));
        }
    }

    let mut out = Vec::with_capacity(sorted.len());
    for pair in sorted.windows(2) {
        let [from, to] = pair else {
            continue;
        };
        out.push(*from);
        let span = (to.timestamp - from.timestamp) as f64;
        let mut timestamp = from.timestamp + HOUR;
        while timestamp < to.timestamp {
            let t = (timestamp - from.timestamp) as f64 / span;
            out.push(RawPrice {
                timestamp,
                usd_price: from.usd_price + (to.usd_price - from.usd_price) * t,
            });
            timestamp += HOUR;
        }
    }
    if let Some(last) = sorted.last() {
        out.push(*last);
    }
    Ok(out)
}
