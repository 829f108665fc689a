//! Per-token statistics over a price feed.
//!
//! Both series are pure functions of the feed's USD prices and share the
//! [`TokenSeries`] shape: one timestamp column and one value column per
//! token.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Symbol;
use crate::error::PoolError;
use crate::traits::PriceFeed;

/// Default look-back of [`volatility_series`]: seven days of hourly steps.
pub const DEFAULT_VOLATILITY_WINDOW: usize = 7 * 24;

/// Values of several tokens aligned on common timestamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenSeries {
    /// Unix seconds of each column entry.
    pub timestamps: Vec<u64>,
    /// Per-token values aligned with `timestamps`.
    pub values: BTreeMap<Symbol, Vec<f64>>,
}

impl TokenSeries {
    /// Values of `symbol`, if it was requested.
    #[must_use]
    pub fn values_of(&self, symbol: &str) -> Option<&[f64]> {
        self.values.get(symbol).map(Vec::as_slice)
    }
}

/// Coefficient of variation in percent, rounded to two decimals.
///
/// Uses the population standard deviation.  Empty input yields zero.
#[must_use]
pub fn volatility(prices: &[f64]) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }
    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
    round_cents(variance.sqrt() / mean * 100.0)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_request<F: PriceFeed + ?Sized>(feed: &F, tokens: &[Symbol]) -> Result<(), PoolError> {
    if feed.is_empty() || tokens.is_empty() {
        return Err(PoolError::EmptyTokenSet);
    }
    Ok(())
}

fn prices_of<F: PriceFeed + ?Sized>(feed: &F, symbol: &Symbol) -> Result<Vec<f64>, PoolError> {
    (0..feed.len())
        .map(|step| Ok(feed.price_at(step, symbol.as_str())?.usd_price))
        .collect()
}

/// Rolling price volatility of every token in `tokens`.
///
/// The value at step `i` covers the prices of steps
/// `i.saturating_sub(window)..=i`, so early steps use a shorter window.
/// One entry per feed step.
///
/// # Errors
///
/// - [`PoolError::EmptyTokenSet`] for an empty feed or token list.
/// - [`PoolError::MissingPrice`] if a token lacks a price at any step.
pub fn volatility_series<F: PriceFeed + ?Sized>(
    feed: &F,
    tokens: &[Symbol],
    window: usize,
) -> Result<TokenSeries, PoolError> {
    check_request(feed, tokens)?;
    let timestamps = (0..feed.len())
        .map(|step| feed.timestamp_at(step))
        .collect::<Result<Vec<_>, _>>()?;
    let mut values = BTreeMap::new();
    for symbol in tokens {
        let prices = prices_of(feed, symbol)?;
        let rolling = (0..prices.len())
            .map(|i| volatility(&prices[i.saturating_sub(window)..=i]))
            .collect();
        values.insert(symbol.clone(), rolling);
    }
    Ok(TokenSeries { timestamps, values })
}

/// Percent price change of every token relative to step 0.
///
/// Step 0 itself is omitted; the series has `len() - 1` entries.
///
/// # Errors
///
/// - [`PoolError::EmptyTokenSet`] for an empty feed or token list.
/// - [`PoolError::MissingPrice`] if a token lacks a price at any step.
pub fn price_change_series<F: PriceFeed + ?Sized>(
    feed: &F,
    tokens: &[Symbol],
) -> Result<TokenSeries, PoolError> {
    check_request(feed, tokens)?;
    let timestamps = (1..feed.len())
        .map(|step| feed.timestamp_at(step))
        .collect::<Result<Vec<_>, _>>()?;
    let mut values = BTreeMap::new();
    for symbol in tokens {
        let prices = prices_of(feed, symbol)?;
        let origin = prices[0];
        let changes = prices[1..]
            .iter()
            .map(|p| (p - origin) / origin * 100.0)
            .collect();
        values.insert(symbol.clone(), changes);
    }
    Ok(TokenSeries { timestamps, values })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::feed::{Frame, HistoricalSeries, PricePoint, HOUR};

    fn feed(prices: &[[f64; 2]]) -> HistoricalSeries {
        let frames = prices
            .iter()
            .enumerate()
            .map(|(step, row)| Frame {
                timestamp: step as u64 * HOUR,
                prices: ["A", "B"]
                    .iter()
                    .zip(row)
                    .map(|(s, p)| {
                        (
                            Symbol::from(*s),
                            PricePoint {
                                usd_price: *p,
                                market_cap: *p,
                                twap_market_cap: *p,
                            },
                        )
                    })
                    .collect(),
            })
            .collect();
        let Ok(series) = HistoricalSeries::new(frames, BTreeMap::new()) else {
            panic!("valid feed");
        };
        series
    }

    fn both() -> Vec<Symbol> {
        vec![Symbol::from("A"), Symbol::from("B")]
    }

    #[test]
    fn volatility_is_relative_deviation_in_percent() {
        // mean 100, population deviation sqrt(2)
        assert!((volatility(&[99.0, 100.0, 101.0, 102.0, 98.0]) - 1.41).abs() < 1e-12);
        assert!(volatility(&[5.0, 5.0, 5.0]).abs() < f64::EPSILON);
        assert!(volatility(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn rolling_window_drops_old_prices() {
        let f = feed(&[[1.0, 1.0], [3.0, 1.0], [3.0, 1.0], [3.0, 1.0]]);
        let Ok(s) = volatility_series(&f, &both(), 1) else {
            panic!("series");
        };
        assert_eq!(s.timestamps, [0, HOUR, 2 * HOUR, 3 * HOUR]);
        let Some(a) = s.values_of("A") else {
            panic!("A tracked");
        };
        // step 1 sees [1, 3]: mean 2, deviation 1
        assert_eq!(a, [0.0, 50.0, 0.0, 0.0]);
        assert_eq!(s.values_of("B"), Some(&[0.0; 4][..]));
    }

    #[test]
    fn wide_window_uses_whole_prefix() {
        let f = feed(&[[1.0, 1.0], [3.0, 1.0], [3.0, 1.0]]);
        let Ok(s) = volatility_series(&f, &both(), DEFAULT_VOLATILITY_WINDOW) else {
            panic!("series");
        };
        let Some(a) = s.values_of("A") else {
            panic!("A tracked");
        };
        // [1, 3, 3]: mean 7/3, deviation sqrt(8)/3
        let expected = round_cents(8f64.sqrt() / 7.0 * 100.0);
        assert!((a[2] - expected).abs() < 1e-12);
    }

    #[test]
    fn price_change_is_relative_to_first_step() {
        let f = feed(&[[2.0, 10.0], [3.0, 5.0], [1.0, 10.0]]);
        let Ok(s) = price_change_series(&f, &both()) else {
            panic!("series");
        };
        assert_eq!(s.timestamps, [HOUR, 2 * HOUR]);
        assert_eq!(s.values_of("A"), Some(&[50.0, -50.0][..]));
        assert_eq!(s.values_of("B"), Some(&[-50.0, 0.0][..]));
    }

    #[test]
    fn single_step_has_no_changes() {
        let f = feed(&[[2.0, 10.0]]);
        let Ok(s) = price_change_series(&f, &both()) else {
            panic!("series");
        };
        assert!(s.timestamps.is_empty());
        assert!(s.values.values().all(Vec::is_empty));
    }

    #[test]
    fn unknown_token_is_an_error() {
        let f = feed(&[[1.0, 1.0]]);
        let tokens = [Symbol::from("Q")];
        assert_eq!(
            volatility_series(&f, &tokens, 3),
            Err(PoolError::MissingPrice {
                step: 0,
                symbol: "Q".into()
            })
        );
        assert_eq!(
            price_change_series(&f, &[]),
            Err(PoolError::EmptyTokenSet)
        );
    }
}
