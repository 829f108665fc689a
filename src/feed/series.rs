//! Materialized price series.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Decimals, Symbol};
use crate::error::PoolError;
use crate::traits::{PriceFeed, RankedToken, TokenQuote};

/// Price data of one token at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Spot USD price.
    pub usd_price: f64,
    /// Spot market cap (`usd_price × total supply`).
    pub market_cap: f64,
    /// Moving-average market cap used for ranking and weights.
    pub twap_market_cap: f64,
}

/// All token prices at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Unix seconds.
    pub timestamp: u64,
    /// Prices keyed by symbol.
    pub prices: BTreeMap<Symbol, PricePoint>,
}

/// An in-memory [`PriceFeed`].
///
/// Frames are ordered by strictly increasing timestamp.  A symbol's
/// precision defaults to 18 decimals when `decimals` has no entry.
///
/// Snapshots round-trip through JSON:
///
/// ```
/// use index_backtest::feed::HistoricalSeries;
/// use index_backtest::traits::PriceFeed;
///
/// let json = r#"{
///     "frames": [
///         {"timestamp": 0, "prices": {"AAA": {"usdPrice": 1.0, "marketCap": 10.0, "twapMarketCap": 10.0}}},
///         {"timestamp": 3600, "prices": {"AAA": {"usdPrice": 1.5, "marketCap": 15.0, "twapMarketCap": 12.5}}}
///     ],
///     "decimals": {"AAA": 6}
/// }"#;
/// let series: HistoricalSeries = serde_json::from_str(json).unwrap();
/// series.validate().unwrap();
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.price_at(1, "AAA").unwrap().decimals.get(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoricalSeries {
    frames: Vec<Frame>,
    #[serde(default)]
    decimals: BTreeMap<Symbol, Decimals>,
}

fn check_positive(value: f64, msg: &'static str) -> Result<(), PoolError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PoolError::InvalidPrice(msg))
    }
}

fn check_non_negative(value: f64, msg: &'static str) -> Result<(), PoolError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PoolError::InvalidPrice(msg))
    }
}

impl HistoricalSeries {
    /// Creates a validated series.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        frames: Vec<Frame>,
        decimals: BTreeMap<Symbol, Decimals>,
    ) -> Result<Self, PoolError> {
        let series = Self { frames, decimals };
        series.validate()?;
        Ok(series)
    }

    /// Checks ordering and price sanity.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfiguration`] if timestamps do not
    ///   strictly increase.
    /// - [`PoolError::InvalidPrice`] for a non-positive price or a
    ///   negative market cap.
    pub fn validate(&self) -> Result<(), PoolError> {
        for pair in self.frames.windows(2) {
            if let [a, b] = pair {
                if b.timestamp <= a.timestamp {
                    return Err(PoolError::InvalidConfiguration(
                        "frame timestamps must strictly increase",
                    ));
                }
            }
        }
        for point in self.frames.iter().flat_map(|f| f.prices.values()) {
            check_positive(point.usd_price, "usd price must be finite and positive")?;
            check_non_negative(point.market_cap, "market cap must be finite and non-negative")?;
            check_non_negative(
                point.twap_market_cap,
                "twap market cap must be finite and non-negative",
            )?;
        }
        Ok(())
    }

    /// Returns the frames.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Every symbol that appears in any frame, sorted.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut all: Vec<Symbol> = self
            .frames
            .iter()
            .flat_map(|f| f.prices.keys().cloned())
            .collect();
        all.sort();
        all.dedup();
        all
    }

    /// Precision of `symbol`.
    #[must_use]
    pub fn decimals_of(&self, symbol: &str) -> Decimals {
        self.decimals.get(symbol).copied().unwrap_or(Decimals::MAX)
    }

    /// Restricts the series to `symbols`, dropping every other token.
    #[must_use]
    pub fn restrict_to(&self, symbols: &[Symbol]) -> Self {
        let frames = self
            .frames
            .iter()
            .map(|f| Frame {
                timestamp: f.timestamp,
                prices: f
                    .prices
                    .iter()
                    .filter(|(s, _)| symbols.contains(s))
                    .map(|(s, p)| (s.clone(), *p))
                    .collect(),
            })
            .collect();
        let decimals = self
            .decimals
            .iter()
            .filter(|(s, _)| symbols.contains(s))
            .map(|(s, d)| (s.clone(), *d))
            .collect();
        Self { frames, decimals }
    }

    fn frame(&self, step: usize) -> Result<&Frame, PoolError> {
        self.frames.get(step).ok_or(PoolError::StepOutOfRange {
            step,
            len: self.frames.len(),
        })
    }

    fn point(&self, step: usize, symbol: &str) -> Result<&PricePoint, PoolError> {
        self.frame(step)?
            .prices
            .get(symbol)
            .ok_or_else(|| PoolError::MissingPrice {
                step,
                symbol: symbol.to_owned(),
            })
    }
}

impl PriceFeed for HistoricalSeries {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn timestamp_at(&self, step: usize) -> Result<u64, PoolError> {
        Ok(self.frame(step)?.timestamp)
    }

    fn price_at(&self, step: usize, symbol: &str) -> Result<TokenQuote, PoolError> {
        let point = self.point(step, symbol)?;
        Ok(TokenQuote {
            usd_price: point.usd_price,
            decimals: self.decimals_of(symbol),
        })
    }

    fn top_symbols(&self, step: usize, count: usize) -> Result<Vec<RankedToken>, PoolError> {
        let mut ranked: Vec<(&Symbol, &PricePoint)> = self.frame(step)?.prices.iter().collect();
        // ties resolve alphabetically: the map iterates in symbol order
        ranked.sort_by(|a, b| b.1.twap_market_cap.total_cmp(&a.1.twap_market_cap));
        Ok(ranked
            .into_iter()
            .take(count)
            .map(|(symbol, point)| RankedToken {
                symbol: symbol.clone(),
                usd_price: point.usd_price,
                decimals: self.decimals_of(symbol.as_str()),
            })
            .collect())
    }

    fn weights_for(&self, step: usize, symbols: &[Symbol]) -> Result<Vec<f64>, PoolError> {
        let roots = symbols
            .iter()
            .map(|s| Ok(self.point(step, s.as_str())?.twap_market_cap.sqrt()))
            .collect::<Result<Vec<f64>, PoolError>>()?;
        let total: f64 = roots.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return Err(PoolError::InvalidPrice("no positive market cap to weigh"));
        }
        Ok(roots.into_iter().map(|r| r / total).collect())
    }
}
