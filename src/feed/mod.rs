//! In-memory historical price feed.
//!
//! [`HistoricalSeries`] is the [`PriceFeed`](crate::traits::PriceFeed)
//! the simulation reads from; [`SeriesBuilder`] produces one from raw,
//! unaligned per-token price histories.  [`analytics`] derives volatility
//! and price-change series from any feed.

pub mod analytics;
mod builder;
mod series;

pub use analytics::{
    price_change_series, volatility_series, TokenSeries, DEFAULT_VOLATILITY_WINDOW,
};
pub use builder::{RawPrice, SeriesBuilder, TokenHistory, DEFAULT_TWAP_WINDOW, HOUR};
pub use series::{Frame, HistoricalSeries, PricePoint};
