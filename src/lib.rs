//! # Index Backtest
//!
//! Back-testing engine for index funds built on Balancer-style weighted
//! pools.  A basket of the top-N tokens by market cap is held in a pool
//! whose weights migrate gradually toward square-root market-cap targets,
//! driven by arbitrage instead of direct trades.  The same history can be
//! replayed against:
//!
//! - **index**: a weighted pool with scheduled reweighs and reindexes;
//! - **balancer**: the same pool with its initial weights frozen;
//! - **baseline**: a basket rebalanced directly at every scheduled event.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | no | `backtest` binary (JSON in, JSON out) |
//!
//! # Quick Start
//!
//! ```rust
//! use index_backtest::config::{PoolKind, SimulationConfig};
//! use index_backtest::domain::{Decimals, Symbol};
//! use index_backtest::feed::{RawPrice, SeriesBuilder, TokenHistory};
//! use index_backtest::simulation::run_backtest;
//!
//! // 1. Raw price histories, hourly or sparser
//! let history = |symbol: &str, supply: f64, prices: [f64; 3]| TokenHistory {
//!     symbol: Symbol::from(symbol),
//!     decimals: Decimals::MAX,
//!     total_supply: supply,
//!     prices: prices
//!         .iter()
//!         .enumerate()
//!         .map(|(i, p)| RawPrice { timestamp: i as u64 * 3_600, usd_price: *p })
//!         .collect(),
//! };
//!
//! // 2. Align them into a feed
//! let feed = SeriesBuilder::new()
//!     .token(history("AAA", 1_000.0, [1.0, 1.1, 1.2]))
//!     .token(history("BBB", 4_000.0, [1.0, 0.9, 0.8]))
//!     .build()
//!     .expect("aligned series");
//!
//! // 3. Run two variants side by side
//! let configs = [
//!     SimulationConfig::new("index", PoolKind::Weighted, 2, 10_000.0).expect("valid"),
//!     SimulationConfig::new("hodl", PoolKind::Baseline, 2, 10_000.0).expect("valid"),
//! ];
//! let reports = run_backtest(&feed, &configs).expect("simulated");
//!
//! assert_eq!(reports.len(), 2);
//! assert_eq!(reports[0].value_log.len(), 2);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ BacktestReq. │  expands into SimulationConfigs
//! └──────┬───────┘
//!        │ run_backtest (rayon, one controller per config)
//!        ▼
//! ┌──────────────┐
//! │  Controller  │  prices, reweigh/reindex, joins, fees, arbitrage
//! └──────┬───────┘
//!        │ PoolFactory::build
//!        ▼
//! ┌──────────────┐
//! │    Pools     │  WeightedPool, BaselinePool behind PoolBox
//! └──────┬───────┘
//!        │ weighted_math, bpow
//!        ▼
//! ┌──────────────┐
//! │     Math     │  U256 fixed point, BONE = 10^18
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Symbol`](domain::Symbol), [`PoolToken`](domain::PoolToken), logs and updates |
//! | [`traits`] | [`TokenSet`](traits::TokenSet), [`PriceFeed`](traits::PriceFeed), [`FromConfig`](traits::FromConfig) |
//! | [`config`] | Pool blueprints, [`SimulationConfig`](config::SimulationConfig), [`BacktestRequest`](config::BacktestRequest) |
//! | [`pools`]  | [`WeightedPool`](pools::WeightedPool), [`BaselinePool`](pools::BaselinePool), [`PoolBox`](pools::PoolBox) |
//! | [`factory`] | [`PoolFactory`](factory::PoolFactory): configs and initial baskets |
//! | [`feed`]   | [`HistoricalSeries`](feed::HistoricalSeries), [`SeriesBuilder`](feed::SeriesBuilder), volatility and price-change analytics |
//! | [`simulation`] | Controller, parallel runner, weight schedule |
//! | [`math`]   | Fixed-point arithmetic and weighted-pool formulas |
//! | [`error`]  | [`PoolError`](error::PoolError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod feed;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod simulation;
pub mod traits;
