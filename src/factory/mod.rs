//! Pool instantiation via the factory pattern.
//!
//! The [`PoolFactory`] creates pool instances from [`PoolConfig`] values,
//! validating configuration and dispatching to the appropriate pool
//! constructor based on the config variant.  For simulation runs it also
//! derives that configuration from the price feed: the initial top-N
//! basket and its square-root market-cap weights.
//!
//! # Usage
//!
//! ```rust
//! use index_backtest::config::{BaselinePoolConfig, PoolConfig};
//! use index_backtest::domain::{Decimals, PoolToken};
//! use index_backtest::factory::PoolFactory;
//! use index_backtest::math::BONE;
//! use index_backtest::traits::TokenSet;
//!
//! let tokens = vec![PoolToken::new("AAA", Decimals::MAX, 2.0, BONE * 50u64, BONE)];
//! let cfg = BaselinePoolConfig::new(tokens, BONE, false).expect("valid");
//!
//! let pool = PoolFactory::create(&PoolConfig::Baseline(cfg)).expect("pool created");
//! assert!((pool.market_cap() - 100.0).abs() < 1e-9);
//! ```
//!
//! [`PoolConfig`]: crate::config::PoolConfig

mod pool_factory;

pub use pool_factory::PoolFactory;
