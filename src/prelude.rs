//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use index_backtest::prelude::*;
//! ```

pub use crate::domain::{
    Decimals, Direction, PoolToken, RebalanceLog, ReindexUpdate, Symbol, ValueLogEntry,
    WeightUpdate,
};

pub use crate::traits::{FromConfig, PriceFeed, TokenSet};

pub use crate::math::{CheckedArithmetic, BONE, U256};

pub use crate::config::{BacktestRequest, PoolConfig, PoolKind, RebalanceSchedule, SimulationConfig};

pub use crate::error::{PoolError, Result};

pub use crate::factory::PoolFactory;

pub use crate::feed::{
    price_change_series, volatility_series, HistoricalSeries, SeriesBuilder, TokenSeries,
};

pub use crate::pools::{BaselinePool, PoolBox, WeightedPool};

pub use crate::simulation::{run_backtest, run_request, SimulationController, SimulationReport};
