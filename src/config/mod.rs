//! Pool and simulation configuration.
//!
//! [`PoolConfig`] is the blueprint the factory turns into a pool;
//! [`SimulationConfig`] describes one back-tested variant end to end;
//! [`BacktestRequest`] expands a user request into several of those.

mod baseline;
mod pool_config;
mod request;
mod simulation;
mod weighted;

pub use baseline::BaselinePoolConfig;
pub use pool_config::PoolConfig;
pub use request::{BacktestRequest, DEFAULT_MINIMUM_TRADER_PROFIT};
pub use simulation::{PoolKind, RebalanceSchedule, SimulationConfig};
pub use weighted::{
    WeightedPoolConfig, WeightedPoolSettings, DEFAULT_SWAP_FEE, DEFAULT_WEIGHT_CHANGE,
};
