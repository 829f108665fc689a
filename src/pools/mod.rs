//! Pool implementations and the [`PoolBox`] dispatch enum.
//!
//! The [`PoolBox`] enum provides static dispatch across both pool types,
//! so a simulation can own either without `dyn` trait objects.
//!
//! # Pool Types
//!
//! | Pool | Style | Rebalancing |
//! |------|-------|-------------|
//! | [`WeightedPool`] | Balancer | arbitrage against gradually migrating weights |
//! | [`BaselinePool`] | direct holder | balances reassigned at each rebalance |

pub mod baseline;
pub mod weighted;

mod pool_box;

#[cfg(test)]
mod proptest_properties;

pub use baseline::BaselinePool;
pub use pool_box::PoolBox;
pub use weighted::WeightedPool;
