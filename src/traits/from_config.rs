//! Generic construction trait for pool instantiation from configuration.
//!
//! [`FromConfig`] provides a uniform interface for creating pool instances
//! from their respective configuration structs.  Each pool type implements
//! `FromConfig<C>` for its own config variant, so the factory dispatches
//! construction without `dyn` trait objects:
//!
//! ```text
//! PoolConfig::Weighted(cfg) => WeightedPool::from_config(&cfg)
//! PoolConfig::Baseline(cfg) => BaselinePool::from_config(&cfg)
//! ```
//!
//! # Validation Contract
//!
//! Implementations validate the configuration during construction.  A
//! successfully constructed pool is in a valid initial state:
//!
//! - At least one token, with unique symbols
//! - Swap fee strictly below 100%
//! - Non-zero initial share supply

use crate::error::PoolError;

/// Builds a pool from a configuration value.
///
/// There is no blanket implementation; every pool-config pairing is
/// explicit.
pub trait FromConfig<C> {
    /// Creates a new pool instance from the given configuration.
    ///
    /// # Errors
    ///
    /// - [`PoolError::EmptyTokenSet`] if the configuration holds no tokens.
    /// - [`PoolError::InvalidConfiguration`] or [`PoolError::InvalidFee`]
    ///   if any parameter is out of range.
    fn from_config(config: &C) -> Result<Self, PoolError>
    where
        Self: Sized;
}
