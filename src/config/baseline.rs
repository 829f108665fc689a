//! Configuration for baseline (directly rebalanced) pools.

use super::weighted::validate_tokens;
use crate::domain::PoolToken;
use crate::error::PoolError;
use crate::math::U256;

/// Initial state of a baseline pool.
///
/// A baseline pool has no fee and no curve; the only parameter besides
/// its tokens and share supply is whether target-weight updates apply.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselinePoolConfig {
    tokens: Vec<PoolToken>,
    total_supply: U256,
    reweigh: bool,
}

impl BaselinePoolConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        tokens: Vec<PoolToken>,
        total_supply: U256,
        reweigh: bool,
    ) -> Result<Self, PoolError> {
        let config = Self {
            tokens,
            total_supply,
            reweigh,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the token set and supply.
    ///
    /// # Errors
    ///
    /// - [`PoolError::EmptyTokenSet`] without tokens.
    /// - [`PoolError::InvalidConfiguration`] for duplicate symbols or a
    ///   zero supply.
    /// - [`PoolError::InvalidPrice`] for an unusable token price.
    pub fn validate(&self) -> Result<(), PoolError> {
        validate_tokens(&self.tokens)?;
        if self.total_supply.is_zero() {
            return Err(PoolError::InvalidConfiguration("total supply must be non-zero"));
        }
        Ok(())
    }

    /// Returns the initial tokens.
    #[must_use]
    pub fn tokens(&self) -> &[PoolToken] {
        &self.tokens
    }

    /// Returns the initial share supply.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Returns `true` if target-weight updates take effect.
    #[must_use]
    pub const fn reweigh(&self) -> bool {
        self.reweigh
    }
}
