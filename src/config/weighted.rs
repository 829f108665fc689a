//! Configuration for weighted (bonding-curve) pools.

use crate::domain::PoolToken;
use crate::error::PoolError;
use crate::math::{BONE, U256};

/// Swap fee used when none is configured (0.25%).
pub const DEFAULT_SWAP_FEE: U256 = U256([2_500_000_000_000_000, 0, 0, 0]);

/// Largest weight change per adjustment used by default (1%).
pub const DEFAULT_WEIGHT_CHANGE: U256 = U256([10_000_000_000_000_000, 0, 0, 0]);

/// Trading and rebalancing parameters of a weighted pool.
///
/// # Defaults
///
/// | Field | Value |
/// |-------|-------|
/// | `reweigh` | `true` |
/// | `swap_fee` | 0.25% |
/// | `min_reweigh_delay` | 3 600 s |
/// | `weight_change_fraction` | 1% |
/// | `minimum_trader_profit` | 5 USD |
/// | `max_arb_iterations` | 64 |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedPoolSettings {
    reweigh: bool,
    swap_fee: U256,
    min_reweigh_delay: u64,
    weight_change_fraction: U256,
    minimum_trader_profit: f64,
    max_arb_iterations: usize,
}

impl Default for WeightedPoolSettings {
    fn default() -> Self {
        Self {
            reweigh: true,
            swap_fee: DEFAULT_SWAP_FEE,
            min_reweigh_delay: 3_600,
            weight_change_fraction: DEFAULT_WEIGHT_CHANGE,
            minimum_trader_profit: 5.0,
            max_arb_iterations: 64,
        }
    }
}

impl WeightedPoolSettings {
    /// Enables or disables target-weight updates.
    #[must_use]
    pub const fn with_reweigh(mut self, reweigh: bool) -> Self {
        self.reweigh = reweigh;
        self
    }

    /// Sets the BONE-scaled swap fee.
    #[must_use]
    pub const fn with_swap_fee(mut self, swap_fee: U256) -> Self {
        self.swap_fee = swap_fee;
        self
    }

    /// Sets the minimum number of seconds between two weight adjustments
    /// of the same token.
    #[must_use]
    pub const fn with_min_reweigh_delay(mut self, seconds: u64) -> Self {
        self.min_reweigh_delay = seconds;
        self
    }

    /// Sets the BONE-scaled maximum weight change per adjustment.
    #[must_use]
    pub const fn with_weight_change_fraction(mut self, fraction: U256) -> Self {
        self.weight_change_fraction = fraction;
        self
    }

    /// Sets the smallest USD profit an arbitrage trade must capture.
    #[must_use]
    pub const fn with_minimum_trader_profit(mut self, usd: f64) -> Self {
        self.minimum_trader_profit = usd;
        self
    }

    /// Sets the per-pair bound on consecutive arbitrage trades.
    #[must_use]
    pub const fn with_max_arb_iterations(mut self, iterations: usize) -> Self {
        self.max_arb_iterations = iterations;
        self
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidFee`] if the swap fee is not below 100%.
    /// - [`PoolError::InvalidConfiguration`] for a weight change outside
    ///   `(0, 1]`, a negative or non-finite minimum profit, or a zero
    ///   arbitrage bound.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.swap_fee >= BONE {
            return Err(PoolError::InvalidFee("swap fee must be below 100%"));
        }
        if self.weight_change_fraction.is_zero() || self.weight_change_fraction > BONE {
            return Err(PoolError::InvalidConfiguration(
                "weight change fraction must be in (0, 1]",
            ));
        }
        if !self.minimum_trader_profit.is_finite() || self.minimum_trader_profit < 0.0 {
            return Err(PoolError::InvalidConfiguration(
                "minimum trader profit must be finite and non-negative",
            ));
        }
        if self.max_arb_iterations == 0 {
            return Err(PoolError::InvalidConfiguration(
                "max arbitrage iterations must be positive",
            ));
        }
        Ok(())
    }

    /// Returns `true` if target-weight updates take effect.
    #[must_use]
    pub const fn reweigh(&self) -> bool {
        self.reweigh
    }

    /// Returns the BONE-scaled swap fee.
    #[must_use]
    pub const fn swap_fee(&self) -> U256 {
        self.swap_fee
    }

    /// Returns the minimum delay between adjustments, in seconds.
    #[must_use]
    pub const fn min_reweigh_delay(&self) -> u64 {
        self.min_reweigh_delay
    }

    /// Returns the BONE-scaled maximum weight change per adjustment.
    #[must_use]
    pub const fn weight_change_fraction(&self) -> U256 {
        self.weight_change_fraction
    }

    /// Returns the minimum arbitrage profit in USD.
    #[must_use]
    pub const fn minimum_trader_profit(&self) -> f64 {
        self.minimum_trader_profit
    }

    /// Returns the per-pair arbitrage bound.
    #[must_use]
    pub const fn max_arb_iterations(&self) -> usize {
        self.max_arb_iterations
    }
}

/// Complete description of a weighted pool at construction.
///
/// # Validation
///
/// - At least one token, no duplicate symbols.
/// - Every token price finite and positive.
/// - Every ready token has a non-zero weight.
/// - Non-zero share supply.
/// - Valid [`WeightedPoolSettings`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPoolConfig {
    tokens: Vec<PoolToken>,
    timestamp: u64,
    total_supply: U256,
    settings: WeightedPoolSettings,
}

impl WeightedPoolConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        tokens: Vec<PoolToken>,
        timestamp: u64,
        total_supply: U256,
        settings: WeightedPoolSettings,
    ) -> Result<Self, PoolError> {
        let config = Self {
            tokens,
            timestamp,
            total_supply,
            settings,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`PoolError::EmptyTokenSet`] without tokens.
    /// - [`PoolError::InvalidConfiguration`] for duplicate symbols or a
    ///   zero supply.
    /// - [`PoolError::InvalidPrice`] for an unusable token price.
    /// - [`PoolError::InvalidWeight`] for a ready token without weight.
    /// - Any error from [`WeightedPoolSettings::validate`].
    pub fn validate(&self) -> Result<(), PoolError> {
        self.settings.validate()?;
        validate_tokens(&self.tokens)?;
        if self.tokens.iter().any(|t| t.is_ready() && t.denorm().is_zero()) {
            return Err(PoolError::InvalidWeight("ready tokens need a non-zero weight"));
        }
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

    /// Returns the initial pool timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Returns the initial share supply.
    #[must_use]
    pub const fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Returns the trading parameters.
    #[must_use]
    pub const fn settings(&self) -> &WeightedPoolSettings {
        &self.settings
    }
}

/// Checks the invariants shared by every pool's initial token set.
pub(crate) fn validate_tokens(tokens: &[PoolToken]) -> Result<(), PoolError> {
    if tokens.is_empty() {
        return Err(PoolError::EmptyTokenSet);
    }
    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        if iter.clone().any(|other| other.symbol() == token.symbol()) {
            return Err(PoolError::InvalidConfiguration(
                "duplicate token symbols are not allowed",
            ));
        }
        let price = token.usd_price();
        if !price.is_finite() || price <= 0.0 {
            return Err(PoolError::InvalidPrice("token price must be finite and positive"));
        }
    }
    Ok(())
}
