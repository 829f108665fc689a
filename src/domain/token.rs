//! Pool token state.

use super::{Decimals, Symbol};
use crate::error::PoolError;
use crate::math::{format_balance, U256};

/// A token held by a pool, together with its pricing and weight state.
///
/// Balances, minimum balances and weights are fixed-point [`U256`]
/// values: balances in the token's base units, weights scaled by
/// [`BONE`](crate::math::BONE).  The USD price is the externally tracked
/// market price and is refreshed by the simulation every tick.
///
/// A token is *ready* once its balance has crossed its minimum bootstrap
/// balance.  Until then the pool prices it against its minimum balance
/// and an inflated effective weight.
///
/// # Examples
///
/// ```
/// use index_backtest::domain::{Decimals, PoolToken};
/// use index_backtest::math::{BONE, U256};
///
/// let dai = PoolToken::new("DAI", Decimals::MAX, 1.0, BONE * 1_000u64, BONE);
/// assert!(dai.is_ready());
/// assert!((dai.usd_value() - 1_000.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PoolToken {
    pub(crate) symbol: Symbol,
    pub(crate) decimals: Decimals,
    pub(crate) usd_price: f64,
    pub(crate) balance: U256,
    pub(crate) minimum_balance: U256,
    pub(crate) denorm: U256,
    pub(crate) target_denorm: U256,
    pub(crate) ready: bool,
}

impl PoolToken {
    /// Creates a ready token whose target weight equals its current weight.
    pub fn new(
        symbol: impl Into<Symbol>,
        decimals: Decimals,
        usd_price: f64,
        balance: U256,
        denorm: U256,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            usd_price,
            balance,
            minimum_balance: U256::zero(),
            denorm,
            target_denorm: denorm,
            ready: true,
        }
    }

    /// Creates a not-ready token with zero balance and zero weight.
    ///
    /// The token becomes ready once its balance strictly exceeds
    /// `minimum_balance`.
    pub fn pending(
        symbol: impl Into<Symbol>,
        decimals: Decimals,
        usd_price: f64,
        minimum_balance: U256,
        target_denorm: U256,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            decimals,
            usd_price,
            balance: U256::zero(),
            minimum_balance,
            denorm: U256::zero(),
            target_denorm,
            ready: false,
        }
    }

    /// Sets the balance, consuming and returning the token.
    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Returns the ticker symbol.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Returns the token's decimal precision.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Returns the last tracked USD price.
    #[must_use]
    pub const fn usd_price(&self) -> f64 {
        self.usd_price
    }

    /// Returns the balance in base units.
    #[must_use]
    pub const fn balance(&self) -> U256 {
        self.balance
    }

    /// Returns the minimum bootstrap balance (zero once ready).
    #[must_use]
    pub const fn minimum_balance(&self) -> U256 {
        self.minimum_balance
    }

    /// Returns the current denormalized weight.
    #[must_use]
    pub const fn denorm(&self) -> U256 {
        self.denorm
    }

    /// Returns the target denormalized weight.
    #[must_use]
    pub const fn target_denorm(&self) -> U256 {
        self.target_denorm
    }

    /// Returns `true` once the token has crossed its bootstrap threshold.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// USD value of the current balance.
    #[must_use]
    pub fn usd_value(&self) -> f64 {
        format_balance(self.balance, self.decimals) * self.usd_price
    }

    /// Updates the tracked USD price.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidPrice`] for non-finite or non-positive
    /// prices.
    pub fn set_usd_price(&mut self, usd_price: f64) -> Result<(), PoolError> {
        if !usd_price.is_finite() || usd_price <= 0.0 {
            return Err(PoolError::InvalidPrice("token price must be finite and positive"));
        }
        self.usd_price = usd_price;
        Ok(())
    }
}
