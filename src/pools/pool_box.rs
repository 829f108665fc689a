//! Enum dispatch wrapper for both pool types.
//!
//! [`PoolBox`] wraps every concrete pool implementation behind a single
//! enum, so the simulation controller can own "a pool" without `dyn`
//! trait objects.

use super::baseline::BaselinePool;
use super::weighted::WeightedPool;

use crate::domain::{PoolToken, RebalanceLog, ReindexUpdate, Symbol, WeightUpdate};
use crate::error::PoolError;
use crate::math::U256;
use crate::traits::TokenSet;

/// Static dispatch enum wrapping the concrete pool implementations.
///
/// The enum implements [`TokenSet`] by delegating every method to the
/// inner pool via `match`.  Curve-specific operations (joins, credits,
/// arbitrage) are reached through [`as_weighted_mut`](Self::as_weighted_mut).
///
/// # Example
///
/// ```text
/// let pool_box = PoolBox::Weighted(Box::new(weighted_pool));
/// let value = pool_box.value_per_share();
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PoolBox {
    /// Weighted pool (Balancer style).
    Weighted(Box<WeightedPool>),

    /// Directly rebalanced basket.
    Baseline(Box<BaselinePool>),
}

/// Delegates a method call to every `PoolBox` variant.
macro_rules! delegate {
    ($self:ident, $method:ident ( $($arg:expr),* )) => {
        match $self {
            PoolBox::Weighted(p) => p.$method($($arg),*),
            PoolBox::Baseline(p) => p.$method($($arg),*),
        }
    };
}

impl PoolBox {
    /// Returns the weighted pool, if this is one.
    #[must_use]
    pub fn as_weighted(&self) -> Option<&WeightedPool> {
        match self {
            Self::Weighted(p) => Some(p),
            Self::Baseline(_) => None,
        }
    }

    /// Returns the weighted pool mutably, if this is one.
    pub fn as_weighted_mut(&mut self) -> Option<&mut WeightedPool> {
        match self {
            Self::Weighted(p) => Some(p),
            Self::Baseline(_) => None,
        }
    }

    /// Weight adjustments applied so far; always empty for a baseline.
    #[must_use]
    pub fn rebalance_log(&self) -> &[RebalanceLog] {
        match self {
            Self::Weighted(p) => p.rebalance_log(),
            Self::Baseline(_) => &[],
        }
    }

    /// Returns a short label for the variant.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Weighted(_) => "weighted",
            Self::Baseline(_) => "baseline",
        }
    }
}

impl From<WeightedPool> for PoolBox {
    fn from(pool: WeightedPool) -> Self {
        Self::Weighted(Box::new(pool))
    }
}

impl From<BaselinePool> for PoolBox {
    fn from(pool: BaselinePool) -> Self {
        Self::Baseline(Box::new(pool))
    }
}

impl TokenSet for PoolBox {
    fn tokens(&self) -> &[PoolToken] {
        delegate!(self, tokens())
    }

    fn total_supply(&self) -> U256 {
        delegate!(self, total_supply())
    }

    fn reweighing_enabled(&self) -> bool {
        delegate!(self, reweighing_enabled())
    }

    fn desired_symbols(&self) -> Vec<Symbol> {
        delegate!(self, desired_symbols())
    }

    fn reweigh_tokens(&mut self, updates: &[WeightUpdate]) -> Result<(), PoolError> {
        delegate!(self, reweigh_tokens(updates))
    }

    fn reindex_tokens(&mut self, updates: &[ReindexUpdate]) -> Result<(), PoolError> {
        delegate!(self, reindex_tokens(updates))
    }

    fn set_usd_price(&mut self, symbol: &str, usd_price: f64) -> Result<(), PoolError> {
        delegate!(self, set_usd_price(symbol, usd_price))
    }
}
