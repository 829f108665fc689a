//! Target-weight updates requested by the simulation.

use super::{Decimals, Symbol};
use crate::math::U256;

/// New target for a token already tracked by the pool.
///
/// `weight` is the normalized target fraction (used by the baseline
/// pool); `target_denorm` is the same target scaled for the weighted
/// pool.  `minimum_balance` only applies to tokens that are not ready.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightUpdate {
    /// Token the update applies to.
    pub symbol: Symbol,
    /// Normalized weight fraction in `[0, 1]`.
    pub weight: f64,
    /// Target denormalized weight (BONE-scaled).
    pub target_denorm: U256,
    /// Minimum bootstrap balance in base units.
    pub minimum_balance: U256,
}

/// New basket member produced by a reindex.
///
/// Carries the price and precision needed to admit a symbol the pool has
/// never held.
#[derive(Debug, Clone, PartialEq)]
pub struct ReindexUpdate {
    /// Target weights for the symbol.
    pub target: WeightUpdate,
    /// Current USD price.
    pub usd_price: f64,
    /// Token precision.
    pub decimals: Decimals,
}

impl ReindexUpdate {
    /// Returns the symbol this update refers to.
    #[must_use]
    pub fn symbol(&self) -> &Symbol {
        &self.target.symbol
    }
}
