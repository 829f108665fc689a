//! Shared token-set contract implemented by every pool variant.
//!
//! [`TokenSet`] is what the simulation controller needs from a pool
//! regardless of how it prices trades: the owned token collection, the
//! share supply, price refreshes and the two target-weight updates.
//!
//! # Provided methods
//!
//! | Method | Derived from |
//! |--------|--------------|
//! | [`token`](TokenSet::token) | linear search over [`tokens`](TokenSet::tokens) |
//! | [`symbols`](TokenSet::symbols) | token order |
//! | [`market_cap`](TokenSet::market_cap) | `Σ balance × price` |
//! | [`value_per_share`](TokenSet::value_per_share) | `market_cap / supply` |

use crate::domain::{PoolToken, ReindexUpdate, Symbol, WeightUpdate};
use crate::error::PoolError;
use crate::math::{bone_to_f64, U256};

/// Token collection and share accounting common to all pools.
pub trait TokenSet {
    /// Tokens currently held, in pool order.
    ///
    /// Order is not stable across evictions.
    fn tokens(&self) -> &[PoolToken];

    /// Outstanding pool shares (18 decimals).
    fn total_supply(&self) -> U256;

    /// Whether target-weight updates take effect.
    fn reweighing_enabled(&self) -> bool;

    /// Symbols the pool still wants to hold at the next reweigh.
    fn desired_symbols(&self) -> Vec<Symbol>;

    /// Applies new target weights to tokens already in the pool.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownToken`] for a symbol the pool does not
    /// hold, or an arithmetic error from rebalancing.
    fn reweigh_tokens(&mut self, updates: &[WeightUpdate]) -> Result<(), PoolError>;

    /// Replaces the desired basket.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic or conversion error from rebalancing.
    fn reindex_tokens(&mut self, updates: &[ReindexUpdate]) -> Result<(), PoolError>;

    /// Refreshes the tracked USD price of one token.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownToken`] or [`PoolError::InvalidPrice`].
    fn set_usd_price(&mut self, symbol: &str, usd_price: f64) -> Result<(), PoolError>;

    /// Looks up a token by symbol.
    fn token(&self, symbol: &str) -> Option<&PoolToken> {
        self.tokens().iter().find(|t| t.symbol().as_str() == symbol)
    }

    /// Symbols of all held tokens, in pool order.
    fn symbols(&self) -> Vec<Symbol> {
        self.tokens().iter().map(|t| t.symbol().clone()).collect()
    }

    /// Total USD value of all balances.
    fn market_cap(&self) -> f64 {
        self.tokens().iter().map(PoolToken::usd_value).sum()
    }

    /// USD value of one pool share.
    fn value_per_share(&self) -> f64 {
        let supply = bone_to_f64(self.total_supply());
        if supply > 0.0 {
            self.market_cap() / supply
        } else {
            0.0
        }
    }
}
