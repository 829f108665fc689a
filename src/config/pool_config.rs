//! Top-level pool configuration enum.
//!
//! [`PoolConfig`] is the declarative blueprint for creating either pool
//! variant.  Each variant wraps a pool-specific configuration struct that
//! fully describes the pool's initial state.
//!
//! # Factory Integration
//!
//! ```text
//! match config {
//!     PoolConfig::Weighted(cfg) => WeightedPool::from_config(&cfg),
//!     PoolConfig::Baseline(cfg) => BaselinePool::from_config(&cfg),
//! }
//! ```

use super::{BaselinePoolConfig, WeightedPoolConfig};
use crate::domain::PoolToken;
use crate::error::PoolError;

/// Configuration for one of the two pool variants.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolConfig {
    /// Bonding-curve pool with gradual weight migration and arbitrage.
    Weighted(WeightedPoolConfig),
    /// Directly rebalanced holder.
    Baseline(BaselinePoolConfig),
}

impl PoolConfig {
    /// Validates the inner configuration.
    ///
    /// # Errors
    ///
    /// Returns the same [`PoolError`] the inner `validate()` would.
    pub fn validate(&self) -> Result<(), PoolError> {
        match self {
            Self::Weighted(cfg) => cfg.validate(),
            Self::Baseline(cfg) => cfg.validate(),
        }
    }

    /// Initial tokens of either variant.
    #[must_use]
    pub fn tokens(&self) -> &[PoolToken] {
        match self {
            Self::Weighted(cfg) => cfg.tokens(),
            Self::Baseline(cfg) => cfg.tokens(),
        }
    }

    /// Returns `true` for [`Weighted`](Self::Weighted).
    #[must_use]
    pub const fn is_weighted(&self) -> bool {
        matches!(self, Self::Weighted(_))
    }

    /// Returns `true` for [`Baseline`](Self::Baseline).
    #[must_use]
    pub const fn is_baseline(&self) -> bool {
        matches!(self, Self::Baseline(_))
    }
}

impl core::fmt::Display for PoolConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Weighted(_) => write!(f, "Weighted"),
            Self::Baseline(_) => write!(f, "Baseline"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::WeightedPoolSettings;
    use crate::domain::Decimals;
    use crate::math::BONE;

    fn tokens() -> Vec<PoolToken> {
        vec![PoolToken::new("A", Decimals::MAX, 1.0, BONE, BONE)]
    }

    #[test]
    fn display_and_predicates() {
        let Ok(w) = WeightedPoolConfig::new(tokens(), 0, BONE, WeightedPoolSettings::default())
        else {
            panic!("expected Ok");
        };
        let Ok(b) = BaselinePoolConfig::new(tokens(), BONE, true) else {
            panic!("expected Ok");
        };
        let w = PoolConfig::Weighted(w);
        let b = PoolConfig::Baseline(b);
        assert!(w.is_weighted() && !w.is_baseline());
        assert!(b.is_baseline());
        assert_eq!(w.to_string(), "Weighted");
        assert_eq!(b.to_string(), "Baseline");
        assert!(w.validate().is_ok());
        assert_eq!(b.tokens().len(), 1);
    }
}
