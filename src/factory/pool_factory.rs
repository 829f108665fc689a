//! Pool factory implementation.

use tracing::info;

use crate::config::{
    BaselinePoolConfig, PoolConfig, PoolKind, SimulationConfig, WeightedPoolConfig,
};
use crate::domain::PoolToken;
use crate::error::PoolError;
use crate::math::{fraction_to_bone, to_token_amount};
use crate::pools::{BaselinePool, PoolBox, WeightedPool};
use crate::traits::{FromConfig, PriceFeed};

/// Stateless factory for creating pools.
///
/// `PoolFactory` is the single entry point for constructing either pool
/// variant.  [`create`](Self::create) matches on the [`PoolConfig`]
/// variant, validates it, delegates to the pool's [`FromConfig`]
/// implementation and wraps the result in a [`PoolBox`].
/// [`build`](Self::build) additionally derives the configuration from a
/// price feed and a [`SimulationConfig`].
///
/// # Thread Safety
///
/// Both constructors are pure functions of their inputs; concurrent
/// simulations may call them freely.
///
/// # Example
///
/// ```rust
/// use index_backtest::config::{PoolConfig, WeightedPoolConfig, WeightedPoolSettings};
/// use index_backtest::domain::{Decimals, PoolToken};
/// use index_backtest::factory::PoolFactory;
/// use index_backtest::math::BONE;
/// use index_backtest::traits::TokenSet;
///
/// let tokens = vec![
///     PoolToken::new("AAA", Decimals::MAX, 1.0, BONE * 100u64, BONE),
///     PoolToken::new("BBB", Decimals::MAX, 1.0, BONE * 100u64, BONE),
/// ];
/// let cfg = WeightedPoolConfig::new(tokens, 0, BONE, WeightedPoolSettings::default())
///     .expect("valid config");
///
/// let pool = PoolFactory::create(&PoolConfig::Weighted(cfg)).expect("pool created");
/// assert!((pool.value_per_share() - 200.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolFactory;

impl PoolFactory {
    /// Creates a new pool instance from the given configuration.
    ///
    /// # Errors
    ///
    /// Any validation error of the configuration, or any error
    /// propagated from the pool's `from_config` method.
    pub fn create(config: &PoolConfig) -> Result<PoolBox, PoolError> {
        config.validate()?;

        match config {
            PoolConfig::Weighted(cfg) => {
                let pool = WeightedPool::from_config(cfg)?;
                Ok(PoolBox::Weighted(Box::new(pool)))
            }
            PoolConfig::Baseline(cfg) => {
                let pool = BaselinePool::from_config(cfg)?;
                Ok(PoolBox::Baseline(Box::new(pool)))
            }
        }
    }

    /// Initial basket at step 0.
    ///
    /// The `size` tokens with the largest time-weighted market cap are
    /// selected and weighted by the square root of it.  Each token is
    /// ready, funded with `weight × initial_value` USD, and carries a
    /// denormalized weight of `weight × weight_multiplier`.
    ///
    /// # Errors
    ///
    /// - [`PoolError::EmptyTokenSet`] if the feed ranks no token.
    /// - Any feed or conversion error.
    pub fn initial_basket<F>(
        feed: &F,
        config: &SimulationConfig,
    ) -> Result<Vec<PoolToken>, PoolError>
    where
        F: PriceFeed + ?Sized,
    {
        let ranked = feed.top_symbols(0, config.size)?;
        if ranked.is_empty() {
            return Err(PoolError::EmptyTokenSet);
        }
        let symbols: Vec<_> = ranked.iter().map(|t| t.symbol.clone()).collect();
        let weights = feed.weights_for(0, &symbols)?;
        ranked
            .into_iter()
            .zip(weights)
            .map(|(token, weight)| {
                let denorm = fraction_to_bone(weight * config.schedule.weight_multiplier)?;
                let usd = weight * config.initial_value;
                let balance = to_token_amount(usd / token.usd_price, token.decimals)?;
                Ok(PoolToken::new(
                    token.symbol,
                    token.decimals,
                    token.usd_price,
                    balance,
                    denorm,
                ))
            })
            .collect()
    }

    /// Pool configuration for one simulation run, built from the feed's
    /// state at step 0.
    ///
    /// # Errors
    ///
    /// Any error from [`initial_basket`](Self::initial_basket) or from
    /// validating the resulting configuration.
    pub fn config_for<F>(feed: &F, config: &SimulationConfig) -> Result<PoolConfig, PoolError>
    where
        F: PriceFeed + ?Sized,
    {
        config.validate()?;
        let tokens = Self::initial_basket(feed, config)?;
        let supply = config.initial_supply_amount()?;
        match config.kind {
            PoolKind::Weighted => Ok(PoolConfig::Weighted(WeightedPoolConfig::new(
                tokens,
                feed.timestamp_at(0)?,
                supply,
                config.weighted_settings()?,
            )?)),
            PoolKind::Baseline => Ok(PoolConfig::Baseline(BaselinePoolConfig::new(
                tokens,
                supply,
                config.reweigh,
            )?)),
        }
    }

    /// Builds the pool for one simulation run.
    ///
    /// # Errors
    ///
    /// See [`config_for`](Self::config_for) and [`create`](Self::create).
    pub fn build<F>(feed: &F, config: &SimulationConfig) -> Result<PoolBox, PoolError>
    where
        F: PriceFeed + ?Sized,
    {
        let pool_config = Self::config_for(feed, config)?;
        info!(
            name = %config.name,
            kind = %config.kind,
            tokens = pool_config.tokens().len(),
            "pool created"
        );
        Self::create(&pool_config)
    }
}
