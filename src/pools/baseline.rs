//! Baseline pool: a directly rebalanced basket.
//!
//! The baseline has no bonding curve, no fee and no caps.  A reweigh
//! reassigns each listed token's balance to `weight × value / price`,
//! where `value` is the basket's market value before the update.  A
//! reindex replaces the basket outright in the same way.  With
//! reweighing disabled the basket is held unchanged (buy and hold).

use tracing::debug;

use crate::config::BaselinePoolConfig;
use crate::domain::{PoolToken, ReindexUpdate, Symbol, WeightUpdate};
use crate::error::PoolError;
use crate::math::{to_token_amount, U256};
use crate::traits::{FromConfig, TokenSet};

/// A basket rebalanced by direct balance assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselinePool {
    tokens: Vec<PoolToken>,
    total_supply: U256,
    reweigh: bool,
}

impl FromConfig<BaselinePoolConfig> for BaselinePool {
    fn from_config(config: &BaselinePoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self {
            tokens: config.tokens().to_vec(),
            total_supply: config.total_supply(),
            reweigh: config.reweigh(),
        })
    }
}

fn target_balance(weight: f64, total: f64, token: &PoolToken) -> Result<U256, PoolError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(PoolError::InvalidWeight("weight must be finite and non-negative"));
    }
    to_token_amount(weight * total / token.usd_price, token.decimals)
}

impl TokenSet for BaselinePool {
    fn tokens(&self) -> &[PoolToken] {
        &self.tokens
    }

    fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn reweighing_enabled(&self) -> bool {
        self.reweigh
    }

    fn desired_symbols(&self) -> Vec<Symbol> {
        self.symbols()
    }

    fn reweigh_tokens(&mut self, updates: &[WeightUpdate]) -> Result<(), PoolError> {
        if !self.reweigh {
            return Ok(());
        }
        let total = self.market_cap();
        for update in updates {
            let token = self
                .tokens
                .iter_mut()
                .find(|t| t.symbol == update.symbol)
                .ok_or_else(|| PoolError::UnknownToken(update.symbol.to_string()))?;
            let balance = target_balance(update.weight, total, token)?;
            token.balance = balance;
            token.target_denorm = update.target_denorm;
            token.denorm = update.target_denorm;
        }
        Ok(())
    }

    fn reindex_tokens(&mut self, updates: &[ReindexUpdate]) -> Result<(), PoolError> {
        if !self.reweigh {
            return Ok(());
        }
        let total = self.market_cap();
        let mut tokens = Vec::with_capacity(updates.len());
        for update in updates {
            let mut token = PoolToken::new(
                update.symbol().clone(),
                update.decimals,
                update.usd_price,
                U256::zero(),
                update.target.target_denorm,
            );
            token.set_usd_price(update.usd_price)?;
            token.balance = target_balance(update.target.weight, total, &token)?;
            tokens.push(token);
        }
        debug!(
            from = self.tokens.len(),
            to = tokens.len(),
            total,
            "baseline basket replaced"
        );
        self.tokens = tokens;
        Ok(())
    }

    fn set_usd_price(&mut self, symbol: &str, usd_price: f64) -> Result<(), PoolError> {
        self.tokens
            .iter_mut()
            .find(|t| t.symbol.as_str() == symbol)
            .ok_or_else(|| PoolError::UnknownToken(symbol.to_owned()))?
            .set_usd_price(usd_price)
    }
}
