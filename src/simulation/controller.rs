//! Tick-driven simulation of one pool over a price feed.
//!
//! # Tick
//!
//! ```text
//! step += 1
//! refresh every token price from the feed
//! if reweighing and the rebalance delay elapsed:
//!     counter += 1
//!     counter % reindex_every == 0 ? reindex : reweigh
//! if weighted:
//!     proportional join of supply × daily_join_volume / 24
//!     swap-fee credit per token
//!     advance the pool clock, then arbitrage
//! log value per share
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{PoolKind, SimulationConfig};
use crate::domain::{
    Decimals, RebalanceLog, ReindexUpdate, Symbol, ValueLogEntry, WeightUpdate,
};
use crate::error::PoolError;
use crate::factory::PoolFactory;
use crate::math::{bmul, fraction_to_bone, to_token_amount, U256};
use crate::pools::PoolBox;
use crate::traits::{PriceFeed, TokenSet};

/// Outcome of one simulated pool variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Variant label from the configuration.
    pub name: String,
    /// Pool implementation.
    pub kind: PoolKind,
    /// Value per share at every simulated step after the first.
    pub value_log: Vec<ValueLogEntry>,
    /// Weight adjustments; empty for baseline pools.
    pub rebalance_log: Vec<RebalanceLog>,
    /// USD captured by arbitrageurs over the whole run.
    pub total_arb_profit: f64,
}

impl SimulationReport {
    /// Value per share at the end of the run.
    #[must_use]
    pub fn final_value(&self) -> Option<f64> {
        self.value_log.last().map(|e| e.usd_value)
    }
}

/// Scheduled target update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rebalance {
    Reweigh,
    Reindex,
}

/// Drives one pool through every step of a [`PriceFeed`].
///
/// Controllers are single-use: build one with [`new`](Self::new), then
/// either call [`run`](Self::run) or step manually with
/// [`tick`](Self::tick).
#[derive(Debug)]
pub struct SimulationController<'a, F: PriceFeed + ?Sized> {
    feed: &'a F,
    config: SimulationConfig,
    pool: PoolBox,
    step: usize,
    last_rebalance: u64,
    rebalance_count: u64,
    value_log: Vec<ValueLogEntry>,
    total_arb_profit: f64,
}

impl<'a, F: PriceFeed + ?Sized> SimulationController<'a, F> {
    /// Validates `config` and builds the pool from the feed's first step.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfiguration`] for an invalid configuration
    ///   or a feed shorter than two steps.
    /// - [`PoolError::EmptyTokenSet`] if the initial basket is empty.
    /// - Any feed error at step 0.
    pub fn new(feed: &'a F, config: SimulationConfig) -> Result<Self, PoolError> {
        config.validate()?;
        if feed.len() < 2 {
            return Err(PoolError::InvalidConfiguration(
                "price feed needs at least two steps",
            ));
        }
        let pool = PoolFactory::build(feed, &config)?;
        let last_rebalance = feed.timestamp_at(0)?;
        Ok(Self {
            feed,
            config,
            pool,
            step: 0,
            last_rebalance,
            rebalance_count: 0,
            value_log: Vec::new(),
            total_arb_profit: 0.0,
        })
    }

    /// Returns the current step.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Returns the simulated pool.
    #[must_use]
    pub const fn pool(&self) -> &PoolBox {
        &self.pool
    }

    /// Number of scheduled rebalances applied so far.
    #[must_use]
    pub const fn rebalance_count(&self) -> u64 {
        self.rebalance_count
    }

    /// Timestamp of the last scheduled rebalance.
    #[must_use]
    pub const fn last_rebalance(&self) -> u64 {
        self.last_rebalance
    }

    /// Value log recorded so far.
    #[must_use]
    pub fn value_log(&self) -> &[ValueLogEntry] {
        &self.value_log
    }

    /// Returns `true` once the last step has been simulated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.step + 1 >= self.feed.len()
    }

    /// Advances the simulation by one step.
    ///
    /// # Errors
    ///
    /// - [`PoolError::StepOutOfRange`] after the last step.
    /// - [`PoolError::MissingPrice`] if the feed lacks a held token.
    /// - Any pool or arithmetic error.
    pub fn tick(&mut self) -> Result<(), PoolError> {
        if self.is_finished() {
            return Err(PoolError::StepOutOfRange {
                step: self.step + 1,
                len: self.feed.len(),
            });
        }
        self.step += 1;
        let timestamp = self.feed.timestamp_at(self.step)?;
        self.refresh_prices()?;

        match self.scheduled_rebalance(timestamp) {
            Some(Rebalance::Reindex) => self.reindex()?,
            Some(Rebalance::Reweigh) => self.reweigh()?,
            None => {}
        }
        if self.pool.as_weighted().is_some() {
            self.apply_flows(timestamp)?;
        }

        self.value_log.push(ValueLogEntry {
            timestamp,
            usd_value: self.pool.value_per_share(),
        });
        Ok(())
    }

    /// Ticks until the end of the feed and returns the report.
    ///
    /// # Errors
    ///
    /// Any error from [`tick`](Self::tick).
    pub fn run(mut self) -> Result<SimulationReport, PoolError> {
        info!(
            name = %self.config.name,
            kind = %self.config.kind,
            steps = self.feed.len(),
            "simulation started"
        );
        while !self.is_finished() {
            self.tick()?;
        }
        let report = self.into_report();
        info!(
            name = %report.name,
            final_value = report.final_value().unwrap_or_default(),
            arb_profit = report.total_arb_profit,
            rebalances = report.rebalance_log.len(),
            "simulation finished"
        );
        Ok(report)
    }

    /// Consumes the controller into its report.
    #[must_use]
    pub fn into_report(self) -> SimulationReport {
        SimulationReport {
            name: self.config.name,
            kind: self.config.kind,
            value_log: self.value_log,
            rebalance_log: self.pool.rebalance_log().to_vec(),
            total_arb_profit: self.total_arb_profit,
        }
    }

    fn refresh_prices(&mut self) -> Result<(), PoolError> {
        for symbol in self.pool.symbols() {
            let quote = self.feed.price_at(self.step, symbol.as_str())?;
            self.pool.set_usd_price(symbol.as_str(), quote.usd_price)?;
        }
        Ok(())
    }

    fn scheduled_rebalance(&mut self, timestamp: u64) -> Option<Rebalance> {
        if !self.config.reweigh {
            return None;
        }
        let schedule = &self.config.schedule;
        if timestamp.saturating_sub(self.last_rebalance) < schedule.reweigh_delay {
            return None;
        }
        self.rebalance_count += 1;
        self.last_rebalance = timestamp;
        if schedule.is_reindex(self.rebalance_count) {
            Some(Rebalance::Reindex)
        } else {
            Some(Rebalance::Reweigh)
        }
    }

    fn minimum_balance(
        &self,
        market_cap: f64,
        usd_price: f64,
        decimals: Decimals,
    ) -> Result<U256, PoolError> {
        to_token_amount(
            market_cap * self.config.minimum_balance_fraction / usd_price,
            decimals,
        )
    }

    fn target_denorm(&self, weight: f64) -> Result<U256, PoolError> {
        fraction_to_bone(weight * self.config.schedule.weight_multiplier)
    }

    fn reweigh(&mut self) -> Result<(), PoolError> {
        let symbols = self.pool.desired_symbols();
        if symbols.is_empty() {
            return Ok(());
        }
        let market_cap = self.pool.market_cap();
        let weights = self.feed.weights_for(self.step, &symbols)?;
        let mut updates = Vec::with_capacity(symbols.len());
        for (symbol, weight) in symbols.into_iter().zip(weights) {
            let quote = self.feed.price_at(self.step, symbol.as_str())?;
            updates.push(WeightUpdate {
                minimum_balance: self.minimum_balance(market_cap, quote.usd_price, quote.decimals)?,
                target_denorm: self.target_denorm(weight)?,
                symbol,
                weight,
            });
        }
        debug!(step = self.step, tokens = updates.len(), "reweigh");
        self.pool.reweigh_tokens(&updates)
    }

    fn reindex(&mut self) -> Result<(), PoolError> {
        let market_cap = self.pool.market_cap();
        let ranked = self.feed.top_symbols(self.step, self.config.size)?;
        let symbols: Vec<Symbol> = ranked.iter().map(|t| t.symbol.clone()).collect();
        let weights = self.feed.weights_for(self.step, &symbols)?;
        let mut updates = Vec::with_capacity(ranked.len());
        for (token, weight) in ranked.into_iter().zip(weights) {
            updates.push(ReindexUpdate {
                target: WeightUpdate {
                    minimum_balance: self.minimum_balance(
                        market_cap,
                        token.usd_price,
                        token.decimals,
                    )?,
                    target_denorm: self.target_denorm(weight)?,
                    symbol: token.symbol,
                    weight,
                },
                usd_price: token.usd_price,
                decimals: token.decimals,
            });
        }
        info!(step = self.step, basket = ?symbols, "reindex");
        self.pool.reindex_tokens(&updates)
    }

    /// Synthetic joins and swap-fee income, then arbitrage.
    fn apply_flows(&mut self, timestamp: u64) -> Result<(), PoolError> {
        let join_fraction = fraction_to_bone(self.config.daily_join_volume / 24.0)?;
        let hourly_swap = self.config.daily_swap_volume / 24.0;
        let swap_fee = self.config.swap_fee;
        let Some(pool) = self.pool.as_weighted_mut() else {
            return Ok(());
        };

        let join = bmul(pool.total_supply(), join_fraction)?;
        if !join.is_zero() {
            pool.join_pool(join)?;
        }

        let symbols = pool.symbols();
        #[allow(clippy::cast_precision_loss)]
        let per_token_usd = hourly_swap * pool.market_cap() * swap_fee / symbols.len() as f64;
        for symbol in &symbols {
            // evicted by an earlier credit
            let Some(token) = pool.token(symbol.as_str()) else {
                continue;
            };
            let amount = to_token_amount(per_token_usd / token.usd_price(), token.decimals())?;
            pool.credit_balance(symbol.as_str(), amount)?;
        }

        pool.set_timestamp(timestamp);
        let profit = pool.arb()?;
        self.total_arb_profit += profit;
        Ok(())
    }
}
