//! Weighted pool implementation (Balancer style).
//!
//! The pool holds N tokens priced by the weighted constant-product
//! invariant and migrates their weights toward externally supplied
//! targets over time.
//!
//! # Token lifecycle
//!
//! ```text
//!             balance > minimum                 denorm < MIN_WEIGHT
//! not-ready ───────────────────▶ ready ─────────────────────────────▶ evicted
//!  (priced at minimum balance     (denorm steps toward target,
//!   and an inflated weight)        at most 1 step per delay)
//! ```
//!
//! - A **not-ready** token trades against its minimum balance with an
//!   effective weight of `MIN_WEIGHT × (1 + shortfall / 10)`, so
//!   arbitrageurs are paid to fill it.
//! - Once its balance strictly exceeds the minimum it becomes **ready**
//!   with `denorm = MIN_WEIGHT × (1 + excess / minimum)`.
//! - A ready token's `denorm` moves toward `target_denorm` by at most
//!   `denorm × weight_change_fraction`, and only after
//!   `min_reweigh_delay` seconds since its previous adjustment.
//! - A decrease that leaves `denorm` below [`MIN_WEIGHT`] **evicts** the
//!   token: 98% of its USD value is redistributed over the remaining
//!   tokens in proportion to their weights.
//!
//! # Swap caps
//!
//! | Check | Error |
//! |-------|-------|
//! | output token ready | [`PoolError::OutputNotReady`] |
//! | `amount_in ≤ usable_in / 2` | [`PoolError::MaxInRatio`] |
//! | `amount_out ≤ balance_out / 3` | [`PoolError::MaxOutRatio`] |
//! | `amount_in > 0` | [`PoolError::ZeroAmount`] |
//!
//! # Token order
//!
//! Eviction removes a token with `swap_remove`: the last token takes the
//! evicted token's slot, so insertion order is **not** preserved.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::config::{WeightedPoolConfig, WeightedPoolSettings};
use crate::domain::{Direction, PoolToken, RebalanceLog, ReindexUpdate, Symbol, WeightUpdate};
use crate::error::PoolError;
use crate::math::{
    bdiv, bmul, calc_all_in_given_pool_out, calc_in_given_out, calc_in_given_price,
    calc_out_given_in, calc_single_in_given_pool_out, calc_spot_price, format_balance, to_f64,
    to_token_amount, CheckedArithmetic, BONE, MIN_WEIGHT, U256,
};
use crate::traits::{FromConfig, TokenSet};

/// Fraction of an evicted token's value returned to the pool.
const EVICTION_RECOVERY: f64 = 0.98;

/// Arbitrage profits above this many USD are logged at debug level.
const LARGE_PROFIT_USD: f64 = 1_000.0;

/// A weighted AMM pool with bootstrap, weight migration and eviction.
///
/// Created from a [`WeightedPoolConfig`] via [`FromConfig`].
///
/// # Example
///
/// ```rust
/// use index_backtest::config::{WeightedPoolConfig, WeightedPoolSettings};
/// use index_backtest::domain::{Decimals, PoolToken};
/// use index_backtest::math::{BONE, U256};
/// use index_backtest::pools::WeightedPool;
/// use index_backtest::traits::FromConfig;
///
/// let tokens = vec![
///     PoolToken::new("AAA", Decimals::MAX, 1.0, BONE * 1_000u64, BONE * 10u64),
///     PoolToken::new("BBB", Decimals::MAX, 1.0, BONE * 1_000u64, BONE * 10u64),
/// ];
/// let settings = WeightedPoolSettings::default().with_swap_fee(U256::zero());
/// let cfg = WeightedPoolConfig::new(tokens, 0, BONE * 100u64, settings).expect("valid");
/// let mut pool = WeightedPool::from_config(&cfg).expect("pool");
///
/// let out = pool
///     .swap_exact_tokens_for_tokens("AAA", "BBB", BONE * 10u64)
///     .expect("swap");
/// assert!(out < BONE * 10u64);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPool {
    tokens: Vec<PoolToken>,
    timestamp: u64,
    total_supply: U256,
    settings: WeightedPoolSettings,
    /// Time of each token's last weight adjustment.
    last_update: HashMap<Symbol, u64>,
    rebalance_log: Vec<RebalanceLog>,
}

impl FromConfig<WeightedPoolConfig> for WeightedPool {
    fn from_config(config: &WeightedPoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let timestamp = config.timestamp();
        let last_update = config
            .tokens()
            .iter()
            .map(|t| (t.symbol().clone(), timestamp))
            .collect();
        Ok(Self {
            tokens: config.tokens().to_vec(),
            timestamp,
            total_supply: config.total_supply(),
            settings: *config.settings(),
            last_update,
            rebalance_log: Vec::new(),
        })
    }
}

impl WeightedPool {
    // -- accessors -------------------------------------------------------------

    /// Returns the pool's simulated clock.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Returns the trading parameters.
    #[must_use]
    pub const fn settings(&self) -> &WeightedPoolSettings {
        &self.settings
    }

    /// Returns every weight adjustment applied so far, oldest first.
    #[must_use]
    pub fn rebalance_log(&self) -> &[RebalanceLog] {
        &self.rebalance_log
    }

    /// Returns the time of the last weight adjustment of `symbol`.
    #[must_use]
    pub fn last_update(&self, symbol: &str) -> Option<u64> {
        self.last_update.get(symbol).copied()
    }

    /// Advances the simulated clock.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Sum of all denormalized weights.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] past 256 bits.
    pub fn total_denorm(&self) -> Result<U256, PoolError> {
        self.tokens
            .iter()
            .try_fold(U256::zero(), |acc, t| acc.safe_add(&t.denorm))
    }

    /// Balance used for pricing: the minimum balance until the token is
    /// ready.
    #[must_use]
    pub fn usable_balance(token: &PoolToken) -> U256 {
        if token.ready {
            token.balance
        } else {
            token.minimum_balance
        }
    }

    /// Weight used for pricing.
    ///
    /// Not-ready tokens get `MIN_WEIGHT` plus a premium of up to 10% of
    /// `MIN_WEIGHT`, proportional to their shortfall.
    ///
    /// # Errors
    ///
    /// Propagates fixed-point failures.
    pub fn usable_denorm(&self, token: &PoolToken) -> Result<U256, PoolError> {
        if !self.settings.reweigh() || token.ready {
            return Ok(token.denorm);
        }
        if token.minimum_balance.is_zero() {
            return Ok(MIN_WEIGHT);
        }
        let shortfall = token.minimum_balance.saturating_sub(token.balance);
        let ratio = bdiv(shortfall, token.minimum_balance)?;
        let premium = bmul(MIN_WEIGHT / 10u64, ratio)?;
        MIN_WEIGHT.safe_add(&premium)
    }

    /// Fee-free spot price of `token_in` in units of `token_out`, using
    /// usable balances and weights.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownToken`] or a fixed-point failure.
    pub fn spot_price(&self, token_in: &str, token_out: &str) -> Result<U256, PoolError> {
        let tin = &self.tokens[self.index_of(token_in)?];
        let tout = &self.tokens[self.index_of(token_out)?];
        calc_spot_price(
            Self::usable_balance(tin),
            self.usable_denorm(tin)?,
            tout.balance,
            tout.denorm,
            U256::zero(),
        )
    }

    fn index_of(&self, symbol: &str) -> Result<usize, PoolError> {
        self.tokens
            .iter()
            .position(|t| t.symbol.as_str() == symbol)
            .ok_or_else(|| PoolError::UnknownToken(symbol.to_owned()))
    }

    fn weight_percent(&self, denorm: U256) -> Result<f64, PoolError> {
        let total = to_f64(self.total_denorm()?);
        if total > 0.0 {
            Ok(to_f64(denorm) / total * 100.0)
        } else {
            Ok(0.0)
        }
    }

    /// Drops last-update entries of tokens no longer held.
    fn sync_last_update(&mut self) {
        let tokens = &self.tokens;
        self.last_update
            .retain(|symbol, _| tokens.iter().any(|t| &t.symbol == symbol));
    }

    fn adjustment_due(&self, symbol: &Symbol) -> bool {
        self.last_update.get(symbol).map_or(true, |last| {
            self.timestamp.saturating_sub(*last) >= self.settings.min_reweigh_delay()
        })
    }

    // -- weight state machine ---------------------------------------------------

    /// Re-evaluates a token whose balance just increased: bootstraps it
    /// if it crossed its minimum, otherwise steps its weight up.
    fn update_input_token(&mut self, index: usize) -> Result<(), PoolError> {
        if !self.settings.reweigh() {
            return Ok(());
        }
        if self.tokens[index].ready {
            return self.adjust_weight_in(index);
        }
        let token = &self.tokens[index];
        if token.balance <= token.minimum_balance {
            return Ok(());
        }
        let extra = token.balance.safe_sub(&token.minimum_balance)?;
        let ratio = if token.minimum_balance.is_zero() {
            U256::zero()
        } else {
            bdiv(extra, token.minimum_balance)?
        };
        let denorm = MIN_WEIGHT.safe_add(&bmul(MIN_WEIGHT, ratio)?)?;
        let symbol = token.symbol.clone();

        let token = &mut self.tokens[index];
        token.ready = true;
        token.denorm = denorm;
        token.minimum_balance = U256::zero();
        self.last_update.insert(symbol.clone(), self.timestamp);

        let new_weight = self.weight_percent(denorm)?;
        debug!(token = %symbol, new_weight, "token bootstrapped");
        self.rebalance_log.push(RebalanceLog {
            token: symbol,
            direction: Direction::Up,
            old_weight: 0.0,
            new_weight,
        });
        Ok(())
    }

    fn adjust_weight_in(&mut self, index: usize) -> Result<(), PoolError> {
        let token = &self.tokens[index];
        if !self.settings.reweigh()
            || !token.ready
            || token.denorm >= token.target_denorm
            || !self.adjustment_due(&token.symbol)
        {
            return Ok(());
        }
        let old_weight = self.weight_percent(token.denorm)?;
        let max_diff = bmul(token.denorm, self.settings.weight_change_fraction())?;
        let diff = token.target_denorm.safe_sub(&token.denorm)?;
        let denorm = if diff > max_diff {
            token.denorm.safe_add(&max_diff)?
        } else {
            token.target_denorm
        };
        let symbol = token.symbol.clone();
        self.tokens[index].denorm = denorm;
        self.record_adjustment(symbol, Direction::Up, old_weight, denorm)
    }

    fn adjust_weight_out(&mut self, index: usize) -> Result<(), PoolError> {
        let token = &self.tokens[index];
        if !self.settings.reweigh()
            || !token.ready
            || token.target_denorm >= token.denorm
            || !self.adjustment_due(&token.symbol)
        {
            return Ok(());
        }
        let old_weight = self.weight_percent(token.denorm)?;
        let max_diff = bmul(token.denorm, self.settings.weight_change_fraction())?;
        let diff = token.denorm.safe_sub(&token.target_denorm)?;
        let denorm = if diff > max_diff {
            token.denorm.safe_sub(&max_diff)?
        } else {
            token.target_denorm
        };
        let symbol = token.symbol.clone();
        self.tokens[index].denorm = denorm;
        self.record_adjustment(symbol, Direction::Down, old_weight, denorm)?;
        if denorm < MIN_WEIGHT {
            self.remove_token(index)?;
        }
        Ok(())
    }

    fn record_adjustment(
        &mut self,
        symbol: Symbol,
        direction: Direction,
        old_weight: f64,
        denorm: U256,
    ) -> Result<(), PoolError> {
        let new_weight = self.weight_percent(denorm)?;
        self.last_update.insert(symbol.clone(), self.timestamp);
        self.rebalance_log.push(RebalanceLog {
            token: symbol,
            direction,
            old_weight,
            new_weight,
        });
        Ok(())
    }

    /// Evicts the token at `index` and redistributes 98% of its value
    /// over the remaining tokens by weight.
    fn remove_token(&mut self, index: usize) -> Result<(), PoolError> {
        let removed = self.tokens.swap_remove(index);
        self.last_update.remove(removed.symbol.as_str());
        let redeemed = removed.usd_value() * EVICTION_RECOVERY;
        debug!(token = %removed.symbol, redeemed, "token evicted");

        let total = to_f64(self.total_denorm()?);
        if total <= 0.0 {
            return Ok(());
        }
        for token in &mut self.tokens {
            let share = to_f64(token.denorm) / total;
            let amount = to_token_amount(share * redeemed / token.usd_price, token.decimals)?;
            token.balance = token.balance.safe_add(&amount)?;
        }
        Ok(())
    }

    // -- trading -----------------------------------------------------------------

    /// Sells exactly `amount_in` of `token_in` for `token_out`.
    ///
    /// On success both balances change, `token_in` is re-evaluated for
    /// bootstrap or a weight increase, and `token_out` for a weight
    /// decrease (which may evict it).
    ///
    /// # Errors
    ///
    /// - [`PoolError::UnknownToken`] for a symbol not in the pool.
    /// - [`PoolError::IdenticalTokens`] if both sides are the same.
    /// - [`PoolError::OutputNotReady`], [`PoolError::MaxInRatio`],
    ///   [`PoolError::MaxOutRatio`], [`PoolError::ZeroAmount`] as listed
    ///   in the module docs, checked in that order.
    pub fn swap_exact_tokens_for_tokens(
        &mut self,
        token_in: &str,
        token_out: &str,
        amount_in: U256,
    ) -> Result<U256, PoolError> {
        let i = self.index_of(token_in)?;
        let o = self.index_of(token_out)?;
        if i == o {
            return Err(PoolError::IdenticalTokens(token_in.to_owned()));
        }
        if !self.tokens[o].ready {
            return Err(PoolError::OutputNotReady(token_out.to_owned()));
        }
        if amount_in > Self::usable_balance(&self.tokens[i]) / 2u64 {
            return Err(PoolError::MaxInRatio);
        }
        let amount_out = self.out_given_in(i, o, amount_in)?;
        if amount_out > self.tokens[o].balance / 3u64 {
            return Err(PoolError::MaxOutRatio);
        }
        if amount_in.is_zero() {
            return Err(PoolError::ZeroAmount);
        }

        self.tokens[i].balance = self.tokens[i].balance.safe_add(&amount_in)?;
        self.tokens[o].balance = self.tokens[o].balance.safe_sub(&amount_out)?;
        self.update_input_token(i)?;
        self.adjust_weight_out(o)?;
        Ok(amount_out)
    }

    fn out_given_in(&self, i: usize, o: usize, amount_in: U256) -> Result<U256, PoolError> {
        let tin = &self.tokens[i];
        let tout = &self.tokens[o];
        calc_out_given_in(
            Self::usable_balance(tin),
            self.usable_denorm(tin)?,
            tout.balance,
            tout.denorm,
            amount_in,
            self.settings.swap_fee(),
        )
    }

    /// Mints `pool_out` shares against a single-token deposit of
    /// `token_in` and returns the amount deposited.
    ///
    /// # Errors
    ///
    /// - [`PoolError::UnknownToken`] for a symbol not in the pool.
    /// - [`PoolError::ZeroAmount`] if `pool_out` is zero.
    /// - [`PoolError::MaxInRatio`] if the deposit exceeds half of the
    ///   token's usable balance.
    pub fn join_swap_pool_amount_out(
        &mut self,
        token_in: &str,
        pool_out: U256,
    ) -> Result<U256, PoolError> {
        let i = self.index_of(token_in)?;
        if pool_out.is_zero() {
            return Err(PoolError::ZeroAmount);
        }
        let tin = &self.tokens[i];
        let usable = Self::usable_balance(tin);
        let amount_in = calc_single_in_given_pool_out(
            usable,
            self.usable_denorm(tin)?,
            self.total_supply,
            self.total_denorm()?,
            pool_out,
            self.settings.swap_fee(),
        )?;
        if amount_in > usable / 2u64 {
            return Err(PoolError::MaxInRatio);
        }
        self.total_supply = self.total_supply.safe_add(&pool_out)?;
        self.tokens[i].balance = self.tokens[i].balance.safe_add(&amount_in)?;
        self.update_input_token(i)?;
        Ok(amount_in)
    }

    /// Mints `pool_out` shares against a proportional deposit of every
    /// token and returns the amounts deposited, in token order.
    ///
    /// # Errors
    ///
    /// Propagates fixed-point failures.
    pub fn join_pool(&mut self, pool_out: U256) -> Result<Vec<U256>, PoolError> {
        let balances: Vec<U256> = self.tokens.iter().map(Self::usable_balance).collect();
        let amounts = calc_all_in_given_pool_out(&balances, self.total_supply, pool_out)?;
        for (token, amount) in self.tokens.iter_mut().zip(&amounts) {
            token.balance = token.balance.safe_add(amount)?;
        }
        self.total_supply = self.total_supply.safe_add(&pool_out)?;
        Ok(amounts)
    }

    /// Adds swap-fee income to a token and re-evaluates its weight.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownToken`] or a fixed-point failure.
    pub fn credit_balance(&mut self, symbol: &str, amount: U256) -> Result<(), PoolError> {
        let i = self.index_of(symbol)?;
        self.tokens[i].balance = self.tokens[i].balance.safe_add(&amount)?;
        if !self.settings.reweigh() {
            return Ok(());
        }
        let token = &self.tokens[i];
        if !token.ready && token.balance > token.minimum_balance {
            self.update_input_token(i)
        } else if token.denorm > token.target_denorm {
            self.adjust_weight_out(i)
        } else if token.target_denorm > token.denorm {
            self.update_input_token(i)
        } else {
            Ok(())
        }
    }

    // -- arbitrage ---------------------------------------------------------------

    /// Executes the most profitable trade that moves the pool price of
    /// `token_out` toward its external price, and returns the USD profit.
    ///
    /// Returns `0.0` when no trade clears the minimum profit or when the
    /// swap is rejected by a precondition.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnknownToken`] or a fixed-point failure.
    pub fn swap_max_profit(&mut self, token_in: &str, token_out: &str) -> Result<f64, PoolError> {
        match self.try_swap_max_profit(token_in, token_out) {
            Ok(profit) => Ok(profit),
            Err(e) if e.is_swap_rejection() => {
                trace!(token_in, token_out, error = %e, "arbitrage swap rejected");
                Ok(0.0)
            }
            Err(e) => Err(e),
        }
    }

    fn try_swap_max_profit(&mut self, token_in: &str, token_out: &str) -> Result<f64, PoolError> {
        let i = self.index_of(token_in)?;
        let o = self.index_of(token_out)?;
        let tin = &self.tokens[i];
        let tout = &self.tokens[o];
        let balance_in = Self::usable_balance(tin);
        let weight_in = self.usable_denorm(tin)?;
        let balance_out = tout.balance;
        let weight_out = tout.denorm;
        if balance_in.is_zero()
            || balance_out.is_zero()
            || weight_in.is_zero()
            || weight_out.is_zero()
        {
            return Ok(0.0);
        }

        let Some(external) = external_price(tin, tout)? else {
            return Ok(0.0);
        };
        let swap_fee = self.settings.swap_fee();
        let fee_complement = BONE.safe_sub(&swap_fee)?;
        let market = calc_spot_price(balance_in, weight_in, balance_out, weight_out, U256::zero())?;
        let buy_price = bdiv(market, fee_complement)?;
        let target_price = bmul(external, fee_complement)?;
        if target_price <= buy_price {
            return Ok(0.0);
        }

        let mut amount_in = calc_in_given_price(
            balance_in,
            weight_in,
            balance_out,
            weight_out,
            target_price,
            swap_fee,
        )?;
        if amount_in.is_zero() {
            return Ok(0.0);
        }
        let max_in = balance_in / 2u64;
        if amount_in > max_in {
            amount_in = max_in;
        }
        let mut amount_out = self.out_given_in(i, o, amount_in)?;
        if amount_out > balance_out / 3u64 {
            amount_out = balance_out / 4u64;
            amount_in = calc_in_given_out(
                balance_in,
                weight_in,
                balance_out,
                weight_out,
                amount_out,
                swap_fee,
            )?;
            amount_out = self.out_given_in(i, o, amount_in)?;
        }

        let value_in = format_balance(amount_in, tin.decimals) * tin.usd_price;
        let value_out = format_balance(amount_out, tout.decimals) * tout.usd_price;
        if value_in >= value_out {
            return Ok(0.0);
        }
        let profit = value_out - value_in;
        if profit < self.settings.minimum_trader_profit() {
            return Ok(0.0);
        }
        self.swap_exact_tokens_for_tokens(token_in, token_out, amount_in)?;
        Ok(profit)
    }

    /// Runs one arbitrage pass over every ordered pair of tokens and
    /// returns the total USD profit.
    ///
    /// Each pair is traded repeatedly until a trade yields no profit or
    /// the per-pair iteration bound is reached.  Earlier pairs are not
    /// revisited.  Pairs involving a token evicted during the pass are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Propagates fixed-point failures; swap rejections count as zero
    /// profit.
    pub fn arb(&mut self) -> Result<f64, PoolError> {
        let mut total = 0.0;
        let mut i = 0;
        while i < self.tokens.len() {
            let mut j = 0;
            while j < self.tokens.len() {
                if i == j || !self.tokens[j].ready {
                    j += 1;
                    continue;
                }
                let token_in = self.tokens[i].symbol.clone();
                let token_out = self.tokens[j].symbol.clone();
                for iteration in 0..self.settings.max_arb_iterations() {
                    if self.index_of(token_in.as_str()).is_err()
                        || self.index_of(token_out.as_str()).is_err()
                    {
                        break;
                    }
                    let profit = self.swap_max_profit(token_in.as_str(), token_out.as_str())?;
                    total += profit;
                    if iteration == 0 && profit > LARGE_PROFIT_USD {
                        debug!(
                            profit,
                            token_in = %token_in,
                            token_out = %token_out,
                            "large arbitrage"
                        );
                    }
                    if profit <= 0.0 {
                        break;
                    }
                }
                j += 1;
            }
            i += 1;
        }
        Ok(total)
    }
}

/// External price of `token_in` in units of `token_out`: how many base
/// units of `token_in` one USD buys, over the same for `token_out`.
///
/// `None` if one USD buys less than one base unit of `token_out`.
fn external_price(token_in: &PoolToken, token_out: &PoolToken) -> Result<Option<U256>, PoolError> {
    let per_usd_in = to_token_amount(1.0 / token_in.usd_price, token_in.decimals)?;
    let per_usd_out = to_token_amount(1.0 / token_out.usd_price, token_out.decimals)?;
    if per_usd_out.is_zero() {
        return Ok(None);
    }
    bdiv(per_usd_in, per_usd_out).map(Some)
}

impl TokenSet for WeightedPool {
    fn tokens(&self) -> &[PoolToken] {
        &self.tokens
    }

    fn total_supply(&self) -> U256 {
        self.total_supply
    }

    fn reweighing_enabled(&self) -> bool {
        self.settings.reweigh()
    }

    fn desired_symbols(&self) -> Vec<Symbol> {
        self.tokens
            .iter()
            .filter(|t| !t.target_denorm.is_zero())
            .map(|t| t.symbol.clone())
            .collect()
    }

    /// Targets below [`MIN_WEIGHT`] are raised to it; minimum balances
    /// only change for tokens that are not ready.
    fn reweigh_tokens(&mut self, updates: &[WeightUpdate]) -> Result<(), PoolError> {
        if !self.settings.reweigh() {
            return Ok(());
        }
        for update in updates {
            let i = self.index_of(update.symbol.as_str())?;
            let token = &mut self.tokens[i];
            token.target_denorm = update.target_denorm.max(MIN_WEIGHT);
            if !token.ready {
                token.minimum_balance = update.minimum_balance;
            }
        }
        Ok(())
    }

    /// New symbols join as not-ready tokens with zero balance; held
    /// symbols missing from `updates` get a zero target and decay out.
    fn reindex_tokens(&mut self, updates: &[ReindexUpdate]) -> Result<(), PoolError> {
        if !self.settings.reweigh() {
            return Ok(());
        }
        let previous = self.symbols();
        for update in updates {
            let target = &update.target;
            match self.index_of(target.symbol.as_str()) {
                Ok(i) => {
                    let token = &mut self.tokens[i];
                    token.set_usd_price(update.usd_price)?;
                    token.target_denorm = target.target_denorm;
                    if !token.ready {
                        token.minimum_balance = target.minimum_balance;
                    }
                }
                Err(_) => {
                    debug!(token = %target.symbol, "token added by reindex");
                    self.tokens.push(PoolToken::pending(
                        target.symbol.clone(),
                        update.decimals,
                        update.usd_price,
                        target.minimum_balance,
                        target.target_denorm,
                    ));
                }
            }
        }
        for symbol in previous {
            if !updates.iter().any(|u| u.symbol() == &symbol) {
                if let Ok(i) = self.index_of(symbol.as_str()) {
                    self.tokens[i].target_denorm = U256::zero();
                }
            }
        }
        self.sync_last_update();
        Ok(())
    }

    fn set_usd_price(&mut self, symbol: &str, usd_price: f64) -> Result<(), PoolError> {
        let i = self.index_of(symbol)?;
        self.tokens[i].set_usd_price(usd_price)
    }
}
