//! Property-based tests using `proptest` for weighted-pool invariants.
//!
//! 1. **Weight step bound**: one adjustment moves `denorm` by at most
//!    `denorm × weight_change_fraction`.
//! 2. **Bootstrap threshold**: a token becomes ready iff its balance
//!    strictly exceeds its minimum; the minimum is zero afterwards.
//! 3. **Eviction value**: eviction removes exactly 2% of the evicted
//!    token's value from the pool.
//! 4. **Arbitrage profitability**: every executed arbitrage trade clears
//!    the configured minimum, matches the value the pool gives up, and a
//!    declined trade leaves balances untouched.
//! 5. **Proportional join**: balances grow by the supply ratio and the
//!    supply grows exactly.
//! 6. **Swap reversibility**: a round trip A→B→A never returns more
//!    than was sold.

use proptest::prelude::*;

use crate::config::{WeightedPoolConfig, WeightedPoolSettings};
use crate::domain::{Decimals, PoolToken, ReindexUpdate, Symbol, WeightUpdate};
use crate::math::{bmul, bone_to_f64, BONE, MIN_WEIGHT, U256};
use crate::pools::WeightedPool;
use crate::traits::{FromConfig, TokenSet};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn b(v: u64) -> U256 {
    BONE * v
}

fn make_pool(tokens: Vec<PoolToken>, settings: WeightedPoolSettings) -> WeightedPool {
    let Ok(cfg) = WeightedPoolConfig::new(tokens, 0, b(100), settings) else {
        panic!("valid config");
    };
    let Ok(pool) = WeightedPool::from_config(&cfg) else {
        panic!("valid pool");
    };
    pool
}

fn ready(symbol: &str, balance: u64, denorm: U256) -> PoolToken {
    PoolToken::new(symbol, Decimals::MAX, 1.0, b(balance), denorm)
}

fn settings(min_profit: f64) -> WeightedPoolSettings {
    WeightedPoolSettings::default().with_minimum_trader_profit(min_profit)
}

fn target(symbol: &str, target_denorm: U256) -> WeightUpdate {
    WeightUpdate {
        symbol: Symbol::from(symbol),
        weight: 0.0,
        target_denorm,
        minimum_balance: U256::zero(),
    }
}

fn denorm_of(pool: &WeightedPool, symbol: &str) -> U256 {
    pool.token(symbol).map_or(U256::zero(), PoolToken::denorm)
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Whole-token balances in [1_000, 10_000_000].
fn balance_strategy() -> impl Strategy<Value = u64> {
    1_000u64..=10_000_000u64
}

/// Denormalized weights in [1, 50] BONE, in hundredths.
fn denorm_strategy() -> impl Strategy<Value = U256> {
    (100u64..=5_000u64).prop_map(|v| BONE / 100u64 * v)
}

/// Price multipliers in [0.2, 5.0].
fn price_strategy() -> impl Strategy<Value = f64> {
    (20u32..=500u32).prop_map(|v| f64::from(v) / 100.0)
}

// ---------------------------------------------------------------------------
// Property 1: Weight step bound
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_weight_step_is_bounded(
        denorm in denorm_strategy(),
        goal in denorm_strategy(),
        balance in balance_strategy(),
    ) {
        let mut pool = make_pool(
            vec![ready("A", balance, denorm), ready("B", balance, b(10))],
            settings(5.0),
        );
        prop_assert!(pool.reweigh_tokens(&[target("A", goal)]).is_ok());
        pool.set_timestamp(3_600);
        prop_assert!(pool.credit_balance("A", U256::one()).is_ok());

        let Ok(max_step) = bmul(denorm, pool.settings().weight_change_fraction()) else {
            return Ok(());
        };
        let after = denorm_of(&pool, "A");
        let moved = if after > denorm { after - denorm } else { denorm - after };
        prop_assert!(moved <= max_step, "moved {} > step {}", moved, max_step);
        if goal != denorm {
            prop_assert!(!moved.is_zero(), "a due adjustment must move the weight");
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Bootstrap threshold
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_bootstrap_requires_strict_excess(
        minimum in 1u64..=100_000u64,
        credit in 0u64..=200_000u64,
    ) {
        let mut pool = make_pool(
            vec![
                ready("A", 1_000_000, b(10)),
                PoolToken::pending("C", Decimals::MAX, 1.0, b(minimum), b(5)),
            ],
            settings(5.0),
        );
        prop_assert!(pool.credit_balance("C", b(credit)).is_ok());
        let Some(c) = pool.token("C") else {
            return Err(TestCaseError::fail("token C missing"));
        };
        prop_assert_eq!(c.is_ready(), credit > minimum);
        if c.is_ready() {
            prop_assert!(c.minimum_balance().is_zero());
            prop_assert!(c.denorm() > MIN_WEIGHT);
        } else {
            prop_assert!(c.denorm().is_zero());
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Eviction value
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_eviction_burns_two_percent(
        ra in balance_strategy(),
        rb in balance_strategy(),
        rc in 1_000u64..=100_000u64,
        wa in denorm_strategy(),
        wb in denorm_strategy(),
    ) {
        let low = MIN_WEIGHT + MIN_WEIGHT / 200u64;
        let mut pool = make_pool(
            vec![ready("A", ra, wa), ready("B", rb, wb), ready("C", rc, low)],
            settings(5.0),
        );
        let evicted_value = pool.token("C").map_or(0.0, PoolToken::usd_value);
        let before = pool.market_cap();
        pool.set_timestamp(3_600);
        // a reindex without C zeroes its target
        let keep = [keep_update("A", wa), keep_update("B", wb)];
        prop_assert!(pool.reindex_tokens(&keep).is_ok());
        prop_assert!(pool.credit_balance("C", U256::one()).is_ok());

        prop_assert!(pool.token("C").is_none());
        let expected = before - 0.02 * evicted_value;
        prop_assert!(
            (pool.market_cap() - expected).abs() <= expected * 1e-9,
            "value {} != expected {}",
            pool.market_cap(),
            expected
        );
    }
}

fn keep_update(symbol: &str, denorm: U256) -> ReindexUpdate {
    ReindexUpdate {
        target: target(symbol, denorm),
        usd_price: 1.0,
        decimals: Decimals::MAX,
    }
}

// ---------------------------------------------------------------------------
// Property 4: Arbitrage profitability
// ---------------------------------------------------------------------------

fn balance_of(pool: &WeightedPool, symbol: &str) -> U256 {
    pool.token(symbol).map_or(U256::zero(), PoolToken::balance)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_every_arb_trade_clears_minimum_profit(
        ra in balance_strategy(),
        rb in balance_strategy(),
        price in price_strategy(),
        min_profit in 0u32..=1_000u32,
    ) {
        let min_profit = f64::from(min_profit);
        let mut pool = make_pool(
            vec![ready("A", ra, b(10)), ready("B", rb, b(10))],
            settings(min_profit).with_reweigh(false),
        );
        prop_assert!(pool.set_usd_price("B", price).is_ok());

        for (token_in, token_out) in [("A", "B"), ("B", "A")] {
            for _ in 0..64 {
                let in_before = balance_of(&pool, token_in);
                let out_before = balance_of(&pool, token_out);
                let Ok(profit) = pool.swap_max_profit(token_in, token_out) else {
                    return Err(TestCaseError::fail("swap_max_profit failed"));
                };
                let in_after = balance_of(&pool, token_in);
                let out_after = balance_of(&pool, token_out);
                if profit == 0.0 {
                    prop_assert_eq!(in_after, in_before);
                    prop_assert_eq!(out_after, out_before);
                    break;
                }
                prop_assert!(profit >= min_profit, "trade profit {} < {}", profit, min_profit);
                prop_assert!(in_after > in_before && out_after < out_before);

                let price_of = |s: &str| pool.token(s).map_or(0.0, PoolToken::usd_price);
                let paid = bone_to_f64(in_after - in_before) * price_of(token_in);
                let taken = bone_to_f64(out_before - out_after) * price_of(token_out);
                prop_assert!(taken > paid);
                prop_assert!(
                    ((taken - paid) - profit).abs() <= 1e-9 * taken.max(1.0),
                    "pool lost {} but trade reported {}",
                    taken - paid,
                    profit
                );
            }
        }
    }

    #[test]
    fn prop_arb_total_never_negative(
        ra in balance_strategy(),
        rb in balance_strategy(),
        price in price_strategy(),
    ) {
        let mut pool = make_pool(
            vec![ready("A", ra, b(10)), ready("B", rb, b(10))],
            settings(5.0),
        );
        prop_assert!(pool.set_usd_price("B", price).is_ok());
        let Ok(profit) = pool.arb() else {
            return Err(TestCaseError::fail("arb failed"));
        };
        prop_assert!(profit >= 0.0);
    }
}

// ---------------------------------------------------------------------------
// Property 5: Proportional join
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_join_pool_is_proportional(
        ra in balance_strategy(),
        rb in balance_strategy(),
        shares in 1u64..=1_000u64,
    ) {
        let mut pool = make_pool(
            vec![ready("A", ra, b(10)), ready("B", rb, b(20))],
            settings(5.0),
        );
        let supply = pool.total_supply();
        let Ok(amounts) = pool.join_pool(b(shares)) else {
            return Err(TestCaseError::fail("join failed"));
        };
        prop_assert_eq!(pool.total_supply(), supply + b(shares));

        let ratio = bone_to_f64(b(shares)) / bone_to_f64(supply);
        for (amount, original) in amounts.iter().zip([ra, rb]) {
            let expected = ratio * original as f64;
            let got = bone_to_f64(*amount);
            prop_assert!((got - expected).abs() <= expected * 1e-9);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Swap reversibility
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip_loses_value(
        ra in balance_strategy(),
        rb in balance_strategy(),
        wa in denorm_strategy(),
    ) {
        let mut pool = make_pool(
            vec![ready("A", ra, wa), ready("B", rb, b(10))],
            settings(5.0).with_reweigh(false),
        );
        let swap_in = b((ra / 1_000).max(1));
        let Ok(received) = pool.swap_exact_tokens_for_tokens("A", "B", swap_in) else {
            return Ok(());
        };
        if received.is_zero() { return Ok(()); }
        let Ok(back) = pool.swap_exact_tokens_for_tokens("B", "A", received) else {
            return Ok(());
        };
        prop_assert!(back <= swap_in, "round trip returned {} > {}", back, swap_in);
    }
}
