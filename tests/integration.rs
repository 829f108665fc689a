//! Integration tests exercising the full system from raw prices to reports.
//!
//! These tests verify end-to-end flows through the public API:
//! factory round-trip, reference pool scenarios, series alignment,
//! multi-variant runs, request handling and the weight schedule.

#![allow(clippy::panic)]

use index_backtest::config::{
    BacktestRequest, BaselinePoolConfig, PoolConfig, PoolKind, RebalanceSchedule,
    SimulationConfig, WeightedPoolConfig, WeightedPoolSettings,
};
use index_backtest::domain::{Decimals, PoolToken, Symbol};
use index_backtest::factory::PoolFactory;
use index_backtest::feed::{HistoricalSeries, RawPrice, SeriesBuilder, TokenHistory, HOUR};
use index_backtest::math::{bone_to_f64, BONE, MIN_WEIGHT, U256};
use index_backtest::pools::PoolBox;
use index_backtest::simulation::{
    run_backtest, run_request, weight_schedule, SimulationController, SimulationReport,
};
use index_backtest::traits::{PriceFeed, TokenSet};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn b(v: u64) -> U256 {
    BONE * v
}

fn history(symbol: &str, supply: f64, prices: &[(u64, f64)]) -> TokenHistory {
    TokenHistory {
        symbol: Symbol::from(symbol),
        decimals: Decimals::MAX,
        total_supply: supply,
        prices: prices
            .iter()
            .map(|&(hour, usd_price)| RawPrice {
                timestamp: 1_600_000_000 + hour * HOUR,
                usd_price,
            })
            .collect(),
    }
}

/// 25 hourly frames from observations every third hour.
fn trending_series() -> HistoricalSeries {
    let sparse = |f: fn(u64) -> f64| -> Vec<(u64, f64)> {
        (0..=8).map(|k| (k * 3, f(k * 3))).collect()
    };
    #[allow(clippy::cast_precision_loss)]
    let Ok(series) = SeriesBuilder::new()
        .token(history("AAA", 1_000.0, &sparse(|h| 1.0 + 0.02 * h as f64)))
        .token(history("BBB", 2_000.0, &sparse(|h| 2.0 - 0.03 * h as f64)))
        .token(history("CCC", 500.0, &sparse(|_| 1.5)))
        .build()
    else {
        panic!("aligned series");
    };
    series
}

/// Six hourly frames in which CCC overtakes BBB at hour 3.
fn overtaking_series() -> HistoricalSeries {
    let flat = |p: f64| -> Vec<(u64, f64)> { (0..6).map(|h| (h, p)).collect() };
    let ccc: Vec<(u64, f64)> = (0..6)
        .map(|h| (h, if h >= 3 { 1_000.0 } else { 1.0 }))
        .collect();
    let Ok(series) = SeriesBuilder::new()
        .twap_window(0)
        .token(history("AAA", 100.0, &flat(1.0)))
        .token(history("BBB", 100.0, &flat(0.9)))
        .token(history("CCC", 1.0, &ccc))
        .build()
    else {
        panic!("aligned series");
    };
    series
}

fn sim(name: &str, kind: PoolKind, reweigh: bool) -> SimulationConfig {
    SimulationConfig {
        name: name.to_owned(),
        kind,
        reweigh,
        size: 2,
        initial_value: 100_000.0,
        daily_swap_volume: 0.5,
        daily_join_volume: 0.01,
        schedule: RebalanceSchedule {
            reweigh_delay: 6 * HOUR,
            reindex_every: 2,
            ..RebalanceSchedule::default()
        },
        ..SimulationConfig::default()
    }
}

fn token(symbol: &str, price: f64, balance: U256, denorm: U256) -> PoolToken {
    PoolToken::new(symbol, Decimals::MAX, price, balance, denorm)
}

fn weighted_box(tokens: Vec<PoolToken>) -> PoolBox {
    let Ok(cfg) = WeightedPoolConfig::new(tokens, 0, b(100), WeightedPoolSettings::default())
    else {
        panic!("valid weighted config");
    };
    let Ok(pool) = PoolFactory::create(&PoolConfig::Weighted(cfg)) else {
        panic!("pool created");
    };
    pool
}

fn balances(pool: &PoolBox) -> Vec<U256> {
    pool.tokens().iter().map(PoolToken::balance).collect()
}

// ===========================================================================
// Suite 1: Factory Round-Trip
// ===========================================================================

#[test]
fn factory_round_trip_weighted() {
    let pool = weighted_box(vec![
        token("A", 1.0, b(1_000), b(10)),
        token("B", 2.0, b(500), b(10)),
    ]);
    assert_eq!(pool.kind_name(), "weighted");
    assert_eq!(pool.tokens().len(), 2);
    // 2 000 USD over 100 shares
    assert!((pool.value_per_share() - 20.0).abs() < 1e-9);
}

#[test]
fn factory_round_trip_baseline() {
    let Ok(cfg) = BaselinePoolConfig::new(
        vec![token("A", 1.0, b(1_000), BONE), token("B", 2.0, b(500), BONE)],
        b(10),
        false,
    ) else {
        panic!("valid baseline config");
    };
    let Ok(pool) = PoolFactory::create(&PoolConfig::Baseline(cfg)) else {
        panic!("pool created");
    };
    assert_eq!(pool.kind_name(), "baseline");
    assert!(pool.rebalance_log().is_empty());
    assert!((pool.value_per_share() - 200.0).abs() < 1e-9);
}

#[test]
fn factory_builds_initial_basket_from_feed() {
    let series = trending_series();
    let Ok(tokens) = PoolFactory::initial_basket(&series, &sim("index", PoolKind::Weighted, true))
    else {
        panic!("basket built");
    };
    let symbols: Vec<&str> = tokens.iter().map(|t| t.symbol().as_str()).collect();
    // BBB (4 000) outranks AAA (1 000) and CCC (750)
    assert_eq!(symbols, ["BBB", "AAA"]);
    let value: f64 = tokens.iter().map(PoolToken::usd_value).sum();
    assert!((value - 100_000.0).abs() < 1e-6);
}

// ===========================================================================
// Suite 2: Reference Pool Scenarios
// ===========================================================================

#[test]
fn swap_on_deep_pool_is_convex() {
    let mut pool = weighted_box(vec![
        token("A", 1.0, b(1_000_000), BONE / 2u64),
        token("B", 2.0, b(500_000), BONE / 2u64),
    ]);
    let Some(weighted) = pool.as_weighted_mut() else {
        panic!("weighted pool");
    };
    let Ok(first) = weighted.swap_exact_tokens_for_tokens("A", "B", b(1_000)) else {
        panic!("first swap");
    };
    let Ok(second) = weighted.swap_exact_tokens_for_tokens("A", "B", b(1_000)) else {
        panic!("second swap");
    };
    assert!(first < b(500));
    assert!(first > b(490));
    assert!(second < first);
}

#[test]
fn credit_past_minimum_bootstraps_token() {
    let mut pool = weighted_box(vec![
        token("A", 1.0, b(1_000), b(10)),
        PoolToken::pending("C", Decimals::MAX, 1.0, b(1_000), b(5)),
    ]);
    let Some(weighted) = pool.as_weighted_mut() else {
        panic!("weighted pool");
    };
    let Ok(()) = weighted.credit_balance("C", b(1_200)) else {
        panic!("credit ok");
    };
    let Some(c) = pool.token("C") else {
        panic!("token present");
    };
    assert!(c.is_ready());
    assert!(c.minimum_balance().is_zero());
    assert_eq!(c.denorm(), MIN_WEIGHT + MIN_WEIGHT / 5u64);
    assert_eq!(pool.rebalance_log().len(), 1);
}

#[test]
fn equilibrium_pool_is_not_arbitraged() {
    let mut pool = weighted_box(vec![
        token("A", 1.0, b(1_000), b(10)),
        token("B", 2.0, b(500), b(10)),
    ]);
    let before = balances(&pool);
    let Some(weighted) = pool.as_weighted_mut() else {
        panic!("weighted pool");
    };
    let Ok(profit) = weighted.arb() else {
        panic!("arb ok");
    };
    assert!(profit.abs() < f64::EPSILON);
    assert_eq!(balances(&pool), before);
}

#[test]
fn baseline_without_reweigh_holds_balances_for_ten_steps() {
    let prices: Vec<(u64, f64)> = (0..10).map(|h| (h, 1.0 + h as f64 / 10.0)).collect();
    let Ok(series) = SeriesBuilder::new()
        .token(history("AAA", 100.0, &prices))
        .token(history("BBB", 50.0, &[(0, 3.0), (9, 1.0)]))
        .build()
    else {
        panic!("aligned series");
    };
    assert_eq!(series.len(), 10);
    let Ok(mut controller) =
        SimulationController::new(&series, sim("hodl", PoolKind::Baseline, false))
    else {
        panic!("controller built");
    };
    let initial = balances(controller.pool());
    while !controller.is_finished() {
        let Ok(()) = controller.tick() else {
            panic!("tick ok");
        };
    }
    assert_eq!(balances(controller.pool()), initial);
    assert_eq!(controller.value_log().len(), 9);
    assert_eq!(controller.rebalance_count(), 0);
}

// ===========================================================================
// Suite 3: Multi-Variant Runs
// ===========================================================================

fn run_three_variants() -> Vec<SimulationReport> {
    let series = trending_series();
    let configs = [
        sim("index", PoolKind::Weighted, true),
        sim("balancer", PoolKind::Weighted, false),
        sim("baseline", PoolKind::Baseline, true),
    ];
    let Ok(reports) = run_backtest(&series, &configs) else {
        panic!("backtest ran");
    };
    reports
}

#[test]
fn variants_share_the_timeline() {
    let reports = run_three_variants();
    let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["index", "balancer", "baseline"]);
    for report in &reports {
        assert_eq!(report.value_log.len(), 24);
        assert!(report
            .value_log
            .windows(2)
            .all(|w| w[0].timestamp < w[1].timestamp));
        assert!(report
            .value_log
            .iter()
            .all(|e| e.usd_value.is_finite() && e.usd_value > 0.0));
    }
    assert_eq!(
        reports[0].value_log.first().map(|e| e.timestamp),
        Some(1_600_000_000 + HOUR)
    );
}

#[test]
fn static_pool_never_rebalances() {
    let reports = run_three_variants();
    assert!(reports[1].rebalance_log.is_empty());
    assert!(reports[2].rebalance_log.is_empty());
    assert!(reports[1].total_arb_profit > 0.0);
    assert!(reports[2].total_arb_profit.abs() < f64::EPSILON);
}

#[test]
fn runs_are_deterministic() {
    assert_eq!(run_three_variants(), run_three_variants());
}

// ===========================================================================
// Suite 4: Requests and Reports
// ===========================================================================

#[test]
fn json_request_round_trip() {
    let json = r#"{
        "tokens": ["AAA", "BBB"],
        "size": 2,
        "swapFee": 0.25,
        "initialValue": 50000,
        "dailySwapVolume": 20,
        "balancer": true,
        "hodl": true
    }"#;
    let Ok(request) = serde_json::from_str::<BacktestRequest>(json) else {
        panic!("request parsed");
    };
    let Ok(reports) = run_request(&trending_series(), &request) else {
        panic!("request ran");
    };
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].kind, PoolKind::Weighted);
    assert_eq!(reports[1].kind, PoolKind::Baseline);

    let Ok(value) = serde_json::to_value(&reports) else {
        panic!("reports serialize");
    };
    assert_eq!(value[0]["name"], "balancer");
    assert_eq!(value[0]["kind"], "weighted");
    assert_eq!(value[1]["valueLog"].as_array().map(Vec::len), Some(24));
    assert!(value[1]["totalArbProfit"].is_number());
}

#[test]
fn series_snapshot_round_trip() {
    let series = trending_series();
    let Ok(json) = serde_json::to_string(&series) else {
        panic!("series serializes");
    };
    let Ok(back) = serde_json::from_str::<HistoricalSeries>(&json) else {
        panic!("series parses");
    };
    assert!(back.validate().is_ok());
    assert_eq!(back.len(), series.len());
    assert_eq!(back.timestamp_at(24), series.timestamp_at(24));
}

#[test]
fn invalid_inputs_fail_gracefully() {
    let series = trending_series();
    let bad_fee = SimulationConfig {
        swap_fee: 1.5,
        ..sim("index", PoolKind::Weighted, true)
    };
    assert!(run_backtest(&series, &[bad_fee]).is_err());

    let request = BacktestRequest {
        tokens: vec![Symbol::from("AAA"), Symbol::from("ZZZ")],
        size: 2,
        swap_fee: 0.25,
        initial_value: 1_000.0,
        daily_join_volume: 0.0,
        daily_swap_volume: 0.0,
        index: true,
        balancer: false,
        baseline: false,
        minimum_trader_profit: None,
    };
    assert!(run_request(&series, &request).is_err());
}

// ===========================================================================
// Suite 5: Weight Schedule
// ===========================================================================

#[test]
fn schedule_matches_rebalanced_baseline() {
    let series = overtaking_series();
    let cadence = RebalanceSchedule {
        reweigh_delay: HOUR,
        reindex_every: 4,
        ..RebalanceSchedule::default()
    };
    let Ok(schedule) = weight_schedule(&series, &series.symbols(), 2, &cadence) else {
        panic!("schedule computed");
    };
    assert_eq!(schedule.timestamps.len(), 6);

    let config = SimulationConfig {
        schedule: cadence,
        ..sim("baseline", PoolKind::Baseline, true)
    };
    let Ok(mut controller) = SimulationController::new(&series, config) else {
        panic!("controller built");
    };
    while !controller.is_finished() {
        let Ok(()) = controller.tick() else {
            panic!("tick ok");
        };
    }
    assert_eq!(controller.rebalance_count(), 5);

    // after the final event each holding is worth its scheduled weight
    let pool = controller.pool();
    let total = pool.market_cap();
    for symbol in ["AAA", "BBB", "CCC"] {
        let held = pool.token(symbol).map_or(0.0, |t| t.usd_value() / total);
        let Some(expected) = schedule.weights_of(symbol).and_then(|w| w.last().copied()) else {
            panic!("{symbol} tracked");
        };
        assert!((held - expected).abs() < 1e-9, "{symbol}: {held} vs {expected}");
    }
    assert!(pool.token("BBB").is_none());
    assert!(bone_to_f64(pool.total_supply()) > 0.0);
}
