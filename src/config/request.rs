//! Multi-variant back-test request.

use serde::{Deserialize, Serialize};

use super::{PoolKind, SimulationConfig};
use crate::domain::Symbol;
use crate::error::PoolError;

/// Minimum arbitrage profit when the request leaves it unset.
pub const DEFAULT_MINIMUM_TRADER_PROFIT: f64 = 5.0;

/// A back-test over one token universe and up to three pool variants.
///
/// Fees and volumes are given in percent, as a user would type them, and
/// are divided by 100 when expanded into [`SimulationConfig`]s.  Variants
/// are expanded in the fixed order `index`, `balancer`, `baseline`:
///
/// | Flag | Pool | Reweigh |
/// |------|------|---------|
/// | `index` | weighted | yes |
/// | `balancer` | weighted | no |
/// | `baseline` | baseline | yes |
///
/// # Examples
///
/// ```
/// use index_backtest::config::BacktestRequest;
///
/// let json = r#"{
///     "tokens": ["AAA", "BBB", "CCC"],
///     "size": 2,
///     "swapFee": 0.25,
///     "initialValue": 10000,
///     "dailyJoinVolume": 1,
///     "dailySwapVolume": 10,
///     "index": true,
///     "hodl": true
/// }"#;
/// let request: BacktestRequest = serde_json::from_str(json).unwrap();
/// let configs = request.simulation_configs().unwrap();
/// assert_eq!(configs.len(), 2);
/// assert_eq!(configs[0].name, "index");
/// assert!((configs[0].swap_fee - 0.0025).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest {
    /// Token universe the baskets are drawn from.
    pub tokens: Vec<Symbol>,
    /// Basket size.
    pub size: usize,
    /// Swap fee in percent.
    pub swap_fee: f64,
    /// Initial pool value in USD.
    pub initial_value: f64,
    /// Daily join volume in percent of supply.
    #[serde(default)]
    pub daily_join_volume: f64,
    /// Daily swap volume in percent of pool value.
    #[serde(default)]
    pub daily_swap_volume: f64,
    /// Run the reweighing weighted pool.
    #[serde(default)]
    pub index: bool,
    /// Run the static weighted pool.
    #[serde(default)]
    pub balancer: bool,
    /// Run the directly rebalanced baseline.
    #[serde(default, alias = "hodl")]
    pub baseline: bool,
    /// Minimum arbitrage profit in USD.
    #[serde(default)]
    pub minimum_trader_profit: Option<f64>,
}

impl BacktestRequest {
    /// Expands the request into one validated configuration per selected
    /// variant.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfiguration`] if no variant is selected or
    ///   the universe is smaller than the basket.
    /// - Any error from [`SimulationConfig::validate`].
    pub fn simulation_configs(&self) -> Result<Vec<SimulationConfig>, PoolError> {
        if self.tokens.len() < self.size {
            return Err(PoolError::InvalidConfiguration(
                "token universe is smaller than the basket",
            ));
        }
        let variants = [
            (self.index, "index", PoolKind::Weighted, true),
            (self.balancer, "balancer", PoolKind::Weighted, false),
            (self.baseline, "baseline", PoolKind::Baseline, true),
        ];
        let configs = variants
            .into_iter()
            .filter(|(selected, ..)| *selected)
            .map(|(_, name, kind, reweigh)| SimulationConfig {
                name: name.to_owned(),
                kind,
                reweigh,
                size: self.size,
                initial_value: self.initial_value,
                swap_fee: self.swap_fee / 100.0,
                daily_join_volume: self.daily_join_volume / 100.0,
                daily_swap_volume: self.daily_swap_volume / 100.0,
                minimum_trader_profit: self
                    .minimum_trader_profit
                    .unwrap_or(DEFAULT_MINIMUM_TRADER_PROFIT),
                ..SimulationConfig::default()
            })
            .collect::<Vec<_>>();
        if configs.is_empty() {
            return Err(PoolError::InvalidConfiguration("no pool variant selected"));
        }
        for config in &configs {
            config.validate()?;
        }
        Ok(configs)
    }
}
