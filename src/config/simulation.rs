//! Per-run simulation configuration.
//!
//! A [`SimulationConfig`] describes one pool variant to back-test: which
//! pool to build, how large its basket is, how much synthetic volume it
//! receives, and the [`RebalanceSchedule`] that drives reweigh and
//! reindex events.  Every field deserializes with a default, so a JSON
//! document only needs the values that differ.
//!
//! | Field | Default |
//! |-------|---------|
//! | `reweigh` | `true` |
//! | `size` | 10 |
//! | `initialValue` | 1 000 000 USD |
//! | `swapFee` | 0.0025 |
//! | `dailyJoinVolume` | 0 |
//! | `dailySwapVolume` | 0 |
//! | `minimumTraderProfit` | 5 USD |
//! | `initialSupply` | 100 shares |
//! | `minReweighDelay` | 3 600 s |
//! | `weightChangeFraction` | 0.01 |
//! | `minimumBalanceFraction` | 0.01 |
//! | `maxArbIterations` | 64 |
//! | `schedule.reweighDelay` | 604 800 s |
//! | `schedule.reindexEvery` | 4 |
//! | `schedule.weightMultiplier` | 25 |

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::WeightedPoolSettings;
use crate::error::PoolError;
use crate::math::{fraction_to_bone, U256};

/// Which pool implementation a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKind {
    /// Bonding-curve pool.
    Weighted,
    /// Directly rebalanced holder.
    Baseline,
}

impl FromStr for PoolKind {
    type Err = PoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weighted" | "balancer" => Ok(Self::Weighted),
            "baseline" | "hodl" => Ok(Self::Baseline),
            _ => Err(PoolError::InvalidConfiguration("unknown pool kind")),
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weighted => f.write_str("weighted"),
            Self::Baseline => f.write_str("baseline"),
        }
    }
}

/// Cadence of scheduled target-weight updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RebalanceSchedule {
    /// Seconds between two scheduled events.
    pub reweigh_delay: u64,
    /// Every n-th event replaces the basket instead of reweighing it.
    pub reindex_every: u64,
    /// Scale from normalized weight to denormalized weight.
    pub weight_multiplier: f64,
}

impl Default for RebalanceSchedule {
    fn default() -> Self {
        Self {
            reweigh_delay: 604_800,
            reindex_every: 4,
            weight_multiplier: 25.0,
        }
    }
}

impl RebalanceSchedule {
    /// Validates the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] for a zero delay or
    /// cadence, or a weight multiplier that is not finite and positive.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.reweigh_delay == 0 {
            return Err(PoolError::InvalidConfiguration("reweigh delay must be positive"));
        }
        if self.reindex_every == 0 {
            return Err(PoolError::InvalidConfiguration("reindex cadence must be positive"));
        }
        if !self.weight_multiplier.is_finite() || self.weight_multiplier <= 0.0 {
            return Err(PoolError::InvalidConfiguration(
                "weight multiplier must be finite and positive",
            ));
        }
        Ok(())
    }

    /// Returns `true` if the `counter`-th event is a reindex.
    #[must_use]
    pub const fn is_reindex(&self, counter: u64) -> bool {
        self.reindex_every != 0 && counter % self.reindex_every == 0
    }
}

/// Parameters of one back-tested pool variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Label carried into the report.
    pub name: String,
    /// Pool implementation.
    pub kind: PoolKind,
    /// Whether scheduled rebalances apply.
    pub reweigh: bool,
    /// Basket size (top-N by market cap).
    pub size: usize,
    /// Initial pool value in USD.
    pub initial_value: f64,
    /// Swap fee as a fraction.
    pub swap_fee: f64,
    /// Daily proportional join volume as a fraction of supply.
    pub daily_join_volume: f64,
    /// Daily swap volume as a fraction of pool value.
    pub daily_swap_volume: f64,
    /// Smallest USD profit an arbitrage trade must capture.
    pub minimum_trader_profit: f64,
    /// Initial share supply.
    pub initial_supply: f64,
    /// Minimum seconds between adjustments of one token's weight.
    pub min_reweigh_delay: u64,
    /// Largest weight change per adjustment, as a fraction.
    pub weight_change_fraction: f64,
    /// Bootstrap threshold as a fraction of pool value.
    pub minimum_balance_fraction: f64,
    /// Per-pair bound on consecutive arbitrage trades.
    pub max_arb_iterations: usize,
    /// Scheduled rebalance cadence.
    pub schedule: RebalanceSchedule,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            name: "index".to_owned(),
            kind: PoolKind::Weighted,
            reweigh: true,
            size: 10,
            initial_value: 1_000_000.0,
            swap_fee: 0.0025,
            daily_join_volume: 0.0,
            daily_swap_volume: 0.0,
            minimum_trader_profit: 5.0,
            initial_supply: 100.0,
            min_reweigh_delay: 3_600,
            weight_change_fraction: 0.01,
            minimum_balance_fraction: 0.01,
            max_arb_iterations: 64,
            schedule: RebalanceSchedule::default(),
        }
    }
}

fn check_fraction(value: f64, msg: &'static str) -> Result<(), PoolError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PoolError::InvalidConfiguration(msg))
    }
}

impl SimulationConfig {
    /// Creates a configuration with defaults for everything but the
    /// variant, basket size and initial value.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        name: impl Into<String>,
        kind: PoolKind,
        size: usize,
        initial_value: f64,
    ) -> Result<Self, PoolError> {
        let config = Self {
            name: name.into(),
            kind,
            size,
            initial_value,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates every field.
    ///
    /// # Errors
    ///
    /// - [`PoolError::InvalidConfiguration`] for a zero basket size, a
    ///   non-positive initial value or supply, negative or non-finite
    ///   volumes, or an invalid schedule.
    /// - [`PoolError::InvalidFee`] for a fee outside `[0, 1)`.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.size == 0 {
            return Err(PoolError::InvalidConfiguration("basket size must be positive"));
        }
        if !self.initial_value.is_finite() || self.initial_value <= 0.0 {
            return Err(PoolError::InvalidConfiguration(
                "initial value must be finite and positive",
            ));
        }
        if !self.initial_supply.is_finite() || self.initial_supply <= 0.0 {
            return Err(PoolError::InvalidConfiguration(
                "initial supply must be finite and positive",
            ));
        }
        if !self.swap_fee.is_finite() || !(0.0..1.0).contains(&self.swap_fee) {
            return Err(PoolError::InvalidFee("swap fee must be in [0, 1)"));
        }
        check_fraction(self.daily_join_volume, "daily join volume must be non-negative")?;
        check_fraction(self.daily_swap_volume, "daily swap volume must be non-negative")?;
        check_fraction(
            self.minimum_balance_fraction,
            "minimum balance fraction must be non-negative",
        )?;
        self.schedule.validate()?;
        self.weighted_settings()?.validate()
    }

    /// Converts the weighted-pool fields into fixed-point settings.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidAmount`] if a fraction cannot be
    /// represented.
    pub fn weighted_settings(&self) -> Result<WeightedPoolSettings, PoolError> {
        Ok(WeightedPoolSettings::default()
            .with_reweigh(self.reweigh)
            .with_swap_fee(fraction_to_bone(self.swap_fee)?)
            .with_min_reweigh_delay(self.min_reweigh_delay)
            .with_weight_change_fraction(fraction_to_bone(self.weight_change_fraction)?)
            .with_minimum_trader_profit(self.minimum_trader_profit)
            .with_max_arb_iterations(self.max_arb_iterations))
    }

    /// Initial share supply in 18-decimal base units.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidAmount`] if the supply cannot be
    /// represented.
    pub fn initial_supply_amount(&self) -> Result<U256, PoolError> {
        fraction_to_bone(self.initial_supply)
    }
}
