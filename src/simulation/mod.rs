//! Back-test orchestration.
//!
//! A [`SimulationController`] steps one pool through a
//! [`PriceFeed`](crate::traits::PriceFeed); [`run_backtest`] runs several
//! controllers side by side over the same feed; [`weight_schedule`]
//! replays the rebalance cadence without any pool.

mod controller;
mod runner;
mod schedule;

pub use controller::{SimulationController, SimulationReport};
pub use runner::{run_backtest, run_request};
pub use schedule::{weight_schedule, WeightSchedule};
