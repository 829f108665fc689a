//! Domain value types used throughout the back-testing engine.
//!
//! Tokens, symbols, precisions, rounding directions, weight updates and
//! the append-only logs a simulation produces.

mod decimals;
mod logs;
mod rounding;
mod symbol;
mod token;
mod update;

pub use decimals::Decimals;
pub use logs::{Direction, RebalanceLog, ValueLogEntry};
pub use rounding::Rounding;
pub use symbol::Symbol;
pub use token::PoolToken;
pub use update::{ReindexUpdate, WeightUpdate};
