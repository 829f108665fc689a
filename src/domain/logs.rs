//! Append-only simulation records.

use serde::{Deserialize, Serialize};

use super::Symbol;

/// Direction of a weight adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Weight moved toward a higher target (or the token bootstrapped).
    Up,
    /// Weight moved toward a lower target.
    Down,
}

/// One weight adjustment applied by a weighted pool.
///
/// Weights are percentages of the pool's total denormalized weight at
/// the time of the adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalanceLog {
    /// Adjusted token.
    pub token: Symbol,
    /// Direction of the change.
    pub direction: Direction,
    /// Weight before the change, in percent.
    pub old_weight: f64,
    /// Weight after the change, in percent.
    pub new_weight: f64,
}

/// USD value of one pool share at a simulated timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueLogEntry {
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Pool market value divided by outstanding shares.
    pub usd_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebalance_log_uses_camel_case() {
        let log = RebalanceLog {
            token: Symbol::from("YFI"),
            direction: Direction::Down,
            old_weight: 12.5,
            new_weight: 12.0,
        };
        let Ok(json) = serde_json::to_string(&log) else {
            panic!("serializable");
        };
        assert!(json.contains("\"oldWeight\":12.5"));
        assert!(json.contains("\"direction\":\"down\""));
    }
}
