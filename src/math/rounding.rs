//! Rounding helpers for 256-bit integer division.
//!
//! [`div_round`] is the low-level building block behind every scaled
//! operation in [`fixed_precision`](super::fixed_precision): each
//! multiplication or division by [`BONE`](super::BONE) ends in one call
//! here with an explicit [`Rounding`].
//!
//! # Examples
//!
//! ```
//! use index_backtest::domain::Rounding;
//! use index_backtest::math::{div_round, U256};
//!
//! let ten = U256::from(10u64);
//! let three = U256::from(3u64);
//! assert_eq!(div_round(ten, three, Rounding::Down), Some(U256::from(3u64)));
//! assert_eq!(div_round(ten, three, Rounding::Up), Some(U256::from(4u64)));
//! assert_eq!(div_round(ten, U256::zero(), Rounding::Down), None);
//! ```

use super::U256;
use crate::domain::Rounding;

/// Integer division of `U256` values with explicit rounding direction.
///
/// - [`Rounding::Down`]: floor division.
/// - [`Rounding::Up`]: ceiling division.
/// - [`Rounding::HalfUp`]: nearest, ties rounded up; identical to the
///   on-chain `(n + d / 2) / d` without its overflow on `n + d / 2`.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub fn div_round(numerator: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let (q, r) = numerator.div_mod(denominator);
    if r.is_zero() {
        return Some(q);
    }
    // q + 1 cannot overflow: r != 0 implies q < U256::MAX.
    match rounding {
        Rounding::Down => Some(q),
        Rounding::Up => Some(q + U256::one()),
        Rounding::HalfUp => {
            let half = denominator - (denominator >> 1);
            if r >= half {
                Some(q + U256::one())
            } else {
                Some(q)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn div_by_zero_returns_none() {
        assert_eq!(div_round(u(100), U256::zero(), Rounding::Down), None);
        assert_eq!(div_round(U256::zero(), U256::zero(), Rounding::HalfUp), None);
    }

    #[test]
    fn exact_division_ignores_direction() {
        for r in [Rounding::Up, Rounding::Down, Rounding::HalfUp] {
            assert_eq!(div_round(u(100), u(10), r), Some(u(10)));
        }
    }

    #[test]
    fn half_up_matches_on_chain_formula() {
        for (n, d) in [(7u64, 2u64), (5, 3), (4, 3), (1, 2), (10, 4), (11, 4), (9, 5)] {
            let expected = (n + d / 2) / d;
            assert_eq!(div_round(u(n), u(d), Rounding::HalfUp), Some(u(expected)));
        }
    }

    #[test]
    fn up_rounds_any_remainder() {
        assert_eq!(div_round(u(7), u(2), Rounding::Up), Some(u(4)));
        assert_eq!(div_round(u(1), u(1_000), Rounding::Up), Some(u(1)));
    }

    #[test]
    fn max_numerator_does_not_overflow() {
        let Some(q) = div_round(U256::MAX, u(2), Rounding::HalfUp) else {
            panic!("expected Some");
        };
        assert_eq!(q, (U256::MAX >> 1) + U256::one());
    }
}
