//! 18-decimal fixed-point numbers on a 256-bit integer backend.
//!
//! All pool arithmetic works on raw [`U256`] values where [`BONE`]
//! (`10^18`) represents `1.0`.  Token balances stay in their own base
//! units; weights, fees, prices and ratios are BONE-scaled.
//!
//! # Precision characteristics
//!
//! | Aspect | Value |
//! |--------|-------|
//! | Width | 256 bits, unsigned |
//! | Scale | 10^18 |
//! | `bmul` / `bdiv` | round half up |
//! | `mul_down` / `div_down` | round toward zero |
//! | `mul_up` / `div_up` | round toward +∞ |
//!
//! `bmul` and `bdiv` reproduce the on-chain weighted-pool library bit
//! for bit; the directional variants are used where a result leaves the
//! formula as an amount owed to or by the pool.

use uint::construct_uint;

use super::CheckedArithmetic;
use crate::domain::{Decimals, Rounding};
use crate::error::PoolError;

construct_uint! {
    /// Fixed-width 256-bit unsigned integer used for all pool amounts.
    pub struct U256(4);
}

/// Fixed-point `1.0`.
pub const BONE: U256 = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Smallest denormalized weight a token may keep before eviction (`0.25`).
pub const MIN_WEIGHT: U256 = U256([250_000_000_000_000_000, 0, 0, 0]);

/// Smallest base accepted by the power series (1 wei).
pub const MIN_BPOW_BASE: U256 = U256([1, 0, 0, 0]);

/// Largest base accepted by the power series (`2.0 − 1 wei`).
pub const MAX_BPOW_BASE: U256 = U256([1_999_999_999_999_999_999, 0, 0, 0]);

/// Series terms smaller than this are dropped (`1e-10`).
pub const BPOW_PRECISION: U256 = U256([100_000_000, 0, 0, 0]);

/// `√2`, used to range-reduce powers of bases at or above `2.0`.
pub const SQRT_TWO: U256 = U256([1_414_213_562_373_095_049, 0, 0, 0]);

const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Checked addition.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] past 256 bits.
#[inline]
pub fn badd(a: U256, b: U256) -> Result<U256, PoolError> {
    a.safe_add(&b)
}

/// Checked subtraction.
///
/// # Errors
///
/// Returns [`PoolError::Underflow`] if `b > a`.
#[inline]
pub fn bsub(a: U256, b: U256) -> Result<U256, PoolError> {
    a.safe_sub(&b)
}

/// Absolute difference together with a "negative" flag.
#[must_use]
pub fn bsub_sign(a: U256, b: U256) -> (U256, bool) {
    if a >= b {
        (a - b, false)
    } else {
        (b - a, true)
    }
}

/// `a × b / scale` with explicit rounding.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if `a × b` exceeds 256 bits and
/// [`PoolError::DivisionByZero`] if `scale` is zero.
pub fn mul_div(a: U256, b: U256, scale: U256, rounding: Rounding) -> Result<U256, PoolError> {
    a.safe_mul(&b)?.safe_div(&scale, rounding)
}

/// Fixed-point multiplication, rounding half up.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if `a × b` exceeds 256 bits.
#[inline]
pub fn bmul(a: U256, b: U256) -> Result<U256, PoolError> {
    mul_div(a, b, BONE, Rounding::HalfUp)
}

/// Fixed-point division, rounding half up.
///
/// # Errors
///
/// Returns [`PoolError::DivisionByZero`] if `b` is zero and
/// [`PoolError::Overflow`] if `a × BONE` exceeds 256 bits.
#[inline]
pub fn bdiv(a: U256, b: U256) -> Result<U256, PoolError> {
    mul_div(a, BONE, b, Rounding::HalfUp)
}

/// Fixed-point multiplication, rounding toward zero.
///
/// # Errors
///
/// See [`bmul`].
#[inline]
pub fn mul_down(a: U256, b: U256) -> Result<U256, PoolError> {
    mul_div(a, b, BONE, Rounding::Down)
}

/// Fixed-point multiplication, rounding toward +∞.
///
/// # Errors
///
/// See [`bmul`].
#[inline]
pub fn mul_up(a: U256, b: U256) -> Result<U256, PoolError> {
    mul_div(a, b, BONE, Rounding::Up)
}

/// Fixed-point division, rounding toward +∞.
///
/// # Errors
///
/// See [`bdiv`].
#[inline]
pub fn div_up(a: U256, b: U256) -> Result<U256, PoolError> {
    mul_div(a, BONE, b, Rounding::Up)
}

/// Integer part of a BONE-scaled value, still BONE-scaled.
#[must_use]
pub fn bfloor(a: U256) -> U256 {
    (a / BONE) * BONE
}

/// Lossy conversion to `f64`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * TWO_POW_64 + *limb as f64)
}

/// Converts a human-readable amount into base units of a token with
/// `decimals` places, truncating toward zero.
///
/// # Errors
///
/// - [`PoolError::InvalidAmount`] for negative or non-finite input.
/// - [`PoolError::Overflow`] if the scaled amount does not fit in 128 bits.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_token_amount(value: f64, decimals: Decimals) -> Result<U256, PoolError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PoolError::InvalidAmount("amount must be finite and non-negative"));
    }
    let scaled = value * decimals.factor_f64();
    if scaled >= u128::MAX as f64 {
        return Err(PoolError::Overflow("token amount exceeds 128 bits"));
    }
    Ok(U256::from(scaled as u128))
}

/// Converts base units into a human-readable `f64` amount.
#[must_use]
pub fn format_balance(amount: U256, decimals: Decimals) -> f64 {
    to_f64(amount) / decimals.factor_f64()
}

/// Converts a fraction such as `0.003` into its BONE-scaled form.
///
/// # Errors
///
/// See [`to_token_amount`].
pub fn fraction_to_bone(fraction: f64) -> Result<U256, PoolError> {
    to_token_amount(fraction, Decimals::MAX)
}

/// Converts a BONE-scaled value back to `f64`.
#[must_use]
pub fn bone_to_f64(value: U256) -> f64 {
    format_balance(value, Decimals::MAX)
}
