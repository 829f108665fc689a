//! Weighted constant-product invariant formulas.
//!
//! The invariant is `V = Π bᵢ^(wᵢ / Σw)`.  Every formula below is a pure
//! function of balances, weights and the swap fee; the pool enforces the
//! preconditions (positive balances and weights, caps, readiness).
//!
//! Rounding follows the on-chain library: intermediate products and
//! quotients round half up, while the final step of each amount owed
//! to or by the pool rounds in the pool's favour.
//!
//! | Formula | Final rounding |
//! |---------|----------------|
//! | [`calc_out_given_in`] | down |
//! | [`calc_in_given_out`] | up |
//! | [`calc_in_given_price`] | up |
//! | [`calc_single_in_given_pool_out`] | up |
//! | [`calc_all_in_given_pool_out`] | up |

use super::{badd, bdiv, bmul, bpow, bsub, div_up, mul_down, mul_up, BONE, U256};
use crate::error::PoolError;

fn fee_complement(swap_fee: U256) -> Result<U256, PoolError> {
    if swap_fee >= BONE {
        return Err(PoolError::InvalidFee("swap fee must be below 1.0"));
    }
    Ok(BONE - swap_fee)
}

/// Spot price of `in` denominated in `out`, including the fee:
/// `(bIn / wIn) / (bOut / wOut) × 1 / (1 − fee)`.
///
/// # Errors
///
/// Returns [`PoolError::DivisionByZero`] for zero weights or a zero
/// output balance, and [`PoolError::InvalidFee`] for `fee ≥ 1`.
pub fn calc_spot_price(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    swap_fee: U256,
) -> Result<U256, PoolError> {
    let numer = bdiv(balance_in, weight_in)?;
    let denom = bdiv(balance_out, weight_out)?;
    let ratio = bdiv(numer, denom)?;
    let scale = bdiv(BONE, fee_complement(swap_fee)?)?;
    bmul(ratio, scale)
}

/// Output received for an exact input:
/// `bOut × (1 − (bIn / (bIn + aIn·(1 − fee)))^(wIn / wOut))`.
///
/// # Errors
///
/// Propagates arithmetic failures from the underlying primitives.
pub fn calc_out_given_in(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_in: U256,
    swap_fee: U256,
) -> Result<U256, PoolError> {
    let weight_ratio = bdiv(weight_in, weight_out)?;
    let adjusted_in = bmul(amount_in, fee_complement(swap_fee)?)?;
    let y = bdiv(balance_in, badd(balance_in, adjusted_in)?)?;
    let foo = bpow(y, weight_ratio)?;
    // bpow may land a wei above 1.0 for tiny inputs
    let bar = BONE.saturating_sub(foo);
    mul_down(balance_out, bar)
}

/// Input required for an exact output:
/// `bIn × ((bOut / (bOut − aOut))^(wOut / wIn) − 1) / (1 − fee)`.
///
/// # Errors
///
/// Returns [`PoolError::Underflow`] if `amount_out > balance_out` and
/// [`PoolError::DivisionByZero`] if they are equal.
pub fn calc_in_given_out(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    amount_out: U256,
    swap_fee: U256,
) -> Result<U256, PoolError> {
    let weight_ratio = bdiv(weight_out, weight_in)?;
    let diff = bsub(balance_out, amount_out)?;
    let y = bdiv(balance_out, diff)?;
    let foo = bpow(y, weight_ratio)?.saturating_sub(BONE);
    let token_in = mul_up(balance_in, foo)?;
    div_up(token_in, fee_complement(swap_fee)?)
}

/// Input of `in` that moves the fee-free spot price to `target_price`.
///
/// Spot price scales with `(bIn' / bIn)^((wIn + wOut) / wOut)` along the
/// invariant, so the post-trade balance is
/// `bIn × (target / spot)^(wOut / (wIn + wOut))`.  The fee is added on
/// top.  Returns zero when the target is not above the current price.
///
/// # Errors
///
/// Propagates arithmetic failures from the underlying primitives.
pub fn calc_in_given_price(
    balance_in: U256,
    weight_in: U256,
    balance_out: U256,
    weight_out: U256,
    target_price: U256,
    swap_fee: U256,
) -> Result<U256, PoolError> {
    let spot = calc_spot_price(balance_in, weight_in, balance_out, weight_out, U256::zero())?;
    if target_price <= spot {
        return Ok(U256::zero());
    }
    let ratio = bdiv(target_price, spot)?;
    let exponent = bdiv(weight_out, badd(weight_in, weight_out)?)?;
    let new_balance_in = bmul(balance_in, bpow(ratio, exponent)?)?;
    let delta = new_balance_in.saturating_sub(balance_in);
    div_up(delta, fee_complement(swap_fee)?)
}

/// Single-asset join: amount of one token required to mint `pool_out`
/// shares.  The fee applies to the portion of the deposit that is not
/// proportional to the token's weight.
///
/// # Errors
///
/// Propagates arithmetic failures from the underlying primitives.
pub fn calc_single_in_given_pool_out(
    balance_in: U256,
    weight_in: U256,
    pool_supply: U256,
    total_weight: U256,
    pool_out: U256,
    swap_fee: U256,
) -> Result<U256, PoolError> {
    let normalized_weight = bdiv(weight_in, total_weight)?;
    let new_supply = badd(pool_supply, pool_out)?;
    let pool_ratio = bdiv(new_supply, pool_supply)?;
    let boo = bdiv(BONE, normalized_weight)?;
    let token_in_ratio = bpow(pool_ratio, boo)?;
    let new_balance_in = bmul(token_in_ratio, balance_in)?;
    let amount_after_fee = new_balance_in.saturating_sub(balance_in);
    let zar = bmul(BONE.saturating_sub(normalized_weight), swap_fee)?;
    div_up(amount_after_fee, fee_complement(zar)?)
}

/// Proportional join: amount of every token required to mint `pool_out`
/// shares, in the order of `balances`.
///
/// # Errors
///
/// Returns [`PoolError::DivisionByZero`] for a zero supply.
pub fn calc_all_in_given_pool_out(
    balances: &[U256],
    pool_supply: U256,
    pool_out: U256,
) -> Result<Vec<U256>, PoolError> {
    let ratio = bdiv(pool_out, pool_supply)?;
    balances.iter().map(|b| mul_up(ratio, *b)).collect()
}
