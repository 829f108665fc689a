//! Fixed-point exponentiation.
//!
//! [`bpow`] raises a BONE-scaled base to a BONE-scaled exponent.  The
//! integer part of the exponent is handled by square-and-multiply
//! ([`bpowi`]); the fractional part by the binomial series
//! ([`bpow_approx`]), which converges for bases in `(0, 2)`.
//!
//! Bases at or above `2.0` occur when solving for a price target far
//! from the current spot price.  They are range-reduced first:
//!
//! ```text
//! b = (√2)^j · m,  m ∈ [1, √2]
//! b^e = m^e · (√2)^(j·e)
//! ```
//!
//! where `j` counts halvings (`2` per bit shift, plus one final division
//! by `√2`).  Every series evaluation then runs on a base close to `1.0`,
//! where the binomial series converges in a handful of terms.

use super::{
    badd, bdiv, bfloor, bmul, bsub, bsub_sign, CheckedArithmetic, BONE, BPOW_PRECISION,
    MAX_BPOW_BASE, MIN_BPOW_BASE, SQRT_TWO, U256,
};
use crate::error::PoolError;

/// Raises `base` to an integer power `exp` (not scaled).
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if an intermediate product exceeds
/// 256 bits.
pub fn bpowi(base: U256, exp: U256) -> Result<U256, PoolError> {
    let mut n = exp;
    let mut a = base;
    let mut z = if n.low_u64() & 1 == 1 { a } else { BONE };
    n >>= 1;
    while !n.is_zero() {
        a = bmul(a, a)?;
        if n.low_u64() & 1 == 1 {
            z = bmul(z, a)?;
        }
        n >>= 1;
    }
    Ok(z)
}

/// Binomial-series approximation of `base^exp` for `base ∈ (0, 2)`.
///
/// Terms are accumulated until one drops below `precision`.
///
/// # Errors
///
/// Returns [`PoolError::Underflow`] or [`PoolError::Overflow`] if the
/// partial sums leave the representable range, which only happens for
/// bases outside the documented domain.
pub fn bpow_approx(base: U256, exp: U256, precision: U256) -> Result<U256, PoolError> {
    let a = exp;
    let (x, xneg) = bsub_sign(base, BONE);
    let mut term = BONE;
    let mut sum = term;
    let mut negative = false;

    let mut i = 1u64;
    while term >= precision {
        let big_k = BONE.safe_mul(&U256::from(i))?;
        let (c, cneg) = bsub_sign(a, bsub(big_k, BONE)?);
        term = bmul(term, bmul(c, x)?)?;
        term = bdiv(term, big_k)?;
        if term.is_zero() {
            break;
        }
        if xneg {
            negative = !negative;
        }
        if cneg {
            negative = !negative;
        }
        sum = if negative {
            bsub(sum, term)?
        } else {
            badd(sum, term)?
        };
        i += 1;
    }
    Ok(sum)
}

/// Raises a BONE-scaled `base` to a BONE-scaled `exp`.
///
/// `0^0` is `1`; `0^e` is `0` for any positive `e`.
///
/// # Errors
///
/// Returns [`PoolError::Overflow`] if the result exceeds 256 bits.
pub fn bpow(base: U256, exp: U256) -> Result<U256, PoolError> {
    if base.is_zero() {
        return Ok(if exp.is_zero() { BONE } else { U256::zero() });
    }
    if base > MAX_BPOW_BASE {
        return bpow_reduced(base, exp);
    }
    debug_assert!(base >= MIN_BPOW_BASE);

    let whole = bfloor(exp);
    let remain = bsub(exp, whole)?;
    let whole_pow = bpowi(base, whole / BONE)?;
    if remain.is_zero() {
        return Ok(whole_pow);
    }
    let partial = bpow_approx(base, remain, BPOW_PRECISION)?;
    bmul(whole_pow, partial)
}

fn bpow_reduced(base: U256, exp: U256) -> Result<U256, PoolError> {
    let mut mantissa = base;
    let mut k = 0u64;
    while mantissa > MAX_BPOW_BASE {
        mantissa >>= 1;
        k += 1;
    }
    let mut halvings = k.saturating_mul(2);
    if mantissa > SQRT_TWO {
        mantissa = bdiv(mantissa, SQRT_TWO)?;
        halvings += 1;
    }
    let mantissa_pow = bpow(mantissa, exp)?;
    let sqrt_two_exp = exp.safe_mul(&U256::from(halvings))?;
    let two_pow = bpow(SQRT_TWO, sqrt_two_exp)?;
    bmul(mantissa_pow, two_pow)
}
