//! Checked arithmetic trait for the 256-bit fixed-point backend.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, PoolError>`](crate::error::PoolError)
//! instead of panicking on overflow, underflow, or division by zero.
//!
//! # Examples
//!
//! ```
//! use index_backtest::math::{CheckedArithmetic, U256};
//!
//! let a = U256::from(100u64);
//! let b = U256::from(200u64);
//! assert!(a.safe_add(&b).is_ok());
//! assert!(a.safe_sub(&b).is_err());
//! ```

use super::{div_round, U256};
use crate::domain::Rounding;
use crate::error::PoolError;

/// Fallible arithmetic for raw fixed-point integers.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the result exceeds 256 bits.
    fn safe_add(&self, other: &Self) -> Result<Self, PoolError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, PoolError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Overflow`] if the result exceeds 256 bits.
    fn safe_mul(&self, other: &Self) -> Result<Self, PoolError>;

    /// Checked division with explicit [`Rounding`] direction.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, PoolError>;
}

impl CheckedArithmetic for U256 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, PoolError> {
        self.checked_add(*other)
            .ok_or(PoolError::Overflow("fixed-point addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, PoolError> {
        self.checked_sub(*other)
            .ok_or(PoolError::Underflow("fixed-point subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, PoolError> {
        self.checked_mul(*other)
            .ok_or(PoolError::Overflow("fixed-point multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, PoolError> {
        div_round(*self, *other, rounding).ok_or(PoolError::DivisionByZero)
    }
}
