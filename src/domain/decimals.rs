//! Token decimal places.

use serde::{Deserialize, Serialize};

use crate::error::PoolError;
use crate::math::U256;

/// Maximum allowed decimal places (EVM standard).
const MAX_DECIMALS: u8 = 18;

/// Number of decimal places of a token's base unit.
///
/// Valid range is `0..=18`.  Construction is validated, including when
/// deserialized from a price snapshot.
///
/// # Examples
///
/// ```
/// use index_backtest::domain::Decimals;
///
/// let d = Decimals::new(6).expect("6 is valid");
/// assert_eq!(d.get(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Decimals(u8);

impl Default for Decimals {
    fn default() -> Self {
        Self::MAX
    }
}

impl Decimals {
    /// Eighteen decimal places, also the precision of pool shares.
    pub const MAX: Self = Self(MAX_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfiguration`] if `value` exceeds 18.
    pub const fn new(value: u8) -> Result<Self, PoolError> {
        if value > MAX_DECIMALS {
            return Err(PoolError::InvalidConfiguration("decimals must be 0..=18"));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^decimals` as a 256-bit integer.
    #[must_use]
    pub fn factor(&self) -> U256 {
        U256::exp10(usize::from(self.0))
    }

    /// Returns `10^decimals` as `f64`.
    #[must_use]
    pub fn factor_f64(&self) -> f64 {
        10f64.powi(i32::from(self.0))
    }
}

impl TryFrom<u8> for Decimals {
    type Error = PoolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Decimals> for u8 {
    fn from(value: Decimals) -> Self {
        value.0
    }
}
