//! Unified error types for the back-testing engine.
//!
//! All fallible operations across the crate return [`PoolError`] as their
//! error type.  Variants fall into four families:
//!
//! | Family | Variants | Effect |
//! |--------|----------|--------|
//! | Swap preconditions | `OutputNotReady`, `MaxInRatio`, `MaxOutRatio`, `ZeroAmount`, `IdenticalTokens` | abort the attempted swap only |
//! | Configuration | `InvalidConfiguration`, `EmptyTokenSet`, `InvalidFee`, `InvalidWeight` | fatal before the first tick |
//! | Feed contract | `MissingPrice`, `StepOutOfRange`, `InvalidPrice` | fatal to the run |
//! | Arithmetic | `Overflow`, `Underflow`, `DivisionByZero`, `InvalidAmount` | propagate |

use thiserror::Error;

/// Errors produced by pool mechanics, configuration, and feed access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PoolError {
    /// The output token of a swap has not crossed its bootstrap threshold.
    #[error("output token {0} is not ready")]
    OutputNotReady(String),

    /// The swap input exceeds half of the input token's usable balance.
    #[error("input amount exceeds the maximum in ratio")]
    MaxInRatio,

    /// The swap output exceeds a third of the output token's balance.
    #[error("output amount exceeds the maximum out ratio")]
    MaxOutRatio,

    /// A swap or join was requested with a zero amount.
    #[error("can not swap 0 tokens")]
    ZeroAmount,

    /// The input and output of a swap are the same token.
    #[error("can not swap {0} for itself")]
    IdenticalTokens(String),

    /// The symbol is not part of the pool's token set.
    #[error("unknown token {0}")]
    UnknownToken(String),

    /// A pool was constructed without any tokens.
    #[error("pool requires at least one token")]
    EmptyTokenSet,

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The swap fee is outside `[0, 1)`.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// A weight is non-finite, negative, or otherwise unusable.
    #[error("invalid weight: {0}")]
    InvalidWeight(&'static str),

    /// The feed has no price for `symbol` at `step`.
    #[error("missing price for {symbol} at step {step}")]
    MissingPrice {
        /// Step index that was requested.
        step: usize,
        /// Symbol that was requested.
        symbol: String,
    },

    /// The requested step is beyond the end of the series.
    #[error("step {step} is out of range for a series of length {len}")]
    StepOutOfRange {
        /// Step index that was requested.
        step: usize,
        /// Number of steps available.
        len: usize,
    },

    /// A price or market cap is non-finite or non-positive.
    #[error("invalid price: {0}")]
    InvalidPrice(&'static str),

    /// A floating-point amount cannot be represented as a token amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// Fixed-point result exceeds 256 bits.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Fixed-point subtraction would go negative.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by a zero fixed-point value.
    #[error("division by zero")]
    DivisionByZero,
}

impl PoolError {
    /// Returns `true` for the swap precondition family, which callers
    /// such as the arbitrage loop treat as "no trade" rather than a
    /// failure.
    #[must_use]
    pub const fn is_swap_rejection(&self) -> bool {
        matches!(
            self,
            Self::OutputNotReady(_)
                | Self::MaxInRatio
                | Self::MaxOutRatio
                | Self::ZeroAmount
                | Self::IdenticalTokens(_)
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_rejections_are_classified() {
        assert!(PoolError::MaxInRatio.is_swap_rejection());
        assert!(PoolError::MaxOutRatio.is_swap_rejection());
        assert!(PoolError::ZeroAmount.is_swap_rejection());
        assert!(PoolError::OutputNotReady("UNI".into()).is_swap_rejection());
        assert!(!PoolError::DivisionByZero.is_swap_rejection());
        assert!(!PoolError::EmptyTokenSet.is_swap_rejection());
    }

    #[test]
    fn missing_price_message_names_symbol_and_step() {
        let e = PoolError::MissingPrice {
            step: 7,
            symbol: "COMP".into(),
        };
        assert_eq!(e.to_string(), "missing price for COMP at step 7");
    }
}
