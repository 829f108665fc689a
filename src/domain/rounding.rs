//! Explicit rounding direction for fixed-point arithmetic.

/// Rounding direction for fixed-point multiplication and division.
///
/// Every scaled operation in the crate names its rounding.  The pool
/// formulas follow a protocol-favourable convention:
///
/// | Quantity | Direction |
/// |----------|-----------|
/// | Swap output | [`Rounding::Down`] (trader receives less) |
/// | Swap / join input | [`Rounding::Up`] (trader pays more) |
/// | Intermediate ratios | [`Rounding::HalfUp`] (on-chain `bmul`/`bdiv`) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
    /// Round to nearest, ties away from zero.
    HalfUp,
}
