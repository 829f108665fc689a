//! Fixed-point arithmetic and weighted-pool invariant formulas.
//!
//! Everything here operates on raw [`U256`] values scaled by [`BONE`].
//! The layer is split by concern:
//!
//! | Module | Contents |
//! |--------|----------|
//! | `fixed_precision` | `U256`, constants, `bmul`/`bdiv` and directional variants, conversions |
//! | `checked` | [`CheckedArithmetic`] for overflow-safe chaining |
//! | `rounding` | [`div_round`] |
//! | `pow` | `bpowi`, `bpow_approx`, `bpow` |
//! | `weighted_math` | spot price, swap and join formulas |
//!
//! No function in this module mutates pool state.

mod checked;
mod fixed_precision;
mod pow;
mod rounding;
mod weighted_math;

pub use checked::CheckedArithmetic;
pub use fixed_precision::{
    badd, bdiv, bfloor, bmul, bone_to_f64, bsub, bsub_sign, div_up, format_balance,
    fraction_to_bone, mul_div, mul_down, mul_up, to_f64, to_token_amount, BONE, BPOW_PRECISION,
    MAX_BPOW_BASE, MIN_BPOW_BASE, MIN_WEIGHT, SQRT_TWO, U256,
};
pub use pow::{bpow, bpow_approx, bpowi};
pub use rounding::div_round;
pub use weighted_math::{
    calc_all_in_given_pool_out, calc_in_given_out, calc_in_given_price, calc_out_given_in,
    calc_single_in_given_pool_out, calc_spot_price,
};
