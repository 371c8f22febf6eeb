use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Used for positions and ranges so that adjacency decisions are exact and
/// identical across platforms.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
///
/// Panics if `v` is outside the representable range; see
/// [`checked_f64_to_fixed64`] for untrusted input.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert an f64 to Fixed64, returning None if it is NaN or out of range.
#[inline]
pub fn checked_f64_to_fixed64(v: f64) -> Option<Fixed64> {
    Fixed64::checked_from_num(v)
}

/// Convert Fixed64 to f64. Use only for display/FFI, never in sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Exact square of `a - b` in raw bits (2^-64 per unit squared).
///
/// The difference of two `i64` bit patterns is below 2^64 in magnitude, so
/// its square always fits in `u128`.
#[inline]
pub fn diff_square_bits(a: Fixed64, b: Fixed64) -> u128 {
    let d = (i128::from(a.to_bits()) - i128::from(b.to_bits())).unsigned_abs();
    d * d
}

/// Exact square of a value in raw bits.
#[inline]
pub fn square_bits(v: Fixed64) -> u128 {
    diff_square_bits(v, Fixed64::ZERO)
}
