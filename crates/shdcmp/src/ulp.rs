//! Bit-pattern distance between `f32` values.
//!
//! The distance is the unsigned difference of the raw IEEE-754 bit
//! patterns. It counts representable floats between two values of the
//! same sign; across a sign change it is dominated by the sign bit and
//! lands far above any tolerance.

/// Unsigned distance between two raw 32-bit patterns.
///
/// Unlike float equality, `0.0` and `-0.0` are `0x8000_0000` apart and
/// NaN payloads are compared like any other pattern.
#[must_use]
pub fn bit_distance(a: u32, b: u32) -> u64 {
    u64::from(a.abs_diff(b))
}
