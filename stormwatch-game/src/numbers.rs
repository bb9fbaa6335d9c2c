//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a charge count to f64 for probability math.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}

/// Convert a turn count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Clamp an arbitrary poison total into the 0..=`ceiling` byte range.
#[must_use]
pub fn clamp_u32_to_u8(value: u32, ceiling: u8) -> u8 {
    let clamped = value.min(u32::from(ceiling));
    cast::<u32, u8>(clamped).unwrap_or(ceiling)
}
