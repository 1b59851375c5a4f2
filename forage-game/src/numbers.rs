//! Numeric conversion helpers centralizing safe integer casts.

use num_traits::cast::cast;

/// Clamp an i64 into the u64 range, mapping negatives to zero.
#[must_use]
pub fn clamp_i64_to_u64(value: i64) -> u64 {
    cast::<i64, u64>(value.max(0)).unwrap_or(0)
}

/// Truncate a f64 toward zero into the u64 range, returning 0 for NaN or negatives.
#[must_use]
pub fn truncate_f64_to_u64(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    cast::<f64, u64>(value.trunc()).unwrap_or(u64::MAX)
}

/// Downcast a u64 to usize, saturating on narrow targets.
#[must_use]
pub fn saturating_u64_to_usize(value: u64) -> usize {
    cast::<u64, usize>(value).unwrap_or(usize::MAX)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}
