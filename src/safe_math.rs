//! Guarded arithmetic shared by every calculator.
//!
//! Nothing in the pipelines is allowed to produce `NaN` or an infinity from a
//! zero denominator; every ratio goes through [`safe_divide`].

/// `numerator / denominator`, or `fallback` when the denominator is zero or
/// either operand is NaN.
pub fn safe_divide(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 || numerator.is_nan() || denominator.is_nan() {
        return fallback;
    }
    numerator / denominator
}

/// [`safe_divide`] with a fallback of zero.
#[inline]
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    safe_divide(numerator, denominator, 0.0)
}

/// Ratio expressed as a percentage, zero when undefined.
#[inline]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    safe_ratio(part, whole) * 100.0
}

/// Pins NaN and infinities to zero.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
