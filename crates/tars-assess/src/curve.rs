//! Clamped power curves mapping a raw quantity onto [0, 1].
//!
//! Inputs are clamped to the curve's bounds before the exponent is applied,
//! so a malformed quantity can never produce an out-of-range factor.
//! A non-finite or non-positive exponent is treated as linear.

use tars_core::config::CurveBounds;

/// 1.0 at or inside `near`, 0.0 at or beyond `far`, non-increasing between.
///
/// Used for range-like quantities: closer means more dangerous.
pub fn falling(value: f64, bounds: &CurveBounds) -> f64 {
    1.0 - rising(value, bounds)
}

/// 0.0 at or below `near`, 1.0 at or above `far`, non-decreasing between.
///
/// Used for speed: faster means more dangerous.
pub fn rising(value: f64, bounds: &CurveBounds) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let span = bounds.far - bounds.near;
    if span <= 0.0 {
        return if value >= bounds.far { 1.0 } else { 0.0 };
    }
    let t = ((value - bounds.near) / span).clamp(0.0, 1.0);
    t.powf(exponent(bounds.curve)).clamp(0.0, 1.0)
}

/// 0.0 at or below zero, 1.0 at or above `max`, `(value / max)^curve` between.
pub fn ratio(value: f64, max: f64, curve: f64) -> f64 {
    if value.is_nan() || value <= 0.0 || max <= 0.0 {
        return 0.0;
    }
    if value >= max {
        return 1.0;
    }
    (value / max).powf(exponent(curve)).clamp(0.0, 1.0)
}

fn exponent(curve: f64) -> f64 {
    if curve.is_finite() && curve > 0.0 {
        curve
    } else {
        1.0
    }
}
