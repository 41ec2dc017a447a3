//! Assertion helpers for gesture and trajectory tests.

use axispan_foundation::Bounds;

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f64, expected: f64, tolerance: f64, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

/// Assert that `value` lies inside the closed `bounds`.
pub fn assert_within_bounds(value: f64, bounds: Bounds, msg: &str) {
    assert!(
        bounds.contains(value),
        "{}: {} outside [{}, {}]",
        msg,
        value,
        bounds.min,
        bounds.max
    );
}

/// Assert that `value` sits exactly on a multiple of `spacing`.
pub fn assert_on_grid(value: f64, spacing: f64, msg: &str) {
    let steps = value / spacing;
    assert!(
        (steps - steps.round()).abs() < 1e-9,
        "{}: {} is not a multiple of {}",
        msg,
        value,
        spacing
    );
}
