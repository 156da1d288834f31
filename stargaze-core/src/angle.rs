//! Angle normalization helpers.
//!
//! Right ascension and sidereal time are cyclic in degrees, clock-face time
//! is cyclic in hours. Both wrapping functions use `libm::fmod` rather than
//! the `%` operator because Rust's `%` is a remainder, not a modulo: for
//! negative inputs the two differ, and angles must always land in the
//! positive half-open range.

/// Wraps an angle in degrees into `[0, 360)`.
///
/// ```
/// use stargaze_core::angle::normalize_degrees;
///
/// assert_eq!(normalize_degrees(370.0), 10.0);
/// assert_eq!(normalize_degrees(-10.0), 350.0);
/// ```
pub fn normalize_degrees(degrees: f64) -> f64 {
    let remainder = libm::fmod(degrees, 360.0);
    if remainder < 0.0 {
        remainder + 360.0
    } else {
        remainder
    }
}

/// Wraps a time-of-day value in hours into `[0, 24)`.
pub fn normalize_hours(hours: f64) -> f64 {
    let remainder = libm::fmod(hours, 24.0);
    if remainder < 0.0 {
        remainder + 24.0
    } else {
        remainder
    }
}
