//! Numeric constants shared across the workspace.

pub const PI: f64 = std::f64::consts::PI;
pub const TWO_PI: f64 = 2.0 * PI;
pub const HALF_PI: f64 = PI / 2.0;

/// Multiply degrees by this to get radians.
pub const DEGREES_TO_RADIANS: f64 = PI / 180.0;
/// Multiply radians by this to get degrees.
pub const RADIANS_TO_DEGREES: f64 = 180.0 / PI;

/// Julian day number of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2451545.0;
/// Days per Julian century.
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;
