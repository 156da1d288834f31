//! Julian day and mean sidereal time.
//!
//! The pointing model needs exactly one astronomical time quantity: the
//! local mean sidereal time, which is the right ascension currently crossing
//! the observer's meridian and therefore the RA of the zenith. Precision
//! requirements are those of a handheld display (arcminutes), so the classic
//! GMST polynomial on the UT1-equals-UTC approximation is plenty.

use crate::constants::UNIX_EPOCH_JD;
use chrono::{DateTime, Datelike, Timelike, Utc};
use stargaze_core::angle::normalize_degrees;
use stargaze_core::constants::{DAYS_PER_JULIAN_CENTURY, J2000_JD};
use stargaze_core::{EquatorialCoordinates, GeoLocation};

/// Computes the Julian day for a UTC instant.
///
/// Meeus, *Astronomical Algorithms*, chapter 7, valid for all Gregorian
/// dates. The day fraction includes sub-second precision so consecutive
/// frames see a smoothly advancing sky.
pub fn julian_day(utc: &DateTime<Utc>) -> f64 {
    let mut y = utc.year() as f64;
    let mut m = utc.month() as f64;
    let d = utc.day() as f64
        + utc.hour() as f64 / 24.0
        + utc.minute() as f64 / 1440.0
        + (utc.second() as f64 + utc.nanosecond() as f64 / 1e9) / 86400.0;

    if m <= 2.0 {
        y -= 1.0;
        m += 12.0;
    }

    let a = libm::floor(y / 100.0);
    let b = 2.0 - a + libm::floor(a / 4.0);

    libm::floor(365.25 * (y + 4716.0)) + libm::floor(30.6001 * (m + 1.0)) + d + b - 1524.5
}

/// Computes the Julian day directly from Unix epoch milliseconds.
///
/// Equivalent to [`julian_day`] on the corresponding instant, but infallible
/// and cheap, so the model's per-frame path uses this form.
pub fn julian_day_from_epoch_millis(millis: i64) -> f64 {
    UNIX_EPOCH_JD + millis as f64 / 86_400_000.0
}

/// Julian centuries since J2000.0.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_JULIAN_CENTURY
}

/// Local mean sidereal time in degrees for a given Julian day and an east
/// longitude in degrees. Result is wrapped into `[0, 360)`.
///
/// Greenwich mean sidereal time per the IAU 1982 expression (Meeus chapter
/// 12); pass longitude 0 for GMST itself.
pub fn mean_sidereal_time_deg(jd: f64, longitude_deg: f64) -> f64 {
    let t = julian_centuries(jd);
    let gmst = 280.46061837
        + 360.98564736629 * (jd - J2000_JD)
        + 0.000387933 * t * t
        - t * t * t / 38_710_000.0;
    normalize_degrees(gmst + longitude_deg)
}

/// RA/Dec of the zenith above `location` at the given UTC instant.
///
/// RA is the local mean sidereal time expressed in degrees, Dec is the
/// latitude. This is the anchor from which the model derives its celestial
/// frame axes.
pub fn zenith(utc: &DateTime<Utc>, location: &GeoLocation) -> EquatorialCoordinates {
    EquatorialCoordinates::new(
        mean_sidereal_time_deg(julian_day(utc), location.longitude()),
        location.latitude(),
    )
}

/// [`zenith`] for a Unix-epoch-millisecond instant, the form clocks report.
pub fn zenith_from_epoch_millis(millis: i64, location: &GeoLocation) -> EquatorialCoordinates {
    EquatorialCoordinates::new(
        mean_sidereal_time_deg(julian_day_from_epoch_millis(millis), location.longitude()),
        location.latitude(),
    )
}
