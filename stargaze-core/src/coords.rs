//! Celestial coordinate types.
//!
//! Two representations of a direction on the sky:
//!
//! - [`GeocentricCoordinates`] — a unit vector in the celestial frame, the
//!   form every matrix transformation consumes. `x` points at RA 0 / Dec 0,
//!   `y` at RA 90 / Dec 0, `z` at the north celestial pole.
//! - [`EquatorialCoordinates`] — right ascension and declination in degrees,
//!   the form users read and catalogs store.
//!
//! Conversions between the two are exact up to rounding; RA coming back
//! from a vector is wrapped into `[0, 360)`.

use crate::angle::normalize_degrees;
use crate::constants::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES};
use crate::errors::{CoreError, Result};
use crate::matrix::Vector3;
use std::fmt;
use std::ops::Deref;

/// A direction on the unit sphere in the celestial frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeocentricCoordinates(pub Vector3);

impl GeocentricCoordinates {
    /// Creates coordinates directly from a vector. The caller is expected to
    /// supply a unit vector; [`from_ra_dec`](Self::from_ra_dec) always does.
    #[inline]
    pub fn new(v: Vector3) -> Self {
        Self(v)
    }

    /// Converts right ascension and declination (both in degrees) to a unit
    /// vector.
    pub fn from_ra_dec(ra_degrees: f64, dec_degrees: f64) -> Self {
        let ra = ra_degrees * DEGREES_TO_RADIANS;
        let dec = dec_degrees * DEGREES_TO_RADIANS;
        let cos_dec = libm::cos(dec);

        Self(Vector3::new(
            libm::cos(ra) * cos_dec,
            libm::sin(ra) * cos_dec,
            libm::sin(dec),
        ))
    }

    /// Right ascension in degrees, wrapped into `[0, 360)`.
    ///
    /// At the celestial poles RA is undefined; this returns 0 there.
    pub fn ra(&self) -> f64 {
        if self.0.x == 0.0 && self.0.y == 0.0 {
            return 0.0;
        }
        normalize_degrees(libm::atan2(self.0.y, self.0.x) * RADIANS_TO_DEGREES)
    }

    /// Declination in degrees, in `[-90, 90]` for unit vectors.
    pub fn dec(&self) -> f64 {
        let plane = libm::sqrt(self.0.x * self.0.x + self.0.y * self.0.y);
        libm::atan2(self.0.z, plane) * RADIANS_TO_DEGREES
    }

    /// The underlying vector.
    #[inline]
    pub fn vector(&self) -> Vector3 {
        self.0
    }
}

impl Deref for GeocentricCoordinates {
    type Target = Vector3;

    fn deref(&self) -> &Vector3 {
        &self.0
    }
}

impl From<Vector3> for GeocentricCoordinates {
    fn from(v: Vector3) -> Self {
        Self(v)
    }
}

impl fmt::Display for GeocentricCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Right ascension and declination, both in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquatorialCoordinates {
    /// Right ascension in degrees, conventionally `[0, 360)`.
    pub ra: f64,
    /// Declination in degrees, `[-90, 90]`.
    pub dec: f64,
}

impl EquatorialCoordinates {
    /// Creates coordinates from RA and Dec in degrees.
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra, dec }
    }

    /// Converts a unit-sphere direction back to RA/Dec.
    pub fn from_geocentric(g: &GeocentricCoordinates) -> Self {
        Self::new(g.ra(), g.dec())
    }

    /// Converts to a unit vector in the celestial frame.
    pub fn to_geocentric(&self) -> GeocentricCoordinates {
        GeocentricCoordinates::from_ra_dec(self.ra, self.dec)
    }

    /// Parses a sexagesimal right ascension, e.g. `"06:45:08.9"` (hours,
    /// minutes, seconds) and returns degrees.
    ///
    /// Components may be separated by `:` or whitespace; minutes and seconds
    /// are optional and default to zero.
    pub fn parse_ra(text: &str) -> Result<f64> {
        let (sign, hours, minutes, seconds) = parse_sexagesimal(text)?;
        if sign < 0.0 {
            return Err(CoreError::Parse(format!(
                "right ascension cannot be negative: '{}'",
                text
            )));
        }
        if hours >= 24.0 {
            return Err(CoreError::Parse(format!(
                "right ascension hours out of range: '{}'",
                text
            )));
        }
        Ok((hours + minutes / 60.0 + seconds / 3600.0) * 15.0)
    }

    /// Parses a sexagesimal declination, e.g. `"-16:42:58"` (degrees,
    /// arcminutes, arcseconds) and returns degrees.
    pub fn parse_dec(text: &str) -> Result<f64> {
        let (sign, degrees, minutes, seconds) = parse_sexagesimal(text)?;
        let value = sign * (degrees + minutes / 60.0 + seconds / 3600.0);
        if !(-90.0..=90.0).contains(&value) {
            return Err(CoreError::Parse(format!(
                "declination out of range: '{}'",
                text
            )));
        }
        Ok(value)
    }

    /// Parses an `"ra dec"` pair where each half is sexagesimal, e.g.
    /// `"06:45:08.9 -16:42:58"`.
    pub fn parse(ra_text: &str, dec_text: &str) -> Result<Self> {
        Ok(Self::new(Self::parse_ra(ra_text)?, Self::parse_dec(dec_text)?))
    }

    /// Formats RA as `hh:mm:ss.s` in hours.
    pub fn ra_string(&self) -> String {
        // Round once in tenths of a second so a carry propagates cleanly.
        let tenths = (normalize_degrees(self.ra) / 15.0 * 36_000.0).round() as u64;
        let h = tenths / 36_000 % 24;
        let m = tenths % 36_000 / 600;
        let s = (tenths % 600) as f64 / 10.0;
        format!("{:02}:{:02}:{:04.1}", h, m, s)
    }

    /// Formats Dec as `+dd:mm:ss`.
    pub fn dec_string(&self) -> String {
        let sign = if self.dec < 0.0 { '-' } else { '+' };
        let seconds = (self.dec.abs() * 3600.0).round() as u64;
        let d = seconds / 3600;
        let m = seconds % 3600 / 60;
        let s = seconds % 60;
        format!("{}{:02}:{:02}:{:02}", sign, d, m, s)
    }
}

impl fmt::Display for EquatorialCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RA {} Dec {}", self.ra_string(), self.dec_string())
    }
}

/// Splits a sexagesimal string into (sign, first, minutes, seconds).
///
/// Accepts one to three numeric components separated by `:` or whitespace,
/// with an optional leading sign on the first component.
fn parse_sexagesimal(text: &str) -> Result<(f64, f64, f64, f64)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Parse("empty coordinate string".into()));
    }

    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut parts = rest.split(|c: char| c == ':' || c.is_whitespace()).filter(|p| !p.is_empty());

    let mut component = |name: &str, required: bool| -> Result<f64> {
        match parts.next() {
            Some(p) => p
                .parse::<f64>()
                .map_err(|_| CoreError::Parse(format!("bad {} in '{}'", name, text))),
            None if required => Err(CoreError::Parse(format!("missing {} in '{}'", name, text))),
            None => Ok(0.0),
        }
    };

    let first = component("first component", true)?;
    let minutes = component("minutes", false)?;
    let seconds = component("seconds", false)?;

    if !(0.0..60.0).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
        return Err(CoreError::Parse(format!(
            "minutes/seconds out of range in '{}'",
            text
        )));
    }

    Ok((sign, first, minutes, seconds))
}
