//! Magnetic declination strategies.
//!
//! Compasses point at magnetic north; the sky is laid out against true
//! north. The model corrects for the difference through one of these
//! calculators, chosen by user preference.

use stargaze_core::GeoLocation;
use std::fmt;

/// Supplies the angle from true north to magnetic north, in degrees, for a
/// given place and time.
pub trait MagneticDeclinationCalculator: fmt::Display + Send {
    /// Declination in degrees, positive when magnetic north lies east of
    /// true north.
    fn declination_deg(&self) -> f64;

    /// Informs the calculator of the observer's location and the time as
    /// Unix epoch milliseconds.
    fn set_location_and_time(&mut self, location: &GeoLocation, epoch_millis: i64);
}

/// Always reports zero declination.
///
/// The safe default before any location fix arrives, and the right choice
/// when the compass is already aligned to true north.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroMagneticDeclination;

impl MagneticDeclinationCalculator for ZeroMagneticDeclination {
    fn declination_deg(&self) -> f64 {
        0.0
    }

    fn set_location_and_time(&mut self, _location: &GeoLocation, _epoch_millis: i64) {}
}

impl fmt::Display for ZeroMagneticDeclination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zero magnetic declination")
    }
}

/// Reports a fixed caller-supplied declination.
///
/// Stands in for a geomagnetic-field model: the host looks the value up for
/// the current fix and hands it over.
#[derive(Debug, Clone, Copy)]
pub struct PresetMagneticDeclination {
    declination_deg: f64,
}

impl PresetMagneticDeclination {
    pub fn new(declination_deg: f64) -> Self {
        Self { declination_deg }
    }
}

impl MagneticDeclinationCalculator for PresetMagneticDeclination {
    fn declination_deg(&self) -> f64 {
        self.declination_deg
    }

    fn set_location_and_time(&mut self, _location: &GeoLocation, _epoch_millis: i64) {}
}

impl fmt::Display for PresetMagneticDeclination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "preset magnetic declination {:.1} deg", self.declination_deg)
    }
}
