//! Observer locations on the Earth's surface.

use crate::constants::{DEGREES_TO_RADIANS, RADIANS_TO_DEGREES};
use crate::errors::{CoreError, Result};
use std::fmt;

/// A geographic observer location.
///
/// Latitude and longitude are in degrees (north and east positive), altitude
/// in meters above sea level. `provider` records where the fix came from
/// ("gps", "network", "manual") so stale or hand-entered positions can be
/// told apart from live ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoLocation {
    latitude: f64,
    longitude: f64,
    altitude: f64,
    provider: String,
}

impl GeoLocation {
    /// Creates a validated location from degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLocation`] if any component is non-finite,
    /// latitude is outside `[-90, 90]`, or longitude is outside `[-180, 180]`.
    pub fn from_degrees(
        latitude: f64,
        longitude: f64,
        altitude: f64,
        provider: impl Into<String>,
    ) -> Result<Self> {
        if !latitude.is_finite() || !longitude.is_finite() || !altitude.is_finite() {
            return Err(CoreError::InvalidLocation(format!(
                "non-finite component: lat={}, lon={}, alt={}",
                latitude, longitude, altitude
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::InvalidLocation(format!(
                "latitude {} outside [-90, 90]",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::InvalidLocation(format!(
                "longitude {} outside [-180, 180]",
                longitude
            )));
        }

        Ok(Self {
            latitude,
            longitude,
            altitude,
            provider: provider.into(),
        })
    }

    /// Latitude in degrees, north positive.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, east positive.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Altitude in meters above sea level.
    #[inline]
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// The source of this fix.
    #[inline]
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Great-circle angular separation from `other`, in degrees.
    ///
    /// Used to decide whether a fresh fix has moved far enough to matter for
    /// pointing purposes. Altitude is ignored.
    pub fn angular_distance_deg(&self, other: &Self) -> f64 {
        let lat1 = self.latitude * DEGREES_TO_RADIANS;
        let lat2 = other.latitude * DEGREES_TO_RADIANS;
        let dlat = lat2 - lat1;
        let dlon = (other.longitude - self.longitude) * DEGREES_TO_RADIANS;

        // Haversine, stable for the small separations this is used for.
        let a = libm::sin(dlat / 2.0) * libm::sin(dlat / 2.0)
            + libm::cos(lat1) * libm::cos(lat2) * libm::sin(dlon / 2.0) * libm::sin(dlon / 2.0);
        2.0 * libm::atan2(libm::sqrt(a), libm::sqrt(1.0 - a)) * RADIANS_TO_DEGREES
    }
}

impl Default for GeoLocation {
    /// Null Island with an "unset" provider.
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            provider: "unset".to_string(),
        }
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.4}, {:.4}) alt {:.0}m [{}]",
            self.latitude, self.longitude, self.altitude, self.provider
        )
    }
}
