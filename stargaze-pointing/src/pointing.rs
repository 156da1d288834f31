//! The astronomer's pointing: where the device faces on the celestial
//! sphere, and which way is up along the screen.

use stargaze_core::{GeocentricCoordinates, Vector3};

/// Line of sight plus screen-up, both unit vectors in celestial coordinates.
///
/// Consumers read copies; the two update methods are crate-private so only
/// the model mutates the live instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pointing {
    line_of_sight: GeocentricCoordinates,
    perpendicular: GeocentricCoordinates,
}

impl Pointing {
    pub fn new(line_of_sight: GeocentricCoordinates, perpendicular: GeocentricCoordinates) -> Self {
        Self {
            line_of_sight,
            perpendicular,
        }
    }

    /// Direction into the screen, celestial frame.
    pub fn line_of_sight(&self) -> GeocentricCoordinates {
        self.line_of_sight
    }

    /// Up along the screen's long side, celestial frame.
    pub fn perpendicular(&self) -> GeocentricCoordinates {
        self.perpendicular
    }

    pub(crate) fn update_line_of_sight(&mut self, v: Vector3) {
        self.line_of_sight = GeocentricCoordinates::new(v);
    }

    pub(crate) fn update_perpendicular(&mut self, v: Vector3) {
        self.perpendicular = GeocentricCoordinates::new(v);
    }
}

impl Default for Pointing {
    fn default() -> Self {
        Self::new(
            GeocentricCoordinates::new(Vector3::x_axis()),
            GeocentricCoordinates::new(Vector3::y_axis()),
        )
    }
}
