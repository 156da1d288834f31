//! Instant retargeting of the pointing, used by search.

use super::{lock_model, Controller, SharedModel};
use stargaze_core::GeocentricCoordinates;

/// Flies the user to a search target in manual mode.
pub struct TeleportingController {
    model: SharedModel,
    enabled: bool,
}

impl TeleportingController {
    pub fn new(model: SharedModel) -> Self {
        Self {
            model,
            enabled: true,
        }
    }

    /// Repoints the model at `target` instantaneously.
    ///
    /// The new screen-up direction is not uniquely defined; any vector
    /// perpendicular to the target works, and the one chosen keeps the
    /// screen's horizontal axis where it was.
    pub fn teleport(&self, target: GeocentricCoordinates) {
        if !self.enabled {
            return;
        }
        log::debug!("teleporting to target {}", target);
        let mut model = lock_model(&self.model);
        let pointing = model.pointing();
        let here = pointing.line_of_sight().vector();
        if target.vector() == here {
            return;
        }

        let top = pointing.perpendicular().normalize();
        let normal = here.cross(&top);
        let new_up = normal.cross(&target.vector());

        model.set_pointing(target.vector(), new_up);
    }
}

impl Controller for TeleportingController {
    fn set_enabled(&mut self, enabled: bool) {
        log::debug!("teleporting controller enabled: {}", enabled);
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}
