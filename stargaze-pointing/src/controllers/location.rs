//! Sets the model's position from location fixes.

use super::{lock_model, Controller, SharedModel};
use stargaze_core::GeoLocation;

/// A fix must move this far before the listener is told about it.
const MIN_DISTANCE_TO_NOTIFY_DEG: f64 = 0.01;

/// Callback invoked when the observer's position changes noticeably.
pub type LocationListener = Box<dyn Fn(&GeoLocation) + Send>;

/// Feeds location fixes from whatever positioning source the host has (GPS,
/// network, user preference) into the model.
///
/// Every fix updates the model; the listener only hears about fixes that
/// moved more than [`MIN_DISTANCE_TO_NOTIFY_DEG`] from the model's current
/// position, so the user is not nagged about GPS jitter.
pub struct LocationController {
    model: SharedModel,
    enabled: bool,
    listener: Option<LocationListener>,
}

impl LocationController {
    pub fn new(model: SharedModel) -> Self {
        Self {
            model,
            enabled: true,
            listener: None,
        }
    }

    pub fn set_listener(&mut self, listener: LocationListener) {
        self.listener = Some(listener);
    }

    /// The position the model currently uses.
    pub fn current_location(&self) -> GeoLocation {
        lock_model(&self.model).location().clone()
    }

    /// Applies a new fix.
    pub fn on_location_fix(&self, location: GeoLocation) {
        if !self.enabled {
            return;
        }
        let moved = {
            let model = lock_model(&self.model);
            model.location().angular_distance_deg(&location)
        };
        if moved > MIN_DISTANCE_TO_NOTIFY_DEG {
            log::debug!("informing listener of change of location to {}", location);
            if let Some(listener) = &self.listener {
                listener(&location);
            }
        } else {
            log::debug!("location not changed sufficiently to notify");
        }
        lock_model(&self.model).set_location(location);
    }
}

impl Controller for LocationController {
    fn set_enabled(&mut self, enabled: bool) {
        log::debug!("location controller enabled: {}", enabled);
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}
