//! Field-of-view control.

use super::{lock_model, Controller, SharedModel};

const MAX_ZOOM_DEG: f64 = 90.0;
const MIN_ZOOM_DEG: f64 = 1.5;

/// Controls the field of view of the user.
pub struct ZoomController {
    model: SharedModel,
    enabled: bool,
}

impl ZoomController {
    pub fn new(model: SharedModel) -> Self {
        Self {
            model,
            enabled: true,
        }
    }

    /// Scales the field of view by `ratio`: greater than 1 zooms out, less
    /// than 1 zooms in. The result is clamped to [1.5, 90] degrees.
    pub fn zoom_by(&self, ratio: f64) {
        let mut model = lock_model(&self.model);
        let degrees = (model.field_of_view() * ratio).clamp(MIN_ZOOM_DEG, MAX_ZOOM_DEG);
        if self.enabled {
            model.set_field_of_view(degrees);
        }
    }
}

impl Controller for ZoomController {
    fn set_enabled(&mut self, enabled: bool) {
        log::debug!("zoom controller enabled: {}", enabled);
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}
