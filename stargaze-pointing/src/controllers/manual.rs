//! Manual pointing control from touch input.

use super::{lock_model, Controller, SharedModel};
use stargaze_core::Matrix3x3;

/// Moves the pointing in response to drags and twists on the screen.
pub struct ManualOrientationController {
    model: SharedModel,
    enabled: bool,
}

impl ManualOrientationController {
    pub fn new(model: SharedModel) -> Self {
        Self {
            model,
            enabled: true,
        }
    }

    /// Moves the pointing right or left by `radians`.
    ///
    /// The linear step is only accurate in the limit of small angles, which
    /// single drag events always are.
    pub fn change_right_left(&self, radians: f64) {
        if !self.enabled {
            return;
        }
        let mut model = lock_model(&self.model);
        let pointing = model.pointing();
        let line_of_sight = pointing.line_of_sight().vector();
        let top = pointing.perpendicular().vector();

        let horizontal = line_of_sight.cross(&top);
        let new_line_of_sight = (line_of_sight + horizontal * radians).normalize();

        model.set_pointing(new_line_of_sight, top);
    }

    /// Moves the pointing up or down by `radians`, tilting the screen-up
    /// vector to keep the frame orthogonal.
    pub fn change_up_down(&self, radians: f64) {
        if !self.enabled {
            return;
        }
        let mut model = lock_model(&self.model);
        let pointing = model.pointing();
        let line_of_sight = pointing.line_of_sight().vector();
        let top = pointing.perpendicular().vector();

        let new_line_of_sight = (line_of_sight + top * -radians).normalize();
        let new_top = (top + line_of_sight * radians).normalize();

        model.set_pointing(new_line_of_sight, new_top);
    }

    /// Rotates the view about the current line of sight.
    ///
    /// Positive degrees turn the sky clockwise on screen.
    pub fn rotate(&self, degrees: f64) {
        if !self.enabled {
            return;
        }
        let mut model = lock_model(&self.model);
        let pointing = model.pointing();
        let line_of_sight = pointing.line_of_sight().vector();
        let rotation = Matrix3x3::from_rotation(-degrees, line_of_sight);

        let new_top = (rotation * pointing.perpendicular().vector()).normalize();

        model.set_pointing(line_of_sight, new_top);
    }
}

impl Controller for ManualOrientationController {
    fn set_enabled(&mut self, enabled: bool) {
        log::debug!("manual orientation controller enabled: {}", enabled);
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }
}
