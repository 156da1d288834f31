//! Sets the direction of view from the orientation sensors.

use super::{lock_model, Controller, SharedModel};
use crate::smoothing::ExponentiallyWeightedSmoother;
use stargaze_core::Vector3;

const DEFAULT_SMOOTHING_ALPHA: f64 = 0.7;
const DEFAULT_SMOOTHING_EXPONENT: u32 = 3;

/// Forwards sensor readings into the model while enabled and started.
///
/// The fused rotation vector goes straight through; the classical
/// accelerometer/magnetometer pair is smoothed first, since those raw
/// streams shake visibly.
pub struct SensorOrientationController {
    model: SharedModel,
    enabled: bool,
    started: bool,
    acceleration_smoother: ExponentiallyWeightedSmoother,
    magnetic_smoother: ExponentiallyWeightedSmoother,
}

impl SensorOrientationController {
    pub fn new(model: SharedModel) -> Self {
        Self::with_smoothing(model, DEFAULT_SMOOTHING_ALPHA, DEFAULT_SMOOTHING_EXPONENT)
    }

    pub fn with_smoothing(model: SharedModel, alpha: f64, exponent: u32) -> Self {
        Self {
            model,
            enabled: true,
            started: false,
            acceleration_smoother: ExponentiallyWeightedSmoother::new(alpha, exponent),
            magnetic_smoother: ExponentiallyWeightedSmoother::new(alpha, exponent),
        }
    }

    fn accepting(&self) -> bool {
        self.enabled && self.started
    }

    /// Feeds a fused rotation-vector reading.
    pub fn on_rotation_vector(&self, values: &[f32]) {
        if !self.accepting() {
            return;
        }
        lock_model(&self.model).set_phone_sensor_values(values);
    }

    /// Feeds a raw accelerometer reading.
    pub fn on_acceleration(&self, sample: Vector3) {
        if !self.accepting() {
            return;
        }
        let smoothed = self.acceleration_smoother.smooth(sample);
        lock_model(&self.model).set_acceleration(smoothed);
    }

    /// Feeds a raw magnetometer reading.
    pub fn on_magnetic_field(&self, sample: Vector3) {
        if !self.accepting() {
            return;
        }
        let smoothed = self.magnetic_smoother.smooth(sample);
        lock_model(&self.model).set_magnetic_field(smoothed);
    }
}

impl Controller for SensorOrientationController {
    fn set_enabled(&mut self, enabled: bool) {
        log::debug!("sensor orientation controller enabled: {}", enabled);
        self.enabled = enabled;
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn start(&mut self) {
        log::debug!("accepting sensor readings");
        self.started = true;
    }

    fn stop(&mut self) {
        log::debug!("ignoring sensor readings");
        self.started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astronomer::AstronomerModel;
    use crate::controllers::shared;
    use crate::declination::ZeroMagneticDeclination;

    fn sensor_setup() -> (SharedModel, SensorOrientationController) {
        let model = shared(AstronomerModel::new(Box::new(ZeroMagneticDeclination)));
        let controller = SensorOrientationController::new(model.clone());
        (model, controller)
    }

    #[test]
    fn readings_are_dropped_until_started() {
        let (model, controller) = sensor_setup();

        // Device on its side: up would swing to -x if this got through.
        controller.on_acceleration(Vector3::new(9.8, 0.0, 0.0));
        lock_model(&model).pointing();
        let up = lock_model(&model).phone_up_direction();
        assert!(up.x.abs() < 1e-9, "dropped reading leaked into {}", up);
    }

    #[test]
    fn rotation_vector_flows_through_once_started() {
        let (model, mut controller) = sensor_setup();
        controller.start();
        controller.on_rotation_vector(&[0.0, 0.0, 0.0, 1.0]);

        lock_model(&model).pointing();
        // Identity rotation: up out of the screen.
        let up = lock_model(&model).phone_up_direction();
        assert!((up - Vector3::z_axis()).magnitude() < 1e-9);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let (_, mut controller) = sensor_setup();
        controller.start();
        controller.start();
        assert!(controller.accepting());
        controller.stop();
        controller.stop();
        assert!(!controller.accepting());
        controller.start();
        assert!(controller.accepting());
    }

    #[test]
    fn disabled_controller_drops_readings_even_when_started() {
        let (model, mut controller) = sensor_setup();
        controller.start();
        controller.set_enabled(false);

        controller.on_magnetic_field(Vector3::new(5.0, 5.0, 5.0));
        controller.on_acceleration(Vector3::new(9.8, 0.0, 0.0));

        lock_model(&model).pointing();
        let up = lock_model(&model).phone_up_direction();
        assert!(up.x.abs() < 1e-9, "dropped reading leaked into {}", up);
    }
}
