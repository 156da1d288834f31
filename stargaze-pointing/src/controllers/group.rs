//! The facade that wires every controller to one model.

use super::{
    lock_model, Controller, LocationController, ManualOrientationController,
    SensorOrientationController, SharedModel, TeleportingController, ZoomController,
};
use stargaze_core::{GeoLocation, GeocentricCoordinates};
use stargaze_time::clock::{Clock, RealClock};
use stargaze_time::{TimeTravelClock, TransitioningCompositeClock};
use std::sync::Arc;

/// Manages all the controllers that affect the model of the observer.
///
/// Both a factory and a facade: it builds the full controller set and the
/// time-travel clock stack, installs the composite clock on the model, and
/// forwards UI input to whichever controller handles it.
pub struct ControllerGroup {
    model: SharedModel,
    manual: ManualOrientationController,
    sensor: SensorOrientationController,
    zoom: ZoomController,
    teleport: TeleportingController,
    location: LocationController,
    time_travel_clock: Arc<TimeTravelClock>,
    transitioning_clock: Arc<TransitioningCompositeClock>,
    using_auto_mode: bool,
}

impl ControllerGroup {
    pub fn new(model: SharedModel) -> Self {
        Self::with_wall_clock(model, Arc::new(RealClock))
    }

    /// Builds the group with an injected wall clock, so tests can drive the
    /// whole stack deterministically.
    pub fn with_wall_clock(model: SharedModel, wall_clock: Arc<dyn Clock>) -> Self {
        let time_travel_clock = Arc::new(TimeTravelClock::with_wall_clock(wall_clock.clone()));
        let transitioning_clock = Arc::new(TransitioningCompositeClock::new(
            time_travel_clock.clone(),
            wall_clock,
        ));

        lock_model(&model).set_clock(transitioning_clock.clone());

        let mut group = Self {
            manual: ManualOrientationController::new(model.clone()),
            sensor: SensorOrientationController::new(model.clone()),
            zoom: ZoomController::new(model.clone()),
            teleport: TeleportingController::new(model.clone()),
            location: LocationController::new(model.clone()),
            model,
            time_travel_clock,
            transitioning_clock,
            using_auto_mode: true,
        };
        group.set_auto_mode(true);
        group
    }

    /// Switches to time travel, easing the sky to the supplied instant.
    /// See [`use_real_time`](Self::use_real_time).
    pub fn go_time_travel(&self, target_epoch_millis: i64) {
        self.transitioning_clock.go_time_travel(target_epoch_millis);
    }

    /// Eases the sky back to the present.
    /// See [`go_time_travel`](Self::go_time_travel).
    pub fn use_real_time(&self) {
        self.transitioning_clock.return_to_real_time();
    }

    pub fn is_time_traveling(&self) -> bool {
        self.transitioning_clock.is_time_traveling()
    }

    /// Speeds up time travel into the future (or slows travel into the
    /// past).
    pub fn accelerate_time_travel(&self) {
        self.time_travel_clock.accelerate_time_travel();
    }

    /// Slows time travel into the future (or speeds travel into the past).
    pub fn decelerate_time_travel(&self) {
        self.time_travel_clock.decelerate_time_travel();
    }

    /// Pauses time-travel playback.
    pub fn pause_time(&self) {
        self.time_travel_clock.pause_time();
    }

    /// Describes the current time-travel rate.
    pub fn speed_label(&self) -> &'static str {
        self.time_travel_clock.speed_label()
    }

    /// Whether pointing follows the sensors (auto) or the touch screen
    /// (manual).
    pub fn is_auto_mode(&self) -> bool {
        self.using_auto_mode
    }

    /// Selects sensor (true) or manual (false) pointing control.
    pub fn set_auto_mode(&mut self, auto: bool) {
        self.manual.set_enabled(!auto);
        self.sensor.set_enabled(auto);
        lock_model(&self.model).set_auto_update_pointing(auto);
        self.using_auto_mode = auto;
    }

    pub fn change_right_left(&self, radians: f64) {
        self.manual.change_right_left(radians);
    }

    pub fn change_up_down(&self, radians: f64) {
        self.manual.change_up_down(radians);
    }

    pub fn rotate(&self, degrees: f64) {
        self.manual.rotate(degrees);
    }

    pub fn zoom_by(&self, ratio: f64) {
        self.zoom.zoom_by(ratio);
    }

    pub fn teleport(&self, target: GeocentricCoordinates) {
        self.teleport.teleport(target);
    }

    pub fn on_location_fix(&self, location: GeoLocation) {
        self.location.on_location_fix(location);
    }

    /// The sensor controller, for feeding readings in.
    pub fn sensor_controller(&self) -> &SensorOrientationController {
        &self.sensor
    }

    /// The location controller, for listener registration.
    pub fn location_controller_mut(&mut self) -> &mut LocationController {
        &mut self.location
    }

    fn for_each_controller(&mut self, f: impl Fn(&mut dyn Controller)) {
        f(&mut self.sensor);
        f(&mut self.manual);
        f(&mut self.zoom);
        f(&mut self.teleport);
        f(&mut self.location);
    }
}

impl Controller for ControllerGroup {
    fn set_enabled(&mut self, enabled: bool) {
        log::info!("setting all controllers enabled: {}", enabled);
        self.for_each_controller(|c| c.set_enabled(enabled));
    }

    fn enabled(&self) -> bool {
        self.sensor.enabled() || self.manual.enabled()
    }

    fn start(&mut self) {
        log::info!("starting controllers");
        self.for_each_controller(|c| c.start());
    }

    fn stop(&mut self) {
        log::info!("stopping controllers");
        self.for_each_controller(|c| c.stop());
    }
}
