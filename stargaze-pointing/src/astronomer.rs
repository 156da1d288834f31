//! The model of the astronomer.
//!
//! Holds where and when the observer is and which way the device points,
//! and translates between three frames of reference:
//!
//! 1. **Celestial** — fixed against the background stars, `z` at the north
//!    celestial pole.
//! 2. **Phone** — fixed in the device, `x` across the short side, `y` across
//!    the long side, `z` out of the screen.
//! 3. **Local** — fixed at the observer, `x` due east along the ground,
//!    `y` due north, `z` at the zenith.
//!
//! The local frame is computed twice, once in phone coordinates (from the
//! sensors) and once in celestial coordinates (from place and time). With
//! `N`, `U`, `E` the local north, up and east vectors, the frame matrices
//! are `axesPhone = [N U E]` and `axesCelestial = [N U E]`, and the
//! transform `T` with `axesCelestial = T * axesPhone` carries any phone
//! vector onto the sky:
//!
//! ```text
//! [viewDir viewUp]_celestial = T * [viewDir viewUp]_phone
//! ```
//!
//! where the phone-frame view vectors are constants.

use crate::declination::MagneticDeclinationCalculator;
use crate::pointing::Pointing;
use chrono::{DateTime, Utc};
use stargaze_core::{EquatorialCoordinates, GeoLocation, GeocentricCoordinates, Matrix3x3, Vector3};
use stargaze_time::clock::{Clock, RealClock};
use stargaze_time::julian;
use std::sync::Arc;

const POINTING_DIR_IN_PHONE_COORDS: Vector3 = Vector3 {
    x: 0.0,
    y: 0.0,
    z: -1.0,
};
const SCREEN_UP_IN_PHONE_COORDS: Vector3 = Vector3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};
const SCREEN_DOWN_IN_PHONE_COORDS: Vector3 = Vector3 {
    x: 1.0,
    y: 0.0,
    z: 0.0,
};
const AXIS_OF_EARTHS_ROTATION: Vector3 = Vector3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Celestial axes drift slowly (sidereal motion is a quarter degree a
/// minute), so recomputing them faster than this wastes work.
const MINIMUM_TIME_BETWEEN_CELESTIAL_COORD_UPDATES_MILLIS: i64 = 60_000;

pub const DEFAULT_FIELD_OF_VIEW_DEG: f64 = 70.0;

/// Where and when the astronomer is, and which way the device points.
pub struct AstronomerModel {
    pointing: Pointing,
    /// Sensor acceleration in the phone frame.
    acceleration: Vector3,
    /// Sensor magnetic field in the phone frame.
    magnetic_field: Vector3,
    rotation_vector: [f32; 4],
    use_rotation_vector: bool,
    screen_in_phone_coords: Vector3,
    declination_calculator: Box<dyn MagneticDeclinationCalculator>,
    auto_update_pointing: bool,
    field_of_view: f64,
    location: GeoLocation,
    clock: Arc<dyn Clock>,
    celestial_coords_last_updated: Option<i64>,
    up_phone: Vector3,
    /// North along the ground, celestial frame.
    true_north_celestial: Vector3,
    /// Up, celestial frame.
    up_celestial: Vector3,
    /// East along the ground, celestial frame.
    true_east_celestial: Vector3,
    /// `[N U E]` phone-frame axes, inverted.
    axes_phone_inverse: Matrix3x3,
    /// `[N U E]` celestial-frame axes with the magnetic correction applied.
    axes_magnetic_celestial: Matrix3x3,
}

impl AstronomerModel {
    pub fn new(declination_calculator: Box<dyn MagneticDeclinationCalculator>) -> Self {
        let acceleration = Vector3::new(0.0, -1.0, -9.0);
        let mut model = Self {
            pointing: Pointing::default(),
            acceleration,
            magnetic_field: Vector3::new(0.0, -1.0, 0.0),
            rotation_vector: [1.0, 0.0, 0.0, 0.0],
            use_rotation_vector: false,
            screen_in_phone_coords: SCREEN_UP_IN_PHONE_COORDS,
            declination_calculator,
            auto_update_pointing: true,
            field_of_view: DEFAULT_FIELD_OF_VIEW_DEG,
            location: GeoLocation::default(),
            clock: Arc::new(RealClock),
            celestial_coords_last_updated: None,
            up_phone: acceleration * -1.0,
            true_north_celestial: Vector3::x_axis(),
            up_celestial: Vector3::y_axis(),
            true_east_celestial: AXIS_OF_EARTHS_ROTATION,
            axes_phone_inverse: Matrix3x3::identity(),
            axes_magnetic_celestial: Matrix3x3::identity(),
        };
        model.update_celestial_axes(true);
        model
    }

    /// Selects which phone-frame vector counts as "up the screen": the long
    /// side normally, the short side when the display is held rotated.
    pub fn set_horizontal_rotation(&mut self, horizontal: bool) {
        self.screen_in_phone_coords = if horizontal {
            SCREEN_DOWN_IN_PHONE_COORDS
        } else {
            SCREEN_UP_IN_PHONE_COORDS
        };
    }

    /// When false, [`pointing`](Self::pointing) returns the last set value
    /// untouched. This is the switch between sensor and manual mode.
    pub fn set_auto_update_pointing(&mut self, auto: bool) {
        self.auto_update_pointing = auto;
    }

    /// Field of view in degrees.
    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn set_field_of_view(&mut self, degrees: f64) {
        self.field_of_view = degrees;
    }

    /// The declination correction currently applied, in degrees.
    pub fn magnetic_correction_deg(&self) -> f64 {
        self.declination_calculator.declination_deg()
    }

    /// The model's current time as UTC.
    pub fn time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.time_millis()).unwrap_or_default()
    }

    /// The model's current time as Unix epoch milliseconds.
    pub fn time_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// The observer's position on Earth.
    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    pub fn set_location(&mut self, location: GeoLocation) {
        // A fix at the same coordinates must not invalidate the cached axes.
        let moved = self.location.latitude() != location.latitude()
            || self.location.longitude() != location.longitude()
            || self.location.altitude() != location.altitude();
        log::debug!("location set to {}", location);
        self.location = location;
        if moved {
            self.update_celestial_axes(true);
        }
    }

    /// Up in the phone frame, from the last sensor reading.
    pub fn phone_up_direction(&self) -> Vector3 {
        self.up_phone
    }

    /// Feeds the fused rotation-vector sensor reading.
    ///
    /// Some devices deliver an oversized vector; anything beyond the first
    /// four components is ignored. Once called, the model uses the rotation
    /// vector permanently in preference to the accel/mag pair.
    pub fn set_phone_sensor_values(&mut self, rotation_vector: &[f32]) {
        let n = rotation_vector.len().min(4);
        self.rotation_vector[..n].copy_from_slice(&rotation_vector[..n]);
        self.use_rotation_vector = true;
    }

    /// Feeds an accelerometer reading, phone frame.
    pub fn set_acceleration(&mut self, acceleration: Vector3) {
        self.acceleration = acceleration;
    }

    /// Feeds a magnetometer reading, phone frame.
    pub fn set_magnetic_field(&mut self, magnetic_field: Vector3) {
        self.magnetic_field = magnetic_field;
    }

    /// North along the ground, celestial frame.
    pub fn north(&mut self) -> GeocentricCoordinates {
        self.update_celestial_axes(false);
        GeocentricCoordinates::new(self.true_north_celestial)
    }

    /// South along the ground, celestial frame.
    pub fn south(&mut self) -> GeocentricCoordinates {
        self.update_celestial_axes(false);
        GeocentricCoordinates::new(self.true_north_celestial * -1.0)
    }

    /// East along the ground, celestial frame.
    pub fn east(&mut self) -> GeocentricCoordinates {
        self.update_celestial_axes(false);
        GeocentricCoordinates::new(self.true_east_celestial)
    }

    /// West along the ground, celestial frame.
    pub fn west(&mut self) -> GeocentricCoordinates {
        self.update_celestial_axes(false);
        GeocentricCoordinates::new(self.true_east_celestial * -1.0)
    }

    /// Straight up, celestial frame.
    pub fn zenith(&mut self) -> GeocentricCoordinates {
        self.update_celestial_axes(false);
        GeocentricCoordinates::new(self.up_celestial)
    }

    /// Straight down, celestial frame.
    pub fn nadir(&mut self) -> GeocentricCoordinates {
        self.update_celestial_axes(false);
        GeocentricCoordinates::new(self.up_celestial * -1.0)
    }

    pub fn set_magnetic_declination_calculator(
        &mut self,
        calculator: Box<dyn MagneticDeclinationCalculator>,
    ) {
        self.declination_calculator = calculator;
        self.update_celestial_axes(true);
    }

    /// The current pointing, recomputed from the sensors first when in auto
    /// mode.
    pub fn pointing(&mut self) -> Pointing {
        self.calculate_pointing();
        self.pointing
    }

    /// Sets the direction of view directly (manual mode, teleports).
    pub fn set_pointing(&mut self, line_of_sight: Vector3, perpendicular: Vector3) {
        self.pointing.update_line_of_sight(line_of_sight);
        self.pointing.update_perpendicular(perpendicular);
    }

    /// RA/Dec of the current line of sight.
    pub fn equatorial_coordinates(&self) -> EquatorialCoordinates {
        EquatorialCoordinates::from_geocentric(&self.pointing.line_of_sight())
    }

    /// Swaps the source of time; the sky follows on the next update.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
        self.update_celestial_axes(true);
    }

    fn calculate_pointing(&mut self) {
        if !self.auto_update_pointing {
            return;
        }
        self.update_celestial_axes(false);
        self.update_phone_axes_from_sensors();

        let transform = self.axes_magnetic_celestial * self.axes_phone_inverse;

        let view = transform * POINTING_DIR_IN_PHONE_COORDS;
        let screen_up = transform * self.screen_in_phone_coords;

        self.pointing.update_line_of_sight(view);
        self.pointing.update_perpendicular(screen_up);
    }

    /// Recomputes local north, up and east in celestial coordinates.
    ///
    /// Rate limited unless `force_update`: location, clock and declination
    /// changes force, per-frame reads do not.
    fn update_celestial_axes(&mut self, force_update: bool) {
        let current_time = self.clock.now_millis();
        if !force_update {
            if let Some(last) = self.celestial_coords_last_updated {
                if (current_time - last).abs() < MINIMUM_TIME_BETWEEN_CELESTIAL_COORD_UPDATES_MILLIS
                {
                    return;
                }
            }
        }
        self.celestial_coords_last_updated = Some(current_time);

        self.declination_calculator
            .set_location_and_time(&self.location, current_time);

        self.up_celestial = julian::zenith_from_epoch_millis(current_time, &self.location)
            .to_geocentric()
            .vector();
        let z = AXIS_OF_EARTHS_ROTATION;
        self.true_north_celestial =
            (z - self.up_celestial * self.up_celestial.dot(&z)).normalize();
        self.true_east_celestial = self.true_north_celestial.cross(&self.up_celestial);

        // Rather than correct the phone's axes for the magnetic declination,
        // rotate the celestial axes by the same amount the other way.
        let declination = self.declination_calculator.declination_deg();
        let correction = Matrix3x3::from_rotation(-declination, self.up_celestial);
        let magnetic_north_celestial = correction * self.true_north_celestial;
        let magnetic_east_celestial = magnetic_north_celestial.cross(&self.up_celestial);

        self.axes_magnetic_celestial = Matrix3x3::from_columns(
            magnetic_north_celestial,
            self.up_celestial,
            magnetic_east_celestial,
        );
    }

    /// Recomputes magnetic north, up and east in phone coordinates from the
    /// sensors, and the inverse frame matrix.
    fn update_phone_axes_from_sensors(&mut self) {
        let (magnetic_north_phone, magnetic_east_phone);
        if self.use_rotation_vector {
            let rows = rotation_matrix_from_vector(&self.rotation_vector);
            // East, north and up are the rows of the rotation matrix.
            magnetic_east_phone = rows[0];
            magnetic_north_phone = rows[1];
            self.up_phone = rows[2];
        } else {
            let down = self.acceleration.normalize();
            // The field vector points from north to south, so reverse it.
            let field_to_north = (-self.magnetic_field).normalize();
            // Project out the vertical part to get north along the ground.
            magnetic_north_phone =
                (field_to_north - down * field_to_north.dot(&down)).normalize();
            self.up_phone = -down;
            magnetic_east_phone = magnetic_north_phone.cross(&self.up_phone);
        }
        // The frame matrix is orthogonal, so its inverse is its transpose.
        // Building from row vectors instead of columns gets it directly.
        self.axes_phone_inverse = Matrix3x3::from_rows(
            magnetic_north_phone,
            self.up_phone,
            magnetic_east_phone,
        );
    }
}

/// Converts a rotation-vector quaternion `(x, y, z, w)` to the rows of the
/// phone-to-world rotation matrix: east, north, up in phone coordinates.
fn rotation_matrix_from_vector(rotation_vector: &[f32; 4]) -> [Vector3; 3] {
    let q1 = rotation_vector[0] as f64;
    let q2 = rotation_vector[1] as f64;
    let q3 = rotation_vector[2] as f64;
    let q0 = rotation_vector[3] as f64;

    let sq_q1 = 2.0 * q1 * q1;
    let sq_q2 = 2.0 * q2 * q2;
    let sq_q3 = 2.0 * q3 * q3;
    let q1_q2 = 2.0 * q1 * q2;
    let q3_q0 = 2.0 * q3 * q0;
    let q1_q3 = 2.0 * q1 * q3;
    let q2_q0 = 2.0 * q2 * q0;
    let q2_q3 = 2.0 * q2 * q3;
    let q1_q0 = 2.0 * q1 * q0;

    [
        Vector3::new(1.0 - sq_q2 - sq_q3, q1_q2 - q3_q0, q1_q3 + q2_q0),
        Vector3::new(q1_q2 + q3_q0, 1.0 - sq_q1 - sq_q3, q2_q3 - q1_q0),
        Vector3::new(q1_q3 - q2_q0, q2_q3 + q1_q0, 1.0 - sq_q1 - sq_q2),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declination::{PresetMagneticDeclination, ZeroMagneticDeclination};
    use stargaze_time::clock::test_support::FakeClock;

    const TOL: f64 = 1e-9;

    /// 2021-06-01 22:00:00 UTC.
    const TEST_EPOCH_MILLIS: i64 = 1_622_584_800_000;

    fn equator() -> GeoLocation {
        GeoLocation::from_degrees(0.0, 0.0, 0.0, "manual").unwrap()
    }

    fn model_at(clock: Arc<FakeClock>, location: GeoLocation) -> AstronomerModel {
        let mut model = AstronomerModel::new(Box::new(ZeroMagneticDeclination));
        model.set_clock(clock);
        model.set_location(location);
        model
    }

    fn assert_vectors_close(a: Vector3, b: Vector3, tol: f64) {
        assert!((a - b).magnitude() < tol, "{} != {}", a, b);
    }

    #[test]
    fn zenith_at_equator_is_on_celestial_equator() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock, equator());

        let zenith = model.zenith();
        assert!((zenith.magnitude() - 1.0).abs() < TOL);
        assert!(zenith.dec().abs() < TOL);

        let expected_ra =
            julian::zenith_from_epoch_millis(TEST_EPOCH_MILLIS, &equator()).ra;
        assert!((zenith.ra() - expected_ra).abs() < 1e-6);
    }

    #[test]
    fn cardinal_directions_form_a_frame() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let loc = GeoLocation::from_degrees(45.0, 11.0, 0.0, "manual").unwrap();
        let mut model = model_at(clock, loc);

        let north = model.north().vector();
        let east = model.east().vector();
        let up = model.zenith().vector();

        assert!(north.dot(&up).abs() < TOL);
        assert!(east.dot(&up).abs() < TOL);
        assert!(north.dot(&east).abs() < TOL);
        assert_vectors_close(north.cross(&up), east, TOL);

        assert_vectors_close(model.south().vector(), -north, TOL);
        assert_vectors_close(model.west().vector(), -east, TOL);
        assert_vectors_close(model.nadir().vector(), -up, TOL);
    }

    #[test]
    fn flat_phone_points_at_the_nadir() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock, equator());

        // Phone flat on the ground, screen up, long side to magnetic north.
        model.set_acceleration(Vector3::new(0.0, 0.0, -9.8));
        model.set_magnetic_field(Vector3::new(0.0, -1.0, 0.0));

        let pointing = model.pointing();
        let nadir = model.nadir().vector();
        let north = model.north().vector();

        assert_vectors_close(pointing.line_of_sight().vector(), nadir, 1e-9);
        assert_vectors_close(pointing.perpendicular().vector(), north, 1e-9);
    }

    #[test]
    fn identity_rotation_vector_matches_flat_phone() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut fused = model_at(clock.clone(), equator());
        fused.set_acceleration(Vector3::new(0.0, 0.0, -9.8));
        fused.set_magnetic_field(Vector3::new(0.0, -1.0, 0.0));

        let mut rotated = model_at(clock, equator());
        rotated.set_phone_sensor_values(&[0.0, 0.0, 0.0, 1.0]);

        let a = fused.pointing();
        let b = rotated.pointing();
        assert_vectors_close(
            a.line_of_sight().vector(),
            b.line_of_sight().vector(),
            1e-9,
        );
        assert_vectors_close(
            a.perpendicular().vector(),
            b.perpendicular().vector(),
            1e-9,
        );
    }

    #[test]
    fn oversized_rotation_vector_is_truncated() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock, equator());

        // Five components, as some devices report; the fifth is an accuracy
        // estimate and must be ignored.
        model.set_phone_sensor_values(&[0.0, 0.0, 0.0, 1.0, 0.5]);
        let pointing = model.pointing();
        let nadir = model.nadir().vector();
        assert_vectors_close(pointing.line_of_sight().vector(), nadir, 1e-9);
    }

    #[test]
    fn celestial_axes_are_rate_limited() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock.clone(), equator());

        let first = model.zenith();

        // Half a minute later the cache still holds.
        clock.advance(30_000);
        assert_eq!(model.zenith(), first);

        // Past the limit the axes move with the sky.
        clock.advance(31_000);
        let later = model.zenith();
        assert!(later != first);
        assert!(later.ra() > first.ra());
    }

    #[test]
    fn location_change_defeats_the_rate_limit() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock.clone(), equator());

        let first = model.zenith();
        clock.advance(1_000);

        let elsewhere = GeoLocation::from_degrees(30.0, 45.0, 0.0, "manual").unwrap();
        model.set_location(elsewhere);
        let moved = model.zenith();
        assert!(moved != first);
        assert!((moved.dec() - 30.0).abs() < TOL);
    }

    #[test]
    fn identical_location_preserves_the_rate_limit() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock.clone(), equator());

        let first = model.zenith();
        clock.advance(30_000);

        // A second fix at the same coordinates, from a different source.
        let same_place = GeoLocation::from_degrees(0.0, 0.0, 0.0, "network").unwrap();
        model.set_location(same_place);
        assert_eq!(model.zenith(), first);
    }

    #[test]
    fn manual_mode_freezes_the_pointing() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock, equator());

        model.set_auto_update_pointing(false);
        let los = Vector3::new(0.0, 1.0, 0.0);
        let up = Vector3::new(0.0, 0.0, 1.0);
        model.set_pointing(los, up);

        model.set_acceleration(Vector3::new(1.0, 2.0, 3.0));
        let pointing = model.pointing();
        assert_eq!(pointing.line_of_sight().vector(), los);
        assert_eq!(pointing.perpendicular().vector(), up);
    }

    #[test]
    fn declination_rotates_the_pointing_about_the_zenith() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));

        let mut plain = model_at(clock.clone(), equator());
        plain.set_acceleration(Vector3::new(0.0, 0.0, -9.8));
        plain.set_magnetic_field(Vector3::new(0.0, -1.0, 0.0));
        let reference = plain.pointing();

        let mut corrected = AstronomerModel::new(Box::new(PresetMagneticDeclination::new(10.0)));
        corrected.set_clock(clock);
        corrected.set_location(equator());
        corrected.set_acceleration(Vector3::new(0.0, 0.0, -9.8));
        corrected.set_magnetic_field(Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(corrected.magnetic_correction_deg(), 10.0);
        let shifted = corrected.pointing();

        // Flat phone: the line of sight is the nadir either way, but the
        // screen-up vector swings by the declination.
        assert_vectors_close(
            shifted.line_of_sight().vector(),
            reference.line_of_sight().vector(),
            1e-9,
        );
        let cos_angle = shifted
            .perpendicular()
            .dot(&reference.perpendicular().vector());
        let angle = libm::acos(cos_angle.clamp(-1.0, 1.0)).to_degrees();
        assert!((angle - 10.0).abs() < 1e-6, "angle {}", angle);
    }

    #[test]
    fn equatorial_coordinates_track_the_line_of_sight() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock, equator());
        model.set_auto_update_pointing(false);

        let target = GeocentricCoordinates::from_ra_dec(101.3, -16.7);
        model.set_pointing(target.vector(), Vector3::z_axis());
        let eq = model.equatorial_coordinates();
        assert!((eq.ra - 101.3).abs() < 1e-9);
        assert!((eq.dec - (-16.7)).abs() < 1e-9);
    }

    #[test]
    fn horizontal_rotation_swaps_the_screen_axis() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let mut model = model_at(clock, equator());
        model.set_acceleration(Vector3::new(0.0, 0.0, -9.8));
        model.set_magnetic_field(Vector3::new(0.0, -1.0, 0.0));

        let upright = model.pointing().perpendicular().vector();
        model.set_horizontal_rotation(true);
        let rotated = model.pointing().perpendicular().vector();

        // Same line of sight, screen-up now along the phone's short side.
        assert!(upright.dot(&rotated).abs() < 1e-9);

        model.set_horizontal_rotation(false);
        assert_vectors_close(model.pointing().perpendicular().vector(), upright, 1e-9);
    }

    #[test]
    fn time_is_read_through_the_clock() {
        let clock = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
        let model = model_at(clock.clone(), equator());
        assert_eq!(model.time_millis(), TEST_EPOCH_MILLIS);
        assert_eq!(model.time().timestamp_millis(), TEST_EPOCH_MILLIS);

        clock.advance(500);
        assert_eq!(model.time_millis(), TEST_EPOCH_MILLIS + 500);
    }
}
