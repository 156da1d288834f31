//! End-to-end exercises of the controller group driving a shared model.

use std::sync::Arc;

use stargaze_core::{GeoLocation, GeocentricCoordinates, Vector3};
use stargaze_pointing::controllers::{shared, Controller, ControllerGroup};
use stargaze_pointing::{AstronomerModel, ZeroMagneticDeclination, DEFAULT_FIELD_OF_VIEW_DEG};
use stargaze_time::clock::test_support::FakeClock;
use stargaze_time::{Clock, TRANSITION_TIME_MILLIS};

/// 2021-06-01 22:00:00 UTC.
const TEST_EPOCH_MILLIS: i64 = 1_622_584_800_000;

fn observer() -> GeoLocation {
    GeoLocation::from_degrees(44.5, 11.3, 54.0, "manual").unwrap()
}

fn setup() -> (Arc<FakeClock>, stargaze_pointing::SharedModel, ControllerGroup) {
    let wall = Arc::new(FakeClock::new(TEST_EPOCH_MILLIS));
    let model = shared(AstronomerModel::new(Box::new(ZeroMagneticDeclination)));
    let group = ControllerGroup::with_wall_clock(model.clone(), wall.clone());
    group.on_location_fix(observer());
    (wall, model, group)
}

fn lock(model: &stargaze_pointing::SharedModel) -> std::sync::MutexGuard<'_, AstronomerModel> {
    model.lock().unwrap()
}

#[test]
fn manual_pointing_round_trip() {
    let (_wall, model, mut group) = setup();
    group.set_auto_mode(false);

    lock(&model).set_pointing(Vector3::x_axis(), Vector3::z_axis());

    // Drag east a little, then twist a quarter turn.
    group.change_right_left(0.02);
    group.change_up_down(-0.01);
    group.rotate(90.0);

    let pointing = lock(&model).pointing();
    let los = pointing.line_of_sight().vector();
    let up = pointing.perpendicular().vector();
    assert!((los.magnitude() - 1.0).abs() < 1e-9);
    assert!((up.magnitude() - 1.0).abs() < 1e-9);
    assert!(los.dot(&up).abs() < 1e-3);
    // The drags actually moved the view off the x axis.
    assert!(los.x < 1.0);
}

#[test]
fn teleport_respects_manual_mode() {
    let (_wall, model, mut group) = setup();
    group.set_auto_mode(false);
    lock(&model).set_pointing(Vector3::x_axis(), Vector3::z_axis());

    let sirius = GeocentricCoordinates::from_ra_dec(101.287, -16.716);
    group.teleport(sirius);

    let eq = lock(&model).equatorial_coordinates();
    assert!((eq.ra - 101.287).abs() < 1e-9);
    assert!((eq.dec + 16.716).abs() < 1e-9);
}

#[test]
fn zoom_is_clamped_at_both_ends() {
    let (_wall, model, group) = setup();

    group.zoom_by(2.0);
    assert_eq!(lock(&model).field_of_view(), 90.0);

    for _ in 0..20 {
        group.zoom_by(0.5);
    }
    assert_eq!(lock(&model).field_of_view(), 1.5);

    group.zoom_by(2.0);
    assert_eq!(lock(&model).field_of_view(), 3.0);
}

#[test]
fn time_travel_through_the_group() {
    let (wall, model, group) = setup();

    assert!(!group.is_time_traveling());
    assert_eq!(lock(&model).time_millis(), TEST_EPOCH_MILLIS);

    // Jump a year back, let the transition play out.
    let target = TEST_EPOCH_MILLIS - 365 * 86_400_000;
    group.go_time_travel(target);
    assert!(group.is_time_traveling());
    wall.advance(TRANSITION_TIME_MILLIS + 1);
    assert_eq!(lock(&model).time_millis(), target);
    assert_eq!(group.speed_label(), "time stopped");

    // Play forward at a day per second for two seconds.
    for _ in 0..5 {
        group.accelerate_time_travel();
    }
    assert_eq!(group.speed_label(), "1 day per second");
    wall.advance(2_000);
    assert_eq!(lock(&model).time_millis(), target + 2 * 86_400_000);

    group.pause_time();
    wall.advance(60_000);
    assert_eq!(lock(&model).time_millis(), target + 2 * 86_400_000);

    // And back to the present.
    group.use_real_time();
    wall.advance(TRANSITION_TIME_MILLIS + 1);
    assert_eq!(lock(&model).time_millis(), wall.now_millis());
    assert!(!group.is_time_traveling());
}

#[test]
fn time_travel_moves_the_sky() {
    let (wall, model, group) = setup();

    let before = lock(&model).zenith();

    // Six hours earlier the zenith RA differs by about 90 degrees.
    group.go_time_travel(TEST_EPOCH_MILLIS - 6 * 3_600_000);
    wall.advance(TRANSITION_TIME_MILLIS + 1);
    let after = lock(&model).zenith();

    let delta = (before.ra() - after.ra()).rem_euclid(360.0);
    assert!((delta - 90.25).abs() < 0.5, "zenith RA moved by {}", delta);
}

#[test]
fn sensor_readings_flow_after_start() {
    let (_wall, model, mut group) = setup();
    group.start();

    group.sensor_controller().on_rotation_vector(&[0.0, 0.0, 0.0, 1.0]);
    lock(&model).pointing();
    let up = lock(&model).phone_up_direction();
    assert!((up - Vector3::z_axis()).magnitude() < 1e-9);

    group.stop();
    group
        .sensor_controller()
        .on_rotation_vector(&[0.5, 0.5, 0.5, 0.5]);
    lock(&model).pointing();
    // Stopped: the stale reading stands.
    let up_after = lock(&model).phone_up_direction();
    assert!((up_after - Vector3::z_axis()).magnitude() < 1e-9);
}

#[test]
fn group_start_stop_is_idempotent() {
    let (_wall, _model, mut group) = setup();
    group.start();
    group.start();
    group.stop();
    group.stop();
    group.start();
    group.set_enabled(false);
    assert!(!group.enabled());
    group.set_enabled(true);
    assert!(group.enabled());
}

#[test]
fn location_fix_repositions_the_zenith() {
    let (_wall, model, group) = setup();

    let equator = GeoLocation::from_degrees(0.0, 11.3, 0.0, "gps").unwrap();
    group.on_location_fix(equator);

    let zenith = lock(&model).zenith();
    assert!(zenith.dec().abs() < 1e-9);
    assert_eq!(lock(&model).field_of_view(), DEFAULT_FIELD_OF_VIEW_DEG);
}
