#[macro_use]
extern crate assert_approx_eq;

use ahrs::{Ahrs, Madgwick};
use approx::relative_eq;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use std::f64;

const DEFAULT_DT: f64 = 1.0 / 256.0;

// accel, gyro, mag values
macro_rules! default_sensors(
  () => {
    (
      Vector3::new(0.06640625, 0.9794922, -0.01269531),
      Vector3::new(68.75, 34.25, 3.0625),
      Vector3::new(0.171875, -0.4536133, -0.04101563)
    )
  };
);

/// Deterministic, bounded but irregular input sequence.
fn wobble(i: usize, scale: f64) -> Vector3<f64> {
    let t = i as f64 * 0.37;
    Vector3::new(
        scale * (1.3 * t).sin(),
        scale * (0.7 * t + 1.0).cos(),
        scale * (2.9 * t).sin() * (0.3 * t).cos(),
    )
}

#[test]
fn test_madgwick_update_imu() {
    let start_quat = Quaternion::new(
        0.7208922848226422,
        0.6922487447935516,
        -0.01829063767755937,
        0.02777483732249482,
    );

    let mut ahrs = Madgwick::with_quaternion(0.1, start_quat);

    let (accel, gyro, _) = default_sensors!();

    ahrs.update_imu(&(gyro * f64::consts::PI / 180.0), &accel, DEFAULT_DT)
        .unwrap();

    let actual = ahrs.orientation();

    let expected = UnitQuaternion::from_quaternion(Quaternion::new(
        0.7208904870913246,
        0.6922506012721736,
        -0.018289818944577468,
        0.027775766101434042,
    ));

    let fail_message = format!(
        "quaternions did not match:\n\
      actual: {:?}\n\
      expect: {:?}",
        actual, expected
    );

    assert!(relative_eq!(actual, expected, epsilon = 1e-6), "{}", fail_message);
}

#[test]
fn norm_stays_unit_for_any_finite_sequence() {
    let mut ahrs = Madgwick::<f64>::new(0.1);

    for i in 0..2_000 {
        let gyr = wobble(i, 3.0);
        let acc = if i % 7 == 0 { Vector3::zeros() } else { wobble(i + 11, 9.81) };
        let mag = if i % 5 == 0 { Vector3::zeros() } else { wobble(i + 29, 45.0) };
        let dt = 0.001 + 0.02 * ((i % 13) as f64 / 13.0);

        if i % 2 == 0 {
            ahrs.update(&gyr, &acc, &mag, dt).unwrap();
        } else {
            ahrs.update_imu(&gyr, &acc, dt).unwrap();
        }

        assert_approx_eq!(ahrs.orientation().quaternion().norm(), 1.0, 1e-9);
    }
}

#[test]
fn zero_references_integrate_gyroscope_only() {
    let mut ahrs = Madgwick::<f64>::new(0.1);
    let gyr = Vector3::new(0., 0., 1.);

    for _ in 0..1_000 {
        ahrs.update(&gyr, &Vector3::zeros(), &Vector3::zeros(), 0.001)
            .unwrap();
    }

    let (roll, pitch, yaw) = ahrs.orientation().euler_angles();
    assert_approx_eq!(roll, 0., 1e-9);
    assert_approx_eq!(pitch, 0., 1e-9);
    assert_approx_eq!(yaw, 1.0, 1e-3);
}

#[test]
fn zero_magnetometer_matches_imu_update() {
    let start = Quaternion::new(0.9, 0.1, -0.2, 0.3);
    let mut marg = Madgwick::with_quaternion(0.1, start.normalize());
    let mut imu = Madgwick::with_quaternion(0.1, start.normalize());
    let (accel, gyro, _) = default_sensors!();

    marg.update(&gyro, &accel, &Vector3::zeros(), DEFAULT_DT).unwrap();
    imu.update_imu(&gyro, &accel, DEFAULT_DT).unwrap();

    assert!(relative_eq!(marg.orientation(), imu.orientation()));
}

#[test]
fn tilt_converges_to_gravity() {
    let roll = 0.3;
    let truth = UnitQuaternion::from_euler_angles(roll, 0., 0.);
    let acc = truth.inverse_transform_vector(&Vector3::new(0., 0., 9.81));

    let mut ahrs = Madgwick::<f64>::new(0.5);
    for _ in 0..2_000 {
        ahrs.update_imu(&Vector3::zeros(), &acc, 0.01).unwrap();
    }

    let (estimated_roll, estimated_pitch, _) = ahrs.orientation().euler_angles();
    assert_approx_eq!(estimated_roll, roll, 0.05);
    assert_approx_eq!(estimated_pitch, 0., 0.05);
}

#[test]
fn heading_converges_to_magnetic_field() {
    let yaw = 0.5;
    let truth = UnitQuaternion::from_euler_angles(0., 0., yaw);
    // Inclined field, magnitude arbitrary
    let field = Vector3::new(20.0, 0., -40.0);
    let acc = truth.inverse_transform_vector(&Vector3::new(0., 0., 9.81));
    let mag = truth.inverse_transform_vector(&field);

    let mut ahrs = Madgwick::<f64>::new(0.5);
    for _ in 0..2_000 {
        ahrs.update(&Vector3::zeros(), &acc, &mag, 0.01).unwrap();
    }

    assert!(ahrs.orientation().angle_to(&truth) < 0.05);
}

#[test]
fn set_orientation_replaces_state() {
    let mut ahrs = Madgwick::<f64>::new(0.1);
    let target = UnitQuaternion::from_euler_angles(0.1, -0.2, 1.4);

    ahrs.set_orientation(target);

    assert!(relative_eq!(ahrs.orientation(), target, epsilon = 1e-12));
}
