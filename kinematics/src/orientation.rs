use ahrs::Ahrs;
use nalgebra::{Quaternion, Rotation3, UnitQuaternion, Vector3};
use std::fmt;

use crate::collector::SensorSample;
use crate::input::RollPitchYaw;

/// Where the orientation of the last step came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationSource {
	/// Absolute quaternion supplied by the sensor provider, filter bypassed.
	AbsoluteQuaternion,
	/// Rotation matrix built from absolute Euler angles, filter bypassed.
	EulerAngleMatrix,
	GyroAccelMagFilter,
	GyroAccelFilter,
	/// Gyroscope kinematics only, no reference direction available.
	GyroFilter,
	Unavailable,
}

impl OrientationSource {
	pub fn label(&self) -> &'static str {
		match self {
			OrientationSource::AbsoluteQuaternion => "absolute quaternion",
			OrientationSource::EulerAngleMatrix => "euler angles",
			OrientationSource::GyroAccelMagFilter => "gyro+accel+mag filter",
			OrientationSource::GyroAccelFilter => "gyro+accel filter",
			OrientationSource::GyroFilter => "gyro filter",
			OrientationSource::Unavailable => "unavailable",
		}
	}
}

impl fmt::Display for OrientationSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Selects, on every step, the best orientation source among the inputs actually available.
/// Absolute sources re-seed the filter so that falling back to it later does not jump.
pub struct OrientationProvider<AHRS: Ahrs<f64>> {
	ahrs: AHRS,
	source: OrientationSource,
}

impl<AHRS: Ahrs<f64>> OrientationProvider<AHRS> {
	pub fn new(ahrs: AHRS) -> Self {
		Self {
			ahrs,
			source: OrientationSource::Unavailable,
		}
	}

	pub fn orientation(&self) -> UnitQuaternion<f64> {
		self.ahrs.orientation()
	}

	pub fn source(&self) -> OrientationSource {
		self.source
	}

	pub fn reset(&mut self) {
		self.ahrs.set_orientation(UnitQuaternion::identity());
	}

	pub fn update(&mut self, sample: &SensorSample, dt: f64) -> OrientationSource {
		let source = self.select_and_update(sample, dt);

		if source != self.source {
			info!("Orientation source: {}", source);
			self.source = source;
		}

		source
	}

	fn select_and_update(&mut self, sample: &SensorSample, dt: f64) -> OrientationSource {
		if let Some(orientation) = sample.orientation_quaternion.and_then(unit_quaternion) {
			self.ahrs.set_orientation(orientation);
			return OrientationSource::AbsoluteQuaternion;
		}

		if let Some(angles) = sample.orientation_euler.filter(RollPitchYaw::is_finite) {
			self.ahrs.set_orientation(from_euler_angles(&angles));
			return OrientationSource::EulerAngleMatrix;
		}

		// Without a gyroscope, the reference directions alone still pull the filter.
		let gyroscope = sample.angular_velocity.unwrap_or_else(Vector3::zeros);

		let (source, result) = match (&sample.acceleration_including_gravity, &sample.magnetic_field) {
			(Some(accelerometer), Some(magnetometer)) => (
				OrientationSource::GyroAccelMagFilter,
				self.ahrs.update(&gyroscope, accelerometer, magnetometer, dt),
			),
			(Some(accelerometer), None) => (
				OrientationSource::GyroAccelFilter,
				self.ahrs.update_imu(&gyroscope, accelerometer, dt),
			),
			(None, _) if sample.angular_velocity.is_some() => (
				OrientationSource::GyroFilter,
				self.ahrs.update_imu(&gyroscope, &Vector3::zeros(), dt),
			),
			(None, _) => return OrientationSource::Unavailable,
		};

		if let Err(e) = result {
			warn!("Orientation filter update skipped: {}", e);
		}

		source
	}
}

fn unit_quaternion(quaternion: Quaternion<f64>) -> Option<UnitQuaternion<f64>> {
	if quaternion.coords.iter().all(|c| c.is_finite()) {
		UnitQuaternion::try_new(quaternion, f64::EPSILON)
	} else {
		None
	}
}

/// Builds the rotation matrix of the roll, pitch, yaw angles and converts it to a quaternion.
pub fn from_euler_angles(angles: &RollPitchYaw) -> UnitQuaternion<f64> {
	let rotation = Rotation3::from_euler_angles(angles.roll, angles.pitch, angles.yaw);
	UnitQuaternion::from_rotation_matrix(&rotation)
}
