#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

pub use crate::madgwick::Madgwick;
use nalgebra::{RealField, UnitQuaternion, Vector3};
use std::fmt;

mod madgwick;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AhrsError {
	/// The integrated quaternion collapsed (zero or non-finite norm). The previous orientation is
	/// kept.
	NormalizationError,
	/// The time delta is not a strictly positive finite number. Nothing was integrated.
	InvalidTimeDelta,
}

impl fmt::Display for AhrsError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AhrsError::NormalizationError => write!(f, "quaternion normalization failed"),
			AhrsError::InvalidTimeDelta => write!(f, "invalid time delta"),
		}
	}
}

impl std::error::Error for AhrsError {}

pub trait Ahrs<N: RealField> where Self: Send + Sync + 'static {
	/// Fuses angular velocity (rad/s) with the gravity direction measured by the accelerometer.
	fn update_imu(&mut self,
				  gyroscope: &Vector3<N>,
				  accelerometer: &Vector3<N>,
				  dt: N) -> Result<(), AhrsError>;

	/// Fuses angular velocity with both the gravity direction and the magnetic field direction.
	fn update(&mut self,
			  gyroscope: &Vector3<N>,
			  accelerometer: &Vector3<N>,
			  magnetometer: &Vector3<N>,
			  dt: N) -> Result<(), AhrsError>;

	/// Rotation from the device frame to the world frame.
	fn orientation(&self) -> UnitQuaternion<N>;

	fn set_orientation(&mut self, orientation: UnitQuaternion<N>);
}
