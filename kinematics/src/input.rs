use nalgebra::{Quaternion, Vector3};
use std::time::Instant;

/// Euler angles, in radians.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RollPitchYaw {
	pub roll: f64,
	pub pitch: f64,
	pub yaw: f64,
}

impl RollPitchYaw {
	pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
		Self { roll, pitch, yaw }
	}

	pub fn is_finite(&self) -> bool {
		self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
	}
}

/// Control commands, delivered through the same channel as sensor readings so that they are
/// applied in order with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	Start,
	Stop,
	Reset,
	Quit,
}

/// Readings are expressed in the device frame, in international system units.
#[derive(Clone, Debug)]
pub enum Input {
	/// Angular velocity in rad/s.
	AngularVelocity((Vector3<f64>, Instant)),
	/// Specific force in m/s², gravity included.
	AccelerationIncludingGravity((Vector3<f64>, Instant)),
	/// Acceleration in m/s², gravity already removed by the sensor provider.
	AccelerationLinear((Vector3<f64>, Instant)),
	/// Magnetic field. Only its direction is used.
	MagneticField((Vector3<f64>, Instant)),
	/// Absolute orientation as roll, pitch, yaw.
	OrientationEuler((RollPitchYaw, Instant)),
	/// Absolute orientation, rotating device-frame vectors into the world frame.
	OrientationQuaternion((Quaternion<f64>, Instant)),
	Command(Command),
}
