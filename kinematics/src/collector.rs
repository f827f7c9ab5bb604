use nalgebra::{Quaternion, Vector3};
use std::time::Instant;

use crate::input::{Input, RollPitchYaw};

/// Latest reading of every input. A step always consumes whatever is cached here and never waits
/// for a fresh sample.
#[derive(Debug, Default, Clone)]
pub struct SensorSample {
	pub angular_velocity: Option<Vector3<f64>>,
	pub acceleration_including_gravity: Option<Vector3<f64>>,
	pub acceleration_linear: Option<Vector3<f64>>,
	pub magnetic_field: Option<Vector3<f64>>,
	pub orientation_euler: Option<RollPitchYaw>,
	pub orientation_quaternion: Option<Quaternion<f64>>,
	pub last_reading: Option<Instant>,
}

impl SensorSample {
	/// Whether any inertial reading was ever received.
	pub fn has_inertial_data(&self) -> bool {
		self.angular_velocity.is_some()
			|| self.acceleration_including_gravity.is_some()
			|| self.acceleration_linear.is_some()
	}

	pub fn angular_speed(&self) -> f64 {
		self.angular_velocity.map_or(0., |angular_velocity| angular_velocity.norm())
	}
}

/// Buffers inputs sent asynchronously by input controllers. Non-finite readings are dropped so
/// that the previous reading of the same input stays in use.
#[derive(Debug, Default)]
pub struct SensorCollector {
	sample: SensorSample,
}

impl SensorCollector {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sample(&self) -> &SensorSample {
		&self.sample
	}

	pub fn collect(&mut self, input: Input) {
		let sample = &mut self.sample;

		let instant = match input {
			Input::AngularVelocity((value, instant)) => store(&mut sample.angular_velocity, value, instant, "angular velocity"),
			Input::AccelerationIncludingGravity((value, instant)) => store(&mut sample.acceleration_including_gravity, value, instant, "acceleration"),
			Input::AccelerationLinear((value, instant)) => store(&mut sample.acceleration_linear, value, instant, "linear acceleration"),
			Input::MagneticField((value, instant)) => store(&mut sample.magnetic_field, value, instant, "magnetic field"),
			Input::OrientationEuler((angles, instant)) => {
				if angles.is_finite() {
					sample.orientation_euler = Some(angles);
					Some(instant)
				} else {
					debug!("Dropped non-finite Euler angles {:?}", angles);
					None
				}
			}
			Input::OrientationQuaternion((quaternion, instant)) => {
				if quaternion.coords.iter().all(|c| c.is_finite()) {
					sample.orientation_quaternion = Some(quaternion);
					Some(instant)
				} else {
					debug!("Dropped non-finite quaternion {:?}", quaternion);
					None
				}
			}
			Input::Command(command) => {
				warn!("Command {:?} reached the sensor collector", command);
				None
			}
		};

		if let Some(instant) = instant {
			sample.last_reading = Some(instant);
		}
	}
}

fn store(slot: &mut Option<Vector3<f64>>, value: Vector3<f64>, instant: Instant, name: &str) -> Option<Instant> {
	if value.iter().all(|c| c.is_finite()) {
		*slot = Some(value);
		Some(instant)
	} else {
		debug!("Dropped non-finite {} {:?}", name, value);
		None
	}
}
