use dsp::{dead_band, LowPass};
use nalgebra::{UnitQuaternion, Vector3};
use std::fmt;

use crate::collector::SensorSample;

/// Standard gravity (m/s²).
pub const G: f64 = 9.80665;

/// How the linear acceleration of the last step was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelerationSource {
	/// Gravity-free reading rotated into the world frame.
	Linear,
	/// Gravity-inclusive reading rotated into the world frame, minus the filtered gravity.
	GravityCompensated,
	Unavailable,
}

impl AccelerationSource {
	pub fn label(&self) -> &'static str {
		match self {
			AccelerationSource::Linear => "linear",
			AccelerationSource::GravityCompensated => "gravity compensated",
			AccelerationSource::Unavailable => "no inertial data",
		}
	}
}

impl fmt::Display for AccelerationSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Produces the world-frame linear acceleration.
pub struct GravitySeparator {
	gravity: LowPass<f64>,
	acceleration_gate: f64,
}

impl GravitySeparator {
	pub fn new(gravity_filter_tau: f64, acceleration_gate: f64) -> Self {
		Self {
			gravity: LowPass::new(gravity_filter_tau),
			acceleration_gate,
		}
	}

	/// World-frame gravity estimate, `None` until a gravity-inclusive reading was processed.
	pub fn gravity(&self) -> Option<Vector3<f64>> {
		self.gravity.value()
	}

	pub fn reset(&mut self) {
		self.gravity.reset();
	}

	/// Gravity-free readings take precedence. The result is gated component-wise.
	pub fn separate(&mut self,
					orientation: &UnitQuaternion<f64>,
					sample: &SensorSample,
					dt: f64) -> (Vector3<f64>, AccelerationSource) {
		let (acceleration, source) = if let Some(linear) = &sample.acceleration_linear {
			(orientation.transform_vector(linear), AccelerationSource::Linear)
		} else if let Some(specific_force) = &sample.acceleration_including_gravity {
			(self.remove_gravity(orientation, specific_force, dt), AccelerationSource::GravityCompensated)
		} else {
			(Vector3::zeros(), AccelerationSource::Unavailable)
		};

		(dead_band(&acceleration, self.acceleration_gate), source)
	}

	fn remove_gravity(&mut self,
					  orientation: &UnitQuaternion<f64>,
					  specific_force: &Vector3<f64>,
					  dt: f64) -> Vector3<f64> {
		let world = orientation.transform_vector(specific_force);
		let gravity = rescale(&self.gravity.update(world, dt));
		self.gravity.set(gravity);

		world - gravity
	}
}

/// Rescales the estimate to exactly `G`. A collapsed estimate falls back to the nominal vertical.
fn rescale(gravity: &Vector3<f64>) -> Vector3<f64> {
	let norm = gravity.norm();

	if norm > f64::EPSILON && norm.is_finite() {
		gravity * (G / norm)
	} else {
		Vector3::new(0., 0., G)
	}
}
