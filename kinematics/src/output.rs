use nalgebra::{UnitQuaternion, Vector3};
use std::fmt::{self, Debug};

use crate::integrator::MotionPhase;
use crate::orientation::OrientationSource;
use crate::separator::AccelerationSource;

pub trait OutputFrame: Debug {}

/// Everything published by one pipeline step.
#[derive(Debug, Clone)]
pub struct MotionFrame {
	/// Time delta integrated by the step (s).
	pub dt: f64,
	/// World-frame linear acceleration after gating (m/s²).
	pub linear_acceleration: Vector3<f64>,
	/// World-frame velocity (m/s).
	pub velocity: Vector3<f64>,
	pub raw_speed: f64,
	/// Raw speed saturated below the invariant speed.
	pub effective_speed: f64,
	/// Lorentz factor of the effective speed.
	pub gamma: f64,
	pub proper_time: f64,
	pub coordinate_time: f64,
	pub orientation: UnitQuaternion<f64>,
	pub orientation_source: OrientationSource,
	pub acceleration_source: AccelerationSource,
	pub phase: MotionPhase,
}

impl OutputFrame for MotionFrame {}

impl fmt::Display for MotionFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f,
			   "v = {:.3} m/s (eff. {:.3}), γ = {:.4}, τ = {:.3} s, t = {:.3} s [{}, {}, {}]",
			   self.raw_speed,
			   self.effective_speed,
			   self.gamma,
			   self.proper_time,
			   self.coordinate_time,
			   self.orientation_source,
			   self.acceleration_source,
			   self.phase)
	}
}
