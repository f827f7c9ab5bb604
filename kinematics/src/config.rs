use serde::{Deserialize, Serialize};

/// Tuning of the motion pipeline. Values are read once per step and never mutated by it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
	/// Invariant speed `c` (m/s), strictly positive.
	pub invariant_speed: f64,
	/// Time constant `τ` (s) of the drift-to-rest decay, strictly positive.
	pub rest_time_constant: f64,
	/// Coupling `k` between the Lorentz factor and the decay rate, positive or zero.
	pub gamma_coupling: f64,
	/// World-frame acceleration components below this magnitude (m/s²) are zeroed.
	pub acceleration_gate: f64,
	/// Angular speed (rad/s) above which a step may be classified as pure rotation.
	pub omega_gate: f64,
	/// Acceleration magnitude (m/s²) below which a fast-rotating step is classified as pure rotation.
	pub rotation_acceleration_gate: f64,
	/// Time constant (s) of the gravity low-pass filter, strictly positive.
	pub gravity_filter_tau: f64,
	/// Madgwick filter gain.
	pub filter_gain: f64,
	/// Smallest time delta (s) a frame may integrate.
	pub min_frame_dt: f64,
	/// Whether a reset also brings the orientation back to identity.
	pub reset_clears_orientation: bool,
}

impl Default for MotionConfig {
	fn default() -> Self {
		MotionConfig {
			invariant_speed: 1.0,
			rest_time_constant: 3.0,
			gamma_coupling: 0.5,
			acceleration_gate: 0.05,
			omega_gate: 0.35,
			rotation_acceleration_gate: 0.2,
			gravity_filter_tau: 0.7,
			filter_gain: 0.1,
			min_frame_dt: 0.001,
			reset_clears_orientation: false,
		}
	}
}

impl MotionConfig {
	/// Replaces every non-finite or out-of-range value by its default.
	pub fn sanitized(self) -> Self {
		let defaults = Self::default();

		Self {
			invariant_speed: positive("invariant_speed", self.invariant_speed, defaults.invariant_speed),
			rest_time_constant: positive("rest_time_constant", self.rest_time_constant, defaults.rest_time_constant),
			gamma_coupling: non_negative("gamma_coupling", self.gamma_coupling, defaults.gamma_coupling),
			acceleration_gate: non_negative("acceleration_gate", self.acceleration_gate, defaults.acceleration_gate),
			omega_gate: non_negative("omega_gate", self.omega_gate, defaults.omega_gate),
			rotation_acceleration_gate: non_negative("rotation_acceleration_gate", self.rotation_acceleration_gate, defaults.rotation_acceleration_gate),
			gravity_filter_tau: positive("gravity_filter_tau", self.gravity_filter_tau, defaults.gravity_filter_tau),
			filter_gain: non_negative("filter_gain", self.filter_gain, defaults.filter_gain),
			min_frame_dt: positive("min_frame_dt", self.min_frame_dt, defaults.min_frame_dt),
			reset_clears_orientation: self.reset_clears_orientation,
		}
	}
}

fn positive(name: &str, value: f64, default: f64) -> f64 {
	if value.is_finite() && value > 0. {
		value
	} else {
		warn!("Invalid {} ({}), using {}", name, value, default);
		default
	}
}

fn non_negative(name: &str, value: f64, default: f64) -> f64 {
	if value.is_finite() && value >= 0. {
		value
	} else {
		warn!("Invalid {} ({}), using {}", name, value, default);
		default
	}
}
