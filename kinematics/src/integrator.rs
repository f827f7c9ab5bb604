use dsp::decay_factor;
use nalgebra::Vector3;
use std::fmt;

use crate::config::MotionConfig;

/// Acceleration magnitudes up to this multiple of the acceleration gate count as stillness.
const STILLNESS_GATE_FACTOR: f64 = 1.5;
/// Share of the effective time constant used to damp velocity while rotating in place.
const ROTATION_DECAY_FRACTION: f64 = 0.25;
const MIN_ROTATION_TIME_CONSTANT: f64 = 0.05;

/// Classification of an integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
	/// Rotation without translation: integration skipped, velocity damped faster.
	Rotating,
	/// Acceleration integrated into velocity.
	Moving,
	/// Acceleration integrated, but small enough for velocity to decay toward rest.
	Settling,
}

impl fmt::Display for MotionPhase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MotionPhase::Rotating => write!(f, "rotating"),
			MotionPhase::Moving => write!(f, "moving"),
			MotionPhase::Settling => write!(f, "settling"),
		}
	}
}

/// Integrates world-frame acceleration into velocity, with decay toward rest.
///
/// Stillness damping applies on top of integration, not instead of it: a step may both integrate
/// and decay.
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
	velocity: Vector3<f64>,
	rest_time_constant: f64,
	gamma_coupling: f64,
	acceleration_gate: f64,
	omega_gate: f64,
	rotation_acceleration_gate: f64,
}

impl MotionIntegrator {
	pub fn new(config: &MotionConfig) -> Self {
		Self {
			velocity: Vector3::zeros(),
			rest_time_constant: config.rest_time_constant,
			gamma_coupling: config.gamma_coupling,
			acceleration_gate: config.acceleration_gate,
			omega_gate: config.omega_gate,
			rotation_acceleration_gate: config.rotation_acceleration_gate,
		}
	}

	pub fn velocity(&self) -> Vector3<f64> {
		self.velocity
	}

	pub fn speed(&self) -> f64 {
		self.velocity.norm()
	}

	pub fn set_velocity(&mut self, velocity: Vector3<f64>) {
		self.velocity = velocity;
	}

	pub fn reset(&mut self) {
		self.velocity = Vector3::zeros();
	}

	/// `τ_eff = τ / (1 + k (γ - 1))`: the faster the motion, the faster spurious velocity is shed.
	pub fn effective_time_constant(&self, gamma: f64) -> f64 {
		let gamma = gamma.max(1.);
		self.rest_time_constant / (1. + self.gamma_coupling * (gamma - 1.))
	}

	/// `gamma` is the Lorentz factor of the velocity entering the step.
	pub fn step(&mut self,
				acceleration: &Vector3<f64>,
				angular_speed: f64,
				gamma: f64,
				dt: f64) -> MotionPhase {
		let time_constant = self.effective_time_constant(gamma);
		let magnitude = acceleration.norm();

		let rotating = angular_speed > self.omega_gate
			&& magnitude < self.rotation_acceleration_gate;

		if rotating {
			let rotation_time_constant = (ROTATION_DECAY_FRACTION * time_constant)
				.max(MIN_ROTATION_TIME_CONSTANT);
			self.velocity *= decay_factor(dt, rotation_time_constant);
		} else {
			self.velocity += acceleration * dt;
		}

		let still = magnitude <= STILLNESS_GATE_FACTOR * self.acceleration_gate;
		if still {
			self.velocity *= decay_factor(dt, time_constant);
		}

		match (rotating, still) {
			(true, _) => MotionPhase::Rotating,
			(false, true) => MotionPhase::Settling,
			(false, false) => MotionPhase::Moving,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn integrator(k: f64) -> MotionIntegrator {
		MotionIntegrator::new(&MotionConfig {
			gamma_coupling: k,
			..MotionConfig::default()
		})
	}

	#[test]
	fn velocity_decays_with_rest_time_constant() {
		let mut integrator = integrator(0.);
		integrator.set_velocity(Vector3::new(1., 0., 0.));

		for _ in 0..300 {
			assert_eq!(integrator.step(&Vector3::zeros(), 0., 1., 0.01), MotionPhase::Settling);
		}

		assert_approx_eq!(integrator.speed(), 0.368, 0.368 * 0.01);
	}

	#[test]
	fn higher_gamma_decays_faster() {
		let mut slow = integrator(0.5);
		let mut fast = integrator(0.5);
		slow.set_velocity(Vector3::new(0., 1., 0.));
		fast.set_velocity(Vector3::new(0., 1., 0.));

		slow.step(&Vector3::zeros(), 0., 1., 0.1);
		fast.step(&Vector3::zeros(), 0., 3., 0.1);

		assert_approx_eq!(fast.effective_time_constant(3.), 1.5);
		assert!(fast.speed() < slow.speed());
	}

	#[test]
	fn rotation_without_translation_only_decays() {
		let mut integrator = integrator(0.5);
		integrator.set_velocity(Vector3::new(0.5, 0., 0.));

		let phase = integrator.step(&Vector3::new(0.05, 0., 0.), 1.0, 1., 0.1);

		assert_eq!(phase, MotionPhase::Rotating);
		assert!(integrator.speed() < 0.5);
		assert!(integrator.velocity().x > 0.);
	}

	#[test]
	fn rotation_from_rest_does_not_move() {
		let mut integrator = integrator(0.5);

		for _ in 0..100 {
			integrator.step(&Vector3::new(0.05, 0.05, 0.), 1.0, 1., 0.1);
		}

		assert_eq!(integrator.speed(), 0.);
	}

	#[test]
	fn strong_acceleration_integrates_while_rotating() {
		let mut integrator = integrator(0.5);

		let phase = integrator.step(&Vector3::new(1., 0., 0.), 1.0, 1., 0.1);

		assert_eq!(phase, MotionPhase::Moving);
		assert_approx_eq!(integrator.velocity().x, 0.1);
	}

	#[test]
	fn euler_integration_without_gate() {
		let mut integrator = MotionIntegrator::new(&MotionConfig {
			acceleration_gate: 0.,
			..MotionConfig::default()
		});

		for _ in 0..60 {
			assert_eq!(integrator.step(&Vector3::new(1., 0., 0.), 0., 1., 1. / 60.), MotionPhase::Moving);
		}

		assert_approx_eq!(integrator.speed(), 1., 1e-9);
	}

	#[test]
	fn reset_zeroes_velocity() {
		let mut integrator = integrator(0.5);
		integrator.set_velocity(Vector3::new(1., 2., 3.));
		integrator.reset();

		assert_eq!(integrator.speed(), 0.);
	}
}
