use ahrs::Madgwick;
use relativity::ProperTime;

use crate::collector::SensorSample;
use crate::config::MotionConfig;
use crate::integrator::MotionIntegrator;
use crate::orientation::OrientationProvider;
use crate::output::MotionFrame;
use crate::separator::{AccelerationSource, GravitySeparator};

/// Owns the whole pipeline state. Independent engines share nothing.
pub struct MotionEngine {
	config: MotionConfig,
	orientation: OrientationProvider<Madgwick<f64>>,
	separator: GravitySeparator,
	integrator: MotionIntegrator,
	clock: ProperTime,
	gamma: f64,
	acceleration_source: AccelerationSource,
	running: bool,
}

impl MotionEngine {
	/// The engine is created stopped.
	pub fn new(config: MotionConfig) -> Self {
		let config = config.sanitized();

		Self {
			orientation: OrientationProvider::new(Madgwick::new(config.filter_gain)),
			separator: GravitySeparator::new(config.gravity_filter_tau, config.acceleration_gate),
			integrator: MotionIntegrator::new(&config),
			clock: ProperTime::new(),
			gamma: 1.,
			acceleration_source: AccelerationSource::Unavailable,
			running: false,
			config,
		}
	}

	pub fn config(&self) -> &MotionConfig {
		&self.config
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn start(&mut self) {
		if !self.running {
			info!("Motion engine started");
			self.running = true;
		}
	}

	/// Suspends stepping. State is kept.
	pub fn stop(&mut self) {
		if self.running {
			info!("Motion engine stopped");
			self.running = false;
		}
	}

	/// Clears velocity, elapsed times and the gravity estimate. Orientation is cleared only when
	/// configured to.
	pub fn reset(&mut self) {
		self.integrator.reset();
		self.separator.reset();
		self.clock.reset();
		self.gamma = 1.;

		if self.config.reset_clears_orientation {
			self.orientation.reset();
		}

		info!("Motion engine reset");
	}

	pub fn integrator(&self) -> &MotionIntegrator {
		&self.integrator
	}

	pub fn integrator_mut(&mut self) -> &mut MotionIntegrator {
		&mut self.integrator
	}

	pub fn orientation(&self) -> &OrientationProvider<Madgwick<f64>> {
		&self.orientation
	}

	pub fn proper_time(&self) -> &ProperTime {
		&self.clock
	}

	/// Runs one pipeline step over the latest readings. Returns `None` when stopped.
	pub fn step(&mut self, sample: &SensorSample, dt: f64) -> Option<MotionFrame> {
		if !self.running {
			return None;
		}

		let dt = if dt.is_finite() && dt > self.config.min_frame_dt {
			dt
		} else {
			self.config.min_frame_dt
		};

		let orientation_source = self.orientation.update(sample, dt);
		let orientation = self.orientation.orientation();

		let (linear_acceleration, acceleration_source) = self.separator.separate(&orientation, sample, dt);
		if acceleration_source != self.acceleration_source {
			match acceleration_source {
				AccelerationSource::Unavailable => warn!("No inertial data, motion is frozen"),
				source => info!("Acceleration source: {}", source),
			}
			self.acceleration_source = acceleration_source;
		}

		let phase = self.integrator.step(&linear_acceleration, sample.angular_speed(), self.gamma, dt);

		let c = self.config.invariant_speed;
		let raw_speed = self.integrator.speed();
		let effective_speed = relativity::effective_speed(raw_speed, c);
		self.gamma = relativity::lorentz_factor(effective_speed, c);
		self.clock.advance(dt, self.gamma);

		trace!("dt = {:.4}, a = {:?}, v = {:.4}, γ = {:.4}, {}", dt, linear_acceleration.as_slice(), raw_speed, self.gamma, phase);

		Some(MotionFrame {
			dt,
			linear_acceleration,
			velocity: self.integrator.velocity(),
			raw_speed,
			effective_speed,
			gamma: self.gamma,
			proper_time: self.clock.proper(),
			coordinate_time: self.clock.coordinate(),
			orientation,
			orientation_source,
			acceleration_source,
			phase,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nalgebra::Vector3;

	use crate::integrator::MotionPhase;
	use crate::orientation::OrientationSource;

	fn running_engine(config: MotionConfig) -> MotionEngine {
		let mut engine = MotionEngine::new(config);
		engine.start();
		engine
	}

	#[test]
	fn stopped_engine_does_not_step() {
		let mut engine = MotionEngine::new(MotionConfig::default());
		assert!(engine.step(&SensorSample::default(), 0.01).is_none());

		engine.start();
		assert!(engine.step(&SensorSample::default(), 0.01).is_some());

		engine.stop();
		assert!(engine.step(&SensorSample::default(), 0.01).is_none());
	}

	#[test]
	fn no_inertial_data_produces_zero_motion() {
		let mut engine = running_engine(MotionConfig::default());

		let frame = engine.step(&SensorSample::default(), 0.01).unwrap();

		assert_eq!(frame.orientation_source, OrientationSource::Unavailable);
		assert_eq!(frame.acceleration_source, AccelerationSource::Unavailable);
		assert_eq!(frame.raw_speed, 0.);
		assert_eq!(frame.gamma, 1.);
		assert_approx_eq!(frame.proper_time, 0.01);
	}

	#[test]
	fn constant_push_from_rest() {
		let mut engine = running_engine(MotionConfig {
			acceleration_gate: 0.,
			..MotionConfig::default()
		});
		let sample = SensorSample {
			angular_velocity: Some(Vector3::zeros()),
			acceleration_linear: Some(Vector3::new(1., 0., 0.)),
			..SensorSample::default()
		};

		let mut frame = None;
		for _ in 0..60 {
			frame = engine.step(&sample, 1. / 60.);
		}
		let frame = frame.unwrap();

		assert_eq!(frame.orientation_source, OrientationSource::GyroFilter);
		assert_eq!(frame.phase, MotionPhase::Moving);
		assert_approx_eq!(frame.raw_speed, 1., 1e-9);
		assert_approx_eq!(frame.effective_speed, 0.7616, 1e-4);
		assert_approx_eq!(frame.gamma, 1.5431, 1e-4);
		assert_approx_eq!(frame.coordinate_time, 1., 1e-9);
		assert!(frame.proper_time < frame.coordinate_time);
	}

	#[test]
	fn invalid_dt_uses_minimum() {
		let mut engine = running_engine(MotionConfig::default());

		let frame = engine.step(&SensorSample::default(), f64::NAN).unwrap();
		assert_approx_eq!(frame.dt, engine.config().min_frame_dt);

		let frame = engine.step(&SensorSample::default(), -1.).unwrap();
		assert_approx_eq!(frame.dt, engine.config().min_frame_dt);
	}

	#[test]
	fn reset_keeps_orientation_by_default() {
		let mut engine = running_engine(MotionConfig::default());
		let sample = SensorSample {
			angular_velocity: Some(Vector3::new(0., 0., 1.)),
			acceleration_linear: Some(Vector3::new(0.5, 0., 0.)),
			..SensorSample::default()
		};

		for _ in 0..30 {
			engine.step(&sample, 0.02);
		}
		let yaw = engine.orientation().orientation().angle();

		engine.reset();

		assert_eq!(engine.integrator().speed(), 0.);
		assert_eq!(engine.proper_time().proper(), 0.);
		assert_approx_eq!(engine.orientation().orientation().angle(), yaw);
		assert_approx_eq!(engine.orientation().orientation().quaternion().norm(), 1., 1e-9);
	}

	#[test]
	fn reset_can_clear_orientation() {
		let mut engine = running_engine(MotionConfig {
			reset_clears_orientation: true,
			..MotionConfig::default()
		});
		let sample = SensorSample {
			angular_velocity: Some(Vector3::new(0., 0., 1.)),
			..SensorSample::default()
		};

		for _ in 0..30 {
			engine.step(&sample, 0.02);
		}
		engine.reset();

		assert_eq!(engine.orientation().orientation().angle(), 0.);
	}
}
