use std::time::Instant;

/// Monotonic time source driving the frames, in seconds.
pub trait Clock where Self: Send + 'static {
	fn now(&self) -> f64;
}

/// Seconds elapsed since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
	origin: Instant,
}

impl MonotonicClock {
	pub fn new() -> Self {
		Self { origin: Instant::now() }
	}
}

impl Default for MonotonicClock {
	fn default() -> Self {
		Self::new()
	}
}

impl Clock for MonotonicClock {
	fn now(&self) -> f64 {
		self.origin.elapsed().as_secs_f64()
	}
}

/// Turns frame timestamps into time deltas.
#[derive(Debug, Clone)]
pub struct FrameClock {
	min_dt: f64,
	previous: Option<f64>,
}

impl FrameClock {
	pub fn new(min_dt: f64) -> Self {
		Self {
			min_dt,
			previous: None,
		}
	}

	/// Time elapsed since the previous frame, never below `min_dt`. The first frame after creation
	/// or `reset`, and frames with a timestamp older than the previous one, get `min_dt`.
	pub fn tick(&mut self, timestamp: f64) -> f64 {
		if !timestamp.is_finite() {
			return self.min_dt;
		}

		let dt = match self.previous {
			Some(previous) if timestamp > previous => timestamp - previous,
			_ => self.min_dt,
		};

		self.previous = Some(self.previous.map_or(timestamp, |previous| previous.max(timestamp)));

		dt.max(self.min_dt)
	}

	/// Forgets the previous timestamp so that a resumed clock does not integrate the pause.
	pub fn reset(&mut self) {
		self.previous = None;
	}
}
