//! Functions use international system units. Speeds are magnitudes, expressed in the same unit as
//! the invariant speed `c`, which must be strictly positive.

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

/// Lorentz factor returned when the speed reaches or exceeds `c`.
pub const GAMMA_SENTINEL: f64 = 1e12;

/// Saturates a raw speed below `c`: `c * tanh(v / c)`.
/// Close to `v` for `v << c`, and strictly lower than `c` for any finite input, including those for
/// which `tanh` rounds to 1.
pub fn effective_speed(raw_speed: f64, c: f64) -> f64 {
	let saturated = c * (raw_speed / c).tanh();
	let ceiling = c * (1. - f64::EPSILON);

	if saturated >= ceiling {
		ceiling
	} else {
		saturated
	}
}

/// Returns the Lorentz factor `1 / sqrt(1 - (v / c)^2)`.
/// Speeds at or above `c` yield `GAMMA_SENTINEL` rather than an infinite or NaN factor.
pub fn lorentz_factor(speed: f64, c: f64) -> f64 {
	let beta = speed / c;
	let beta_squared = beta * beta;

	if !(beta_squared > 0.) {
		1.
	} else if beta_squared >= 1. {
		GAMMA_SENTINEL
	} else {
		let gamma = 1. / (1. - beta_squared).sqrt();
		if gamma.is_finite() {
			gamma
		} else {
			GAMMA_SENTINEL
		}
	}
}

/// Proper time elapsed in the moving frame during `dt` of coordinate time.
/// Never negative, and never longer than `dt`.
pub fn proper_time_delta(dt: f64, gamma: f64) -> f64 {
	if !(dt > 0.) || !dt.is_finite() {
		return 0.;
	}

	dt / gamma.max(1.)
}

/// Accumulates proper time alongside the coordinate (wall-clock) time it was derived from.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ProperTime {
	proper: f64,
	coordinate: f64,
}

impl ProperTime {
	pub fn new() -> Self {
		Self::default()
	}

	/// Advances both clocks by one step and returns the proper time increment.
	pub fn advance(&mut self, dt: f64, gamma: f64) -> f64 {
		let delta = proper_time_delta(dt, gamma);

		if delta > 0. {
			self.proper += delta;
			self.coordinate += dt;
		}

		delta
	}

	/// Seconds elapsed in the moving frame.
	pub fn proper(&self) -> f64 {
		self.proper
	}

	/// Seconds elapsed in the rest frame.
	pub fn coordinate(&self) -> f64 {
		self.coordinate
	}

	/// How far the moving clock lags behind the rest clock.
	pub fn dilation(&self) -> f64 {
		self.coordinate - self.proper
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}
}
