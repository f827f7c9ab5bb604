use nalgebra::{RealField, Vector3};

/// First-order exponential low-pass filter with a time constant expressed in seconds, so that the
/// response does not depend on the sampling rate.
#[derive(Debug, Clone)]
pub struct LowPass<N: RealField> {
	time_constant: N,
	state: Option<Vector3<N>>,
}

impl<N: RealField> LowPass<N> where Self: Send + Sync {
	pub fn new(time_constant: N) -> Self {
		Self {
			time_constant,
			state: None,
		}
	}

	pub fn time_constant(&self) -> N {
		self.time_constant
	}

	/// Filtered value, `None` until the first update.
	pub fn value(&self) -> Option<Vector3<N>> {
		self.state
	}

	/// Overwrites the filter state, e.g. after post-processing the output.
	pub fn set(&mut self, value: Vector3<N>) {
		self.state = Some(value);
	}

	pub fn reset(&mut self) {
		self.state = None;
	}

	/// The first sample seeds the filter.
	pub fn update(&mut self, input: Vector3<N>, dt: N) -> Vector3<N> {
		let output = match self.state {
			Some(previous) => {
				let alpha = N::one() - crate::decay_factor(dt, self.time_constant);
				previous + (input - previous) * alpha
			}
			None => input,
		};

		self.state = Some(output);

		output
	}
}
