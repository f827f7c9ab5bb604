#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

pub mod low_pass;

pub use low_pass::LowPass;

use nalgebra::{RealField, Vector3};

/// Multiplicative factor applied by an exponential decay of time constant `time_constant` over
/// `dt`. A non-positive time constant decays instantly.
pub fn decay_factor<N: RealField>(dt: N, time_constant: N) -> N {
	if time_constant > N::zero() {
		(-dt / time_constant).exp()
	} else {
		N::zero()
	}
}

/// Zeroes every component whose magnitude is strictly below `threshold`.
pub fn dead_band<N: RealField>(value: &Vector3<N>, threshold: N) -> Vector3<N> {
	value.map(|component| {
		if component.abs() < threshold {
			N::zero()
		} else {
			component
		}
	})
}
