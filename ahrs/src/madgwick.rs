#![allow(non_snake_case)]
#![allow(clippy::many_single_char_names)]

use nalgebra::{Matrix4x3, Quaternion, RealField, UnitQuaternion, Vector3, Vector4};
use crate::{Ahrs, AhrsError};

/// Gradient-descent orientation filter (S. Madgwick, 2010).
///
/// The quaternion rotates device-frame vectors into the world frame (Z up). `beta` trades gyroscope
/// drift tolerance against accelerometer and magnetometer noise sensitivity.
#[derive(Debug)]
pub struct Madgwick<N: RealField> {
	beta: N,
	quaternion: Quaternion<N>,
}

impl<N: RealField> Madgwick<N> {
	pub fn new(beta: N) -> Self {
		Madgwick::with_quaternion(
			beta,
			Quaternion::new(N::one(), N::zero(), N::zero(), N::zero()),
		)
	}

	pub fn with_quaternion(beta: N, quaternion: Quaternion<N>) -> Self {
		Madgwick {
			beta,
			quaternion,
		}
	}

	pub fn beta(&self) -> N {
		self.beta
	}

	/// Gradient of the gravity alignment objective, ordered (w, x, y, z).
	fn gravity_gradient(q: &Quaternion<N>, accel: &Vector3<N>) -> Vector4<N> {
		let zero: N = nalgebra::zero();
		let two: N = nalgebra::convert(2.0);
		let four: N = nalgebra::convert(4.0);
		let half: N = nalgebra::convert(0.5);
		let (w, x, y, z) = (q.w, q.i, q.j, q.k);

		#[rustfmt::skip]
		let F = Vector3::new(
			two * (x * z - w * y) - accel.x,
			two * (w * x + y * z) - accel.y,
			two * (half - x * x - y * y) - accel.z,
		);

		#[rustfmt::skip]
		let J_t = Matrix4x3::new(
			-two * y, two * x, zero,
			two * z, two * w, -four * x,
			-two * w, two * z, -four * y,
			two * x, two * y, zero,
		);

		J_t * F
	}

	/// Gradient of the magnetic alignment objective, ordered (w, x, y, z).
	///
	/// The reference field is rebuilt from the live reading on every call, so only its inclination
	/// matters and the local field magnitude does not.
	fn magnetic_gradient(q: &Quaternion<N>, mag: &Vector3<N>) -> Vector4<N> {
		let zero: N = nalgebra::zero();
		let two: N = nalgebra::convert(2.0);
		let four: N = nalgebra::convert(4.0);
		let half: N = nalgebra::convert(0.5);
		let (w, x, y, z) = (q.w, q.i, q.j, q.k);

		// Reference direction of Earth's magnetic field
		let h = q * (Quaternion::from_parts(zero, *mag) * q.conjugate());
		let bx = (h.i * h.i + h.j * h.j).sqrt();
		let bz = h.k;

		#[rustfmt::skip]
		let F = Vector3::new(
			two * bx * (half - y * y - z * z) + two * bz * (x * z - w * y) - mag.x,
			two * bx * (x * y - w * z) + two * bz * (w * x + y * z) - mag.y,
			two * bx * (w * y + x * z) + two * bz * (half - x * x - y * y) - mag.z,
		);

		#[rustfmt::skip]
		let J_t = Matrix4x3::new(
			-two * bz * y, -two * bx * z + two * bz * x, two * bx * y,
			two * bz * z, two * bx * y + two * bz * w, two * bx * z - four * bz * x,
			-four * bx * y - two * bz * w, two * bx * x + two * bz * z, two * bx * w - four * bz * y,
			-four * bx * z + two * bz * x, -two * bx * w + two * bz * y, two * bx * x,
		);

		J_t * F
	}

	/// Runs one filter step. Reference vectors that cannot be normalized are left out of the
	/// corrective step, so a step with no usable reference integrates the gyroscope alone.
	fn step(&mut self,
			gyroscope: &Vector3<N>,
			accelerometer: Option<&Vector3<N>>,
			magnetometer: Option<&Vector3<N>>,
			dt: N) -> Result<(), AhrsError> {
		let zero: N = nalgebra::zero();
		let half: N = nalgebra::convert(0.5);

		if !(dt > zero) || !dt.is_finite() {
			return Err(AhrsError::InvalidTimeDelta);
		}

		let q = self.quaternion;
		let accel = accelerometer.and_then(normalized);
		let mag = magnetometer.and_then(normalized);

		// Gradient descent algorithm corrective step
		let mut gradient = Vector4::<N>::zeros();
		if let Some(accel) = &accel {
			gradient += Self::gravity_gradient(&q, accel);
		}
		if let Some(mag) = &mag {
			gradient += Self::magnetic_gradient(&q, mag);
		}

		// Compute rate of change of quaternion
		let mut qDot = (q * Quaternion::from_parts(zero, *gyroscope)) * half;
		if let Some(step) = normalized4(&gradient) {
			qDot = qDot - Quaternion::new(step[0], step[1], step[2], step[3]) * self.beta;
		}

		// Integrate to yield quaternion
		let integrated = q + qDot * dt;
		let norm = integrated.norm();
		if !(norm > zero) || !norm.is_finite() {
			return Err(AhrsError::NormalizationError);
		}

		self.quaternion = integrated / norm;
		Ok(())
	}
}

impl<N: RealField> Ahrs<N> for Madgwick<N> {
	fn update_imu(
		&mut self,
		gyroscope: &Vector3<N>,
		accelerometer: &Vector3<N>,
		dt: N,
	) -> Result<(), AhrsError> {
		self.step(gyroscope, Some(accelerometer), None, dt)
	}

	fn update(
		&mut self,
		gyroscope: &Vector3<N>,
		accelerometer: &Vector3<N>,
		magnetometer: &Vector3<N>,
		dt: N,
	) -> Result<(), AhrsError> {
		self.step(gyroscope, Some(accelerometer), Some(magnetometer), dt)
	}

	fn orientation(&self) -> UnitQuaternion<N> {
		UnitQuaternion::from_quaternion(self.quaternion)
	}

	fn set_orientation(&mut self, orientation: UnitQuaternion<N>) {
		self.quaternion = orientation.into_inner();
	}
}

fn normalized<N: RealField>(v: &Vector3<N>) -> Option<Vector3<N>> {
	let norm = v.norm();
	if norm > N::zero() && norm.is_finite() {
		Some(v / norm)
	} else {
		None
	}
}

fn normalized4<N: RealField>(v: &Vector4<N>) -> Option<Vector4<N>> {
	let norm = v.norm();
	if norm > N::zero() && norm.is_finite() {
		Some(v / norm)
	} else {
		None
	}
}
