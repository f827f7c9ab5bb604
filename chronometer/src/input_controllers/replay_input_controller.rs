use kinematics::{Command, Input, InputController, RollPitchYaw};
use nalgebra::{Quaternion, Vector3};
use serde::Deserialize;
use std::collections::VecDeque;
use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// One line of a recording. Vectors are in the device frame, in SI units; `t` is in seconds.
#[derive(Debug, Default, Deserialize)]
pub struct ReplayRecord {
	pub t: f64,
	pub gyr: Option<[f64; 3]>,
	pub acc: Option<[f64; 3]>,
	pub lin: Option<[f64; 3]>,
	pub mag: Option<[f64; 3]>,
	/// `[w, x, y, z]`
	pub quat: Option<[f64; 4]>,
	/// `[roll, pitch, yaw]` in radians
	pub euler: Option<[f64; 3]>,
}

fn vector(v: [f64; 3]) -> Vector3<f64> {
	Vector3::new(v[0], v[1], v[2])
}

impl ReplayRecord {
	pub fn into_inputs(self, timestamp: Instant) -> Vec<Input> {
		let mut inputs = Vec::new();

		if let Some(q) = self.quat {
			inputs.push(Input::OrientationQuaternion((Quaternion::new(q[0], q[1], q[2], q[3]), timestamp)));
		}
		if let Some(e) = self.euler {
			inputs.push(Input::OrientationEuler((RollPitchYaw::new(e[0], e[1], e[2]), timestamp)));
		}
		if let Some(v) = self.gyr {
			inputs.push(Input::AngularVelocity((vector(v), timestamp)));
		}
		if let Some(v) = self.acc {
			inputs.push(Input::AccelerationIncludingGravity((vector(v), timestamp)));
		}
		if let Some(v) = self.lin {
			inputs.push(Input::AccelerationLinear((vector(v), timestamp)));
		}
		if let Some(v) = self.mag {
			inputs.push(Input::MagneticField((vector(v), timestamp)));
		}

		inputs
	}
}

/// Replays a JSON-lines recording, pacing the readings on their `t` field.
pub struct ReplayInputController<R: BufRead + Send + 'static> {
	reader: R,
	pending: VecDeque<Input>,
	/// Wall clock instant and recording time of the first record.
	origin: Option<(Instant, f64)>,
	real_time: bool,
	quit_when_done: bool,
	done: bool,
}

impl ReplayInputController<BufReader<File>> {
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
		Ok(Self::new(BufReader::new(File::open(path)?)))
	}
}

impl<R: BufRead + Send + 'static> ReplayInputController<R> {
	pub fn new(reader: R) -> Self {
		ReplayInputController {
			reader,
			pending: VecDeque::new(),
			origin: None,
			real_time: true,
			quit_when_done: false,
			done: false,
		}
	}

	/// Disables pacing: records are delivered as fast as they are read.
	pub fn without_pacing(mut self) -> Self {
		self.real_time = false;
		self
	}

	/// Sends a quit command once the recording is exhausted.
	pub fn quit_when_done(mut self, quit_when_done: bool) -> Self {
		self.quit_when_done = quit_when_done;
		self
	}

	fn timestamp(&mut self, t: f64) -> Instant {
		let (start, first_t) = *self.origin.get_or_insert_with(|| (Instant::now(), t));
		let offset = Duration::from_secs_f64((t - first_t).max(0.));
		let timestamp = start + offset;

		if self.real_time {
			let now = Instant::now();
			if timestamp > now {
				thread::sleep(timestamp - now);
			}
		}

		timestamp
	}
}

impl<R: BufRead + Send + 'static> InputController for ReplayInputController<R> {
	const DELAY: Option<Duration> = None;

	fn read_input(&mut self) -> Result<Option<Input>, Box<dyn Error>> {
		loop {
			if let Some(input) = self.pending.pop_front() {
				return Ok(Some(input));
			}

			if self.done {
				return Ok(None);
			}

			let mut line = String::new();
			if self.reader.read_line(&mut line)? == 0 {
				self.done = true;
				info!("Replay finished");

				if self.quit_when_done {
					return Ok(Some(Input::Command(Command::Quit)));
				}
				continue;
			}

			if line.trim().is_empty() {
				continue;
			}

			let record: ReplayRecord = serde_json::from_str(&line)?;
			if !record.t.is_finite() {
				return Err(format!("Invalid replay timestamp {}", record.t).into());
			}

			let timestamp = self.timestamp(record.t);
			self.pending.extend(record.into_inputs(timestamp));
		}
	}
}
