use kinematics::{Dispatcher, MotionFrame};
use std::error::Error;

/// Logs the published frames. Every `every`-th frame goes to the info level, the rest to debug.
pub struct FrameDispatcher {
	every: u64,
	count: u64,
}

impl FrameDispatcher {
	pub fn new(every: u32) -> Self {
		FrameDispatcher {
			every: u64::from(every.max(1)),
			count: 0,
		}
	}

	fn is_highlighted(&self) -> bool {
		self.count % self.every == 0
	}
}

impl Dispatcher<MotionFrame> for FrameDispatcher {
	fn dispatch(&mut self, output_frame: MotionFrame) -> Result<(), Box<dyn Error>> {
		if self.is_highlighted() {
			info!("{}", output_frame);
		} else {
			debug!("{}", output_frame);
		}

		self.count += 1;

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_nth_frame_is_highlighted() {
		let mut dispatcher = FrameDispatcher::new(3);
		let mut highlighted = Vec::new();

		for _ in 0..7 {
			highlighted.push(dispatcher.is_highlighted());
			dispatcher.count += 1;
		}

		assert_eq!(highlighted, vec![true, false, false, true, false, false, true]);
	}

	#[test]
	fn zero_means_every_frame() {
		let dispatcher = FrameDispatcher::new(0);
		assert_eq!(dispatcher.every, 1);
	}
}
