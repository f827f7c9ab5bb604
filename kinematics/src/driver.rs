use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::clock::{Clock, FrameClock};
use crate::collector::{SensorCollector, SensorSample};
use crate::engine::MotionEngine;
use crate::input::{Command, Input};
use crate::output::MotionFrame;

/// Drives an engine from an injected clock. The driver is the only writer of pipeline state:
/// readings and commands reach it through `collect`/`handle`, and each frame steps the engine once.
pub struct FrameDriver<C: Clock> {
	engine: MotionEngine,
	collector: SensorCollector,
	frame_clock: FrameClock,
	clock: C,
}

impl<C: Clock> FrameDriver<C> {
	pub fn new(engine: MotionEngine, clock: C) -> Self {
		Self {
			frame_clock: FrameClock::new(engine.config().min_frame_dt),
			collector: SensorCollector::new(),
			engine,
			clock,
		}
	}

	pub fn engine(&self) -> &MotionEngine {
		&self.engine
	}

	pub fn sample(&self) -> &SensorSample {
		self.collector.sample()
	}

	pub fn start(&mut self) {
		self.engine.start();
	}

	pub fn stop(&mut self) {
		self.engine.stop();
		self.frame_clock.reset();
	}

	pub fn reset(&mut self) {
		self.engine.reset();
	}

	/// Applies a command. Returns `false` when the driver should quit.
	pub fn handle(&mut self, command: Command) -> bool {
		match command {
			Command::Start => self.start(),
			Command::Stop => self.stop(),
			Command::Reset => self.reset(),
			Command::Quit => {
				self.stop();
				return false;
			}
		}

		true
	}

	/// Returns `false` when the input was a quit command.
	pub fn collect(&mut self, input: Input) -> bool {
		match input {
			Input::Command(command) => self.handle(command),
			reading => {
				self.collector.collect(reading);
				true
			}
		}
	}

	pub fn tick(&mut self) -> Option<MotionFrame> {
		let timestamp = self.clock.now();
		self.tick_at(timestamp)
	}

	/// Steps the engine once with the time elapsed since the previous frame.
	pub fn tick_at(&mut self, timestamp: f64) -> Option<MotionFrame> {
		if !self.engine.is_running() {
			return None;
		}

		let dt = self.frame_clock.tick(timestamp);
		self.engine.step(self.collector.sample(), dt)
	}

	/// Runs frames every `period` until a quit command is received or a channel disconnects.
	pub fn run(&mut self,
			   input_receiver: Receiver<Input>,
			   frame_sender: Sender<MotionFrame>,
			   period: Duration) {
		loop {
			// Drain without blocking, the latest reading of each input wins
			loop {
				match input_receiver.try_recv() {
					Ok(input) => {
						if !self.collect(input) {
							info!("Frame driver quit");
							return;
						}
					}
					Err(TryRecvError::Empty) => break,
					Err(TryRecvError::Disconnected) => {
						info!("Input channel disconnected, frame driver quit");
						return;
					}
				}
			}

			if let Some(frame) = self.tick() {
				if let Err(e) = frame_sender.send(frame) {
					error!("{}", e);
					return;
				}
			}

			thread::sleep(period);
		}
	}

	pub fn spawn(mut self,
				 input_receiver: Receiver<Input>,
				 frame_sender: Sender<MotionFrame>,
				 period: Duration) -> JoinHandle<()> {
		thread::spawn(move || self.run(input_receiver, frame_sender, period))
	}
}
