#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate log;

use crossbeam_channel::unbounded;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

use crate::chronometer_config::{ChronometerConfig, TryIntoLevelFilter, DEFAULT_CONFIG_FILE_PATH};
use crate::frame_dispatcher::FrameDispatcher;
use crate::input_controllers::command_input_controller::CommandInputController;
use crate::input_controllers::replay_input_controller::ReplayInputController;

use black_box::BlackBox;
use kinematics::*;

mod chronometer_config;
mod frame_dispatcher;
mod input_controllers;

fn main() -> Result<(), Box<dyn Error>> {
	std::env::set_var("RUST_BACKTRACE", "full");

	// Command line arguments
	const REPLAY_ARG: &'static str = "replay";
	const CONFIG_ARG: &'static str = "config";
	const SAVE_DEFAULT_ARG: &'static str = "save-default";
	const EXIT_ARG: &'static str = "exit-after-replay";

	let args = clap::App::new("Chronometer")
		.version(env!("CARGO_PKG_VERSION"))
		.author("Vincent Leporcher <vincent.leporcher@telecom-paris.fr>")
		.about("Proper time of a moving device, from its inertial sensors")
		.arg(clap::Arg::new(REPLAY_ARG)
			.about("JSON-lines sensor recording to replay")
			.value_name("FILE")
			.index(1))
		.arg(clap::Arg::new(CONFIG_ARG)
			.long("config")
			.short('c')
			.about("Configuration file")
			.value_name("FILE")
			.default_value(DEFAULT_CONFIG_FILE_PATH))
		.arg(clap::Arg::new(SAVE_DEFAULT_ARG)
			.long("save-default")
			.about("Write the default configuration to the configuration file and exit")
			.takes_value(false))
		.arg(clap::Arg::new(EXIT_ARG)
			.long("exit-after-replay")
			.about("Quit once the recording is exhausted")
			.takes_value(false))
		.get_matches();

	let config_path = args.value_of(CONFIG_ARG).unwrap_or(DEFAULT_CONFIG_FILE_PATH);

	if args.is_present(SAVE_DEFAULT_ARG) {
		chronometer_config::save(config_path, &ChronometerConfig::default())?;
		println!("Default configuration written to {}", config_path);
		return Ok(());
	}

	// Configuration
	let config_found = Path::new(config_path).exists();
	let config = if config_found {
		chronometer_config::read(config_path)?
	} else {
		ChronometerConfig::default()
	};

	if !(config.frame_rate.is_finite() && config.frame_rate > 0.) {
		return Err(anyhow!("Invalid frame rate {}", config.frame_rate).into());
	}

	// Log
	let level_filter = config.log_level_filter
		.try_into_level_filter()
		.map_err(|_| anyhow!("Failed to parse log level filter"))?;

	BlackBox::new("chronometer")?
		.spawn(level_filter)
		.map_err(|e| anyhow!("Failed to install black box: {}", e))?;

	info!("Chronometer {}", env!("CARGO_PKG_VERSION"));

	if !config_found {
		warn!("{} not found, using default configuration", config_path);
	}

	// Dispatcher
	let (frame_sender, frame_receiver) = unbounded::<MotionFrame>();

	let dispatcher_handle = FrameDispatcher::new(config.log_every_frames)
		.spawn(frame_receiver);

	// Driver
	let (input_sender, input_receiver) = unbounded::<Input>();

	if config.start_on_launch {
		input_sender.send(Input::Command(Command::Start))?;
	}

	let period = Duration::from_secs_f64(1. / config.frame_rate);

	let driver_handle = FrameDriver::new(MotionEngine::new(config.motion), MonotonicClock::new())
		.spawn(input_receiver, frame_sender, period);

	// Input controllers
	if let Some(replay_path) = args.value_of(REPLAY_ARG) {
		info!("Replaying {}", replay_path);

		ReplayInputController::open(replay_path)?
			.quit_when_done(args.is_present(EXIT_ARG))
			.spawn(input_sender.clone());
	}

	CommandInputController::stdin()
		.spawn(input_sender.clone());

	drop(input_sender);

	info!("Type start, stop, reset or quit");

	driver_handle.join().map_err(|_| anyhow!("Frame driver panicked"))?;
	dispatcher_handle.join().map_err(|_| anyhow!("Frame dispatcher panicked"))?;

	log::logger().flush();
	std::thread::sleep(Duration::from_millis(100));

	Ok(())
}
