use kinematics::MotionConfig;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE_PATH: &'static str = "chronometer.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronometerConfig {
	pub log_level_filter: String,
	/// Frames per second produced by the driver.
	pub frame_rate: f64,
	/// Every n-th frame is logged at the info level, the others at the debug level.
	pub log_every_frames: u32,
	/// Start the engine as soon as the driver is spawned, without waiting for a `start` command.
	pub start_on_launch: bool,
	pub motion: MotionConfig,
}

pub trait TryIntoLevelFilter {
	fn try_into_level_filter(&self) -> Result<LevelFilter, ()>;
}

impl TryIntoLevelFilter for String {
	fn try_into_level_filter(&self) -> Result<LevelFilter, ()> {
		Ok(match self.as_str() {
			"none" => LevelFilter::Off,
			"error" => LevelFilter::Error,
			"warn" => LevelFilter::Warn,
			"info" => LevelFilter::Info,
			"debug" => LevelFilter::Debug,
			"all" => LevelFilter::Trace,
			_ => return Err(()),
		})
	}
}

impl Default for ChronometerConfig {
	fn default() -> Self {
		ChronometerConfig {
			log_level_filter: String::from("info"),
			frame_rate: 60.,
			log_every_frames: 30,
			start_on_launch: true,
			motion: MotionConfig::default(),
		}
	}
}

pub fn read<P: AsRef<Path>>(path: P) -> Result<ChronometerConfig, Box<dyn Error>> {
	let config_file = File::open(path)?;

	let config: ChronometerConfig = serde_json::from_reader(config_file)?;

	Ok(config)
}

pub fn save<P: AsRef<Path>>(path: P, config: &ChronometerConfig) -> Result<(), Box<dyn Error>> {
	let mut config_file = OpenOptions::new()
		.create(true)
		.write(true)
		.truncate(true)
		.open(path)?;

	write!(config_file, "{}", serde_json::to_string_pretty(config)?)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn level_filters() {
		assert_eq!(String::from("none").try_into_level_filter(), Ok(LevelFilter::Off));
		assert_eq!(String::from("all").try_into_level_filter(), Ok(LevelFilter::Trace));
		assert_eq!(String::from("warn").try_into_level_filter(), Ok(LevelFilter::Warn));
		assert!(String::from("verbose").try_into_level_filter().is_err());
	}

	#[test]
	fn missing_fields_take_defaults() {
		let config: ChronometerConfig = serde_json::from_str(
			r#"{ "frame_rate": 120, "motion": { "invariant_speed": 2.5 } }"#
		).unwrap();

		assert_eq!(config.frame_rate, 120.);
		assert_eq!(config.log_level_filter, "info");
		assert_eq!(config.motion.invariant_speed, 2.5);
		assert_eq!(config.motion.rest_time_constant, MotionConfig::default().rest_time_constant);
	}

	#[test]
	fn saved_config_is_read_back() {
		let path = std::env::temp_dir().join(format!("chronometer_config_{}.json", std::process::id()));
		let mut config = ChronometerConfig::default();
		config.motion.gamma_coupling = 0.;
		config.log_level_filter = String::from("debug");

		save(&path, &config).unwrap();
		let read_back = read(&path).unwrap();

		assert_eq!(read_back.log_level_filter, "debug");
		assert_eq!(read_back.motion, config.motion);

		std::fs::remove_file(&path).unwrap();
	}
}
