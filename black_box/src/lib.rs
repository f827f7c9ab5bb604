#[macro_use]
extern crate lazy_static;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::{
	collections::VecDeque,
	fs::{File, OpenOptions},
	io::{self, Write},
	path::{Path, PathBuf},
	thread,
	thread::JoinHandle,
	time::{Duration, Instant},
};

lazy_static! {
	static ref BLACK_BOX_CHANNEL: (Sender<Message>, Receiver<Message>) = unbounded::<Message>();
	static ref BLACK_BOX_LOGGER: BlackBoxLogger = BlackBoxLogger {
		start_instant: Instant::now()
	};
}

const MAX_BUFFER_LEN: usize = 8;

enum Message {
	Log(String),
	Flush,
}

/// Records every log line of the process to a file, and echoes it on the standard output.
pub struct BlackBox {
	file: File,
	path: PathBuf,
	buffer: VecDeque<String>,
	echo: bool,
}

impl BlackBox {
	/// Opens `<prefix>_<date>_<time>.log` in the working directory.
	pub fn new(prefix: &str) -> io::Result<Self> {
		let now = chrono::offset::Local::now();
		let file_name = format!("{}_{}.log", prefix, now.format("%Y-%m-%d_%H-%M-%S"));

		Self::create(file_name)
	}

	pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
		let file = OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.open(path.as_ref())?;

		Ok(BlackBox {
			file,
			path: path.as_ref().to_path_buf(),
			buffer: VecDeque::<String>::new(),
			echo: true,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Whether lines are also printed on the standard output. Enabled by default.
	pub fn with_echo(mut self, echo: bool) -> Self {
		self.echo = echo;
		self
	}

	fn push(&mut self, line: String) {
		self.buffer.push_back(line);

		if self.buffer.len() > MAX_BUFFER_LEN {
			self.try_flush();
		}
	}

	fn try_flush(&mut self) {
		if let Err(e) = self.flush() {
			self.buffer.push_back(format!("Failed to flush black box: {}", e));
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		while let Some(line) = self.buffer.pop_front() {
			if self.echo {
				println!("{}", line);
			}
			writeln!(self.file, "{}", line)?;
		}
		self.file.flush()
	}

	fn receive_loop(&mut self) {
		const RECEIVE_TIMEOUT: Duration = Duration::from_millis(500);

		loop {
			match BLACK_BOX_CHANNEL.1.recv_timeout(RECEIVE_TIMEOUT) {
				Ok(Message::Log(line)) => self.push(line),
				Ok(Message::Flush) => self.try_flush(),
				// Quiet period, write out whatever is pending
				Err(_) => {
					if !self.buffer.is_empty() {
						self.try_flush();
					}
				}
			}
		}
	}

	/// Installs the black box as the global logger and starts writing in a background thread.
	/// Fails if another logger was installed before.
	pub fn spawn(mut self, level_filter: LevelFilter) -> Result<JoinHandle<()>, SetLoggerError> {
		log::set_logger(&*BLACK_BOX_LOGGER)?;
		log::set_max_level(level_filter);

		Ok(thread::spawn(move || self.receive_loop()))
	}
}

struct BlackBoxLogger {
	start_instant: Instant,
}

/// Errors also carry their source location.
fn format_record(elapsed: Duration, record: &Record) -> String {
	let prefix = format!(
		"[{:.3}][{:?}][{}] {}",
		elapsed.as_secs_f32(),
		record.level(),
		record.module_path().unwrap_or("unknown"),
		record.args(),
	);

	if record.level() == Level::Error {
		format!(
			"{} ({}:{})",
			prefix,
			record.file().unwrap_or("unknown"),
			record.line().unwrap_or(0)
		)
	} else {
		prefix
	}
}

impl Log for BlackBoxLogger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record) {
		if self.enabled(record.metadata()) {
			let line = format_record(self.start_instant.elapsed(), record);
			// Nothing sensible to do if the black box thread is gone
			let _ = BLACK_BOX_CHANNEL.0.send(Message::Log(line));
		}
	}

	fn flush(&self) {
		let _ = BLACK_BOX_CHANNEL.0.send(Message::Flush);
	}
}
