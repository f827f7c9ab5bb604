use kinematics::{Command, Input, InputController};
use std::error::Error;
use std::io::{self, BufRead, BufReader, Stdin};
use std::time::Duration;

/// Reads one command per line: `start`, `stop`, `reset` or `quit`.
pub struct CommandInputController<R: BufRead + Send + 'static> {
	reader: R,
}

impl CommandInputController<BufReader<Stdin>> {
	pub fn stdin() -> Self {
		CommandInputController { reader: BufReader::new(io::stdin()) }
	}
}

impl<R: BufRead + Send + 'static> CommandInputController<R> {
	pub fn new(reader: R) -> Self {
		CommandInputController { reader }
	}
}

pub fn parse_command(line: &str) -> Option<Command> {
	match line.trim().to_lowercase().as_str() {
		"start" => Some(Command::Start),
		"stop" => Some(Command::Stop),
		"reset" => Some(Command::Reset),
		"quit" | "exit" => Some(Command::Quit),
		_ => None,
	}
}

impl<R: BufRead + Send + 'static> InputController for CommandInputController<R> {
	const DELAY: Option<Duration> = None;

	fn read_input(&mut self) -> Result<Option<Input>, Box<dyn Error>> {
		loop {
			let mut line = String::new();
			if self.reader.read_line(&mut line)? == 0 {
				return Ok(None);
			}

			if line.trim().is_empty() {
				continue;
			}

			return match parse_command(&line) {
				Some(command) => {
					info!("Command: {:?}", command);
					Ok(Some(Input::Command(command)))
				}
				None => Err(format!("Unknown command {:?}, expected start, stop, reset or quit", line.trim()).into()),
			};
		}
	}
}
