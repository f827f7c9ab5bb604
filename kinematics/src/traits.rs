use crossbeam_channel::{Receiver, Sender};
use std::{error::Error, thread, thread::JoinHandle, time::Duration};

use crate::input::Input;
use crate::output::OutputFrame;

/// Controllers that import external data.
pub trait InputController
where
    Self: Sized + Send + 'static,
{
    /// Minimum duration to wait between two successive `read_input` calls.
    const DELAY: Option<Duration>;

    /// Reads the next input. `Ok(None)` means the source is exhausted.
    fn read_input(&mut self) -> Result<Option<Input>, Box<dyn Error>>;

    fn read_loop(&mut self, input_sender: Sender<Input>) {
        loop {
            match self.read_input() {
                Ok(Some(input)) => {
                    if input_sender.send(input).is_err() {
                        debug!("Input channel disconnected");
                        return;
                    }
                }
                Ok(None) => {
                    info!("Input source exhausted");
                    return;
                }
                Err(e) => error!("{}", e),
            }

            if let Some(delay) = Self::DELAY {
                thread::sleep(delay);
            }
        }
    }

    /// Spawns a thread running `read_loop`. It is expected that the input controller is ready to
    /// read when spawned, i.e. that the initialization (if any) is done.
    fn spawn(mut self, input_sender: Sender<Input>) -> JoinHandle<()> {
        thread::spawn(move || self.read_loop(input_sender))
    }
}

/// Controllers that dispense output frames.
pub trait Dispatcher<T: OutputFrame + Send + Sized + 'static>
where
    Self: Sized + Send + 'static,
{
    fn dispatch(&mut self, output_frame: T) -> Result<(), Box<dyn Error>>;

    fn dispatch_loop(&mut self, output_frame_receiver: Receiver<T>) {
        for output_frame in output_frame_receiver {
            trace!("{:?}", &output_frame);
            if let Err(e) = self.dispatch(output_frame) {
                error!("{}", e);
            }
        }
    }

    fn spawn(mut self, output_frame_receiver: Receiver<T>) -> JoinHandle<()> {
        thread::spawn(move || self.dispatch_loop(output_frame_receiver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Command;
    use crossbeam_channel::unbounded;
    use std::collections::VecDeque;

    struct ScriptedInputController {
        inputs: VecDeque<Input>,
    }

    impl InputController for ScriptedInputController {
        const DELAY: Option<Duration> = None;

        fn read_input(&mut self) -> Result<Option<Input>, Box<dyn Error>> {
            Ok(self.inputs.pop_front())
        }
    }

    #[test]
    fn read_loop_stops_when_exhausted() {
        let (sender, receiver) = unbounded::<Input>();
        let controller = ScriptedInputController {
            inputs: vec![Input::Command(Command::Start), Input::Command(Command::Quit)].into(),
        };

        controller.spawn(sender).join().unwrap();

        let received: Vec<Input> = receiver.iter().collect();
        assert_eq!(received.len(), 2);
    }
}
