pub mod command_input_controller;
pub mod replay_input_controller;
