#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate assert_approx_eq;

mod clock;
mod collector;
mod config;
mod driver;
mod engine;
mod input;
mod integrator;
mod orientation;
mod output;
mod separator;
mod traits;

pub use clock::*;
pub use collector::*;
pub use config::*;
pub use driver::*;
pub use engine::*;
pub use input::*;
pub use integrator::*;
pub use orientation::*;
pub use output::*;
pub use separator::*;
pub use traits::*;
