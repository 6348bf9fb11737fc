//! CLI interface for ndsolicit
//!
//! Argument parsing, logging setup and the runner that turns a command
//! line into one or more Neighbor Solicitations.

pub mod args;
pub mod dump;
pub mod logging;
pub mod runner;

pub use args::{Cli, Commands};
pub use runner::{run, Mode, RunConfig, RunReport};
