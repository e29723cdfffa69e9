// src/exec/mod.rs

//! External tool invocation layer.

pub mod command;
pub mod runner;

pub use command::{CommandOutput, CommandSpec};
pub use runner::{CommandRunner, ProcessRunner, run_checked};
