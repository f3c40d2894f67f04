//! CLI module for pomodoro-desk.
//!
//! This module provides the command-line interface:
//! - `commands`: Process arguments and session commands using clap derive
//! - `app`: The interactive event loop hosting a `Session`

pub mod app;
pub mod commands;

pub use app::{run, AppOptions, Flow};
pub use commands::{Cli, CommandLine, Commands, SessionCommand, Toggle};
