//! Command-line interface for tunebot.
//!
//! Runs the bot on the console transport and provides a few maintenance
//! commands for the database and the catalog.

mod commands;

pub use commands::{Cli, Commands, run_command};
