//! tunebot - a chat bot for searching music, liking tracks and keeping
//! playlists.
//!
//! The bot core is transport-agnostic; the binary drives it from the
//! console. Logs go to stderr so replies on stdout stay readable.

pub mod bot;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod model;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tunebot=info".parse()?))
        .init();

    cli::run_command(&args)
}
