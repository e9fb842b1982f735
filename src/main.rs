//! saavn-fetch - a JioSaavn catalog client.
//!
//! Looks songs, albums, playlists and artists up in the primary catalog API,
//! falls back to a secondary source when the primary answer is unusable, and
//! downloads audio with retry and backoff.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod name_cache;
pub mod naming;
pub mod session;
#[cfg(test)]
pub mod test_utils;
pub mod transport;

use clap::{CommandFactory, Parser};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("saavn_fetch=info".parse()?))
        .init();

    if !cli::run_command(&args)? {
        // No subcommand: show usage
        cli::Cli::command().print_help()?;
        println!();
    }
    Ok(())
}
