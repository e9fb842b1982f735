//! Command-line interface for saavn-fetch.
//!
//! This module provides CLI commands for searching, browsing and downloading
//! from the JioSaavn catalog.

mod commands;

pub use commands::{Cli, Commands, run_command};
