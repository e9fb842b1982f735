//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `browse`: search, songs, collections, deep links, lyrics
//! - `download`: single downloads and batch files
//! - `system`: service probe and configuration

mod browse;
mod download;
mod system;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::catalog::{CatalogKind, CatalogQuery, SearchKind};
use crate::config;
use crate::session::{self, Session};

pub use browse::{cmd_collection, cmd_lyrics, cmd_open, cmd_search, cmd_song, cmd_suggest};
pub use download::{cmd_batch, cmd_download};
pub use system::{cmd_config, cmd_ping};

/// saavn-fetch CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog
    Search {
        /// Search text
        query: String,
        /// What to search for: songs, albums, artists, playlists
        #[arg(short, long, default_value = "songs")]
        kind: String,
        /// Result page, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Top hits across songs, albums, artists and playlists
    Suggest {
        /// Search text
        query: String,
    },
    /// Show one song
    Song {
        /// Song id
        id: String,
    },
    /// List an album's tracks
    Album {
        /// Album id
        id: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// List a playlist's tracks
    Playlist {
        /// Playlist id
        id: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// List an artist's songs and albums
    Artist {
        /// Artist id
        id: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Display name, used to search by name if both sources fail
        #[arg(long)]
        name: Option<String>,
    },
    /// Show whatever a catalog link points at
    Open {
        /// Song, album, playlist or artist URL
        url: String,
    },
    /// Print a song's lyrics
    Lyrics {
        /// Song id
        id: String,
    },
    /// Download a song by id, or everything a catalog link points at
    Download {
        /// Song id or catalog URL
        target: String,
        /// Bitrate in kbps: 160 or 320
        #[arg(short, long)]
        bitrate: Option<u32>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Download every catalog link listed in a file
    Batch {
        /// File with one URL per line; blank lines and # comments are skipped
        file: PathBuf,
        /// Bitrate in kbps: 160 or 320
        #[arg(short, long)]
        bitrate: Option<u32>,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check whether a URL answers with JSON or the HTML "service alive" page
    Ping {
        /// URL to probe (default: the primary API endpoint)
        url: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Write the configuration file if it doesn't exist
        #[arg(long)]
        init: bool,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if no command was specified.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let Some(command) = &cli.command else {
        return Ok(false);
    };

    let rt = Runtime::new()?;
    let mut config = config::load();

    match command {
        Commands::Search { query, kind, page } => {
            let kind: SearchKind = kind
                .parse()
                .map_err(|e| anyhow::anyhow!(session::user_message(&e)))?;
            cmd_search(&rt, &Session::from_config(&config), query, kind, *page)?;
        }
        Commands::Suggest { query } => {
            cmd_suggest(&rt, &Session::from_config(&config), query)?;
        }
        Commands::Song { id } => {
            cmd_song(&rt, &Session::from_config(&config), id)?;
        }
        Commands::Album { id, page } => {
            let query = page_query(CatalogKind::Album, id, *page, config.paging.page_size);
            cmd_collection(&rt, &Session::from_config(&config), &query, None)?;
        }
        Commands::Playlist { id, page } => {
            let query = page_query(CatalogKind::Playlist, id, *page, config.paging.page_size);
            cmd_collection(&rt, &Session::from_config(&config), &query, None)?;
        }
        Commands::Artist { id, page, name } => {
            let query = page_query(CatalogKind::Artist, id, *page, config.paging.page_size);
            cmd_collection(&rt, &Session::from_config(&config), &query, name.as_deref())?;
        }
        Commands::Open { url } => {
            cmd_open(&rt, &Session::from_config(&config), url)?;
        }
        Commands::Lyrics { id } => {
            cmd_lyrics(&rt, &Session::from_config(&config), id)?;
        }
        Commands::Download {
            target,
            bitrate,
            output,
        } => {
            apply_download_overrides(&mut config, *bitrate, output.as_ref());
            cmd_download(&rt, &Session::from_config(&config), target)?;
        }
        Commands::Batch {
            file,
            bitrate,
            output,
        } => {
            apply_download_overrides(&mut config, *bitrate, output.as_ref());
            cmd_batch(&rt, &Session::from_config(&config), file)?;
        }
        Commands::Ping { url } => {
            cmd_ping(&rt, &config, url.as_deref())?;
        }
        Commands::Config { init } => {
            cmd_config(&config, *init)?;
        }
    }
    Ok(true)
}

// ============================================================================
// Shared helper functions
// ============================================================================

fn page_query(kind: CatalogKind, id: &str, page: u32, page_size: u32) -> CatalogQuery {
    CatalogQuery::new(kind, id).with_page(page, page_size)
}

/// Command-line flags win over the config file.
fn apply_download_overrides(
    config: &mut config::Config,
    bitrate: Option<u32>,
    output: Option<&PathBuf>,
) {
    if let Some(bitrate) = bitrate {
        config.download.bitrate = bitrate;
    }
    if let Some(output) = output {
        config.download.directory = output.clone();
    }
}

/// Render an error for the terminal.
pub(crate) fn fail(err: crate::error::Error) -> anyhow::Error {
    anyhow::anyhow!(session::describe(&err))
}
