//! Orchestration boundary between the CLI and the catalog core.
//!
//! A [`Session`] owns the [`CatalogService`] and the artist name cache. It
//! fills the cache from search hits and song credits, consults it when an
//! artist is opened by id, and downloads whole collections one track at a
//! time. [`user_message`] turns catalog errors into text fit for a terminal.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::catalog::fallback::{self, FallbackClient};
use crate::catalog::link;
use crate::catalog::primary::{self, PrimaryClient};
use crate::catalog::{
    Autocomplete, Bitrate, CanonicalCollection, CanonicalTrack, CatalogError, CatalogKind,
    CatalogQuery, CatalogService, FallbackApi, Lyrics, PrimaryApi, SearchHit, SearchKind,
    SearchResult, UNKNOWN,
};
use crate::config::Config;
use crate::error::{Error, Result, ResultExt};
use crate::name_cache::ArtistNameCache;
use crate::naming;
use crate::transport::{DownloadError, Downloader, TransportError};

/// Settings a session reads on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub page_size: u32,
    pub search_page_size: u32,
    pub bitrate: Bitrate,
    pub directory: PathBuf,
    pub collection_cap: usize,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            page_size: config.paging.page_size,
            search_page_size: config.paging.search_page_size,
            bitrate: config.download.bitrate(),
            directory: config.download.directory.clone(),
            collection_cap: config.download.collection_cap.max(1),
        }
    }
}

/// Whatever a deep link pointed at.
#[derive(Debug, Clone, PartialEq)]
pub enum Opened {
    Song(Box<CanonicalTrack>),
    Collection(CanonicalCollection),
}

/// Outcome of one track in a collection download.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackOutcome {
    Saved(PathBuf),
    Failed { title: String, message: String },
}

/// Outcome of a collection download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadReport {
    pub kind: CatalogKind,
    pub title: String,
    pub directory: PathBuf,
    /// Tracks the collection reports, before the cap
    pub available: u64,
    pub outcomes: Vec<TrackOutcome>,
}

impl DownloadReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, TrackOutcome::Saved(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// One-line summary for the terminal.
    pub fn summary(&self) -> String {
        if self.outcomes.is_empty() {
            return format!("This {} is empty.", self.kind);
        }
        if self.succeeded() == 0 {
            return format!("Failed to download any songs from this {}.", self.kind);
        }
        let mut line = format!(
            "Download complete! Downloaded: {} songs into {}",
            self.succeeded(),
            self.directory.display()
        );
        if self.failed() > 0 {
            line.push_str(&format!(" (failed: {})", self.failed()));
        }
        line
    }
}

/// Result of downloading a deep link.
#[derive(Debug, Clone, PartialEq)]
pub enum Downloaded {
    Song(PathBuf),
    Collection(DownloadReport),
}

/// CLI-facing catalog session.
pub struct Session<P = PrimaryClient, F = FallbackClient> {
    catalog: CatalogService<P, F>,
    names: ArtistNameCache,
    settings: SessionSettings,
}

impl Session {
    /// Build a session with real clients from `config`.
    pub fn from_config(config: &Config) -> Self {
        let primary = PrimaryClient::new(
            config.primary.base_url_or(primary::DEFAULT_BASE_URL),
            config.primary.timeout(),
        );
        let fallback = FallbackClient::new(
            config.fallback.base_url_or(fallback::DEFAULT_BASE_URL),
            config.fallback.timeout(),
        );
        let downloader = Downloader::new(
            config.download.timeout(),
            config.download.retry_policy(),
            config.download.chunk_size,
        );
        let names = ArtistNameCache::new(
            std::time::Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        );

        Self::new(
            CatalogService::new(primary, fallback, downloader),
            names,
            SessionSettings::from(config),
        )
    }
}

impl<P: PrimaryApi, F: FallbackApi> Session<P, F> {
    pub fn new(
        catalog: CatalogService<P, F>,
        names: ArtistNameCache,
        settings: SessionSettings,
    ) -> Self {
        Self {
            catalog,
            names,
            settings,
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Cached display name for an artist id.
    pub fn artist_name(&self, artist_id: &str) -> Option<String> {
        self.names.get(artist_id)
    }

    /// Seed the name cache, e.g. from a name given on the command line.
    pub fn remember_artist(&self, artist_id: &str, name: &str) {
        self.names.insert(artist_id, name);
    }

    pub async fn search(&self, query: &str, kind: SearchKind, page: u32) -> Result<SearchResult> {
        let result = self
            .catalog
            .search(query, kind, page, self.settings.search_page_size)
            .await?;
        if kind == SearchKind::Artists {
            self.remember_hits(&result.results);
        }
        Ok(result)
    }

    pub async fn autocomplete(&self, query: &str) -> Result<Autocomplete> {
        let result = self.catalog.autocomplete(query).await?;
        self.remember_hits(&result.artists);
        Ok(result)
    }

    pub async fn song(&self, id: &str) -> Result<CanonicalTrack> {
        self.song_query(&CatalogQuery::new(CatalogKind::Song, id)).await
    }

    async fn song_query(&self, query: &CatalogQuery) -> Result<CanonicalTrack> {
        let track = self.catalog.fetch_song(query).await?;
        self.remember_credits(&track);
        Ok(track)
    }

    /// One page of an album, playlist or artist.
    pub async fn collection(&self, query: &CatalogQuery) -> Result<CanonicalCollection> {
        let collection = match query.kind {
            CatalogKind::Artist => {
                let id = query.require_id()?;
                let name = self.names.get(id);
                debug!("Artist {} cached name: {:?}", id, name);
                let artist = self.catalog.fetch_artist(query, name.as_deref()).await?;
                if artist.title != UNKNOWN {
                    self.names.insert(id, &artist.title);
                }
                artist
            }
            _ => self.catalog.fetch_collection(query).await?,
        };
        for track in &collection.tracks {
            self.remember_credits(track);
        }
        Ok(collection)
    }

    pub async fn lyrics(&self, song_id: &str) -> Result<Lyrics> {
        let track = self.song(song_id).await?;
        let lyrics_id = match track.lyrics_id.as_deref() {
            Some(id) if track.has_lyrics => id.to_string(),
            _ => return Err(CatalogError::not_found(CatalogKind::Lyrics, song_id).into()),
        };
        Ok(self.catalog.lyrics(&lyrics_id).await?)
    }

    /// Resolve a deep link to its song or first collection page.
    pub async fn open(&self, url: &str) -> Result<Opened> {
        let link = link::parse(url).map_err(|e| Error::invalid_input(user_message(&e)))?;
        let query = link.to_query(self.settings.page_size);
        info!("Opening {} {}", link.kind, link.id);

        match link.kind {
            CatalogKind::Song => Ok(Opened::Song(Box::new(self.song_query(&query).await?))),
            _ => Ok(Opened::Collection(self.collection(&query).await?)),
        }
    }

    /// Download a single song into the configured directory.
    pub async fn download_song(&self, id: &str) -> Result<PathBuf> {
        let track = self.song(id).await?;
        let dest = self
            .catalog
            .download_song(&track, self.settings.bitrate, &self.settings.directory)
            .await
            .with_context(format!("'{}'", track.title))?;
        Ok(dest)
    }

    /// Download whatever `url` points at.
    pub async fn download_link(&self, url: &str) -> Result<Downloaded> {
        match self.open(url).await? {
            Opened::Song(track) => {
                let dest = self
                    .catalog
                    .download_song(&track, self.settings.bitrate, &self.settings.directory)
                    .await
                    .with_context(format!("'{}'", track.title))?;
                Ok(Downloaded::Song(dest))
            }
            Opened::Collection(collection) => {
                Ok(Downloaded::Collection(self.download_collection(&collection).await))
            }
        }
    }

    /// Download the tracks of `collection` one after another, up to the cap.
    ///
    /// Per-track failures are counted, never returned.
    pub async fn download_collection(&self, collection: &CanonicalCollection) -> DownloadReport {
        let directory = naming::collection_dir(
            &self.settings.directory,
            &collection.title,
            collection.id.as_deref(),
        );
        let available = collection.track_count.max(collection.tracks.len() as u64);
        let cap = self.settings.collection_cap;
        if collection.tracks.len() > cap {
            info!("Found {} songs, downloading first {}", available, cap);
        } else {
            info!("Found {} songs, starting download", collection.tracks.len());
        }

        let total = collection.tracks.len().min(cap);
        let outcomes: Vec<TrackOutcome> = futures::stream::iter(
            collection.tracks.iter().take(cap).enumerate(),
        )
        .then(|(n, track)| {
            let directory = directory.as_path();
            async move {
                debug!("Downloading song {}/{}", n + 1, total);
                self.download_track(track, directory).await
            }
        })
        .collect()
        .await;

        let report = DownloadReport {
            kind: collection.kind,
            title: collection.title.clone(),
            directory,
            available,
            outcomes,
        };
        info!(
            "{} '{}': {} downloaded, {} failed",
            report.kind,
            report.title,
            report.succeeded(),
            report.failed()
        );
        report
    }

    async fn download_track(&self, track: &CanonicalTrack, directory: &Path) -> TrackOutcome {
        let result = match self.downloadable(track).await {
            Ok(track) => self
                .catalog
                .download_song(&track, self.settings.bitrate, directory)
                .await
                .map_err(Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(path) => TrackOutcome::Saved(path),
            Err(e) => {
                warn!("Failed to download song {}: {}", track.id, e);
                TrackOutcome::Failed {
                    title: track.title.clone(),
                    message: describe(&e),
                }
            }
        }
    }

    /// `track`, or a fresh copy when it carries nothing to download from.
    async fn downloadable(&self, track: &CanonicalTrack) -> Result<CanonicalTrack> {
        if !track.download_candidates.is_empty() || track.encrypted_media_url.is_some() {
            return Ok(track.clone());
        }
        if track.id.is_empty() {
            return Err(DownloadError::NoAuthUrl(track.title.clone()).into());
        }
        debug!("Refetching song {} for its media URL", track.id);
        self.song(&track.id).await
    }

    fn remember_hits(&self, hits: &[SearchHit]) {
        for hit in hits {
            self.names.insert(&hit.id, &hit.title);
        }
    }

    fn remember_credits(&self, track: &CanonicalTrack) {
        for credit in &track.artists {
            if let Some(id) = credit.id.as_deref() {
                self.names.insert(id, &credit.name);
            }
        }
    }
}

/// Terminal-ready text for a catalog error.
pub fn user_message(err: &CatalogError) -> String {
    match err {
        CatalogError::NotFound { kind, key } => match kind {
            CatalogKind::Song => "The requested song could not be found.".to_string(),
            CatalogKind::Lyrics => format!("No lyrics available for {}.", key),
            kind => format!(
                "The requested {kind} could not be found.\n\
                 This might be due to:\n\
                 - Invalid {kind} ID\n\
                 - {kind} removed from JioSaavn\n\
                 - Temporary API issues"
            ),
        },
        CatalogError::Transport(e @ (TransportError::Blocked | TransportError::InvalidFormat)) => {
            e.to_string()
        }
        CatalogError::Transport(_) => {
            "Connection refused by JioSaavn API. Please try again.".to_string()
        }
        CatalogError::Validation(message) => message.clone(),
        CatalogError::Download(e) => e.to_string(),
    }
}

/// Terminal-ready text for any session error.
pub fn describe(err: &Error) -> String {
    match err {
        Error::Catalog(e) => user_message(e),
        Error::WithContext { context, source } => format!("{}: {}", context, describe(source)),
        other => other.to_string(),
    }
}
