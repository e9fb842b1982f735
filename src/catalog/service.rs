//! Catalog service - reconciles the primary and fallback sources
//!
//! Every entity fetch is a two-step pipeline:
//! 1. Ask the primary source and judge the raw answer (`verdict`)
//! 2. Accepted: decode and normalize it. Otherwise: ask the fallback source
//!    and normalize its answer instead
//!
//! A transport failure on the primary is returned as-is; only an answer that
//! arrived but is unusable sends the fetch to the fallback.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{
    Autocomplete, Bitrate, CanonicalCollection, CanonicalTrack, CatalogError, CatalogKind,
    CatalogQuery, CollectionKind, Lyrics, Origin, ResolvedDownload, SearchKind, SearchResult,
    SourceResponse, validate_paging,
};
use super::fallback::{self, FallbackClient};
use super::primary::{self, PrimaryClient, PrimaryRequest, dto};
use super::traits::{FallbackApi, PrimaryApi};
use super::verdict;
use crate::naming;
use crate::transport::{DownloadError, Downloader};

/// Albums requested from the fallback source alongside an artist's songs.
pub const FALLBACK_ALBUM_COUNT: u32 = 10;

/// Catalog facade used by the session layer.
pub struct CatalogService<P = PrimaryClient, F = FallbackClient> {
    primary: P,
    fallback: F,
    downloader: Downloader,
}

impl<P: PrimaryApi, F: FallbackApi> CatalogService<P, F> {
    pub fn new(primary: P, fallback: F, downloader: Downloader) -> Self {
        Self {
            primary,
            fallback,
            downloader,
        }
    }

    /// Fetch one song. Falls back to the `ids` lookup when `songs` is empty.
    pub async fn fetch_song(&self, query: &CatalogQuery) -> Result<CanonicalTrack, CatalogError> {
        let id = query.require_id()?;
        let response = self
            .primary
            .send(&PrimaryRequest::Song {
                token: id.to_string(),
            })
            .await?;

        if let Some(track) = accepted_song(response)? {
            return Ok(track);
        }

        info!("Primary has no song {}, trying fallback", id);
        let fallback = self
            .fallback
            .get_song(id, query.source_url.as_deref())
            .await
            .ok_or_else(|| CatalogError::not_found(CatalogKind::Song, id))?;

        fallback::to_tracks(fallback.body)?
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::not_found(CatalogKind::Song, id))
    }

    /// Fetch one page of an album or playlist.
    pub async fn fetch_collection(
        &self,
        query: &CatalogQuery,
    ) -> Result<CanonicalCollection, CatalogError> {
        let kind = CollectionKind::try_from(query.kind)?;
        query.validate()?;
        let id = query.require_id()?;

        let response = self
            .primary
            .send(&PrimaryRequest::Collection {
                kind,
                token: id.to_string(),
                page: query.page,
                page_size: query.page_size,
            })
            .await?;

        if verdict::collection_verdict(&response.body).is_accept() {
            debug!("Primary {} {} accepted", kind.as_str(), id);
            let decoded: dto::CollectionResponse = primary::decode(response.body)?;
            return Ok(primary::to_collection(
                kind,
                decoded,
                query.page,
                query.page_size,
            ));
        }

        let lookup_id = numeric_id(&response.body, &["id"]).unwrap_or_else(|| id.to_string());
        info!(
            "Primary {} {} unusable, trying fallback with {}",
            kind.as_str(),
            id,
            lookup_id
        );

        let fallback = self
            .fallback
            .get_collection(
                kind,
                &lookup_id,
                query.source_url.as_deref(),
                query.page - 1,
                query.page_size,
            )
            .await
            .ok_or_else(|| CatalogError::not_found(kind.into(), id))?;

        let collection = fallback::to_collection(kind, fallback.body, &lookup_id)?;
        info!(
            "Fallback returned {} '{}' with {} tracks",
            kind.as_str(),
            collection.title,
            collection.tracks.len()
        );
        Ok(collection)
    }

    /// Fetch one page of an artist's songs and albums.
    ///
    /// `name` enables a last-resort song search when both sources fail.
    pub async fn fetch_artist(
        &self,
        query: &CatalogQuery,
        name: Option<&str>,
    ) -> Result<CanonicalCollection, CatalogError> {
        query.validate()?;
        let id = query.require_id()?;

        let response = self
            .primary
            .send(&PrimaryRequest::Artist {
                token: id.to_string(),
                page: query.page,
                page_size: query.page_size,
            })
            .await?;

        if verdict::artist_verdict(&response.body).is_accept() {
            let decoded: dto::ArtistResponse = primary::decode(response.body)?;
            return Ok(primary::to_artist(
                decoded,
                name,
                query.page,
                query.page_size,
            ));
        }

        let lookup_id =
            numeric_id(&response.body, &["artistId", "id"]).unwrap_or_else(|| id.to_string());
        let url = query
            .source_url
            .clone()
            .or_else(|| artist_url(&response.body));
        info!("Primary artist {} has no top songs, trying fallback", id);

        if let Some(fallback) = self
            .fallback
            .get_artist(
                &lookup_id,
                query.page - 1,
                query.page_size,
                FALLBACK_ALBUM_COUNT,
                url.as_deref(),
            )
            .await
        {
            let artist = fallback::to_artist(fallback.body, &lookup_id, name)?;
            info!(
                "Fallback returned {} tracks for artist '{}'",
                artist.tracks.len(),
                artist.title
            );
            return Ok(artist);
        }

        warn!("Fallback failed for artist {}", id);
        match name.filter(|n| !n.trim().is_empty()) {
            Some(name) => self.artist_by_name(id, name, query).await,
            None => Err(CatalogError::not_found(CatalogKind::Artist, id)),
        }
    }

    /// Songs whose subtitle credits `name`, as an artist collection.
    async fn artist_by_name(
        &self,
        id: &str,
        name: &str,
        query: &CatalogQuery,
    ) -> Result<CanonicalCollection, CatalogError> {
        let response = self
            .primary
            .send(&PrimaryRequest::Search {
                query: format!("\"{}\"", name),
                kind: SearchKind::Songs,
                page: query.page,
                page_size: query.page_size,
            })
            .await?;
        let decoded: dto::SearchResponse = primary::decode(response.body)?;

        let needle = name.to_lowercase();
        let tracks: Vec<CanonicalTrack> = decoded
            .results
            .iter()
            .filter(|item| {
                item.subtitle
                    .as_deref()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
            .map(primary::to_track)
            .collect();

        if tracks.is_empty() {
            return Err(CatalogError::not_found(CatalogKind::Artist, id));
        }
        info!("Found {} songs for artist '{}' by name", tracks.len(), name);

        Ok(CanonicalCollection {
            kind: CatalogKind::Artist,
            id: Some(id.to_string()),
            title: name.to_string(),
            subtitle: None,
            image_url: tracks.iter().find_map(|t| t.image_url.clone()),
            perma_url: None,
            track_count: tracks.len() as u64,
            tracks,
            follower_count: None,
            release_year: None,
            language: None,
            is_verified: None,
            origin: Origin::Primary,
        })
    }

    /// Search one kind. Primary only.
    pub async fn search(
        &self,
        query: &str,
        kind: SearchKind,
        page: u32,
        page_size: u32,
    ) -> Result<SearchResult, CatalogError> {
        validate_paging(page, page_size)?;
        if query.trim().is_empty() {
            return Err(CatalogError::Validation(
                "Search query must not be empty".to_string(),
            ));
        }

        let response = self
            .primary
            .send(&PrimaryRequest::Search {
                query: query.to_string(),
                kind,
                page,
                page_size,
            })
            .await?;
        let decoded: dto::SearchResponse = primary::decode(response.body)?;
        Ok(primary::to_search_result(decoded, page_size))
    }

    /// Top hits across every kind.
    pub async fn autocomplete(&self, query: &str) -> Result<Autocomplete, CatalogError> {
        let response = self
            .primary
            .send(&PrimaryRequest::Autocomplete {
                query: query.to_string(),
            })
            .await?;
        let decoded: dto::AutocompleteResponse = primary::decode(response.body)?;
        Ok(primary::to_autocomplete(decoded))
    }

    pub async fn lyrics(&self, lyrics_id: &str) -> Result<Lyrics, CatalogError> {
        let response = self
            .primary
            .send(&PrimaryRequest::Lyrics {
                lyrics_id: lyrics_id.to_string(),
            })
            .await?;
        let decoded: dto::LyricsResponse = primary::decode(response.body)?;
        primary::to_lyrics(decoded)
            .ok_or_else(|| CatalogError::not_found(CatalogKind::Lyrics, lyrics_id))
    }

    /// Pick the URL to fetch `track` from.
    ///
    /// A direct candidate (fallback tracks) wins; otherwise the primary
    /// source signs the track's encrypted media URL.
    pub async fn resolve_download(
        &self,
        track: &CanonicalTrack,
        bitrate: Bitrate,
    ) -> Result<ResolvedDownload, CatalogError> {
        if let Some(candidate) = track.best_candidate(bitrate) {
            return Ok(ResolvedDownload {
                url: candidate.url.clone(),
                bitrate,
                direct: true,
            });
        }

        let no_url = || CatalogError::from(DownloadError::NoAuthUrl(track.id.clone()));
        let encrypted = track.encrypted_media_url.clone().ok_or_else(no_url)?;

        let response = self
            .primary
            .send(&PrimaryRequest::AuthToken {
                encrypted_media_url: encrypted,
                bitrate,
            })
            .await?;
        let decoded: dto::AuthTokenResponse = primary::decode(response.body)?;
        let url = primary::to_auth_url(decoded).ok_or_else(no_url)?;

        Ok(ResolvedDownload {
            url,
            bitrate,
            direct: false,
        })
    }

    /// Download `track` into `dir` as `<title>_<bitrate>kbps.mp3`.
    pub async fn download_song(
        &self,
        track: &CanonicalTrack,
        bitrate: Bitrate,
        dir: &Path,
    ) -> Result<PathBuf, CatalogError> {
        let resolved = self.resolve_download(track, bitrate).await?;
        debug!(
            "Downloading '{}' from {} link",
            track.title,
            if resolved.direct { "direct" } else { "signed" }
        );

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| DownloadError::Io {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;

        let dest = dir.join(naming::track_filename(&track.title, bitrate));
        let bytes = self.downloader.download_to(&resolved.url, &dest).await?;
        info!("Downloaded '{}' ({} bytes)", track.title, bytes);
        Ok(dest)
    }
}

#[cfg(test)]
impl<P, F> CatalogService<P, F> {
    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

/// First song of an accepted primary song response.
fn accepted_song(response: SourceResponse) -> Result<Option<CanonicalTrack>, CatalogError> {
    if !verdict::song_verdict(&response.body).is_accept() {
        return Ok(None);
    }
    let decoded: dto::SongResponse = primary::decode(response.body)?;
    Ok(decoded.songs.first().map(primary::to_track))
}

/// An all-digit id under any of `keys`.
fn numeric_id(body: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| body.get(key)).find_map(|value| match value {
        Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            Some(s.clone())
        }
        Value::Number(n) if n.is_u64() => Some(n.to_string()),
        _ => None,
    })
}

/// Artist page URL carried by an unusable primary answer, if any.
fn artist_url(body: &Value) -> Option<String> {
    body.get("perma_url")
        .or_else(|| body.get("urls").and_then(|urls| urls.get("songs")))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
