//! Canonical catalog models.
//!
//! These types are OUR types - they don't change when either source API
//! changes. Primary and fallback payloads are converted into them by the
//! adapters in `primary/` and `fallback/`.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::transport::{DownloadError, TransportError};

/// Placeholder used when a source omits a display name.
pub const UNKNOWN: &str = "Unknown";

/// Default number of tracks per page for collections.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Which source produced a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Primary,
    Fallback,
}

/// Raw, un-normalized payload from either client.
///
/// Created per request and consumed by exactly one normalization step.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceResponse {
    pub origin: Origin,
    pub body: serde_json::Value,
}

impl SourceResponse {
    pub fn primary(body: serde_json::Value) -> Self {
        Self {
            origin: Origin::Primary,
            body,
        }
    }

    pub fn fallback(body: serde_json::Value) -> Self {
        Self {
            origin: Origin::Fallback,
            body,
        }
    }
}

/// What a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Song,
    Album,
    Playlist,
    Artist,
    Lyrics,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Song => "song",
            CatalogKind::Album => "album",
            CatalogKind::Playlist => "playlist",
            CatalogKind::Artist => "artist",
            CatalogKind::Lyrics => "lyrics",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two collection kinds that share the album/playlist fetch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Album,
    Playlist,
}

impl CollectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Album => "album",
            CollectionKind::Playlist => "playlist",
        }
    }

    /// Fallback title when the source has none.
    pub fn untitled(self) -> &'static str {
        match self {
            CollectionKind::Album => "Unknown Album",
            CollectionKind::Playlist => "Unknown Playlist",
        }
    }

    /// Catalog web path segment for this kind.
    pub fn web_segment(self) -> &'static str {
        match self {
            CollectionKind::Album => "album",
            CollectionKind::Playlist => "featured",
        }
    }
}

impl From<CollectionKind> for CatalogKind {
    fn from(kind: CollectionKind) -> Self {
        match kind {
            CollectionKind::Album => CatalogKind::Album,
            CollectionKind::Playlist => CatalogKind::Playlist,
        }
    }
}

impl TryFrom<CatalogKind> for CollectionKind {
    type Error = CatalogError;

    fn try_from(kind: CatalogKind) -> Result<Self, Self::Error> {
        match kind {
            CatalogKind::Album => Ok(CollectionKind::Album),
            CatalogKind::Playlist => Ok(CollectionKind::Playlist),
            other => Err(CatalogError::Validation(format!(
                "`{}` is not a collection kind",
                other
            ))),
        }
    }
}

/// Search categories understood by the primary API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Songs,
    Albums,
    Artists,
    Playlists,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Songs => "songs",
            SearchKind::Albums => "albums",
            SearchKind::Artists => "artists",
            SearchKind::Playlists => "playlists",
        }
    }

    /// `__call` value for this search kind.
    pub fn call(self) -> &'static str {
        match self {
            SearchKind::Songs => "search.getResults",
            SearchKind::Albums => "search.getAlbumResults",
            SearchKind::Artists => "search.getArtistResults",
            SearchKind::Playlists => "search.getPlaylistResults",
        }
    }
}

impl FromStr for SearchKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "songs" => Ok(SearchKind::Songs),
            "albums" => Ok(SearchKind::Albums),
            "artists" => Ok(SearchKind::Artists),
            "playlists" => Ok(SearchKind::Playlists),
            other => Err(CatalogError::Validation(format!(
                "Invalid search_type: {}",
                other
            ))),
        }
    }
}

/// Audio quality offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bitrate {
    Kbps160,
    #[default]
    Kbps320,
}

impl Bitrate {
    pub fn kbps(self) -> u32 {
        match self {
            Bitrate::Kbps160 => 160,
            Bitrate::Kbps320 => 320,
        }
    }

    /// Label as used in file names and candidate lists, e.g. `320kbps`.
    pub fn label(self) -> String {
        format!("{}kbps", self.kbps())
    }
}

impl FromStr for Bitrate {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_end_matches("kbps") {
            "160" => Ok(Bitrate::Kbps160),
            "320" => Ok(Bitrate::Kbps320),
            other => Err(CatalogError::Validation(format!(
                "Unsupported bitrate: {}",
                other
            ))),
        }
    }
}

/// Identifies what is being requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub kind: CatalogKind,
    /// Numeric id, slug id, or absent
    pub id: Option<String>,
    /// Original deep link, usable by the fallback source
    pub source_url: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl CatalogQuery {
    pub fn new(kind: CatalogKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
            source_url: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Reject non-positive paging before any network call.
    pub fn validate(&self) -> Result<(), CatalogError> {
        validate_paging(self.page, self.page_size)
    }

    /// The id, or a validation error when none was supplied.
    pub fn require_id(&self) -> Result<&str, CatalogError> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CatalogError::Validation(format!("A {} id is required", self.kind)))
    }
}

/// Shared paging check for queries and searches.
pub fn validate_paging(page: u32, page_size: u32) -> Result<(), CatalogError> {
    if page < 1 {
        return Err(CatalogError::Validation(
            "`page_no` must be a positive integer.".to_string(),
        ));
    }
    if page_size < 1 {
        return Err(CatalogError::Validation(
            "`page_size` must be a positive integer.".to_string(),
        ));
    }
    Ok(())
}

/// A credited artist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtistCredit {
    pub id: Option<String>,
    pub name: String,
    pub role: String,
}

/// Album reference on a track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
}

/// A directly downloadable rendition (fallback source only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCandidate {
    pub bitrate_label: String,
    pub url: String,
}

/// Normalized track, identical in shape whichever source produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTrack {
    pub id: String,
    /// Never empty
    pub title: String,
    pub subtitle: Option<String>,
    pub album: AlbumRef,
    /// Highest resolution variant found in the payload
    pub image_url: Option<String>,
    pub artists: SmallVec<[ArtistCredit; 4]>,
    /// Display line of the singers (see `normalize::performer_line`)
    pub performers: String,
    pub music: Option<String>,
    pub duration_seconds: u32,
    pub language: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub perma_url: Option<String>,
    pub download_candidates: Vec<DownloadCandidate>,
    pub play_count: Option<u64>,
    pub has_lyrics: bool,
    pub lyrics_id: Option<String>,
    pub encrypted_media_url: Option<String>,
    pub label: Option<String>,
    pub copyright: Option<String>,
    pub explicit: bool,
    pub origin: Origin,
}

impl CanonicalTrack {
    /// Names credited with `role`, joined with ", ".
    pub fn credits_for(&self, role: &str) -> String {
        self.artists
            .iter()
            .filter(|a| a.role == role && !a.name.is_empty())
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Candidate whose label mentions `bitrate`, else the last (highest) one.
    pub fn best_candidate(&self, bitrate: Bitrate) -> Option<&DownloadCandidate> {
        let wanted = bitrate.kbps().to_string();
        self.download_candidates
            .iter()
            .find(|c| c.bitrate_label.contains(&wanted))
            .or_else(|| self.download_candidates.last())
    }
}

/// Album, playlist, or artist song list.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalCollection {
    pub kind: CatalogKind,
    pub id: Option<String>,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub perma_url: Option<String>,
    /// Declared total; may exceed `tracks.len()`
    pub track_count: u64,
    /// One page of tracks
    pub tracks: Vec<CanonicalTrack>,
    pub follower_count: Option<u64>,
    pub release_year: Option<i32>,
    pub language: Option<String>,
    pub is_verified: Option<bool>,
    pub origin: Origin,
}

impl CanonicalCollection {
    /// Whether another page is likely available.
    pub fn has_next_page(&self, page: u32, page_size: u32) -> bool {
        self.track_count > u64::from(page) * u64::from(page_size)
    }
}

/// One entry of a search or autocomplete listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// Entity type as reported by the source (`song`, `album`, ...)
    pub kind: Option<String>,
    pub image_url: Option<String>,
    pub perma_url: Option<String>,
    pub year: Option<i32>,
    pub language: Option<String>,
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub total: u64,
    pub start: u64,
    pub results: Vec<SearchHit>,
}

/// Top hits across all kinds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Autocomplete {
    pub top_query: Vec<SearchHit>,
    pub songs: Vec<SearchHit>,
    pub albums: Vec<SearchHit>,
    pub artists: Vec<SearchHit>,
    pub playlists: Vec<SearchHit>,
}

/// Song lyrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics {
    pub text: String,
    pub snippet: Option<String>,
    pub copyright: Option<String>,
}

/// Where a song's audio can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDownload {
    pub url: String,
    pub bitrate: Bitrate,
    /// True for a fallback-provided direct link, false for a signed URL
    pub direct: bool,
}

/// Errors that escape the catalog core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog service unavailable, try again later ({0})")]
    Transport(#[from] TransportError),

    #[error("No {kind} found for {key}")]
    NotFound { kind: CatalogKind, key: String },

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Download(#[from] DownloadError),
}

impl CatalogError {
    pub fn not_found(kind: CatalogKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = CatalogQuery::new(CatalogKind::Album, "123");
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_rejects_zero_paging() {
        let query = CatalogQuery::new(CatalogKind::Album, "123").with_page(0, 10);
        assert!(matches!(query.validate(), Err(CatalogError::Validation(_))));

        let query = CatalogQuery::new(CatalogKind::Album, "123").with_page(1, 0);
        assert!(matches!(query.validate(), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn test_require_id() {
        let mut query = CatalogQuery::new(CatalogKind::Artist, "");
        assert!(query.require_id().is_err());
        query.id = Some("459320".to_string());
        assert_eq!(query.require_id().unwrap(), "459320");
    }

    #[test]
    fn test_search_kind_parsing() {
        assert_eq!("songs".parse::<SearchKind>().unwrap(), SearchKind::Songs);
        assert_eq!(
            "playlists".parse::<SearchKind>().unwrap().call(),
            "search.getPlaylistResults"
        );
        assert!(matches!(
            "podcasts".parse::<SearchKind>(),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_bitrate_parsing() {
        assert_eq!("160".parse::<Bitrate>().unwrap(), Bitrate::Kbps160);
        assert_eq!("320kbps".parse::<Bitrate>().unwrap(), Bitrate::Kbps320);
        assert!("128".parse::<Bitrate>().is_err());
        assert_eq!(Bitrate::Kbps160.label(), "160kbps");
    }

    #[test]
    fn test_collection_kind_conversion() {
        assert_eq!(
            CollectionKind::try_from(CatalogKind::Playlist).unwrap(),
            CollectionKind::Playlist
        );
        assert!(CollectionKind::try_from(CatalogKind::Song).is_err());
    }

    #[test]
    fn test_not_found_distinct_from_transport() {
        let not_found = CatalogError::not_found(CatalogKind::Song, "abc");
        let transport = CatalogError::from(TransportError::InvalidFormat);
        assert!(not_found.is_not_found());
        assert!(!transport.is_not_found());
        assert_ne!(not_found.to_string(), transport.to_string());
    }
}
