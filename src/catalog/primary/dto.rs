//! Primary API Data Transfer Objects
//!
//! These types match what `api.php` returns (`api_version=4`).
//! DO NOT use these types outside the primary module - convert to domain types.
//!
//! The API is loose about types: counts and years arrive as strings, empty
//! lists arrive as `""`, and nested objects are sometimes missing. Every
//! field is therefore optional and decoded leniently.

use serde::Deserialize;

use crate::catalog::fields::{
    AlbumField, ArtistsField, ImageField, Scalar, lenient_list, lenient_option, one_or_many,
};

/// Any catalog item: song, album, playlist, artist entry or search hit.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Item {
    #[serde(default, deserialize_with = "lenient_option")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub title: Option<String>,
    /// Artist entries use `name` instead of `title`
    #[serde(default, deserialize_with = "lenient_option")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_option")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub perma_url: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub year: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub play_count: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub explicit_content: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub more_info: Option<MoreInfo>,
}

/// The `more_info` block shared by songs and collections.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MoreInfo {
    #[serde(default, deserialize_with = "lenient_option")]
    pub music: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub album_id: Option<Scalar>,
    #[serde(default)]
    pub album: Option<AlbumField>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub album_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub duration: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub encrypted_media_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub has_lyrics: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub copyright_text: Option<String>,
    #[serde(rename = "artistMap", default, deserialize_with = "lenient_option")]
    pub artist_map: Option<ArtistMap>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub song_count: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub follower_count: Option<Scalar>,
}

/// Role-grouped artists attached to a song or album.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArtistMap {
    #[serde(default)]
    pub artists: Option<ArtistsField>,
    #[serde(default)]
    pub primary_artists: Option<ArtistsField>,
}

/// `webapi.get` with `type=song`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SongResponse {
    #[serde(default, deserialize_with = "one_or_many")]
    pub songs: Vec<Item>,
}

/// `webapi.get` with `type=album` or `type=playlist`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CollectionResponse {
    #[serde(default, deserialize_with = "lenient_option")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub perma_url: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub year: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub list_count: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub list: Vec<Item>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub songs: Vec<Item>,
    #[serde(rename = "topSongs", default, deserialize_with = "lenient_list")]
    pub top_songs: Vec<Item>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub more_info: Option<MoreInfo>,
}

/// `webapi.get` with `type=artist`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArtistResponse {
    #[serde(rename = "artistId", default, deserialize_with = "lenient_option")]
    pub artist_id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub follower_count: Option<Scalar>,
    #[serde(rename = "isVerified", default, deserialize_with = "lenient_option")]
    pub is_verified: Option<Scalar>,
    #[serde(rename = "dominantLanguage", default, deserialize_with = "lenient_option")]
    pub dominant_language: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub perma_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub urls: Option<ArtistUrls>,
    #[serde(rename = "topSongs", default, deserialize_with = "lenient_list")]
    pub top_songs: Vec<Item>,
    #[serde(rename = "topAlbums", default, deserialize_with = "lenient_list")]
    pub top_albums: Vec<Item>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArtistUrls {
    #[serde(default, deserialize_with = "lenient_option")]
    pub songs: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub albums: Option<String>,
}

/// `search.get*Results`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_option")]
    pub total: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub start: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub results: Vec<Item>,
}

/// `autocomplete.get`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AutocompleteResponse {
    #[serde(default, deserialize_with = "lenient_option")]
    pub topquery: Option<Section>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub songs: Option<Section>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub albums: Option<Section>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub artists: Option<Section>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub playlists: Option<Section>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Section {
    #[serde(default, deserialize_with = "lenient_list")]
    pub data: Vec<Item>,
}

/// `lyrics.getLyrics`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LyricsResponse {
    #[serde(default, deserialize_with = "lenient_option")]
    pub lyrics: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub snippet: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub lyrics_copyright: Option<String>,
}

/// `song.generateAuthToken`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthTokenResponse {
    #[serde(default, deserialize_with = "lenient_option")]
    pub auth_url: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs accept what the real API returns.
// ============================================================================
