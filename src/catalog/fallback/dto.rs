//! Fallback API Data Transfer Objects
//!
//! These types match the fallback service's `/api/*` responses.
//! DO NOT use these types outside the fallback module - convert to domain types.
//!
//! Every response is wrapped in `{"success": bool, "data": ...}`.

use serde::Deserialize;

use crate::catalog::fields::{
    AlbumField, ArtistsField, ImageField, Scalar, lenient_list, lenient_option,
};

/// Response wrapper shared by every endpoint.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Envelope {
    #[serde(default, deserialize_with = "lenient_option")]
    pub success: Option<bool>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    /// The payload of a successful response; `None` when the service
    /// reported failure or sent nothing.
    pub fn into_data(self) -> Option<serde_json::Value> {
        if self.success != Some(true) {
            return None;
        }
        match self.data? {
            serde_json::Value::Null => None,
            serde_json::Value::Array(items) if items.is_empty() => None,
            serde_json::Value::Object(fields) if fields.is_empty() => None,
            data => Some(data),
        }
    }
}

/// A direct download rendition.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DownloadLink {
    #[serde(default, deserialize_with = "lenient_option")]
    pub quality: Option<String>,
    #[serde(default, alias = "link", deserialize_with = "lenient_option")]
    pub url: Option<String>,
}

/// A song, or an album entry in an artist's `topAlbums`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Song {
    #[serde(default, deserialize_with = "lenient_option")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub title: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_option")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub year: Option<Scalar>,
    #[serde(rename = "releaseDate", default, deserialize_with = "lenient_option")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub duration: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub label: Option<String>,
    #[serde(rename = "explicitContent", default, deserialize_with = "lenient_option")]
    pub explicit_content: Option<Scalar>,
    #[serde(rename = "playCount", default, deserialize_with = "lenient_option")]
    pub play_count: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub language: Option<String>,
    #[serde(rename = "hasLyrics", default, deserialize_with = "lenient_option")]
    pub has_lyrics: Option<Scalar>,
    #[serde(rename = "lyricsId", default, deserialize_with = "lenient_option")]
    pub lyrics_id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub copyright: Option<String>,
    #[serde(default)]
    pub album: Option<AlbumField>,
    #[serde(default)]
    pub artists: Option<ArtistsField>,
    #[serde(default)]
    pub image: Option<ImageField>,
    #[serde(rename = "downloadUrl", default, deserialize_with = "lenient_list")]
    pub download_url: Vec<DownloadLink>,
}

/// `/api/albums` and `/api/playlists` payload.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Collection {
    #[serde(default, deserialize_with = "lenient_option")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub year: Option<Scalar>,
    #[serde(rename = "releaseDate", default, deserialize_with = "lenient_option")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub language: Option<String>,
    #[serde(rename = "songCount", default, deserialize_with = "lenient_option")]
    pub song_count: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub songs: Vec<Song>,
}

/// `/api/artists` payload.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Artist {
    #[serde(default, deserialize_with = "lenient_option")]
    pub id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_option")]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<ImageField>,
    #[serde(rename = "followerCount", default, deserialize_with = "lenient_option")]
    pub follower_count: Option<Scalar>,
    #[serde(rename = "isVerified", default, deserialize_with = "lenient_option")]
    pub is_verified: Option<bool>,
    #[serde(rename = "dominantLanguage", default, deserialize_with = "lenient_option")]
    pub dominant_language: Option<String>,
    #[serde(rename = "dominantType", default, deserialize_with = "lenient_option")]
    pub dominant_type: Option<String>,
    #[serde(rename = "topSongs", default, deserialize_with = "lenient_list")]
    pub top_songs: Vec<Song>,
    #[serde(rename = "topAlbums", default, deserialize_with = "lenient_list")]
    pub top_albums: Vec<Song>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs accept what the fallback service returns.
// ============================================================================
