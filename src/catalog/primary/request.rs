//! `api.php` request shapes.
//!
//! Every call goes to the same endpoint; the `__call` parameter picks the
//! operation and the rest of the query string is fixed per call.

use crate::catalog::domain::{Bitrate, CollectionKind, SearchKind};

/// One call against the primary API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryRequest {
    Search {
        query: String,
        kind: SearchKind,
        page: u32,
        page_size: u32,
    },
    Autocomplete {
        query: String,
    },
    Song {
        token: String,
    },
    Collection {
        kind: CollectionKind,
        token: String,
        page: u32,
        page_size: u32,
    },
    /// Asks for `page_size` songs and `page_size` albums
    Artist {
        token: String,
        page: u32,
        page_size: u32,
    },
    Lyrics {
        lyrics_id: String,
    },
    AuthToken {
        encrypted_media_url: String,
        bitrate: Bitrate,
    },
}

impl PrimaryRequest {
    /// The `__call` value.
    pub fn call(&self) -> &'static str {
        match self {
            PrimaryRequest::Search { kind, .. } => kind.call(),
            PrimaryRequest::Autocomplete { .. } => "autocomplete.get",
            PrimaryRequest::Song { .. }
            | PrimaryRequest::Collection { .. }
            | PrimaryRequest::Artist { .. } => "webapi.get",
            PrimaryRequest::Lyrics { .. } => "lyrics.getLyrics",
            PrimaryRequest::AuthToken { .. } => "song.generateAuthToken",
        }
    }

    /// Stable name of the operation, independent of its arguments.
    pub fn route(&self) -> &'static str {
        match self {
            PrimaryRequest::Search { .. } => "search",
            PrimaryRequest::Autocomplete { .. } => "autocomplete",
            PrimaryRequest::Song { .. } => "song",
            PrimaryRequest::Collection { kind, .. } => kind.as_str(),
            PrimaryRequest::Artist { .. } => "artist",
            PrimaryRequest::Lyrics { .. } => "lyrics",
            PrimaryRequest::AuthToken { .. } => "auth_token",
        }
    }

    /// Full query string for this call.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("__call", self.call().to_string())];

        match self {
            PrimaryRequest::Search {
                query,
                page,
                page_size,
                ..
            } => {
                params.push(("p", page.to_string()));
                params.push(("q", query.clone()));
                params.push(("n", page_size.to_string()));
                params.push(("api_version", "4".to_string()));
                params.push(("ctx", "web6dot0".to_string()));
            }
            PrimaryRequest::Autocomplete { query } => {
                params.push(("query", query.clone()));
                params.push(("ctx", "web6dot0".to_string()));
            }
            PrimaryRequest::Song { token } => {
                params.extend(entity_params(token, "song"));
            }
            PrimaryRequest::Collection {
                kind,
                token,
                page,
                page_size,
            } => {
                params.extend(entity_params(token, kind.as_str()));
                params.push(("p", page.to_string()));
                params.push(("n", page_size.to_string()));
            }
            PrimaryRequest::Artist {
                token,
                page,
                page_size,
            } => {
                params.extend(entity_params(token, "artist"));
                params.push(("p", page.to_string()));
                params.push(("n_song", page_size.to_string()));
                params.push(("n_album", page_size.to_string()));
            }
            PrimaryRequest::Lyrics { lyrics_id } => {
                params.push(("lyrics_id", lyrics_id.clone()));
                params.push(("type", "song".to_string()));
                params.push(("includeMetaTags", "0".to_string()));
                params.push(("ctx", "web6dot0".to_string()));
                params.push(("api_version", "4".to_string()));
            }
            PrimaryRequest::AuthToken {
                encrypted_media_url,
                bitrate,
            } => {
                params.push(("url", encrypted_media_url.clone()));
                params.push(("bitrate", bitrate.kbps().to_string()));
                params.push(("api_version", "4".to_string()));
                params.push(("ctx", "wap6dot0".to_string()));
            }
        }

        params.push(("_format", "json".to_string()));
        params.push(("_marker", "0".to_string()));
        params
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            PrimaryRequest::Search { query, kind, .. } => format!("search {} '{}'", kind.as_str(), query),
            PrimaryRequest::Autocomplete { query } => format!("autocomplete '{}'", query),
            PrimaryRequest::Song { token } => format!("song {}", token),
            PrimaryRequest::Collection { kind, token, .. } => format!("{} {}", kind.as_str(), token),
            PrimaryRequest::Artist { token, .. } => format!("artist {}", token),
            PrimaryRequest::Lyrics { lyrics_id } => format!("lyrics {}", lyrics_id),
            PrimaryRequest::AuthToken { .. } => "auth token".to_string(),
        }
    }
}

fn entity_params(token: &str, kind: &str) -> [(&'static str, String); 5] {
    [
        ("token", token.to_string()),
        ("type", kind.to_string()),
        ("includeMetaTags", "0".to_string()),
        ("ctx", "web6dot0".to_string()),
        ("api_version", "4".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_search_params() {
        let params = PrimaryRequest::Search {
            query: "arijit".to_string(),
            kind: SearchKind::Albums,
            page: 2,
            page_size: 10,
        }
        .params();

        assert_eq!(value(&params, "__call"), Some("search.getAlbumResults"));
        assert_eq!(value(&params, "p"), Some("2"));
        assert_eq!(value(&params, "n"), Some("10"));
        assert_eq!(value(&params, "q"), Some("arijit"));
        assert_eq!(value(&params, "_format"), Some("json"));
    }

    #[test]
    fn test_playlist_params() {
        let params = PrimaryRequest::Collection {
            kind: CollectionKind::Playlist,
            token: "abc".to_string(),
            page: 1,
            page_size: 20,
        }
        .params();

        assert_eq!(value(&params, "__call"), Some("webapi.get"));
        assert_eq!(value(&params, "type"), Some("playlist"));
        assert_eq!(value(&params, "token"), Some("abc"));
        assert_eq!(value(&params, "includeMetaTags"), Some("0"));
    }

    #[test]
    fn test_artist_asks_for_songs_and_albums() {
        let params = PrimaryRequest::Artist {
            token: "xyz".to_string(),
            page: 3,
            page_size: 15,
        }
        .params();

        assert_eq!(value(&params, "n_song"), Some("15"));
        assert_eq!(value(&params, "n_album"), Some("15"));
        assert_eq!(value(&params, "p"), Some("3"));
        assert_eq!(value(&params, "n"), None);
    }

    #[test]
    fn test_song_has_no_paging() {
        let params = PrimaryRequest::Song {
            token: "s1".to_string(),
        }
        .params();
        assert_eq!(value(&params, "type"), Some("song"));
        assert_eq!(value(&params, "p"), None);
    }

    #[test]
    fn test_auth_token_uses_wap_context() {
        let params = PrimaryRequest::AuthToken {
            encrypted_media_url: "enc".to_string(),
            bitrate: Bitrate::Kbps160,
        }
        .params();
        assert_eq!(value(&params, "ctx"), Some("wap6dot0"));
        assert_eq!(value(&params, "bitrate"), Some("160"));
        assert_eq!(value(&params, "url"), Some("enc"));
    }

    #[test]
    fn test_lyrics_params() {
        let params = PrimaryRequest::Lyrics {
            lyrics_id: "l1".to_string(),
        }
        .params();
        assert_eq!(value(&params, "__call"), Some("lyrics.getLyrics"));
        assert_eq!(value(&params, "type"), Some("song"));
    }
}
