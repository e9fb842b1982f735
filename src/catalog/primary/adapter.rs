//! Adapter layer: Convert primary DTOs to domain models
//!
//! This is the ONLY place where primary DTO types are converted to domain
//! types. If `api.php` changes its response format, only this file and
//! dto.rs need to change.

use serde::de::DeserializeOwned;

use super::dto;
use crate::catalog::domain::{
    Autocomplete, CanonicalCollection, CanonicalTrack, CatalogKind, CollectionKind, Lyrics,
    Origin, SearchHit, SearchResult,
};
use crate::catalog::fields::Scalar;
use crate::catalog::normalize;
use crate::catalog::pagination;
use crate::transport::TransportError;

/// Decode an accepted body into its DTO.
pub fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, TransportError> {
    serde_json::from_value(body).map_err(|e| TransportError::Decode(e.to_string()))
}

/// Convert a song, album entry or list item to a track.
pub fn to_track(item: &dto::Item) -> CanonicalTrack {
    let more = item.more_info.clone().unwrap_or_default();
    let artist_map = more.artist_map.unwrap_or_default();
    let artists = normalize::artist_credits(
        artist_map
            .artists
            .as_ref()
            .or(artist_map.primary_artists.as_ref()),
    );
    let performers = normalize::performer_line(&artists);

    let id = item
        .id
        .as_ref()
        .and_then(Scalar::non_empty)
        .or_else(|| item.perma_url.as_deref().and_then(last_segment))
        .unwrap_or_default();

    let release_date = normalize::non_empty(more.release_date.as_deref());
    let has_lyrics = more.has_lyrics.as_ref().is_some_and(Scalar::as_bool);
    let music = normalize::non_empty(more.music.as_deref()).or_else(|| {
        let names = artists
            .iter()
            .filter(|a| a.role == "music")
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        (!names.is_empty()).then_some(names)
    });

    CanonicalTrack {
        title: normalize::title(item.title.as_deref().or(item.name.as_deref())),
        subtitle: normalize::non_empty(item.subtitle.as_deref()),
        album: normalize::album_ref(
            more.album.as_ref(),
            more.album_id.as_ref().and_then(Scalar::non_empty),
            normalize::non_empty(more.album_url.as_deref()),
        ),
        image_url: normalize::image_url(item.image.as_ref(), Origin::Primary),
        performers,
        music,
        duration_seconds: normalize::duration_seconds(more.duration.as_ref()),
        language: normalize::non_empty(item.language.as_deref()),
        release_year: normalize::release_year(item.year.as_ref(), release_date.as_deref()),
        release_date,
        perma_url: normalize::non_empty(item.perma_url.as_deref()),
        download_candidates: Vec::new(),
        play_count: item.play_count.as_ref().and_then(Scalar::as_u64),
        has_lyrics,
        // The primary source keys lyrics by song id
        lyrics_id: has_lyrics.then(|| id.clone()),
        encrypted_media_url: normalize::non_empty(more.encrypted_media_url.as_deref()),
        label: normalize::non_empty(more.label.as_deref()),
        copyright: normalize::non_empty(more.copyright_text.as_deref()),
        explicit: item.explicit_content.as_ref().is_some_and(Scalar::as_bool),
        artists,
        id,
        origin: Origin::Primary,
    }
}

/// Convert an accepted album or playlist response.
pub fn to_collection(
    kind: CollectionKind,
    response: dto::CollectionResponse,
    page: u32,
    page_size: u32,
) -> CanonicalCollection {
    let more = response.more_info.clone().unwrap_or_default();

    let raw = [response.list, response.songs, response.top_songs]
        .into_iter()
        .find(|list| !list.is_empty())
        .unwrap_or_default();

    let track_count = response
        .list_count
        .as_ref()
        .and_then(Scalar::as_u64)
        .filter(|n| *n > 0)
        .or_else(|| more.song_count.as_ref().and_then(Scalar::as_u64))
        .unwrap_or(raw.len() as u64)
        .max(raw.len() as u64);

    let tracks = match kind {
        // `p`/`n` already selected the page
        CollectionKind::Playlist => raw
            .iter()
            .take(page_size as usize)
            .map(to_track)
            .collect(),
        CollectionKind::Album => pagination::slice(&raw, page, page_size)
            .iter()
            .map(to_track)
            .collect(),
    };

    let release_date = normalize::non_empty(more.release_date.as_deref());

    CanonicalCollection {
        kind: kind.into(),
        id: response.id.as_ref().and_then(Scalar::non_empty),
        title: normalize::non_empty(response.title.as_deref())
            .unwrap_or_else(|| kind.untitled().to_string()),
        subtitle: normalize::non_empty(response.subtitle.as_deref()),
        image_url: normalize::image_url(response.image.as_ref(), Origin::Primary),
        perma_url: normalize::non_empty(more.album_url.as_deref())
            .or_else(|| normalize::non_empty(response.perma_url.as_deref())),
        track_count,
        tracks,
        follower_count: more.follower_count.as_ref().and_then(Scalar::as_u64),
        release_year: normalize::release_year(response.year.as_ref(), release_date.as_deref()),
        language: normalize::non_empty(response.language.as_deref()),
        is_verified: None,
        origin: Origin::Primary,
    }
}

/// Convert an accepted artist response: top songs followed by top albums.
pub fn to_artist(
    response: dto::ArtistResponse,
    name_hint: Option<&str>,
    page: u32,
    page_size: u32,
) -> CanonicalCollection {
    let mut items = response.top_songs;
    items.extend(response.top_albums);
    let track_count = items.len() as u64;

    let tracks = pagination::slice(&items, page, page_size)
        .iter()
        .map(to_track)
        .collect();

    let perma_url = response
        .urls
        .as_ref()
        .and_then(|urls| normalize::non_empty(urls.songs.as_deref()))
        .or_else(|| normalize::non_empty(response.perma_url.as_deref()));

    CanonicalCollection {
        kind: CatalogKind::Artist,
        id: response.artist_id.as_ref().and_then(Scalar::non_empty),
        title: normalize::title(response.name.as_deref().or(name_hint)),
        subtitle: normalize::non_empty(response.subtitle.as_deref()),
        image_url: normalize::image_url(response.image.as_ref(), Origin::Primary),
        perma_url,
        track_count,
        tracks,
        follower_count: response.follower_count.as_ref().and_then(Scalar::as_u64),
        release_year: None,
        language: normalize::non_empty(response.dominant_language.as_deref()),
        is_verified: response.is_verified.as_ref().map(Scalar::as_bool),
        origin: Origin::Primary,
    }
}

/// Convert a listing entry to a search hit.
pub fn to_hit(item: &dto::Item) -> SearchHit {
    SearchHit {
        id: item
            .id
            .as_ref()
            .and_then(Scalar::non_empty)
            .unwrap_or_default(),
        title: normalize::title(item.title.as_deref().or(item.name.as_deref())),
        subtitle: normalize::non_empty(item.subtitle.as_deref())
            .or_else(|| normalize::non_empty(item.description.as_deref())),
        kind: normalize::non_empty(item.kind.as_deref()),
        image_url: normalize::image_url(item.image.as_ref(), Origin::Primary),
        perma_url: normalize::non_empty(item.perma_url.as_deref()),
        year: normalize::release_year(item.year.as_ref(), None),
        language: normalize::non_empty(item.language.as_deref()),
    }
}

/// Convert a search page, keeping at most `page_size` hits.
pub fn to_search_result(response: dto::SearchResponse, page_size: u32) -> SearchResult {
    SearchResult {
        total: response.total.as_ref().and_then(Scalar::as_u64).unwrap_or(0),
        start: response.start.as_ref().and_then(Scalar::as_u64).unwrap_or(0),
        results: response
            .results
            .iter()
            .take(page_size as usize)
            .map(to_hit)
            .collect(),
    }
}

pub fn to_autocomplete(response: dto::AutocompleteResponse) -> Autocomplete {
    let hits = |section: Option<dto::Section>| -> Vec<SearchHit> {
        section
            .map(|s| s.data.iter().map(to_hit).collect())
            .unwrap_or_default()
    };

    Autocomplete {
        top_query: hits(response.topquery),
        songs: hits(response.songs),
        albums: hits(response.albums),
        artists: hits(response.artists),
        playlists: hits(response.playlists),
    }
}

/// Lyrics with `<br>` breaks turned into newlines; `None` when blank.
pub fn to_lyrics(response: dto::LyricsResponse) -> Option<Lyrics> {
    let text = response.lyrics.filter(|l| !l.trim().is_empty())?;
    let text = text
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<br>", "\n");

    Some(Lyrics {
        text: normalize::decode_entities(&text),
        snippet: normalize::non_empty(response.snippet.as_deref()),
        copyright: normalize::non_empty(response.lyrics_copyright.as_deref()),
    })
}

pub fn to_auth_url(response: dto::AuthTokenResponse) -> Option<String> {
    normalize::non_empty(response.auth_url.as_deref())
}

fn last_segment(url: &str) -> Option<String> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song_item() -> dto::Item {
        decode(json!({
            "id": "5WXAlMNt",
            "title": "Tum Hi Ho",
            "subtitle": "Arijit Singh - Aashiqui 2",
            "perma_url": "https://www.jiosaavn.com/song/tum-hi-ho/EToxUyFpcwQ",
            "image": "https://c.saavncdn.com/430/Aashiqui-2-150x150.jpg",
            "language": "hindi",
            "year": "2013",
            "explicit_content": "0",
            "more_info": {
                "music": "Mithoon",
                "album": "Aashiqui 2",
                "album_id": "1139549",
                "duration": "262",
                "has_lyrics": "true",
                "encrypted_media_url": "enc",
                "artistMap": {
                    "artists": [
                        {"id": "456863", "name": "Mithoon", "role": "music"},
                        {"id": "455130", "name": "Arijit Singh", "role": "singer"}
                    ]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_song_conversion() {
        let track = to_track(&song_item());

        assert_eq!(track.id, "5WXAlMNt");
        assert_eq!(track.title, "Tum Hi Ho");
        assert_eq!(track.album.name.as_deref(), Some("Aashiqui 2"));
        assert_eq!(track.album.id.as_deref(), Some("1139549"));
        assert_eq!(track.performers, "Arijit Singh");
        assert_eq!(track.music.as_deref(), Some("Mithoon"));
        assert_eq!(track.duration_seconds, 262);
        assert_eq!(track.release_year, Some(2013));
        assert!(track.image_url.unwrap().contains("500x500"));
        assert!(track.has_lyrics);
        assert_eq!(track.lyrics_id.as_deref(), Some("5WXAlMNt"));
        assert!(!track.explicit);
        assert_eq!(track.origin, Origin::Primary);
    }

    #[test]
    fn test_sparse_item_gets_placeholders() {
        let track = to_track(&dto::Item::default());
        assert_eq!(track.title, "Unknown");
        assert_eq!(track.album.name, None);
        assert_eq!(track.duration_seconds, 0);
        assert!(track.artists.is_empty());
    }

    #[test]
    fn test_album_slices_full_list() {
        let list: Vec<_> = (1..=45)
            .map(|n| json!({"id": n.to_string(), "title": format!("T{}", n)}))
            .collect();
        let response: dto::CollectionResponse = decode(json!({
            "id": "1",
            "title": "Big Album",
            "list_count": "45",
            "list": list
        }))
        .unwrap();

        let album = to_collection(CollectionKind::Album, response, 2, 20);
        assert_eq!(album.tracks.len(), 20);
        assert_eq!(album.tracks[0].id, "21");
        assert_eq!(album.track_count, 45);
        assert_eq!(album.kind, CatalogKind::Album);
    }

    #[test]
    fn test_short_album_past_last_page_is_empty() {
        let list: Vec<_> = (1..=8).map(|n| json!({"id": n.to_string()})).collect();
        let response: dto::CollectionResponse =
            decode(json!({"title": "Short", "list": list})).unwrap();

        let album = to_collection(CollectionKind::Album, response, 2, 10);
        assert!(album.tracks.is_empty());
        assert_eq!(album.track_count, 8);
        assert!(!album.has_next_page(2, 10));
    }

    #[test]
    fn test_playlist_uses_declared_count() {
        let list: Vec<_> = (21..=40).map(|n| json!({"id": n.to_string()})).collect();
        let response: dto::CollectionResponse = decode(json!({
            "title": "",
            "list_count": "120",
            "list": list
        }))
        .unwrap();

        let playlist = to_collection(CollectionKind::Playlist, response, 2, 20);
        assert_eq!(playlist.tracks.len(), 20);
        assert_eq!(playlist.tracks[0].id, "21");
        assert_eq!(playlist.track_count, 120);
        assert_eq!(playlist.title, "Unknown Playlist");
        assert!(playlist.has_next_page(2, 20));
    }

    #[test]
    fn test_songs_key_used_when_list_empty() {
        let response: dto::CollectionResponse =
            decode(json!({"list": [], "songs": [{"id": "a"}]})).unwrap();
        let album = to_collection(CollectionKind::Album, response, 1, 20);
        assert_eq!(album.tracks.len(), 1);
        assert_eq!(album.track_count, 1);
    }

    #[test]
    fn test_artist_merges_songs_and_albums() {
        let response: dto::ArtistResponse = decode(json!({
            "artistId": "459320",
            "name": "Arijit Singh",
            "follower_count": "100",
            "isVerified": true,
            "topSongs": [{"id": "s1"}, {"id": "s2"}],
            "topAlbums": [{"id": "a1", "type": "album"}]
        }))
        .unwrap();

        let artist = to_artist(response, None, 1, 20);
        assert_eq!(artist.track_count, 3);
        assert_eq!(artist.tracks.len(), 3);
        assert_eq!(artist.tracks[2].id, "a1");
        assert_eq!(artist.title, "Arijit Singh");
        assert_eq!(artist.follower_count, Some(100));
        assert_eq!(artist.is_verified, Some(true));
    }

    #[test]
    fn test_artist_second_page_sliced() {
        let response: dto::ArtistResponse = decode(json!({
            "topSongs": [{"id": "s1"}, {"id": "s2"}, {"id": "s3"}],
            "topAlbums": [{"id": "a1", "type": "album"}]
        }))
        .unwrap();

        let artist = to_artist(response, None, 2, 3);
        assert_eq!(artist.track_count, 4);
        assert_eq!(artist.tracks.len(), 1);
        assert_eq!(artist.tracks[0].id, "a1");
        assert!(to_artist(dto::ArtistResponse::default(), None, 2, 3).tracks.is_empty());
    }

    #[test]
    fn test_artist_name_hint() {
        let artist = to_artist(dto::ArtistResponse::default(), Some("Known Name"), 1, 20);
        assert_eq!(artist.title, "Known Name");
    }

    #[test]
    fn test_search_truncated_to_page_size() {
        let response: dto::SearchResponse = decode(json!({
            "total": "3",
            "start": 1,
            "results": [{"id": "1"}, {"id": "2"}, {"id": "3"}]
        }))
        .unwrap();

        let result = to_search_result(response, 2);
        assert_eq!(result.total, 3);
        assert_eq!(result.results.len(), 2);
    }

    #[test]
    fn test_lyrics_line_breaks() {
        let lyrics = to_lyrics(dto::LyricsResponse {
            lyrics: Some("line one<br>line two<br/>line three".to_string()),
            snippet: None,
            lyrics_copyright: None,
        })
        .unwrap();
        assert_eq!(lyrics.text, "line one\nline two\nline three");
        assert!(to_lyrics(dto::LyricsResponse::default()).is_none());
    }

    #[test]
    fn test_malformed_body_is_decode_error() {
        let result: Result<dto::SearchResponse, _> = decode(json!("not an object"));
        assert!(matches!(result, Err(TransportError::Decode(_))));
    }
}
