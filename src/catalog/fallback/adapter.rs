//! Adapter layer: Convert fallback DTOs to domain models
//!
//! This is the ONLY place where fallback DTO types are converted to domain
//! types. Fallback payloads arrive already paged, so nothing here slices.

use super::dto;
use crate::catalog::domain::{
    CanonicalCollection, CanonicalTrack, CatalogKind, CollectionKind, DownloadCandidate, Origin,
};
use crate::catalog::fields::Scalar;
use crate::catalog::normalize;
use crate::transport::TransportError;

const WEB_ROOT: &str = "https://www.jiosaavn.com";

pub fn to_track(song: &dto::Song) -> CanonicalTrack {
    let artists = normalize::artist_credits(song.artists.as_ref());
    let performers = normalize::performer_line(&artists);
    let id = song
        .id
        .as_ref()
        .and_then(Scalar::non_empty)
        .unwrap_or_default();
    let has_lyrics = song.has_lyrics.as_ref().is_some_and(Scalar::as_bool);
    let release_date = normalize::non_empty(song.release_date.as_deref());
    let music = {
        let names = artists
            .iter()
            .filter(|a| a.role == "music")
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        (!names.is_empty()).then_some(names)
    };

    let download_candidates = song
        .download_url
        .iter()
        .filter_map(|link| {
            let url = normalize::non_empty(link.url.as_deref())?;
            Some(DownloadCandidate {
                bitrate_label: link.quality.clone().unwrap_or_default(),
                url,
            })
        })
        .collect();

    CanonicalTrack {
        title: normalize::title(song.name.as_deref().or(song.title.as_deref())),
        subtitle: (!performers.is_empty()).then(|| performers.clone()),
        album: normalize::album_ref(song.album.as_ref(), None, None),
        image_url: normalize::image_url(song.image.as_ref(), Origin::Fallback),
        performers,
        music,
        duration_seconds: normalize::duration_seconds(song.duration.as_ref()),
        language: normalize::non_empty(song.language.as_deref()),
        release_year: normalize::release_year(song.year.as_ref(), release_date.as_deref()),
        release_date,
        perma_url: normalize::non_empty(song.url.as_deref()),
        download_candidates,
        play_count: song.play_count.as_ref().and_then(Scalar::as_u64),
        has_lyrics,
        lyrics_id: song
            .lyrics_id
            .as_ref()
            .and_then(Scalar::non_empty)
            .or_else(|| has_lyrics.then(|| id.clone())),
        encrypted_media_url: None,
        label: normalize::non_empty(song.label.as_deref()),
        copyright: normalize::non_empty(song.copyright.as_deref()),
        explicit: song.explicit_content.as_ref().is_some_and(Scalar::as_bool),
        artists,
        id,
        origin: Origin::Fallback,
    }
}

/// Songs from a `/api/songs` payload, which is a list or a single object.
pub fn to_tracks(data: serde_json::Value) -> Result<Vec<CanonicalTrack>, TransportError> {
    let items = match data {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    let songs = items
        .into_iter()
        .map(serde_json::from_value::<dto::Song>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TransportError::Decode(e.to_string()))?;

    Ok(songs.iter().map(to_track).collect())
}

/// Convert an album or playlist payload. `token` is the id the lookup used.
pub fn to_collection(
    kind: CollectionKind,
    data: serde_json::Value,
    token: &str,
) -> Result<CanonicalCollection, TransportError> {
    let collection: dto::Collection = decode(data)?;
    let tracks: Vec<CanonicalTrack> = collection.songs.iter().map(to_track).collect();

    let track_count = collection
        .song_count
        .as_ref()
        .and_then(Scalar::as_u64)
        .unwrap_or(tracks.len() as u64);

    Ok(CanonicalCollection {
        kind: kind.into(),
        id: collection
            .id
            .as_ref()
            .and_then(Scalar::non_empty)
            .or_else(|| Some(token.to_string())),
        title: normalize::non_empty(collection.name.as_deref())
            .unwrap_or_else(|| kind.untitled().to_string()),
        subtitle: normalize::non_empty(collection.description.as_deref()),
        image_url: normalize::image_url(collection.image.as_ref(), Origin::Fallback),
        perma_url: normalize::non_empty(collection.url.as_deref())
            .or_else(|| Some(format!("{}/{}/{}", WEB_ROOT, kind.web_segment(), token))),
        track_count,
        tracks,
        follower_count: None,
        release_year: normalize::release_year(
            collection.year.as_ref(),
            collection.release_date.as_deref(),
        ),
        language: normalize::non_empty(collection.language.as_deref()),
        is_verified: None,
        origin: Origin::Fallback,
    })
}

/// Convert an artist payload: top songs followed by top albums.
pub fn to_artist(
    data: serde_json::Value,
    token: &str,
    name_hint: Option<&str>,
) -> Result<CanonicalCollection, TransportError> {
    let artist: dto::Artist = decode(data)?;
    let tracks: Vec<CanonicalTrack> = artist
        .top_songs
        .iter()
        .chain(artist.top_albums.iter())
        .map(to_track)
        .collect();

    let title = normalize::title(artist.name.as_deref().or(name_hint));
    let perma_url = normalize::non_empty(artist.url.as_deref()).or_else(|| {
        let slug = title.to_lowercase().replace(' ', "-");
        Some(format!("{}/artist/{}-songs/", WEB_ROOT, slug))
    });

    Ok(CanonicalCollection {
        kind: CatalogKind::Artist,
        id: artist
            .id
            .as_ref()
            .and_then(Scalar::non_empty)
            .or_else(|| Some(token.to_string())),
        title,
        subtitle: normalize::non_empty(artist.dominant_type.as_deref()),
        image_url: normalize::image_url(artist.image.as_ref(), Origin::Fallback),
        perma_url,
        track_count: tracks.len() as u64,
        tracks,
        follower_count: artist.follower_count.as_ref().and_then(Scalar::as_u64),
        release_year: None,
        language: normalize::non_empty(artist.dominant_language.as_deref()),
        is_verified: artist.is_verified,
        origin: Origin::Fallback,
    })
}

fn decode<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> Result<T, TransportError> {
    serde_json::from_value(data).map_err(|e| TransportError::Decode(e.to_string()))
}
