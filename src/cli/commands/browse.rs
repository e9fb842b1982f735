//! Catalog browsing commands.

use tokio::runtime::Runtime;

use super::fail;
use crate::catalog::{
    Autocomplete, CanonicalCollection, CanonicalTrack, CatalogQuery, SearchHit, SearchKind,
};
use crate::session::{Opened, Session};

/// Search one kind and list the hits
pub fn cmd_search(
    rt: &Runtime,
    session: &Session,
    query: &str,
    kind: SearchKind,
    page: u32,
) -> anyhow::Result<()> {
    let result = rt
        .block_on(session.search(query, kind, page))
        .map_err(fail)?;

    if result.results.is_empty() {
        println!("No {} found for \"{}\"", kind.as_str(), query);
        return Ok(());
    }

    println!(
        "{} {} for \"{}\" (page {}, {} total)",
        result.results.len(),
        kind.as_str(),
        query,
        page,
        result.total
    );
    println!();
    for hit in &result.results {
        print_hit(hit);
    }
    Ok(())
}

/// Top hits across every kind
pub fn cmd_suggest(rt: &Runtime, session: &Session, query: &str) -> anyhow::Result<()> {
    let Autocomplete {
        top_query,
        songs,
        albums,
        artists,
        playlists,
    } = rt.block_on(session.autocomplete(query)).map_err(fail)?;

    for (heading, hits) in [
        ("Top result", top_query),
        ("Songs", songs),
        ("Albums", albums),
        ("Artists", artists),
        ("Playlists", playlists),
    ] {
        if hits.is_empty() {
            continue;
        }
        println!("{}:", heading);
        for hit in &hits {
            print_hit(hit);
        }
        println!();
    }
    Ok(())
}

/// Show one song
pub fn cmd_song(rt: &Runtime, session: &Session, id: &str) -> anyhow::Result<()> {
    let track = rt.block_on(session.song(id)).map_err(fail)?;
    print_track(&track);
    Ok(())
}

/// Show one page of an album, playlist or artist
pub fn cmd_collection(
    rt: &Runtime,
    session: &Session,
    query: &CatalogQuery,
    artist_name: Option<&str>,
) -> anyhow::Result<()> {
    if let (Some(id), Some(name)) = (query.id.as_deref(), artist_name) {
        session.remember_artist(id, name);
    }
    let collection = rt.block_on(session.collection(query)).map_err(fail)?;
    print_collection(&collection, query.page, query.page_size);
    Ok(())
}

/// Show whatever a catalog link points at
pub fn cmd_open(rt: &Runtime, session: &Session, url: &str) -> anyhow::Result<()> {
    match rt.block_on(session.open(url)).map_err(fail)? {
        Opened::Song(track) => print_track(&track),
        Opened::Collection(collection) => {
            print_collection(&collection, 1, session.settings().page_size)
        }
    }
    Ok(())
}

/// Print a song's lyrics
pub fn cmd_lyrics(rt: &Runtime, session: &Session, id: &str) -> anyhow::Result<()> {
    let lyrics = rt.block_on(session.lyrics(id)).map_err(fail)?;
    println!("{}", lyrics.text);
    if let Some(copyright) = lyrics.copyright {
        println!();
        println!("{}", copyright);
    }
    Ok(())
}

fn print_hit(hit: &SearchHit) {
    let mut line = format!("  {}  {}", hit.id, hit.title);
    if let Some(subtitle) = &hit.subtitle {
        line.push_str(&format!(" - {}", subtitle));
    }
    if let Some(year) = hit.year {
        line.push_str(&format!(" ({})", year));
    }
    println!("{}", line);
}

fn print_track(track: &CanonicalTrack) {
    println!("Title:    {}", track.title);
    println!("Artists:  {}", track.performers);
    if let Some(album) = &track.album.name {
        println!("Album:    {}", album);
    }
    if let Some(music) = &track.music {
        println!("Music:    {}", music);
    }
    let lyricists = track.credits_for("lyricist");
    if !lyricists.is_empty() {
        println!("Lyrics by: {}", lyricists);
    }
    println!(
        "Duration: {}:{:02}",
        track.duration_seconds / 60,
        track.duration_seconds % 60
    );
    if let Some(year) = track.release_year {
        println!("Year:     {}", year);
    }
    if let Some(language) = &track.language {
        println!("Language: {}", language);
    }
    if let Some(url) = &track.perma_url {
        println!("Link:     {}", url);
    }
    println!(
        "Lyrics:   {}",
        if track.has_lyrics { "available" } else { "none" }
    );
    println!("Source:   {:?}", track.origin);
}

fn print_collection(collection: &CanonicalCollection, page: u32, page_size: u32) {
    println!("{} ({})", collection.title, collection.kind);
    if let Some(subtitle) = &collection.subtitle {
        println!("{}", subtitle);
    }
    if let Some(followers) = collection.follower_count {
        println!("Followers: {}", followers);
    }
    println!(
        "{} tracks, page {} (source: {:?})",
        collection.track_count, page, collection.origin
    );
    println!();

    for (n, track) in collection.tracks.iter().enumerate() {
        println!(
            "  {:>3}. {} - {}  [{}]",
            n + 1,
            track.title,
            track.performers,
            track.id
        );
    }

    if collection.has_next_page(page, page_size) {
        println!();
        println!("More tracks: --page {}", page + 1);
    }
}
