//! Catalog deep links.
//!
//! `https://www.jiosaavn.com/<kind>/<slug>/<id>`: the last path segment is
//! the id, the first recognised segment is the kind.

use super::domain::{CatalogError, CatalogKind, CatalogQuery};

/// A parsed catalog URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    pub kind: CatalogKind,
    pub id: String,
    /// The URL as supplied, kept as a fallback lookup key
    pub url: String,
}

impl DeepLink {
    /// Query for the first page of this link's target.
    pub fn to_query(&self, page_size: u32) -> CatalogQuery {
        CatalogQuery::new(self.kind, self.id.clone())
            .with_page(1, page_size)
            .with_source_url(self.url.clone())
    }
}

/// Parse a catalog URL.
pub fn parse(url: &str) -> Result<DeepLink, CatalogError> {
    let trimmed = url.trim();
    let invalid = || CatalogError::Validation(format!("Not a catalog link: {}", trimmed));

    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(invalid)?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let mut segments = rest.split('/').filter(|s| !s.is_empty());
    let host = segments.next().ok_or_else(invalid)?;
    if !host.contains('.') {
        return Err(invalid());
    }
    let segments: Vec<&str> = segments.collect();

    let kind = segments
        .iter()
        .find_map(|segment| kind_for(segment))
        .ok_or_else(invalid)?;

    // A bare `/album/` has no id
    if segments.len() < 2 {
        return Err(invalid());
    }
    let last = segments.last().ok_or_else(invalid)?;
    let id = urlencoding::decode(last)
        .map(|id| id.into_owned())
        .unwrap_or_else(|_| last.to_string());

    Ok(DeepLink {
        kind,
        id,
        url: trimmed.to_string(),
    })
}

fn kind_for(segment: &str) -> Option<CatalogKind> {
    match segment {
        "song" => Some(CatalogKind::Song),
        "album" => Some(CatalogKind::Album),
        "featured" | "playlist" => Some(CatalogKind::Playlist),
        "artist" => Some(CatalogKind::Artist),
        _ => None,
    }
}
