//! Field-class normalizers.
//!
//! Pure functions, one per field class, applied the same way whichever
//! source produced the value. Only the image mapper looks at the origin:
//! primary-source URL strings are low-res and get upgraded, fallback images
//! are already the highest resolution.

use chrono::{Datelike, NaiveDate};
use smallvec::SmallVec;

use super::domain::{AlbumRef, ArtistCredit, Origin, UNKNOWN};
use super::fields::{AlbumField, ArtistItem, ArtistsField, ImageField, Scalar};

/// Highest-resolution image URL in the field.
pub fn image_url(field: Option<&ImageField>, origin: Origin) -> Option<String> {
    let url = match field? {
        ImageField::Url(url) => match origin {
            Origin::Primary => upgrade_image(url),
            Origin::Fallback => url.clone(),
        },
        ImageField::Variants(variants) => variants.last()?.url.clone()?,
        ImageField::Object(variant) => variant.url.clone()?,
        ImageField::Unknown(_) => return None,
    };
    (!url.trim().is_empty()).then_some(url)
}

/// Swap the 150px thumbnail for the 500px rendition.
pub fn upgrade_image(url: &str) -> String {
    url.replace("150x150", "500x500")
}

/// Ordered artist credits from any artist shape.
pub fn artist_credits(field: Option<&ArtistsField>) -> SmallVec<[ArtistCredit; 4]> {
    let Some(field) = field else {
        return SmallVec::new();
    };

    match field {
        ArtistsField::List(items) => items.iter().filter_map(credit_from_item).collect(),
        ArtistsField::Single(entry) => {
            let mut credits = SmallVec::new();
            credits.push(ArtistCredit {
                id: entry.id.as_ref().and_then(Scalar::non_empty),
                name: decode_entities(&entry.name),
                role: entry.role.clone().unwrap_or_default(),
            });
            credits
        }
        ArtistsField::RoleKeyed(keyed) => keyed
            .primary_artists
            .as_ref()
            .filter(|items| !items.is_empty())
            .or(keyed.all.as_ref())
            .map(|items| items.iter().filter_map(credit_from_item).collect())
            .unwrap_or_default(),
        ArtistsField::Unknown(_) => SmallVec::new(),
    }
}

fn credit_from_item(item: &ArtistItem) -> Option<ArtistCredit> {
    match item {
        ArtistItem::Entry(entry) => Some(ArtistCredit {
            id: entry.id.as_ref().and_then(Scalar::non_empty),
            name: decode_entities(&entry.name),
            role: entry.role.clone().unwrap_or_default(),
        }),
        ArtistItem::Name(name) => Some(ArtistCredit {
            id: None,
            name: decode_entities(name),
            role: String::new(),
        }),
        ArtistItem::Unknown(_) => None,
    }
}

/// The "singers" display line.
///
/// Exact role `singer`, else `primary_artists`, else the first three
/// credited names whatever their role.
pub fn performer_line(artists: &[ArtistCredit]) -> String {
    for role in ["singer", "primary_artists"] {
        let names = names_with_role(artists, role);
        if !names.is_empty() {
            return names;
        }
    }

    artists
        .iter()
        .take(3)
        .filter(|a| !a.name.is_empty())
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn names_with_role(artists: &[ArtistCredit], role: &str) -> String {
    artists
        .iter()
        .filter(|a| a.role == role && !a.name.is_empty())
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Album display name; `"Unknown"` when absent.
pub fn album_name(field: Option<&AlbumField>) -> String {
    let name = match field {
        Some(AlbumField::Name(name)) => Some(name.as_str()),
        Some(AlbumField::Object(object)) => object.name.as_deref(),
        _ => None,
    };
    name.map(decode_entities)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Album reference, with `url_hint` used when the field carries no URL.
pub fn album_ref(
    field: Option<&AlbumField>,
    id_hint: Option<String>,
    url_hint: Option<String>,
) -> AlbumRef {
    let name = album_name(field);
    let (id, url) = match field {
        Some(AlbumField::Object(object)) => (
            object.id.as_ref().and_then(Scalar::non_empty).or(id_hint),
            non_empty(object.url.as_deref()).or(url_hint),
        ),
        _ => (id_hint, url_hint),
    };

    AlbumRef {
        id,
        name: (name != UNKNOWN).then_some(name),
        url,
    }
}

/// Duration in seconds; non-numeric or absent values become 0.
pub fn duration_seconds(value: Option<&Scalar>) -> u32 {
    value
        .and_then(Scalar::as_u64)
        .map(|secs| u32::try_from(secs).unwrap_or(u32::MAX))
        .unwrap_or(0)
}

/// Explicit year, else the year of a `YYYY-MM-DD` release date.
pub fn release_year(year: Option<&Scalar>, release_date: Option<&str>) -> Option<i32> {
    if let Some(year) = year.and_then(Scalar::as_i32).filter(|y| *y > 0) {
        return Some(year);
    }

    let date = release_date?.trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(parsed.year());
    }
    date.get(..4)
        .filter(|prefix| prefix.chars().all(|c| c.is_ascii_digit()))
        .and_then(|prefix| prefix.parse().ok())
}

/// Display title; never empty.
pub fn title(raw: Option<&str>) -> String {
    non_empty(raw).unwrap_or_else(|| UNKNOWN.to_string())
}

/// Trimmed, entity-decoded text, or `None` when blank.
pub fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(decode_entities)
}

/// Decode the handful of HTML entities the catalog embeds in names.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
