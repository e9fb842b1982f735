//! Shape-tolerant field types shared by both sources.
//!
//! Catalog payloads encode the same field several ways (an image may be a
//! URL string, a list of variants, or an object; artists may be a list or a
//! role-keyed object). Each field is decoded ONCE here into a tagged union,
//! and `normalize` matches over the tag.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};

/// A scalar that may arrive as a number, bool, or numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Scalar {
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Scalar::Int(n) => u64::try_from(*n).ok(),
            Scalar::Float(n) if *n >= 0.0 => Some(*n as u64),
            Scalar::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Scalar::Int(n) => i32::try_from(*n).ok(),
            Scalar::Float(n) => Some(*n as i32),
            Scalar::Text(s) => s.trim().parse().ok(),
            Scalar::Bool(_) => None,
        }
    }

    /// `true`, `"true"`, `"1"` and non-zero numbers are truthy.
    pub fn as_bool(&self) -> bool {
        match self {
            Scalar::Bool(b) => *b,
            Scalar::Int(n) => *n != 0,
            Scalar::Float(n) => *n != 0.0,
            Scalar::Text(s) => matches!(s.trim(), "true" | "1"),
        }
    }

    /// Non-empty text form.
    pub fn non_empty(&self) -> Option<String> {
        let text = self.as_text();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// One entry of an image list.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ImageVariant {
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

/// Image field as any source encodes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ImageField {
    Url(String),
    /// Ordered low-to-high resolution
    Variants(Vec<ImageVariant>),
    Object(ImageVariant),
    Unknown(IgnoredAny),
}

/// A single artist as listed by either source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtistEntry {
    #[serde(default)]
    pub id: Option<Scalar>,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// An item of an artist list; lists sometimes hold bare names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArtistItem {
    Entry(ArtistEntry),
    Name(String),
    Unknown(IgnoredAny),
}

/// Artists grouped by role.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct RoleKeyedArtists {
    #[serde(default, alias = "primary")]
    pub primary_artists: Option<Vec<ArtistItem>>,
    #[serde(default)]
    pub all: Option<Vec<ArtistItem>>,
}

/// Artist field as any source encodes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArtistsField {
    List(Vec<ArtistItem>),
    Single(ArtistEntry),
    RoleKeyed(RoleKeyedArtists),
    Unknown(IgnoredAny),
}

/// Album reference object.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct AlbumObject {
    #[serde(default)]
    pub id: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

/// Album field as any source encodes it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AlbumField {
    Name(String),
    Object(AlbumObject),
    Unknown(IgnoredAny),
}

/// Decode a list that may be absent, `""`, `null` or an array, skipping
/// items that don't fit `T`.
pub fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(items)) = value else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Skipping malformed list item: {}", e);
                None
            }
        })
        .collect())
}

/// Like [`lenient_list`], but a lone object counts as a one-item list.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let items = match value {
        Some(serde_json::Value::Array(items)) => items,
        Some(object @ serde_json::Value::Object(_)) => vec![object],
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Decode an optional nested object, treating any mismatch as absent.
pub fn lenient_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
