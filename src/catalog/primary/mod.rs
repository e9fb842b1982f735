//! Primary catalog API (`api.php`)
//!
//! Authoritative but unreliable: it may answer with an HTML page, an empty
//! list, or `list_count: "0"` for entities it does have. Its responses are
//! judged by `verdict` before they are decoded here.

pub mod dto;
mod adapter;
mod client;
mod request;

pub use adapter::{
    decode, to_artist, to_auth_url, to_autocomplete, to_collection, to_hit, to_lyrics,
    to_search_result, to_track,
};
pub use client::{DEFAULT_BASE_URL, PrimaryClient};
pub use request::PrimaryRequest;
