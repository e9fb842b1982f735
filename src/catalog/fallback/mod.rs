//! Fallback catalog API
//!
//! A structurally different service queried only when the primary answer is
//! judged unusable. Its payloads come pre-paged and with full-resolution
//! images.

pub mod dto;
mod adapter;
mod client;

pub use adapter::{to_artist, to_collection, to_track, to_tracks};
pub use client::{DEFAULT_BASE_URL, FallbackClient, LookupKey};
