//! Catalog core: dual-source lookup and normalization
//!
//! This module provides:
//! - **primary**: the authoritative but unreliable `api.php` source
//! - **fallback**: a structurally different secondary source
//! - **verdict**: rules deciding when a primary answer is unusable
//! - **normalize**: field mappers shared by both sources
//! - **service**: the facade tying them together
//!
//! Callers only ever see the canonical types in `domain`, whichever source
//! produced them.

pub mod domain;
pub mod fallback;
pub mod fields;
pub mod link;
pub mod normalize;
pub mod pagination;
pub mod primary;
pub mod service;
pub mod traits;
pub mod verdict;

pub use domain::{
    AlbumRef, ArtistCredit, Autocomplete, Bitrate, CanonicalCollection, CanonicalTrack,
    CatalogError, CatalogKind, CatalogQuery, CollectionKind, DEFAULT_PAGE_SIZE,
    DownloadCandidate, Lyrics, Origin, ResolvedDownload, SearchHit, SearchKind, SearchResult,
    SourceResponse, UNKNOWN,
};
pub use link::DeepLink;
pub use service::CatalogService;
pub use traits::{FallbackApi, PrimaryApi};
