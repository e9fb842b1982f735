//! Outbound HTTP for both catalog sources.
//!
//! - [`HttpTransport`] issues JSON GET requests and classifies failures
//! - [`Downloader`] streams binary transfers to disk with retry/backoff
//!
//! Neither type holds per-request state, so a single instance can be shared
//! across concurrent calls.

mod download;
mod http;

pub use download::{Downloader, RetryPolicy, DEFAULT_CHUNK_SIZE};
pub use http::{HttpTransport, Payload};

/// Failures talking to a catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Request blocked by JioSaavn. Try again later.")]
    Blocked,

    #[error("JioSaavn API returned invalid response format.")]
    InvalidFormat,

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Failures resolving or transferring audio.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    #[error("Unable to retrieve the download URL for song {0}")]
    NoAuthUrl(String),

    #[error("Failed to download after {attempts} attempts: {reason}")]
    TransferFailed { attempts: u32, reason: String },

    #[error("Download rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("Failed to write {path}: {reason}")]
    Io { path: String, reason: String },
}
