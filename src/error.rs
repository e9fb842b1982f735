//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`TransportError`], [`DownloadError`], [`CatalogError`], [`ConfigError`]),
//! and this module gathers them into one hierarchy for the session layer.
//! The CLI uses `anyhow` on top for convenient propagation.
//!
//! # Example
//!
//! ```ignore
//! use saavn_fetch::error::{Result, ResultExt};
//!
//! fn read_links(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_context(format!("reading {}", path.display()))
//! }
//! ```

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::transport::{DownloadError, TransportError};

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Lookup, validation or download failure from the catalog core
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid user input (bad link, unknown kind)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Catalog(e.into())
    }
}

impl From<DownloadError> for Error {
    fn from(e: DownloadError) -> Self {
        Self::Catalog(e.into())
    }
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }

    /// The catalog error at the root of this one, if any.
    pub fn catalog(&self) -> Option<&CatalogError> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::WithContext { source, .. } => source.catalog(),
            _ => None,
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, CatalogError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Catalog(e).context(ctx))
    }
}
