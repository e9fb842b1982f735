//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\saavn-fetch\config.toml
//! - macOS: ~/Library/Application Support/saavn-fetch/config.toml
//! - Linux: ~/.config/saavn-fetch/config.toml
//!
//! Every section is optional; missing keys take their defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{Bitrate, DEFAULT_PAGE_SIZE};
use crate::catalog::{fallback, primary};
use crate::name_cache;
use crate::transport::{DEFAULT_CHUNK_SIZE, RetryPolicy};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub primary: SourceConfig,
    pub fallback: SourceConfig,
    pub download: DownloadConfig,
    pub cache: CacheConfig,
    pub paging: PagingConfig,
}

/// Endpoint settings for one catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Scheme and host, no path (empty = built-in host)
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl SourceConfig {
    fn with_host(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Configured host, or `default` when none is set.
    pub fn base_url_or<'a>(&'a self, default: &'a str) -> &'a str {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() { default } else { trimmed }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Audio download settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Where files are written (empty = current directory)
    pub directory: PathBuf,

    /// Preferred bitrate in kbps: 160 or 320
    pub bitrate: u32,

    /// Attempts per file, including the first
    pub max_attempts: u32,

    /// Delay before the first retry; doubles each retry
    pub base_delay_ms: u64,

    /// Upper bound on a single retry delay
    pub max_delay_ms: u64,

    /// Overall timeout for one transfer
    pub timeout_secs: u64,

    /// Write buffer size in bytes
    pub chunk_size: usize,

    /// Most tracks fetched for one album/playlist/artist
    pub collection_cap: usize,
}

impl DownloadConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.base_delay_ms)),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Configured bitrate; unsupported values fall back to the default.
    pub fn bitrate(&self) -> Bitrate {
        self.bitrate.to_string().parse().unwrap_or_else(|_| {
            tracing::warn!(
                "Unsupported bitrate {} in config, using {}",
                self.bitrate,
                Bitrate::default().label()
            );
            Bitrate::default()
        })
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            bitrate: Bitrate::default().kbps(),
            max_attempts: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            timeout_secs: 300,
            chunk_size: DEFAULT_CHUNK_SIZE,
            collection_cap: 50,
        }
    }
}

/// Artist name cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: name_cache::DEFAULT_TTL.as_secs(),
            max_entries: name_cache::DEFAULT_CAPACITY,
        }
    }
}

/// Page sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Tracks per collection page
    pub page_size: u32,

    /// Hits per search page
    pub search_page_size: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_page_size: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary: SourceConfig::with_host(primary::DEFAULT_BASE_URL),
            fallback: SourceConfig::with_host(fallback::DEFAULT_BASE_URL),
            download: DownloadConfig::default(),
            cache: CacheConfig::default(),
            paging: PagingConfig::default(),
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("saavn-fetch"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the standard location
///
/// Returns defaults if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match load_from(&path) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            tracing::error!("{}", e);
            tracing::warn!("Using default configuration");
            Config::default()
        }
    }
}

/// Read and parse a config file
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Save configuration to the standard location
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to `path`
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[primary]"));
        assert!(toml.contains("[fallback]"));
        assert!(toml.contains("[download]"));
        assert!(toml.contains("[cache]"));
        assert!(toml.contains("[paging]"));
    }

    #[test]
    fn test_defaults_match_catalog_hosts() {
        let config = Config::default();
        assert_eq!(config.primary.base_url, "https://www.jiosaavn.com");
        assert_eq!(config.fallback.base_url, "https://jiosavanwave.vercel.app");
        assert_eq!(config.download.collection_cap, 50);
        assert_eq!(config.download.retry_policy().max_attempts, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[download]
bitrate = 160
directory = "/music"
"#,
        )
        .unwrap();

        let config = load_from(&path).unwrap();

        // Specified fields are set
        assert_eq!(config.download.bitrate(), Bitrate::Kbps160);
        assert_eq!(config.download.directory, PathBuf::from("/music"));

        // Other fields use defaults
        assert_eq!(config.download.max_attempts, 3);
        assert_eq!(config.paging.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.fallback.base_url, fallback::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_section_without_host_keeps_builtin() {
        let config: Config = toml::from_str("[fallback]\ntimeout_secs = 5\n").unwrap();
        assert_eq!(
            config.fallback.base_url_or(fallback::DEFAULT_BASE_URL),
            fallback::DEFAULT_BASE_URL
        );
        assert_eq!(config.fallback.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_bitrate_falls_back() {
        let config = DownloadConfig {
            bitrate: 128,
            ..DownloadConfig::default()
        };
        assert_eq!(config.bitrate(), Bitrate::Kbps320);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.cache.ttl_secs = 60;
        config.paging.search_page_size = 25;
        save_to(&config, &path).unwrap();

        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[download\nbitrate = ").unwrap();

        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_, _)));
        assert!(err.to_string().contains("config.toml"));
    }
}
