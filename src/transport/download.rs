//! Streamed binary downloads with retry.
//!
//! Transient failures (connect/timeout/body errors, HTTP 5xx and 429) are
//! retried with exponential backoff. Any other non-2xx status on the signed
//! URL fails immediately.

use std::path::Path;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::DownloadError;
use super::http::BROWSER_USER_AGENT;

/// Write buffer size for audio transfers (4 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Retry schedule for binary transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt; doubles on each further failure
    pub base_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after `attempt` (1-based) failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

enum AttemptError {
    Transient(String),
    Fatal(DownloadError),
}

/// Downloads audio files to disk.
#[derive(Clone)]
pub struct Downloader {
    client: reqwest::Client,
    policy: RetryPolicy,
    chunk_size: usize,
}

impl Downloader {
    /// `timeout` bounds a whole attempt, body included.
    pub fn new(timeout: Duration, policy: RetryPolicy, chunk_size: usize) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://www.jiosaavn.com/"),
        );
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_static("https://www.jiosaavn.com"),
        );

        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default download client: {}", e);
                reqwest::Client::new()
            });

        Self {
            client,
            policy,
            chunk_size: chunk_size.max(8 * 1024),
        }
    }

    /// Stream `url` into `dest`, returning the number of bytes written.
    ///
    /// A partially written file is removed when the download ultimately fails.
    pub async fn download_to(&self, url: &str, dest: &Path) -> Result<u64, DownloadError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(attempt, max_attempts, dest = %dest.display(), "Starting transfer");

            match self.attempt(url, dest).await {
                Ok(bytes) => {
                    info!(bytes, dest = %dest.display(), "Download complete");
                    return Ok(bytes);
                }
                Err(AttemptError::Fatal(e)) => {
                    let _ = tokio::fs::remove_file(dest).await;
                    return Err(e);
                }
                Err(AttemptError::Transient(reason)) => {
                    warn!(attempt, max_attempts, %reason, "Transfer failed");
                    if attempt >= max_attempts {
                        let _ = tokio::fs::remove_file(dest).await;
                        return Err(DownloadError::TransferFailed {
                            attempts: attempt,
                            reason,
                        });
                    }
                    let delay = self.policy.delay_for(attempt);
                    debug!(delay_ms = delay.as_millis() as u64, "Retrying after delay");
                    sleep(delay).await;
                }
            }
        }
    }

    async fn attempt(&self, url: &str, dest: &Path) -> Result<u64, AttemptError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::Transient(format!("HTTP {}", status)));
        }
        if !status.is_success() {
            return Err(AttemptError::Fatal(DownloadError::Rejected {
                status: status.as_u16(),
            }));
        }

        let io_error = |e: std::io::Error| {
            AttemptError::Fatal(DownloadError::Io {
                path: dest.display().to_string(),
                reason: e.to_string(),
            })
        };

        let file = tokio::fs::File::create(dest).await.map_err(io_error)?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);
        let mut written = 0u64;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| AttemptError::Transient(e.to_string()))?
        {
            writer.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }
        writer.flush().await.map_err(io_error)?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fast_policy, ok_response, serve};
    use std::sync::atomic::Ordering;

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        };
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
    }

    #[test]
    fn test_delay_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(15),
        };
        assert_eq!(policy.delay_for(4), Duration::from_secs(15));
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_success_writes_file() {
        let (base, hits) = serve(ok_response("hello audio")).await;
        let url = format!("{}/audio.mp4", base);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("song.mp3");

        let downloader = Downloader::new(Duration::from_secs(5), fast_policy(), DEFAULT_CHUNK_SIZE);
        let bytes = downloader.download_to(&url, &dest).await.unwrap();

        assert_eq!(bytes, 11);
        assert_eq!(std::fs::read(&dest).unwrap(), b"hello audio");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let (url, hits) =
            serve("HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("song.mp3");

        let downloader = Downloader::new(Duration::from_secs(5), fast_policy(), DEFAULT_CHUNK_SIZE);
        let result = downloader.download_to(&url, &dest).await;

        assert_eq!(result, Err(DownloadError::Rejected { status: 403 }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_server_error_retried_until_exhausted() {
        let (url, hits) = serve(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("song.mp3");

        let downloader = Downloader::new(Duration::from_secs(5), fast_policy(), DEFAULT_CHUNK_SIZE);
        let result = downloader.download_to(&url, &dest).await;

        match result {
            Err(DownloadError::TransferFailed { attempts, .. }) => assert_eq!(attempts, 3),
            other => panic!("expected TransferFailed, got {:?}", other),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_transfer_failed_message_names_attempts() {
        let err = DownloadError::TransferFailed {
            attempts: 3,
            reason: "connection reset".to_string(),
        };
        assert!(err.to_string().contains("after 3 attempts"));
        assert_ne!(
            err.to_string(),
            DownloadError::NoAuthUrl("x".to_string()).to_string()
        );
    }
}
