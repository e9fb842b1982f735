//! Primary catalog HTTP client
//!
//! All calls hit a single `api.php` endpoint. The client does no judging:
//! it hands back the raw body and the service decides whether it is usable.

use std::time::Duration;

use tracing::debug;

use super::request::PrimaryRequest;
use crate::catalog::domain::SourceResponse;
use crate::transport::{HttpTransport, Payload, TransportError};

/// Default catalog host.
pub const DEFAULT_BASE_URL: &str = "https://www.jiosaavn.com";

/// Primary API client
#[derive(Clone)]
pub struct PrimaryClient {
    transport: HttpTransport,
    api_url: String,
}

impl PrimaryClient {
    /// Create a client against `base_url` (scheme and host, no path).
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            transport: HttpTransport::new(timeout, Some(base_url)),
            api_url: format!("{}/api.php", base_url),
        }
    }

    /// Endpoint every call is sent to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue one call. An HTML answer comes back as an empty body.
    pub async fn send(&self, request: &PrimaryRequest) -> Result<SourceResponse, TransportError> {
        let payload = self
            .transport
            .get_json(&self.api_url, &request.params())
            .await?;

        if payload == Payload::ServiceAlive {
            debug!("Primary answered {} with an HTML page", request.describe());
        }

        Ok(SourceResponse::primary(payload.into_json()))
    }
}

impl Default for PrimaryClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(30))
    }
}
