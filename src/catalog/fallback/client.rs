//! Fallback catalog HTTP client
//!
//! Every lookup tries the deep link first (`link=`), then the id. Failures
//! are logged and reported as `None`; this client never returns an error.

use std::time::Duration;

use tracing::{debug, error, info};

use super::dto::Envelope;
use crate::catalog::domain::{CollectionKind, SourceResponse};
use crate::transport::HttpTransport;

/// Default fallback host.
pub const DEFAULT_BASE_URL: &str = "https://jiosavanwave.vercel.app";

/// How a lookup identifies its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey<'a> {
    Link(&'a str),
    Id(&'a str),
    /// Songs are looked up by `ids`
    Ids(&'a str),
}

impl LookupKey<'_> {
    fn param(&self) -> (&'static str, String) {
        match self {
            LookupKey::Link(url) => ("link", url.to_string()),
            LookupKey::Id(id) => ("id", id.to_string()),
            LookupKey::Ids(ids) => ("ids", ids.to_string()),
        }
    }
}

/// Fallback API client
#[derive(Clone)]
pub struct FallbackClient {
    transport: HttpTransport,
    base_url: String,
}

impl FallbackClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            transport: HttpTransport::new(timeout, None),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Album or playlist page, `page` 0-based.
    pub async fn get_collection(
        &self,
        kind: CollectionKind,
        id: &str,
        url: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Option<SourceResponse> {
        let endpoint = match kind {
            CollectionKind::Album => "albums",
            CollectionKind::Playlist => "playlists",
        };
        let paging = [("page", page.to_string()), ("limit", limit.to_string())];

        self.lookup(endpoint, url, LookupKey::Id(id), &paging).await
    }

    /// Artist top songs and albums, most popular first.
    pub async fn get_artist(
        &self,
        id: &str,
        page: u32,
        song_count: u32,
        album_count: u32,
        url: Option<&str>,
    ) -> Option<SourceResponse> {
        let extra = [
            ("page", page.to_string()),
            ("songCount", song_count.to_string()),
            ("albumCount", album_count.to_string()),
            ("sortBy", "popularity".to_string()),
            ("sortOrder", "desc".to_string()),
        ];

        self.lookup("artists", url, LookupKey::Id(id), &extra).await
    }

    pub async fn get_song(&self, id: &str, url: Option<&str>) -> Option<SourceResponse> {
        self.lookup("songs", url, LookupKey::Ids(id), &[]).await
    }

    async fn lookup(
        &self,
        endpoint: &str,
        url: Option<&str>,
        key: LookupKey<'_>,
        extra: &[(&'static str, String)],
    ) -> Option<SourceResponse> {
        if let Some(link) = url.filter(|u| !u.is_empty()) {
            if let Some(data) = self.request(endpoint, LookupKey::Link(link), extra).await {
                info!("Fallback {} resolved by link", endpoint);
                return Some(SourceResponse::fallback(data));
            }
            debug!("Fallback {} link lookup failed, trying {:?}", endpoint, key);
        }

        self.request(endpoint, key, extra)
            .await
            .map(SourceResponse::fallback)
    }

    async fn request(
        &self,
        endpoint: &str,
        key: LookupKey<'_>,
        extra: &[(&'static str, String)],
    ) -> Option<serde_json::Value> {
        let url = format!("{}/api/{}", self.base_url, endpoint);
        let mut params = vec![key.param()];
        params.extend(extra.iter().cloned());

        let payload = match self.transport.get_json(&url, &params).await {
            Ok(payload) => payload,
            Err(e) => {
                error!("Fallback request to {} failed: {}", url, e);
                return None;
            }
        };

        let envelope: Envelope = match serde_json::from_value(payload.into_json()) {
            Ok(envelope) => envelope,
            Err(e) => {
                error!("Fallback response from {} is not an envelope: {}", url, e);
                return None;
            }
        };

        let data = envelope.into_data();
        if data.is_none() {
            debug!("Fallback {} reported no data for {:?}", endpoint, key);
        }
        data
    }
}

impl Default for FallbackClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_key_params() {
        assert_eq!(LookupKey::Link("u").param(), ("link", "u".to_string()));
        assert_eq!(LookupKey::Id("1").param(), ("id", "1".to_string()));
        assert_eq!(LookupKey::Ids("2").param(), ("ids", "2".to_string()));
    }

    #[tokio::test]
    async fn test_network_failure_is_none() {
        let client = FallbackClient::new("http://127.0.0.1:9", Duration::from_secs(2));
        assert!(client.get_song("abc", None).await.is_none());
        assert!(
            client
                .get_collection(CollectionKind::Album, "1", Some("https://x/album/a/1"), 0, 20)
                .await
                .is_none()
        );
    }
}
