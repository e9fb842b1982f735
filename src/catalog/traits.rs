//! Trait definitions for the two catalog sources.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses `PrimaryClient` and `FallbackClient`, while tests
//! substitute the recording mocks below.

use async_trait::async_trait;

use super::domain::{CollectionKind, SourceResponse};
use super::fallback::FallbackClient;
use super::primary::{PrimaryClient, PrimaryRequest};
use crate::transport::TransportError;

/// The primary source: raw answers, judged by the caller.
#[async_trait]
pub trait PrimaryApi: Send + Sync {
    async fn send(&self, request: &PrimaryRequest) -> Result<SourceResponse, TransportError>;
}

/// The fallback source. `None` means "not available", for any reason.
#[async_trait]
pub trait FallbackApi: Send + Sync {
    /// Album or playlist; `page` is 0-based.
    async fn get_collection(
        &self,
        kind: CollectionKind,
        id: &str,
        url: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Option<SourceResponse>;

    async fn get_artist(
        &self,
        id: &str,
        page: u32,
        song_count: u32,
        album_count: u32,
        url: Option<&str>,
    ) -> Option<SourceResponse>;

    async fn get_song(&self, id: &str, url: Option<&str>) -> Option<SourceResponse>;
}

// Implement traits for real clients

#[async_trait]
impl PrimaryApi for PrimaryClient {
    async fn send(&self, request: &PrimaryRequest) -> Result<SourceResponse, TransportError> {
        PrimaryClient::send(self, request).await
    }
}

#[async_trait]
impl FallbackApi for FallbackClient {
    async fn get_collection(
        &self,
        kind: CollectionKind,
        id: &str,
        url: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Option<SourceResponse> {
        FallbackClient::get_collection(self, kind, id, url, page, limit).await
    }

    async fn get_artist(
        &self,
        id: &str,
        page: u32,
        song_count: u32,
        album_count: u32,
        url: Option<&str>,
    ) -> Option<SourceResponse> {
        FallbackClient::get_artist(self, id, page, song_count, album_count, url).await
    }

    async fn get_song(&self, id: &str, url: Option<&str>) -> Option<SourceResponse> {
        FallbackClient::get_song(self, id, url).await
    }
}

/// Recording mocks for service tests.
#[cfg(test)]
pub mod mocks {
    use std::collections::HashMap;

    use parking_lot::Mutex;
    use serde_json::Value;

    use super::*;

    /// Mock primary source answering per route (`song`, `album`, `search`, ...).
    #[derive(Default)]
    pub struct MockPrimary {
        responses: HashMap<&'static str, Result<Value, TransportError>>,
        /// Every request received, in order
        pub requests: Mutex<Vec<PrimaryRequest>>,
    }

    impl MockPrimary {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer `route` with `body`.
        pub fn with(mut self, route: &'static str, body: Value) -> Self {
            self.responses.insert(route, Ok(body));
            self
        }

        /// Fail `route` with a transport error.
        pub fn failing(mut self, route: &'static str, error: TransportError) -> Self {
            self.responses.insert(route, Err(error));
            self
        }

        pub fn routes(&self) -> Vec<&'static str> {
            self.requests.lock().iter().map(PrimaryRequest::route).collect()
        }
    }

    #[async_trait]
    impl PrimaryApi for MockPrimary {
        async fn send(&self, request: &PrimaryRequest) -> Result<SourceResponse, TransportError> {
            self.requests.lock().push(request.clone());
            match self.responses.get(request.route()) {
                Some(Ok(body)) => Ok(SourceResponse::primary(body.clone())),
                Some(Err(e)) => Err(e.clone()),
                // Unconfigured routes behave like the HTML sentinel
                None => Ok(SourceResponse::primary(Value::Object(Default::default()))),
            }
        }
    }

    /// One recorded fallback call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FallbackCall {
        pub endpoint: &'static str,
        pub id: String,
        pub url: Option<String>,
        pub page: u32,
        pub limit: u32,
    }

    /// Mock fallback source; `None` payloads mean "unsuccessful".
    #[derive(Default)]
    pub struct MockFallback {
        pub collection: Option<Value>,
        pub artist: Option<Value>,
        pub song: Option<Value>,
        pub calls: Mutex<Vec<FallbackCall>>,
    }

    impl MockFallback {
        /// A fallback that never has anything.
        pub fn unavailable() -> Self {
            Self::default()
        }

        pub fn with_collection(data: Value) -> Self {
            Self {
                collection: Some(data),
                ..Self::default()
            }
        }

        pub fn with_artist(data: Value) -> Self {
            Self {
                artist: Some(data),
                ..Self::default()
            }
        }

        pub fn with_song(data: Value) -> Self {
            Self {
                song: Some(data),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<FallbackCall> {
            self.calls.lock().clone()
        }

        fn record(&self, endpoint: &'static str, id: &str, url: Option<&str>, page: u32, limit: u32) {
            self.calls.lock().push(FallbackCall {
                endpoint,
                id: id.to_string(),
                url: url.map(str::to_string),
                page,
                limit,
            });
        }
    }

    #[async_trait]
    impl FallbackApi for MockFallback {
        async fn get_collection(
            &self,
            kind: CollectionKind,
            id: &str,
            url: Option<&str>,
            page: u32,
            limit: u32,
        ) -> Option<SourceResponse> {
            self.record(kind.as_str(), id, url, page, limit);
            self.collection.clone().map(SourceResponse::fallback)
        }

        async fn get_artist(
            &self,
            id: &str,
            page: u32,
            song_count: u32,
            _album_count: u32,
            url: Option<&str>,
        ) -> Option<SourceResponse> {
            self.record("artist", id, url, page, song_count);
            self.artist.clone().map(SourceResponse::fallback)
        }

        async fn get_song(&self, id: &str, url: Option<&str>) -> Option<SourceResponse> {
            self.record("song", id, url, 0, 0);
            self.song.clone().map(SourceResponse::fallback)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use serde_json::json;

        #[tokio::test]
        async fn test_mock_primary_records_routes() {
            let mock = MockPrimary::new().with("song", json!({"songs": []}));
            let response = mock
                .send(&PrimaryRequest::Song {
                    token: "x".to_string(),
                })
                .await
                .unwrap();
            assert_eq!(response.body, json!({"songs": []}));
            assert_eq!(mock.routes(), vec!["song"]);
        }

        #[tokio::test]
        async fn test_mock_primary_error() {
            let mock = MockPrimary::new().failing("lyrics", TransportError::Blocked);
            let result = mock
                .send(&PrimaryRequest::Lyrics {
                    lyrics_id: "l".to_string(),
                })
                .await;
            assert_eq!(result, Err(TransportError::Blocked));
        }

        #[tokio::test]
        async fn test_mock_fallback_records_calls() {
            let mock = MockFallback::unavailable();
            assert!(mock.get_song("abc", None).await.is_none());
            assert_eq!(mock.calls()[0].endpoint, "song");
            assert_eq!(mock.calls()[0].id, "abc");
        }
    }
}
