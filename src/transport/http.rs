//! JSON GET transport.
//!
//! The primary API sometimes answers with an HTML page instead of JSON. That
//! page means "service alive, nothing for you" and is surfaced as
//! [`Payload::ServiceAlive`] rather than an error.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::debug;

use super::TransportError;

/// Browser-like user agent; the catalog rejects obvious bots.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Decoded body of a successful GET.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    /// The endpoint answered with an HTML page.
    ServiceAlive,
}

impl Payload {
    /// The JSON body, or an empty object for the HTML sentinel.
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Payload::Json(value) => value,
            Payload::ServiceAlive => serde_json::Value::Object(Default::default()),
        }
    }
}

/// Thin wrapper over a configured `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with catalog-friendly default headers.
    pub fn new(timeout: Duration, referer: Option<&str>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        if let Some(referer) = referer.and_then(|r| HeaderValue::from_str(r).ok()) {
            headers.insert(header::REFERER, referer);
        }

        let client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self { client }
    }

    /// GET `url` with query parameters and decode the body.
    pub async fn get_json(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<Payload, TransportError> {
        debug!(url, ?params, "GET");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| TransportError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await.map_err(|e| TransportError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        decode_body(&text)
    }
}

/// Content-sniff a response body.
pub fn decode_body(text: &str) -> Result<Payload, TransportError> {
    if is_html(text) {
        return Ok(Payload::ServiceAlive);
    }

    match serde_json::from_str(text) {
        Ok(value) => Ok(Payload::Json(value)),
        Err(_) => {
            let lower = text.to_lowercase();
            if lower.contains("blocked") || lower.contains("forbidden") {
                Err(TransportError::Blocked)
            } else {
                let preview: String = text.chars().take(200).collect();
                debug!("Non-JSON response: {}...", preview);
                Err(TransportError::InvalidFormat)
            }
        }
    }
}

/// True when the body looks like an HTML document.
pub fn is_html(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<!doctype") || trimmed.starts_with("<html")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_is_service_alive() {
        let body = "  <!DOCTYPE html><html><body>ok</body></html>";
        assert_eq!(decode_body(body).unwrap(), Payload::ServiceAlive);
        assert_eq!(decode_body("<html></html>").unwrap(), Payload::ServiceAlive);
    }

    #[test]
    fn test_json_body() {
        let payload = decode_body(r#"{"songs": []}"#).unwrap();
        match payload {
            Payload::Json(value) => assert!(value["songs"].is_array()),
            Payload::ServiceAlive => panic!("expected JSON"),
        }
    }

    #[test]
    fn test_blocked_body_distinct_from_invalid() {
        assert_eq!(
            decode_body("Access Forbidden by policy"),
            Err(TransportError::Blocked)
        );
        assert_eq!(decode_body("your request was BLOCKED"), Err(TransportError::Blocked));
        assert_eq!(decode_body("garbage {"), Err(TransportError::InvalidFormat));
    }

    #[test]
    fn test_error_messages_differ() {
        assert_ne!(
            TransportError::Blocked.to_string(),
            TransportError::InvalidFormat.to_string()
        );
    }

    #[test]
    fn test_service_alive_into_json_is_empty_object() {
        let value = Payload::ServiceAlive.into_json();
        assert!(value.as_object().is_some_and(|o| o.is_empty()));
    }
}
