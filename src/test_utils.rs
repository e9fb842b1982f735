//! Test utilities and fixtures for saavn-fetch tests.
//!
//! Provides a throwaway loopback HTTP server, a fast retry policy, and JSON
//! fixtures shaped like real catalog payloads.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{serve, fast_policy};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (url, hits) = serve(ok_response("abc")).await;
//!     // ... point a Downloader at `url`
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::transport::RetryPolicy;

/// Retry policy with millisecond delays.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
    }
}

/// A complete `200 OK` HTTP/1.1 response carrying `body`.
pub fn ok_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

/// Serve `response` to every connection on a loopback port, counting them.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and the hit counter.
pub async fn serve(response: impl Into<String>) -> (String, Arc<AtomicUsize>) {
    let response: Arc<str> = response.into().into();
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind loopback listener");
    let addr = listener.local_addr().expect("Listener has no address");
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{}", addr), hits)
}

/// Fallback-shaped song with direct download links.
pub fn fallback_song(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "year": "2013",
        "duration": 215,
        "url": format!("https://www.jiosaavn.com/song/{}/{}", name.to_lowercase().replace(' ', "-"), id),
        "album": {"id": "1139549", "name": "Aashiqui 2"},
        "artists": {"primary": [{"id": "459320", "name": "Arijit Singh", "role": "singer"}]},
        "image": [{"quality": "500x500", "url": "https://c.saavncdn.com/x-500x500.jpg"}],
        "downloadUrl": [
            {"quality": "160kbps", "url": format!("https://aac.saavncdn.com/{}_160.mp4", id)},
            {"quality": "320kbps", "url": format!("https://aac.saavncdn.com/{}_320.mp4", id)}
        ]
    })
}

/// Primary-shaped song item.
pub fn primary_song(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "subtitle": "Arijit Singh - Aashiqui 2",
        "type": "song",
        "year": "2013",
        "perma_url": format!("https://www.jiosaavn.com/song/x/{}", id),
        "image": "https://c.saavncdn.com/x-150x150.jpg",
        "more_info": {
            "album": "Aashiqui 2",
            "duration": "215",
            "encrypted_media_url": format!("enc-{}", id),
            "artistMap": {"artists": [{"id": "459320", "name": "Arijit Singh", "role": "singer"}]}
        }
    })
}
