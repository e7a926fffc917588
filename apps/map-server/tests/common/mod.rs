#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use tokio::time;

use map_server::config::Config;
use map_server::{AppState, MapServer};

/// Config bound to a free local port.
pub fn test_config(ping_interval: Duration) -> Config {
    Config {
        port: 0,
        ping_interval,
        ..Config::default()
    }
}

/// Build the full application router wired to a fresh state.
pub fn test_app() -> (axum::Router, AppState) {
    let state = AppState::new(test_config(Duration::from_secs(30)));
    let app = map_server::controller::build_app(state.clone());
    (app, state)
}

/// Start a real server on a free port.
pub async fn start_server(ping_interval: Duration) -> (MapServer, SocketAddr) {
    let mut server = MapServer::new(test_config(ping_interval));
    let addr = server.start().await.expect("start map server");
    (server, addr)
}

/// Poll `check` until it holds or five seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = time::Instant::now() + Duration::from_secs(5);
    while time::Instant::now() < deadline {
        if check() {
            return true;
        }
        time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

/// Minimal event-stream reader over a live `/api/sse` response.
pub struct SseClient {
    stream: BoxStream<'static, reqwest::Result<Bytes>>,
    buf: String,
}

impl SseClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let resp = reqwest::get(format!("http://{addr}/api/sse"))
            .await
            .expect("sse request");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/event-stream"), "{content_type}");

        Self {
            stream: resp.bytes_stream().boxed(),
            buf: String::new(),
        }
    }

    /// Next raw `data:` payload, or `None` once the server ends the stream.
    pub async fn next_raw(&mut self) -> Option<String> {
        loop {
            if let Some(end) = self.buf.find("\n\n") {
                let event: String = self.buf.drain(..end + 2).collect();
                let payload = event
                    .trim_end()
                    .strip_prefix("data: ")
                    .unwrap_or_else(|| panic!("unexpected event framing: {event:?}"))
                    .to_string();
                return Some(payload);
            }

            let chunk = time::timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("timeout waiting for event");
            match chunk {
                Some(Ok(bytes)) => self.buf.push_str(std::str::from_utf8(&bytes).expect("utf-8")),
                Some(Err(_)) | None => return None,
            }
        }
    }

    pub async fn next_json(&mut self) -> serde_json::Value {
        let raw = self.next_raw().await.expect("stream ended");
        serde_json::from_str(&raw).expect("parse event payload")
    }

    /// Read the `connected` frame and return the assigned ID.
    pub async fn expect_connected(&mut self) -> u64 {
        let frame = self.next_json().await;
        assert_eq!(frame["type"], "connected", "{frame}");
        frame["id"].as_u64().expect("integer id")
    }
}
