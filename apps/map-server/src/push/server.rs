//! Server-sent events endpoint: one subscription stream per browser tab.

use std::convert::Infallible;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use futures_util::stream;
use tokio::sync::mpsc;

use crate::AppState;

use super::stream::{ChannelTransport, SubscriptionStream};

/// Frames buffered between a stream task and its HTTP body.
const TRANSPORT_BUFFER: usize = 16;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sse", get(subscribe))
}

// ---------------------------------------------------------------------------
// GET /api/sse
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/sse",
    tag = "Push",
    responses(
        (status = 200, description = "Stream of `data: <json>` events: one `connected`, then commands and pings", content_type = "text/event-stream", body = String),
    ),
)]
pub async fn subscribe(State(state): State<AppState>) -> Response {
    // Registered before the response goes out, so a broadcast issued right
    // after the connected frame arrives is never missed.
    let subscription =
        SubscriptionStream::connect(state.registry.clone(), state.config.ping_interval);

    let (tx, rx) = mpsc::channel::<String>(TRANSPORT_BUFFER);
    tokio::spawn(async move {
        let mut transport = ChannelTransport::new(tx);
        subscription.run(&mut transport).await;
    });

    let body = stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(body),
    )
        .into_response()
}
