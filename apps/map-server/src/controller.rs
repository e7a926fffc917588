//! Host-facing map control surface.
//!
//! A [`MapServer`] owns the HTTP server task and the shared push/view state.
//! Display calls serialize a command once and fan it out to every connected
//! browser tab; they never wait on a slow browser.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mapcast_common::command::{Bounds, LatLng, Options};
use mapcast_common::Command;

use crate::config::Config;
use crate::error::MapError;
use crate::push::fanout::BroadcastReport;
use crate::view::View;
use crate::AppState;

/// How long `stop` waits for in-flight requests before aborting the server.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Build the full router with middleware, wired to `state`.
pub fn build_app(state: AppState) -> Router {
    let mut router = crate::routes::router();
    if state.config.cors_any {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router = router.layer(cors);
    }
    router.layer(TraceLayer::new_for_http()).with_state(state)
}

struct Running {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

/// Local control server for a browser-rendered map.
pub struct MapServer {
    state: AppState,
    running: Option<Running>,
}

impl MapServer {
    pub fn new(config: Config) -> Self {
        Self {
            state: AppState::new(config),
            running: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    /// Number of connected browser tabs.
    pub fn client_count(&self) -> usize {
        self.state.registry.len()
    }

    /// Bind the configured address and serve in a background task.
    pub async fn start(&mut self) -> Result<SocketAddr, MapError> {
        if let Some(running) = &self.running {
            return Err(MapError::AlreadyRunning(running.addr));
        }

        let requested = self.state.config.addr();
        let listener = TcpListener::bind(requested)
            .await
            .map_err(|source| MapError::Bind {
                addr: requested,
                source,
            })?;
        let addr = listener.local_addr().map_err(|source| MapError::Bind {
            addr: requested,
            source,
        })?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = build_app(self.state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!(%addr, "map server started");
        self.running = Some(Running {
            addr,
            shutdown: shutdown_tx,
            handle,
        });
        Ok(addr)
    }

    /// Close every subscriber stream and shut the server down. A no-op when
    /// the server isn't running.
    pub async fn stop(&mut self) -> Result<(), MapError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        tracing::info!(addr = %running.addr, "map server stopping");

        let _ = running.shutdown.send(());
        // Open event streams would otherwise hold graceful shutdown forever.
        let closed = self.state.registry.close_all();
        tracing::debug!(closed, "closed subscriber queues");

        let mut handle = running.handle;
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await {
            Ok(joined) => {
                if let Err(err) = joined? {
                    tracing::error!(%err, "map server error");
                }
            }
            Err(_elapsed) => {
                tracing::warn!("map server did not shut down in time; aborting");
                handle.abort();
            }
        }

        tracing::info!("map server stopped");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Display commands
    // -----------------------------------------------------------------------

    /// Push an arbitrary command to every connected browser.
    pub fn send_command(&self, command: &Command) -> Result<BroadcastReport, MapError> {
        self.state.broadcast.broadcast(command)
    }

    /// Drop a marker at `coordinates`, with optional popup text.
    pub fn show_marker(
        &self,
        coordinates: LatLng,
        text: Option<&str>,
        options: Option<Options>,
    ) -> Result<BroadcastReport, MapError> {
        let command = Command::marker(coordinates, text.map(str::to_string), options);
        self.send_command(&command)
    }

    pub fn show_polygon(
        &self,
        coordinates: Vec<LatLng>,
        options: Option<Options>,
    ) -> Result<BroadcastReport, MapError> {
        self.send_command(&Command::polygon(coordinates, options))
    }

    pub fn show_line(
        &self,
        coordinates: Vec<LatLng>,
        options: Option<Options>,
    ) -> Result<BroadcastReport, MapError> {
        self.send_command(&Command::line(coordinates, options))
    }

    /// Move the map. Only the supplied fields are sent.
    pub fn set_view(
        &self,
        bounds: Option<Bounds>,
        center: Option<LatLng>,
        zoom: Option<f64>,
    ) -> Result<BroadcastReport, MapError> {
        self.send_command(&Command::view(bounds, center, zoom))
    }

    pub fn set_title(
        &self,
        title: &str,
        options: Option<Options>,
    ) -> Result<BroadcastReport, MapError> {
        self.send_command(&Command::title(title, options))
    }

    /// The last view reported by any browser.
    pub fn get_current_view(&self) -> View {
        self.state.view.read()
    }
}
