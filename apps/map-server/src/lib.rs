pub mod config;
pub mod controller;
pub mod error;
pub mod push;
pub mod routes;
pub mod view;

use std::sync::Arc;

use config::Config;
use push::fanout::Broadcaster;
use push::registry::ClientRegistry;
use view::ViewState;

pub use controller::MapServer;
pub use error::MapError;
pub use mapcast_common::command::{Bounds, LatLng, Options};
pub use mapcast_common::Command;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<ClientRegistry>,
    pub broadcast: Broadcaster,
    pub view: Arc<ViewState>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(ClientRegistry::new());
        Self {
            config: Arc::new(config),
            broadcast: Broadcaster::new(registry.clone()),
            registry,
            view: Arc::new(ViewState::new()),
        }
    }
}
