use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use map_server::config::Config;
use map_server::MapServer;

#[tokio::main]
async fn main() {
    // Load .env if present; the environment may already be set externally.
    if dotenvy::dotenv().is_err() {
        let env_path = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(env_path);
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        ping_interval_secs = config.ping_interval.as_secs(),
        cors_any = config.cors_any,
        "map-server configured"
    );

    let mut server = MapServer::new(config);
    let addr = match server.start().await {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(%err, "map-server failed to start");
            std::process::exit(1);
        }
    };
    tracing::info!(%addr, "map-server listening; press Ctrl+C to stop");

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for Ctrl+C");
    }

    if let Err(err) = server.stop().await {
        tracing::error!(%err, "map-server did not stop cleanly");
    }
}
