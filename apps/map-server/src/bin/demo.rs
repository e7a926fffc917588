//! Scripted walkthrough of the map commands around San Francisco.
//!
//! Start it, open a page subscribed to `/api/sse`, and watch the map update.

use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use map_server::config::Config;
use map_server::{MapError, MapServer, Options};

/// Turn a `json!` object literal into command options.
fn options(value: serde_json::Value) -> Option<Options> {
    value.as_object().cloned()
}

async fn run_demo(server: &MapServer) -> Result<(), MapError> {
    tracing::info!("setting map title");
    server.set_title("San Francisco Landmarks", options(json!({ "color": "#0066cc" })))?;
    sleep(Duration::from_secs(2)).await;

    tracing::info!("setting map view to San Francisco");
    server.set_view(None, Some([37.7749, -122.4194]), Some(12.0))?;
    sleep(Duration::from_secs(3)).await;

    tracing::info!("adding a marker at Coit Tower");
    server.show_marker(
        [37.8024, -122.4058],
        Some("Coit Tower, San Francisco"),
        options(json!({ "title": "Coit Tower" })),
    )?;
    sleep(Duration::from_secs(3)).await;

    tracing::info!("adding a polygon around Golden Gate Park");
    let golden_gate_park = vec![
        [37.7694, -122.5110],
        [37.7694, -122.4566],
        [37.7646, -122.4566],
        [37.7646, -122.5110],
    ];
    server.show_polygon(
        golden_gate_park,
        options(json!({ "color": "green", "fillOpacity": 0.3 })),
    )?;
    sleep(Duration::from_secs(3)).await;

    tracing::info!("adding a line along Market Street");
    let market_street = vec![
        [37.7944, -122.3953], // Ferry Building
        [37.7932, -122.3967],
        [37.7909, -122.4013],
        [37.7891, -122.4051],
        [37.7865, -122.4113], // Powell Street
        [37.7835, -122.4173],
        [37.7811, -122.4219], // Civic Center
    ];
    server.show_line(
        market_street,
        options(json!({ "color": "red", "weight": 5, "dashArray": "10,15" })),
    )?;
    sleep(Duration::from_secs(3)).await;

    server.set_title(
        "San Francisco Landmarks - Golden Gate Park Area",
        options(json!({ "color": "#006600", "backgroundColor": "rgba(255, 255, 255, 0.9)" })),
    )?;
    sleep(Duration::from_secs(2)).await;

    let view = server.get_current_view();
    tracing::info!(center = ?view.center, zoom = view.zoom, bounds = ?view.bounds, "current map view");
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "map_demo=info,map_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut server = MapServer::new(Config::from_env());
    let addr = match server.start().await {
        Ok(addr) => addr,
        Err(err) => {
            tracing::error!(%err, "failed to start map server");
            std::process::exit(1);
        }
    };
    tracing::info!("map server started; subscribe at http://{addr}/api/sse");

    // Give a browser a moment to connect.
    sleep(Duration::from_secs(5)).await;

    if let Err(err) = run_demo(&server).await {
        tracing::error!(%err, "demo aborted");
    }

    tracing::info!("demo complete; press Ctrl+C to stop");
    let _ = tokio::signal::ctrl_c().await;
    if let Err(err) = server.stop().await {
        tracing::error!(%err, "map server did not stop cleanly");
    }
}
