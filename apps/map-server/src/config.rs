use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::push::stream::DEFAULT_PING_INTERVAL;

/// Map server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to.
    pub host: IpAddr,
    /// Port the HTTP server binds to. `0` picks a free port.
    pub port: u16,
    /// Silence on a subscriber stream before a liveness ping is sent.
    pub ping_interval: Duration,
    /// Allow any origin to subscribe and report views.
    pub cors_any: bool,
}

impl Config {
    /// Load configuration from environment variables. Every variable is
    /// optional; unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: parsed_var("MAP_HOST").unwrap_or(defaults.host),
            port: parsed_var("MAP_PORT").unwrap_or(defaults.port),
            ping_interval: parsed_var("MAP_PING_INTERVAL_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.ping_interval),
            cors_any: parsed_var("MAP_CORS_ANY").unwrap_or(defaults.cors_any),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            ping_interval: DEFAULT_PING_INTERVAL,
            cors_any: true,
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok().filter(|s| !s.is_empty())?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "ignoring unparseable env var");
            None
        }
    }
}
