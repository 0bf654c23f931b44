//! Server configuration
//!
//! Configuration is read from the environment with development defaults,
//! so the server runs out of the box with `cargo run`.

use std::net::SocketAddr;
use std::time::Duration;

/// Runtime configuration for the checkout server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,

    /// Simulated processing latency for form submissions and order
    /// placement. Stands in for a network/payment call; set to zero in tests.
    pub submit_latency: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            submit_latency: Duration::from_millis(150),
        }
    }
}

impl Config {
    /// Builds a configuration from `PORT` and `SUBMIT_LATENCY_MS`,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or_else(|| defaults.addr.port());

        let submit_latency = std::env::var("SUBMIT_LATENCY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.submit_latency);

        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            submit_latency,
        }
    }
}
