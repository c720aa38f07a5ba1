//! Configuration structures.
//!
//! Configuration is loaded from environment variables and config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier published in the `client` tag of every authored event.
pub const CLIENT: &str = "noscms.pages.dev";

/// Global configuration for the CMS core.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Relay selection.
    #[serde(default)]
    pub relays: RelayConfig,

    /// Query behavior (page size, timeouts).
    #[serde(default)]
    pub query: QueryConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Relay selection.
///
/// Contents live on the basic relays, schemas and site settings on the
/// app-data relays, and published sites are served from the hostr relays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Relays queried for content events.
    pub basic: Vec<String>,

    /// Relays holding application data (schema tables, site settings).
    pub app_data: Vec<String>,

    /// Static-site hosting relays.
    pub hostr: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            basic: vec!["ws://127.0.0.1:7002".to_string()],
            app_data: vec!["ws://127.0.0.1:7002".to_string()],
            hostr: vec!["wss://r.hostr.cc".to_string()],
        }
    }
}

/// Query behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Contents fetched per page.
    pub page_size: usize,

    /// Upper bound on a single relay round-trip.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: 30,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
