// Configuration types module
// Defines all configuration-related data structures

use crate::http::directives::DirectiveSet;
use crate::http::etag::EtagKind;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Per-connection timeout in seconds
    pub request_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    pub access_log: bool,
}

/// Log output format
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Cache defaults, applied in order at startup
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CacheConfig {
    #[serde(default)]
    pub rules: Vec<CacheRule>,
}

/// One `cache_control` registration
#[derive(Debug, Deserialize, Clone)]
pub struct CacheRule {
    /// Route name, or `*` for every route without its own rule
    pub action: String,
    /// Wire form, e.g. `public, max-age=60`
    #[serde(default)]
    pub directives: DirectiveSet,
    #[serde(default)]
    pub keep_existing: bool,
}

/// Static directory route
#[derive(Debug, Deserialize, Clone)]
pub struct RouteConfig {
    /// Action name cache rules refer to
    pub name: String,
    pub prefix: String,
    pub dir: String,
    /// Seconds until expiry; sets `Expires` and `max-age` when present
    #[serde(default)]
    pub expires: Option<u64>,
    #[serde(default)]
    pub etag: EtagKind,
    #[serde(default = "default_last_modified")]
    pub last_modified: bool,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_last_modified() -> bool {
    true
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}
