// Configuration module entry point
// Loads layered configuration and turns cache rules into a CachePolicy

mod state;
mod types;

use crate::error::Error;
use crate::freshness::CachePolicy;
use crate::logger;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::net::SocketAddr;

pub use state::AppState;
pub use types::{CacheConfig, CacheRule, Config, LogFormat, LoggingConfig, RouteConfig, ServerConfig};

/// Environment variable prefix, e.g. `FRESHD_SERVER__PORT=9000`
const ENV_PREFIX: &str = "FRESHD";

impl Config {
    /// Load configuration from specified file path (extension optional)
    ///
    /// A missing file is not an error; environment variables and defaults
    /// still apply.
    pub fn load_from(config_path: &str) -> Result<Self, Error> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Parse a TOML document, filling gaps with defaults
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let settings = with_defaults(config::Config::builder())?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Reject values serde accepts but the server cannot run with
    fn validated(self) -> Result<Self, Error> {
        if self.server.workers == Some(0) {
            return Err(Error::InvalidSetting {
                key: "server.workers",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{}:{} ({e})", self.server.host, self.server.port)))
    }

    /// Build the read-only cache policy from the configured rules
    pub fn cache_policy(&self) -> CachePolicy {
        let mut builder = CachePolicy::builder();
        for rule in &self.cache.rules {
            if rule.action != "*" && !self.routes.iter().any(|r| r.name == rule.action) {
                logger::log_warning(&format!(
                    "Cache rule for unknown route '{}' will never apply",
                    rule.action
                ));
            }
            builder = builder.cache_control(rule.action.as_str(), rule.directives.clone(), rule.keep_existing);
        }
        builder.build()
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.request_timeout", 30)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "pretty")?
        .set_default("logging.access_log", true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::etag::EtagKind;

    const SAMPLE: &str = r#"
[server]
port = 9090

[logging]
format = "json"

[[cache.rules]]
action = "*"
directives = "public, max-age=60"

[[cache.rules]]
action = "assets"
directives = "public, immutable"

[[cache.rules]]
action = "assets"
directives = "private, max-age=31536000"
keep_existing = true

[[routes]]
name = "assets"
prefix = "/assets"
dir = "public/assets"
expires = 3600
etag = "weak"

[[routes]]
name = "site"
prefix = "/"
dir = "public"
last_modified = false
"#;

    #[test]
    fn test_defaults_fill_gaps() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.routes.is_empty());
        assert!(config.cache_policy().is_empty());
    }

    #[test]
    fn test_sample_document() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.routes.len(), 2);

        let assets = &config.routes[0];
        assert_eq!(assets.expires, Some(3600));
        assert_eq!(assets.etag, EtagKind::Weak);
        assert!(assets.last_modified);
        assert_eq!(assets.index_files, vec!["index.html", "index.htm"]);

        let site = &config.routes[1];
        assert_eq!(site.etag, EtagKind::Strong);
        assert!(!site.last_modified);
    }

    #[test]
    fn test_cache_rules_become_policy() {
        let policy = Config::from_toml_str(SAMPLE).unwrap().cache_policy();
        assert_eq!(
            policy.for_action("assets").to_string(),
            "public, immutable, max-age=31536000"
        );
        assert_eq!(policy.for_action("site").to_string(), "public, max-age=60");
    }

    #[test]
    fn test_invalid_etag_kind_is_rejected() {
        let doc = r#"
[[routes]]
name = "x"
prefix = "/"
dir = "."
etag = "medium"
"#;
        let err = Config::from_toml_str(doc).unwrap_err();
        assert!(err.to_string().contains("medium"), "unexpected error: {err}");
    }

    #[test]
    fn test_invalid_directive_is_rejected() {
        let doc = r#"
[[cache.rules]]
action = "*"
directives = "max age=5"
"#;
        assert!(Config::from_toml_str(doc).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = Config::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.socket_addr().unwrap().port(), 9090);

        let bad = Config::from_toml_str("[server]\nhost = \"not a host\"").unwrap();
        assert!(matches!(bad.socket_addr(), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let err = Config::from_toml_str("[server]\nworkers = 0").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting { key: "server.workers", .. }
        ));

        let config = Config::from_toml_str("[server]\nworkers = 2").unwrap();
        assert_eq!(config.server.workers, Some(2));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freshd.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.cache.rules.len(), 3);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("freshd.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        std::env::set_var("FRESHD_SERVER__PORT", "9999");
        let loaded = Config::load_from(path.to_str().unwrap());
        std::env::remove_var("FRESHD_SERVER__PORT");

        let config = loaded.unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.routes.len(), 2);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");

        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert!(config.routes.is_empty());
        assert!(config.logging.access_log);
    }
}
