// Application state module
// Read-only state shared by every request

use super::types::{Config, RouteConfig};
use crate::freshness::CachePolicy;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; nothing in here changes
/// while requests are being served.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub policy: CachePolicy,
    /// Routes ordered longest prefix first
    routes: Vec<RouteConfig>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let policy = config.cache_policy();
        let mut routes = config.routes.clone();
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self {
            config,
            policy,
            routes,
        }
    }

    /// Longest configured prefix that covers `path`
    pub fn match_route(&self, path: &str) -> Option<&RouteConfig> {
        self.routes
            .iter()
            .find(|route| prefix_matches(&route.prefix, path))
    }
}

/// Prefix match on segment boundaries: `/assets` covers `/assets/x` but not `/assetsx`
fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let config = Config::from_toml_str(
            r#"
[[routes]]
name = "site"
prefix = "/"
dir = "public"

[[routes]]
name = "assets"
prefix = "/assets"
dir = "public/assets"
"#,
        )
        .unwrap();
        AppState::new(config)
    }

    #[test]
    fn test_longest_prefix_wins() {
        let state = state();
        assert_eq!(state.match_route("/assets/app.js").unwrap().name, "assets");
        assert_eq!(state.match_route("/assets").unwrap().name, "assets");
        assert_eq!(state.match_route("/index.html").unwrap().name, "site");
        assert_eq!(state.match_route("/assetsx").unwrap().name, "site");
    }

    #[test]
    fn test_no_routes_no_match() {
        let state = AppState::new(Config::from_toml_str("").unwrap());
        assert!(state.match_route("/").is_none());
    }
}
