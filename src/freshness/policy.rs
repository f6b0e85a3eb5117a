//! Per-action default `Cache-Control` directives
//!
//! Built once during startup with [`CachePolicyBuilder`], then shared
//! read-only (typically behind an `Arc`) by every request.

use super::NO_DEFAULTS;
use crate::http::directives::DirectiveSet;
use std::collections::HashMap;

/// Key a default is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKey {
    /// Applies to every action without its own entry
    Any,
    Named(String),
}

impl From<&str> for ActionKey {
    /// `"*"` is the wildcard, anything else names an action
    fn from(value: &str) -> Self {
        if value == "*" {
            Self::Any
        } else {
            Self::Named(value.to_string())
        }
    }
}

impl From<String> for ActionKey {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

/// Immutable action → directives table
#[derive(Debug, Clone, Default)]
pub struct CachePolicy {
    wildcard: Option<DirectiveSet>,
    actions: HashMap<String, DirectiveSet>,
}

impl CachePolicy {
    pub fn builder() -> CachePolicyBuilder {
        CachePolicyBuilder::default()
    }

    /// Defaults for `action`: its own entry, else the wildcard, else empty
    ///
    /// A named entry replaces the wildcard entirely; the two are not merged.
    pub fn for_action(&self, action: &str) -> &DirectiveSet {
        self.actions
            .get(action)
            .or(self.wildcard.as_ref())
            .unwrap_or(&NO_DEFAULTS)
    }

    pub fn is_empty(&self) -> bool {
        self.wildcard.is_none() && self.actions.is_empty()
    }
}

/// Setup-time registry of cache defaults
#[derive(Debug, Default)]
pub struct CachePolicyBuilder {
    policy: CachePolicy,
}

impl CachePolicyBuilder {
    /// Register directives for `action`
    ///
    /// With `keep_existing` the new directives only fill gaps in what is
    /// already registered for the same key; otherwise they replace it.
    #[must_use]
    pub fn cache_control(
        mut self,
        action: impl Into<ActionKey>,
        directives: DirectiveSet,
        keep_existing: bool,
    ) -> Self {
        match action.into() {
            ActionKey::Any => {
                let current = self.policy.wildcard.take();
                self.policy.wildcard = Some(merge(current, directives, keep_existing));
            }
            ActionKey::Named(name) => {
                let current = self.policy.actions.remove(&name);
                let merged = merge(current, directives, keep_existing);
                self.policy.actions.insert(name, merged);
            }
        }
        self
    }

    pub fn build(self) -> CachePolicy {
        self.policy
    }
}

fn merge(existing: Option<DirectiveSet>, incoming: DirectiveSet, keep_existing: bool) -> DirectiveSet {
    match existing {
        Some(mut current) if keep_existing => {
            current.supplement(&incoming);
            current
        }
        _ => incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(wire: &str) -> DirectiveSet {
        wire.parse().unwrap()
    }

    #[test]
    fn test_named_overrides_wildcard() {
        let policy = CachePolicy::builder()
            .cache_control("*", set("public, max-age=60"), false)
            .cache_control("assets", set("public, immutable, max-age=86400"), false)
            .build();
        assert_eq!(
            policy.for_action("assets").to_string(),
            "public, immutable, max-age=86400"
        );
        assert_eq!(policy.for_action("pages").to_string(), "public, max-age=60");
    }

    #[test]
    fn test_missing_everything_is_empty() {
        let policy = CachePolicy::builder().build();
        assert!(policy.is_empty());
        assert!(policy.for_action("anything").is_empty());
    }

    #[test]
    fn test_keep_existing_preserves_original() {
        let policy = CachePolicy::builder()
            .cache_control("show", set("public"), false)
            .cache_control("show", set("private, max-age=5"), true)
            .build();
        assert_eq!(policy.for_action("show").to_string(), "public, max-age=5");
    }

    #[test]
    fn test_without_keep_existing_replaces() {
        let policy = CachePolicy::builder()
            .cache_control("show", set("public"), false)
            .cache_control("show", set("private"), false)
            .build();
        assert_eq!(policy.for_action("show").to_string(), "private");
    }

    #[test]
    fn test_keep_existing_on_empty_slot_registers() {
        let policy = CachePolicy::builder()
            .cache_control("*", set("no-cache"), true)
            .build();
        assert_eq!(policy.for_action("x").to_string(), "no-cache");
    }
}
