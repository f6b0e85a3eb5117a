//! Entity tags
//!
//! Provides `ETag` rendering, content-based generation, and the match
//! function used by `If-None-Match` / `If-Match` evaluation.

use crate::error::Error;
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Validator strength
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum EtagKind {
    /// Byte-for-byte equivalence
    #[default]
    Strong,
    /// Semantic equivalence only
    Weak,
}

impl FromStr for EtagKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strong" => Ok(Self::Strong),
            "weak" => Ok(Self::Weak),
            other => Err(Error::InvalidEtagKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for EtagKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EtagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strong => f.write_str("strong"),
            Self::Weak => f.write_str("weak"),
        }
    }
}

/// A resource version identifier plus its strength
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Etag {
    pub value: String,
    pub kind: EtagKind,
}

impl Etag {
    pub fn new(value: impl Into<String>, kind: EtagKind) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    /// Strong validator from a fast content hash
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        Self::new(format!("{:x}", hasher.finish()), EtagKind::Strong)
    }

    /// Header representation: `"value"` or `W/"value"`
    pub fn to_header_value(&self) -> String {
        match self.kind {
            EtagKind::Strong => format!("\"{}\"", self.value),
            EtagKind::Weak => format!("W/\"{}\"", self.value),
        }
    }
}

impl fmt::Display for Etag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

/// Check a client `If-None-Match` / `If-Match` list against a rendered `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`, which matches any existing representation and therefore
///   never matches a resource that is about to be created
///
/// Comparison is exact string membership, so a weak tag only matches the
/// same weak tag.
pub fn etag_matches(list: &str, etag: &str, new_resource: bool) -> bool {
    if list.trim() == "*" {
        return !new_resource;
    }
    list.split(',').any(|candidate| candidate.trim() == etag)
}
