//! Error types
//!
//! A single error enum shared by the freshness evaluator and the reference host.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `ETag` kind other than `strong` or `weak`
    #[error("invalid ETag kind '{0}': strong or weak expected")]
    InvalidEtagKind(String),

    /// A rendered value cannot be carried in an HTTP header
    #[error("invalid value for header {name}: {value:?}")]
    InvalidHeaderValue { name: String, value: String },

    /// Malformed `Cache-Control` directive text
    #[error("invalid cache directive '{0}'")]
    InvalidDirective(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A setting that deserialized but cannot be used
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
