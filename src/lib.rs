//! HTTP response freshness negotiation
//!
//! [`freshness`] shapes `Cache-Control`, `Expires`, `ETag` and
//! `Last-Modified` on a response and evaluates conditional GET headers,
//! halting with 304 or 412 when a precondition decides the outcome. The
//! remaining modules host it as a small static file server.

pub mod config;
pub mod error;
pub mod freshness;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::{Error, Result};
