//! HTTP protocol layer module
//!
//! Wire-level building blocks shared by the freshness evaluator and the
//! reference host: dates, `Cache-Control` directives, entity tags, MIME
//! lookup and response builders.

pub mod date;
pub mod directives;
pub mod etag;
pub mod mime;
pub mod response;

pub use response::{
    build_404_response, build_405_response, build_file_response, build_halt_response,
    build_options_response,
};
