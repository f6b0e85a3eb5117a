//! Request handler module
//!
//! Responsible for request routing dispatch and static file serving, with
//! freshness negotiation applied to every served file.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
