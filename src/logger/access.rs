//! Access log entries
//!
//! One entry per request, carrying the freshness outcome next to the usual
//! request line fields. Rendered as a Common Log Format line for the message
//! and as structured fields for JSON output.

use crate::freshness::ConditionalOutcome;
use chrono::{DateTime, Local};
use hyper::StatusCode;

/// Access log entry containing request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client address, `-` when unknown
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Name of the matched route
    pub route: Option<String>,
    pub status: u16,
    pub body_bytes: usize,
    /// Freshness outcome; `None` when the evaluator did not run or was rejected
    pub outcome: Option<ConditionalOutcome>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: impl Into<String>, method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            remote_addr: remote_addr.into(),
            time: Local::now(),
            method: method.into(),
            path: path.into(),
            route: None,
            status: 200,
            body_bytes: 0,
            outcome: None,
            request_time_us: 0,
        }
    }

    /// Record the final status
    pub fn finish(&mut self, status: StatusCode, body_bytes: usize, request_time_us: u64) {
        self.status = status.as_u16();
        self.body_bytes = body_bytes;
        self.request_time_us = request_time_us;
    }

    pub fn outcome_str(&self) -> &'static str {
        self.outcome.map_or("-", ConditionalOutcome::as_str)
    }

    /// Common Log Format
    /// `$remote_addr - - [$time_local] "$method $path" $status $body_bytes_sent`
    pub fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{} {}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.method,
            self.path,
            self.status,
            self.body_bytes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_line() {
        let mut entry = AccessLogEntry::new("192.168.1.1", "GET", "/assets/app.js");
        entry.finish(StatusCode::OK, 1234, 150);
        let line = entry.common_line();
        assert!(line.starts_with("192.168.1.1 - - ["));
        assert!(line.ends_with("\"GET /assets/app.js\" 200 1234"));
    }

    #[test]
    fn test_outcome_str() {
        let mut entry = AccessLogEntry::new("-", "GET", "/");
        entry.finish(StatusCode::INTERNAL_SERVER_ERROR, 25, 10);
        assert_eq!(entry.outcome, None);
        assert_eq!(entry.outcome_str(), "-");

        entry.outcome = Some(ConditionalOutcome::NotModified);
        entry.finish(StatusCode::NOT_MODIFIED, 0, 10);
        assert_eq!(entry.status, 304);
        assert_eq!(entry.outcome_str(), "not_modified");
    }
}
