//! Response freshness negotiation
//!
//! [`Freshness`] shapes one response: it writes `Cache-Control`, `Expires`,
//! `Last-Modified` and `ETag`, and evaluates the request's conditional
//! headers. A failed or satisfied precondition comes back as `Err(Halt)`, so
//! a handler written with `?` stops right there:
//!
//! ```
//! use freshd::freshness::{EtagOptions, Freshness, Halt};
//! use freshd::http::directives::DirectiveSet;
//! use hyper::header::{HeaderValue, CACHE_CONTROL, IF_NONE_MATCH};
//! use hyper::{HeaderMap, Method};
//!
//! fn show(method: &Method, request: &HeaderMap, response: &mut HeaderMap) -> Result<&'static str, Halt> {
//!     let mut fresh = Freshness::new(method, request, response);
//!     fresh.cache_control(&DirectiveSet::new().token("public"))?;
//!     fresh.etag("v1", EtagOptions::default())?;
//!     Ok("full body")
//! }
//!
//! let mut request = HeaderMap::new();
//! request.insert(IF_NONE_MATCH, HeaderValue::from_static("\"v1\""));
//! let mut response = HeaderMap::new();
//!
//! let result = show(&Method::GET, &request, &mut response);
//! assert!(matches!(result, Err(Halt::NotModified)));
//! assert_eq!(response[CACHE_CONTROL], "public");
//! ```

mod outcome;
pub mod policy;

pub use outcome::{ConditionalOutcome, Halt};
pub use policy::{ActionKey, CachePolicy, CachePolicyBuilder};

use crate::error::Error;
use crate::http::date::{format_http_date, parse_http_date};
use crate::http::directives::DirectiveSet;
use crate::http::etag::{etag_matches, Etag, EtagKind};
use chrono::{DateTime, TimeDelta, Utc};
use hyper::header::{
    HeaderName, HeaderValue, CACHE_CONTROL, ETAG, EXPIRES, IF_MATCH, IF_MODIFIED_SINCE,
    IF_NONE_MATCH, IF_UNMODIFIED_SINCE, LAST_MODIFIED,
};
use hyper::{HeaderMap, Method, StatusCode};
use std::time::{Duration, SystemTime};
use tracing::debug;

pub(crate) static NO_DEFAULTS: DirectiveSet = DirectiveSet::new();

/// When a response stops being fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Seconds from now
    In(u64),
    /// Absolute point in time, possibly in the past
    At(DateTime<Utc>),
}

impl From<u64> for Expiry {
    fn from(secs: u64) -> Self {
        Self::In(secs)
    }
}

impl From<u32> for Expiry {
    fn from(secs: u32) -> Self {
        Self::In(u64::from(secs))
    }
}

impl From<Duration> for Expiry {
    fn from(duration: Duration) -> Self {
        Self::In(duration.as_secs())
    }
}

impl From<DateTime<Utc>> for Expiry {
    fn from(time: DateTime<Utc>) -> Self {
        Self::At(time)
    }
}

impl From<SystemTime> for Expiry {
    fn from(time: SystemTime) -> Self {
        Self::At(time.into())
    }
}

/// Options for [`Freshness::etag`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EtagOptions {
    pub kind: EtagKind,
    /// Whether the request may create the resource; `None` means "is it a POST"
    pub new_resource: Option<bool>,
}

impl EtagOptions {
    pub fn weak() -> Self {
        Self {
            kind: EtagKind::Weak,
            new_resource: None,
        }
    }

    #[must_use]
    pub const fn kind(mut self, kind: EtagKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub const fn new_resource(mut self, new_resource: bool) -> Self {
        self.new_resource = Some(new_resource);
        self
    }
}

/// Per-request freshness evaluator
pub struct Freshness<'a> {
    method: &'a Method,
    request: &'a HeaderMap,
    response: &'a mut HeaderMap,
    status: StatusCode,
    defaults: &'a DirectiveSet,
    now: DateTime<Utc>,
}

impl<'a> Freshness<'a> {
    /// Evaluator for a 200 response with no cache defaults, clocked at `Utc::now()`
    pub fn new(method: &'a Method, request: &'a HeaderMap, response: &'a mut HeaderMap) -> Self {
        Self {
            method,
            request,
            response,
            status: StatusCode::OK,
            defaults: &NO_DEFAULTS,
            now: Utc::now(),
        }
    }

    /// Directives every `cache_control` call is layered over
    #[must_use]
    pub fn with_defaults(mut self, defaults: &'a DirectiveSet) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Pin the clock
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Set `Cache-Control` from `directives` layered over the action defaults
    ///
    /// Replaces any previous value. Nothing is written when the result is empty.
    pub fn cache_control(&mut self, directives: &DirectiveSet) -> Result<(), Error> {
        let merged = directives.layered_over(self.defaults);
        if let Some(rendered) = merged.render() {
            let value = header_value(&CACHE_CONTROL, rendered)?;
            self.response.insert(CACHE_CONTROL, value);
        }
        Ok(())
    }

    /// Set `Expires` and fold the matching `max-age` into `Cache-Control`
    ///
    /// A caller-supplied `max-age` is overwritten. An absolute time in the past
    /// yields a negative `max-age`, which is passed through as is.
    pub fn expires(&mut self, amount: impl Into<Expiry>, directives: &DirectiveSet) -> Result<(), Error> {
        let (time, max_age) = match amount.into() {
            Expiry::In(secs) => {
                let secs = i64::try_from(secs).unwrap_or(i64::MAX);
                let time = TimeDelta::try_seconds(secs)
                    .and_then(|delta| self.now.checked_add_signed(delta))
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
                (time, secs)
            }
            Expiry::At(time) => (time, (time - self.now).num_seconds()),
        };

        let expires = header_value(&EXPIRES, format_http_date(&time))?;
        self.cache_control(&directives.clone().value("max_age", max_age))?;
        self.response.insert(EXPIRES, expires);
        Ok(())
    }

    /// Set `Last-Modified` and evaluate the date preconditions
    ///
    /// Comparison is on whole seconds. `If-None-Match` on the request defers
    /// everything to [`Freshness::etag`]. Unparsable request dates are ignored.
    pub fn last_modified(&mut self, time: impl Into<Option<DateTime<Utc>>>) -> Result<(), Halt> {
        let Some(time) = time.into() else {
            return Ok(());
        };

        let value = header_value(&LAST_MODIFIED, format_http_date(&time))?;
        self.response.insert(LAST_MODIFIED, value);

        if self.request.contains_key(IF_NONE_MATCH) {
            return Ok(());
        }

        let modified = time.timestamp();

        if self.status == StatusCode::OK {
            if let Some(since) = self.request_date(&IF_MODIFIED_SINCE) {
                if since.timestamp() >= modified {
                    debug!(last_modified = %time, "If-Modified-Since satisfied, not modified");
                    return Err(Halt::NotModified);
                }
            }
        }

        if self.status.is_success() || self.status == StatusCode::PRECONDITION_FAILED {
            if let Some(since) = self.request_date(&IF_UNMODIFIED_SINCE) {
                if since.timestamp() < modified {
                    debug!(last_modified = %time, "If-Unmodified-Since failed");
                    return Err(Halt::PreconditionFailed);
                }
            }
        }

        Ok(())
    }

    /// Set `ETag` and evaluate `If-None-Match` / `If-Match`
    ///
    /// A matching `If-None-Match` halts with 304 for safe methods and 412 for
    /// the rest. Without `If-None-Match`, a present but unmatched `If-Match`
    /// halts with 412. Preconditions are only checked for 2xx and 304 responses.
    pub fn etag(&mut self, value: &str, options: EtagOptions) -> Result<(), Halt> {
        let new_resource = options
            .new_resource
            .unwrap_or_else(|| *self.method == Method::POST);
        let rendered = Etag::new(value, options.kind).to_header_value();

        let header = header_value(&ETAG, rendered.clone())?;
        self.response.insert(ETAG, header);

        if !(self.status.is_success() || self.status == StatusCode::NOT_MODIFIED) {
            return Ok(());
        }

        if let Some(list) = self.request_list(&IF_NONE_MATCH) {
            if etag_matches(&list, &rendered, new_resource) {
                debug!(etag = %rendered, method = %self.method, "If-None-Match matched");
                return Err(if self.method.is_safe() {
                    Halt::NotModified
                } else {
                    Halt::PreconditionFailed
                });
            }
        } else if let Some(list) = self.request_list(&IF_MATCH) {
            if !etag_matches(&list, &rendered, new_resource) {
                debug!(etag = %rendered, "If-Match did not match");
                return Err(Halt::PreconditionFailed);
            }
        }

        Ok(())
    }

    /// All values of a list header, joined; `None` when absent
    fn request_list(&self, name: &HeaderName) -> Option<String> {
        let values: Vec<String> = self
            .request
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    fn request_date(&self, name: &HeaderName) -> Option<DateTime<Utc>> {
        let raw = self.request.get(name)?;
        let parsed = raw.to_str().ok().and_then(parse_http_date);
        if parsed.is_none() {
            debug!(header = %name, value = ?raw, "ignoring malformed date");
        }
        parsed
    }
}

fn header_value(name: &HeaderName, value: String) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(&value).map_err(|_| Error::InvalidHeaderValue {
        name: name.to_string(),
        value,
    })
}
