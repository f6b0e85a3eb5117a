//! HTTP response building module
//!
//! Builders for the handful of responses the reference host produces.
//! Freshness headers collected during evaluation are passed in as a
//! `HeaderMap` and copied onto the response.

use crate::freshness::Halt;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{HeaderMap, Response, StatusCode};

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build the response for a halted request
///
/// 304 carries the freshness headers and no body. 412 keeps the headers too,
/// so the client learns the current validators. A rejected evaluation is a
/// server error and drops them.
pub fn build_halt_response(halt: &Halt, headers: HeaderMap) -> Response<Full<Bytes>> {
    let status = halt.status();
    match halt {
        Halt::NotModified => build(status, headers, None, Bytes::new()),
        Halt::PreconditionFailed => build(
            status,
            headers,
            Some("text/plain"),
            Bytes::from_static(b"412 Precondition Failed"),
        ),
        Halt::Rejected(err) => {
            logger::log_error(&format!("Freshness evaluation rejected: {err}"));
            build(
                status,
                HeaderMap::new(),
                Some("text/plain"),
                Bytes::from_static(b"500 Internal Server Error"),
            )
        }
    }
}

/// Build 200 response for a served file
///
/// `Content-Length` always reflects the full body, even for HEAD.
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    headers: HeaderMap,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };
    let mut response = build(StatusCode::OK, headers, Some(content_type), body);
    response
        .headers_mut()
        .insert(CONTENT_LENGTH, content_length.into());
    response
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build(
        StatusCode::NOT_FOUND,
        HeaderMap::new(),
        Some("text/plain"),
        Bytes::from_static(b"404 Not Found"),
    )
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut response = build(
        StatusCode::METHOD_NOT_ALLOWED,
        HeaderMap::new(),
        Some("text/plain"),
        Bytes::from_static(b"405 Method Not Allowed"),
    );
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    let mut response = build(StatusCode::NO_CONTENT, HeaderMap::new(), None, Bytes::new());
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

fn build(
    status: StatusCode,
    headers: HeaderMap,
    content_type: Option<&str>,
    body: Bytes,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(status);
    if let Some(map) = builder.headers_mut() {
        map.extend(headers);
    }
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(status, &e);
        let mut fallback = Response::new(Full::new(Bytes::new()));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

/// Log response build error
fn log_build_error(status: StatusCode, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use hyper::header::ETAG;

    fn freshness_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ETAG, HeaderValue::from_static("\"abc\""));
        headers
    }

    #[test]
    fn test_not_modified_keeps_headers() {
        let response = build_halt_response(&Halt::NotModified, freshness_headers());
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(response.headers()[ETAG], "\"abc\"");
        assert!(!response.headers().contains_key(CONTENT_TYPE));
    }

    #[test]
    fn test_precondition_failed() {
        let response = build_halt_response(&Halt::PreconditionFailed, freshness_headers());
        assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(response.headers()[ETAG], "\"abc\"");
    }

    #[test]
    fn test_rejected_is_server_error() {
        let halt = Halt::Rejected(Error::InvalidEtagKind("bogus".into()));
        let response = build_halt_response(&halt, freshness_headers());
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.headers().contains_key(ETAG));
    }

    #[test]
    fn test_head_file_response_has_length_but_no_body() {
        let response =
            build_file_response(Bytes::from_static(b"hello"), "text/plain", HeaderMap::new(), true);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_LENGTH], "5");
    }

    #[test]
    fn test_method_responses_advertise_allow() {
        assert_eq!(build_405_response().headers()[ALLOW], ALLOWED_METHODS);
        assert_eq!(build_options_response().status(), StatusCode::NO_CONTENT);
    }
}
