//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method gate, route match,
//! static file dispatch, halt handling and access logging.

use crate::config::AppState;
use crate::freshness::ConditionalOutcome;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{HeaderMap, Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    pub headers: &'a HeaderMap,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();

    let ctx = RequestContext {
        method: &parts.method,
        path: parts.uri.path(),
        headers: &parts.headers,
        is_head: parts.method == Method::HEAD,
    };

    let mut entry = AccessLogEntry::new(
        remote_addr.map_or_else(|| "-".to_string(), |a| a.ip().to_string()),
        parts.method.as_str(),
        ctx.path,
    );

    let response = route_request(&ctx, &state, &mut entry).await;

    if state.config.logging.access_log {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        let elapsed = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        entry.finish(response.status(), body_bytes, elapsed);
        logger::log_access(&entry);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for anything but GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
async fn route_request(
    ctx: &RequestContext<'_>,
    state: &AppState,
    entry: &mut AccessLogEntry,
) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(ctx.method) {
        return resp;
    }

    let Some(route) = state.match_route(ctx.path) else {
        return http::build_404_response();
    };
    entry.route = Some(route.name.clone());

    let defaults = state.policy.for_action(&route.name);
    let mut headers = HeaderMap::new();

    let result = static_files::serve(ctx, route, defaults, &mut headers).await;
    if !matches!(result, Ok(None)) {
        entry.outcome = ConditionalOutcome::from_result(&result);
    }

    match result {
        Ok(Some(file)) => {
            http::build_file_response(file.data, file.content_type, headers, ctx.is_head)
        }
        Ok(None) => http::build_404_response(),
        Err(halt) => http::build_halt_response(&halt, headers),
    }
}
