//! Request handler module
//!
//! Entry point for HTTP request processing: method gate, header extraction,
//! pipeline invocation, and error mapping. Everything protocol-heavy lives
//! in the serve pipeline; this module is the glue around it.

use crate::config::Config;
use crate::http::{self, Body};
use crate::logger;
use crate::serve::{self, RequestContext, ResolveError};
use hyper::body::Incoming;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    config: Arc<Config>,
) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    if method != Method::GET && !is_head {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return Ok(http::build_405_response());
    }

    let ctx = RequestContext {
        if_modified_since: header_string(&req, "if-modified-since"),
        if_none_match: header_string(&req, "if-none-match"),
        range: header_string(&req, "range"),
        accept_encoding: header_string(&req, "accept-encoding"),
        is_head,
    };

    let response = match serve::serve(&config.serve, &path, &ctx).await {
        Ok(resp) => resp,
        Err(ResolveError::NotFound) => http::build_404_response(),
    };

    if config.logging.access_log {
        logger::log_access(
            method.as_str(),
            &path,
            response.status().as_u16(),
            content_length_of(&response),
        );
    }

    Ok(response)
}

/// Extract a header as an owned string, dropping non-ASCII values
fn header_string(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Declared body size for the access line; 0 when unknown (encoded bodies)
fn content_length_of(response: &Response<Body>) -> u64 {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}
