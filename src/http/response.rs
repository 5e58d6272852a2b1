//! HTTP response building module
//!
//! Shared boxed body type plus builders for the fixed status responses,
//! decoupled from the file-serving logic.

use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::Response;
use std::io;

/// Response body used throughout the server
///
/// Boxed so that buffered responses and streamed file bodies share one type.
pub type Body = BoxBody<Bytes, io::Error>;

/// Wrap a buffered payload into the shared body type
pub fn full(data: Bytes) -> Body {
    Full::new(data)
        .map_err(|never| match never {})
        .boxed()
}

/// Empty body
pub fn empty() -> Body {
    full(Bytes::new())
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Body> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(empty())
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Body> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(full(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(empty())
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Body> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD")
        .body(full(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(empty())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
