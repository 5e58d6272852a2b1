//! Response planning module
//!
//! Composes the evaluator results into a single response plan, then drives
//! the byte transfer. Exactly one outcome is taken per request: 304, an
//! encoded 200, a 206 window, or a full 200.

use crate::http::conditional;
use crate::http::encoding::{Compressor, Encoding};
use crate::http::mime;
use crate::http::range::{self, ByteWindow};
use crate::http::response::{self, Body};
use crate::logger;
use crate::serve::resolver::{Resource, ResolveError};
use crate::serve::RequestContext;
use chrono::{DateTime, Utc};
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};
use hyper::Response;
use std::io::{self, SeekFrom};
use std::time::SystemTime;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Read granularity for streamed bodies
const CHUNK_SIZE: usize = 64 * 1024;

/// Accumulated decisions for one request
///
/// Invariants: a window is only honored under identity encoding, and a
/// not-modified plan ignores everything else.
#[derive(Debug, Clone, Copy)]
pub struct ResponsePlan {
    pub not_modified: bool,
    pub window: Option<ByteWindow>,
    pub range_requested: bool,
    pub encoding: Encoding,
}

/// Serving flags consumed by the pipeline
///
/// Mirrors the `[serve]` configuration section without dragging the whole
/// config into the core.
#[derive(Debug, Clone, Copy)]
pub struct ServeFlags {
    pub gzip: bool,
    pub deflate: bool,
}

/// Run the evaluator stages in their fixed order
pub fn plan(resource: &Resource, ctx: &RequestContext, flags: ServeFlags) -> ResponsePlan {
    let not_modified = conditional::is_not_modified(
        ctx.if_modified_since.as_deref(),
        ctx.if_none_match.as_deref(),
        resource.modified,
        &resource.validator,
    );
    let window = range::resolve_range(ctx.range.as_deref(), resource.size);
    let encoding = Encoding::negotiate(ctx.accept_encoding.as_deref(), flags.gzip, flags.deflate);

    ResponsePlan {
        not_modified,
        range_requested: window.is_some(),
        window,
        encoding,
    }
}

/// Turn a plan into a response, opening and streaming the file as needed
///
/// The file is opened before any header is chosen; if it vanished since the
/// resolver's snapshot the request degrades to `NotFound`.
pub async fn respond(
    resource: &Resource,
    plan: &ResponsePlan,
    is_head: bool,
) -> Result<Response<Body>, ResolveError> {
    if plan.not_modified {
        return Ok(response::build_304_response(&resource.validator));
    }

    let mut builder = Response::builder()
        .header("ETag", resource.validator.as_str())
        .header("Date", http_date(SystemTime::now()))
        .header("Last-Modified", http_date(resource.modified))
        .header("Content-Type", mime::content_type_for(&resource.path))
        .header("Accept-Ranges", "bytes");

    // compression ignores any accepted range: a compressed stream has no
    // stable byte offsets into the original content
    let mut window = None;
    let mut compressor = None;
    if let Some(encoding_name) = plan.encoding.header_value() {
        builder = builder
            .status(200)
            .header("Content-Encoding", encoding_name);
        compressor = plan.encoding.compressor();
    } else if let Some(w) = plan.window {
        builder = builder
            .status(206)
            .header(
                "Content-Range",
                format!("bytes {}-{}/{}", w.start, w.end, resource.size),
            )
            .header("Content-Length", w.len());
        window = Some(w);
    } else {
        builder = builder.status(200).header("Content-Length", resource.size);
    }

    let body = if is_head {
        response::empty()
    } else {
        let file = File::open(&resource.path)
            .await
            .map_err(|_| ResolveError::NotFound)?;
        stream_body(file, window, compressor)
    };

    Ok(builder.body(body).unwrap_or_else(|e| {
        logger::log_error(&format!("Failed to build file response: {e}"));
        Response::new(response::empty())
    }))
}

/// Format a timestamp as an RFC 7231 HTTP date
fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Stream a file (optionally windowed or compressed) as a response body
///
/// A producer task reads the file in chunks and feeds an mpsc channel; the
/// body wraps the receiving end. When the client goes away the body is
/// dropped, the channel closes, and the producer exits, releasing the file
/// handle and any compressor state.
fn stream_body(file: File, window: Option<ByteWindow>, compressor: Option<Compressor>) -> Body {
    let (tx, rx) = mpsc::channel::<Result<Frame<Bytes>, io::Error>>(4);
    tokio::spawn(pump(file, window, compressor, tx));
    StreamBody::new(ReceiverStream::new(rx)).boxed()
}

async fn pump(
    mut file: File,
    window: Option<ByteWindow>,
    mut compressor: Option<Compressor>,
    tx: mpsc::Sender<Result<Frame<Bytes>, io::Error>>,
) {
    let mut remaining = match window {
        Some(w) => {
            if let Err(e) = file.seek(SeekFrom::Start(w.start)).await {
                let _ = tx.send(Err(e)).await;
                return;
            }
            w.len()
        }
        None => u64::MAX,
    };

    let mut buf = vec![0_u8; CHUNK_SIZE];
    while remaining > 0 {
        let want = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let read = match file.read(&mut buf[..want]).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                let _ = tx.send(Err(e)).await;
                return;
            }
        };
        remaining = remaining.saturating_sub(read as u64);

        let chunk = match compressor.as_mut() {
            Some(c) => match c.write(&buf[..read]) {
                Ok(out) => out,
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    return;
                }
            },
            None => buf[..read].to_vec(),
        };

        if !chunk.is_empty() && tx.send(Ok(Frame::data(Bytes::from(chunk)))).await.is_err() {
            // receiver dropped: client disconnected mid-stream
            return;
        }
    }

    if let Some(c) = compressor.take() {
        match c.finish() {
            Ok(tail) => {
                if !tail.is_empty() {
                    let _ = tx.send(Ok(Frame::data(Bytes::from(tail)))).await;
                }
            }
            Err(e) => {
                let _ = tx.send(Err(e)).await;
            }
        }
    }
}
