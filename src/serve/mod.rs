//! Static file serving pipeline
//!
//! Fixed-order pipeline over an immutable-per-request descriptor:
//! resolver → conditional evaluator → range evaluator → encoding negotiator
//! → response planner. `serve` is the single entry point; the caller is
//! expected to hand it a sanitized GET/HEAD path and map `NotFound` to a
//! client-visible error.

pub mod planner;
pub mod resolver;

pub use planner::{plan, respond, ResponsePlan, ServeFlags};
pub use resolver::{resolve, ResolveError, Resource};

use crate::config::ServeConfig;
use crate::http::response::Body;
use hyper::Response;

/// Read-only view of the request headers the pipeline cares about
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub if_modified_since: Option<String>,
    pub if_none_match: Option<String>,
    pub range: Option<String>,
    pub accept_encoding: Option<String>,
    pub is_head: bool,
}

/// Resolve a path and drive the full pipeline to a response
pub async fn serve(
    cfg: &ServeConfig,
    path: &str,
    ctx: &RequestContext,
) -> Result<Response<Body>, ResolveError> {
    let resource = resolver::resolve(&cfg.root, &cfg.index_files, path).await?;
    let plan = planner::plan(
        &resource,
        ctx,
        ServeFlags {
            gzip: cfg.gzip,
            deflate: cfg.deflate,
        },
    );
    planner::respond(&resource, &plan, ctx.is_head).await
}
