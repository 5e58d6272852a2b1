//! staticd - asynchronous static file server
//!
//! Serves files from a configured root over HTTP with conditional GET
//! (`If-Modified-Since` / `ETag`), single byte-range requests, and
//! negotiated gzip/deflate content encoding. The core lives in [`serve`]:
//! a fixed pipeline of resolver, conditional evaluator, range evaluator,
//! encoding negotiator and response planner. The remaining modules are the
//! server glue around it.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod serve;
pub mod server;
