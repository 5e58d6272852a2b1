//! HTTP protocol layer module
//!
//! Protocol-level building blocks for the static file pipeline: content-type
//! lookup, range parsing, conditional-request evaluation, content-encoding
//! negotiation, and response builders. Nothing in here touches the filesystem.

pub mod conditional;
pub mod encoding;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use encoding::Encoding;
pub use range::ByteWindow;
pub use response::{build_304_response, build_404_response, build_405_response, Body};
