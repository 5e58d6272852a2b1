//! Content-encoding negotiation module
//!
//! Chooses the transfer encoding from the client's Accept-Encoding header and
//! the server's configuration flags. Matching is plain substring containment
//! (no quality values), gzip preferred over deflate.

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use std::io::{self, Write};

/// Negotiated content encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Identity,
    Gzip,
    Deflate,
}

impl Encoding {
    /// Negotiate from the Accept-Encoding header, gated by server config
    ///
    /// gzip wins when both are acceptable and enabled.
    pub fn negotiate(accept_encoding: Option<&str>, gzip: bool, deflate: bool) -> Self {
        let Some(accept) = accept_encoding else {
            return Self::Identity;
        };
        if gzip && accept.contains("gzip") {
            Self::Gzip
        } else if deflate && accept.contains("deflate") {
            Self::Deflate
        } else {
            Self::Identity
        }
    }

    /// Value for the Content-Encoding header, if one is needed
    pub const fn header_value(self) -> Option<&'static str> {
        match self {
            Self::Identity => None,
            Self::Gzip => Some("gzip"),
            Self::Deflate => Some("deflate"),
        }
    }

    /// Build the streaming compressor for this encoding
    pub fn compressor(self) -> Option<Compressor> {
        match self {
            Self::Identity => None,
            Self::Gzip => Some(Compressor::Gzip(GzEncoder::new(
                Vec::new(),
                Compression::default(),
            ))),
            Self::Deflate => Some(Compressor::Deflate(ZlibEncoder::new(
                Vec::new(),
                Compression::default(),
            ))),
        }
    }
}

/// Incremental compressor over an in-memory output buffer
///
/// `write` feeds a chunk in and drains whatever compressed output is ready;
/// `finish` flushes the trailing bytes. Deflate is zlib-wrapped.
pub enum Compressor {
    Gzip(GzEncoder<Vec<u8>>),
    Deflate(ZlibEncoder<Vec<u8>>),
}

impl Compressor {
    /// Compress a chunk and take the output produced so far
    pub fn write(&mut self, chunk: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            Self::Gzip(enc) => {
                enc.write_all(chunk)?;
                Ok(std::mem::take(enc.get_mut()))
            }
            Self::Deflate(enc) => {
                enc.write_all(chunk)?;
                Ok(std::mem::take(enc.get_mut()))
            }
        }
    }

    /// Flush the stream and return the remaining compressed bytes
    pub fn finish(self) -> io::Result<Vec<u8>> {
        match self {
            Self::Gzip(enc) => enc.finish(),
            Self::Deflate(enc) => enc.finish(),
        }
    }
}
