// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Body compression strategies.
//!
//! [`BodyEncoder`] maps the configured [`BodyCompression`] to an encode
//! function and applies it to a single log record body:
//!
//! | Algorithm | Output                                              |
//! |-----------|-----------------------------------------------------|
//! | `none`    | body untouched                                      |
//! | `gzip`    | RFC 1952 stream (`1f 8b`, deflate, CRC32 + ISIZE)   |
//! | `snappy`  | xerial-framed snappy, see [`crate::xerial`]         |
//!
//! Strings are compressed from their UTF-8 bytes, byte bodies from their raw
//! bytes. The compressed body always replaces the original as
//! [`AnyValue::Bytes`]. On error the body is left exactly as it was.

use std::io::{self, Write};

use flate2::{write::GzEncoder, Compression};

use crate::config::BodyCompression;
use crate::model::AnyValue;
use crate::xerial::XerialEncoder;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("unsupported body type '{0}', expected str or bytes")]
    UnsupportedBody(&'static str),

    #[error("failed to gzip compress log record body: {0}")]
    Write(#[source] io::Error),

    #[error("failed to close gzip writer: {0}")]
    Finalize(#[source] io::Error),

    #[error("failed to snappy compress log record body: {0}")]
    Snappy(#[from] snap::Error),
}

/// What happened to a body passed to [`BodyEncoder::encode_body`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyOutcome {
    /// Body replaced with its compressed bytes.
    Compressed,
    /// Body left as is: compression disabled, or nothing to compress.
    Skipped,
}

/// Per-batch encoder state.
///
/// Owns the snappy scratch state, so create one for each batch rather than
/// sharing it between concurrent callers.
pub struct BodyEncoder {
    compression: BodyCompression,
    xerial: Option<XerialEncoder>,
}

impl BodyEncoder {
    #[must_use]
    pub fn new(compression: BodyCompression) -> Self {
        let xerial = match compression {
            BodyCompression::Snappy => Some(XerialEncoder::new()),
            BodyCompression::None | BodyCompression::Gzip => None,
        };
        Self {
            compression,
            xerial,
        }
    }

    /// Compresses `body` in place.
    pub fn encode_body(&mut self, body: &mut AnyValue) -> Result<BodyOutcome, EncodeError> {
        if self.compression == BodyCompression::None || body.is_empty_body() {
            return Ok(BodyOutcome::Skipped);
        }

        let raw: &[u8] = match &*body {
            AnyValue::Str(s) => s.as_bytes(),
            AnyValue::Bytes(b) => b.as_slice(),
            other => return Err(EncodeError::UnsupportedBody(other.type_name())),
        };

        let compressed = self.compress(raw)?;
        *body = AnyValue::Bytes(compressed);
        Ok(BodyOutcome::Compressed)
    }

    /// Compresses raw bytes with the configured algorithm.
    ///
    /// With [`BodyCompression::None`] this returns a copy of the input.
    pub fn compress(&mut self, raw: &[u8]) -> Result<Vec<u8>, EncodeError> {
        match self.compression {
            BodyCompression::None => Ok(raw.to_vec()),
            BodyCompression::Gzip => gzip(raw),
            BodyCompression::Snappy => {
                let xerial = self.xerial.get_or_insert_with(XerialEncoder::new);
                Ok(xerial.encode(raw)?)
            }
        }
    }
}

/// Gzip `raw` at the fastest level.
///
/// The writer must be finished before its buffer is read, otherwise the CRC32
/// and ISIZE trailer is missing and readers fail with an unexpected EOF.
pub fn gzip(raw: &[u8]) -> Result<Vec<u8>, EncodeError> {
    gzip_into(Vec::with_capacity(raw.len() / 2 + 32), raw)
}

fn gzip_into<W: Write>(sink: W, raw: &[u8]) -> Result<W, EncodeError> {
    let mut writer = GzEncoder::new(sink, Compression::fast());
    writer.write_all(raw).map_err(EncodeError::Write)?;
    writer.finish().map_err(EncodeError::Finalize)
}
