// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Snappy compression in xerial framing.
//!
//! This is the layout produced by `snappy-java`'s `SnappyOutputStream` and by
//! Kafka clients, and the one the security violations consumers decode. It is
//! *not* the raw snappy block format and *not* the official snappy framing
//! format; a bare block decoder rejects it.
//!
//! ```text
//! offset  size  field
//! 0       8     magic                82 'S' 'N' 'A' 'P' 'P' 'Y' 00
//! 8       4     version              u32 BE, 1
//! 12      4     min compatible       u32 BE, 1
//! 16      4     block #1 length      u32 BE
//! 20      len   block #1             raw snappy
//! ...           (length, block) pairs until the input is consumed
//! ```
//!
//! Input is cut into slices of at most [`BLOCK_SIZE`] bytes and each slice is
//! compressed independently as a raw snappy block.

use snap::raw::{max_compress_len, Encoder};

/// Magic marker opening every xerial stream.
pub const MAGIC: [u8; 8] = [0x82, b'S', b'N', b'A', b'P', b'P', b'Y', 0];

pub const VERSION: u32 = 1;
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// Magic plus both version words.
pub const HEADER_LEN: usize = MAGIC.len() + 8;

/// Maximum uncompressed bytes per block.
pub const BLOCK_SIZE: usize = 32 * 1024;

/// Reusable xerial encoder.
///
/// Holds the snappy hash table and one block-sized scratch buffer so a batch
/// of bodies can be encoded without reallocating either. Not shared across
/// threads; build one per batch.
pub struct XerialEncoder {
    raw: Encoder,
    block: Vec<u8>,
}

impl Default for XerialEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl XerialEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: Encoder::new(),
            block: vec![0; max_compress_len(BLOCK_SIZE)],
        }
    }

    /// Encodes `input` into a freshly allocated xerial stream.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>, snap::Error> {
        let blocks = input.len().div_ceil(BLOCK_SIZE);
        let mut out = Vec::with_capacity(HEADER_LEN + blocks * 4 + input.len());
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION.to_be_bytes());
        out.extend_from_slice(&MIN_COMPATIBLE_VERSION.to_be_bytes());

        for chunk in input.chunks(BLOCK_SIZE) {
            // Only the first `n` bytes of the scratch buffer belong to this block.
            let n = self.raw.compress(chunk, &mut self.block)?;
            let len = u32::try_from(n).map_err(|_| snap::Error::TooBig {
                given: n as u64,
                max: u64::from(u32::MAX),
            })?;
            out.extend_from_slice(&len.to_be_bytes());
            out.extend_from_slice(&self.block[..n]);
        }

        Ok(out)
    }
}

/// One-shot helper around [`XerialEncoder::encode`].
pub fn encode(input: &[u8]) -> Result<Vec<u8>, snap::Error> {
    XerialEncoder::new().encode(input)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decode(framed: &[u8]) -> Vec<u8> {
        assert_eq!(&framed[..8], &MAGIC);
        let mut rest = &framed[HEADER_LEN..];
        let mut decoder = snap::raw::Decoder::new();
        let mut out = Vec::new();
        while !rest.is_empty() {
            let len = u32::from_be_bytes(rest[..4].try_into().unwrap()) as usize;
            out.extend(decoder.decompress_vec(&rest[4..4 + len]).unwrap());
            rest = &rest[4 + len..];
        }
        out
    }

    #[test]
    fn test_header_layout() {
        let framed = encode(b"foo").unwrap();
        assert_eq!(
            &framed[..HEADER_LEN],
            &[0x82, 0x53, 0x4e, 0x41, 0x50, 0x50, 0x59, 0x00, 0, 0, 0, 1, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_single_block_length_prefix() {
        let framed = encode(b"foo").unwrap();
        let block = snap::raw::Encoder::new().compress_vec(b"foo").unwrap();
        let len = u32::from_be_bytes(framed[HEADER_LEN..HEADER_LEN + 4].try_into().unwrap());
        assert_eq!(len as usize, block.len());
        assert_eq!(&framed[HEADER_LEN + 4..], block.as_slice());
    }

    #[test]
    fn test_empty_input_is_header_only() {
        let framed = encode(b"").unwrap();
        assert_eq!(framed.len(), HEADER_LEN);
    }

    #[test]
    fn test_round_trip() {
        let input = b"GET /index.php?id=1%27%20OR%201=1 HTTP/1.1".repeat(10);
        assert_eq!(decode(&encode(&input).unwrap()), input);
    }

    #[test]
    fn test_input_is_split_into_blocks() {
        let input: Vec<u8> = (0..BLOCK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        let framed = encode(&input).unwrap();

        let mut rest = &framed[HEADER_LEN..];
        let mut blocks = 0;
        while !rest.is_empty() {
            let len = u32::from_be_bytes(rest[..4].try_into().unwrap()) as usize;
            let decoded_len = snap::raw::decompress_len(&rest[4..4 + len]).unwrap();
            assert!(decoded_len <= BLOCK_SIZE);
            rest = &rest[4 + len..];
            blocks += 1;
        }
        assert_eq!(blocks, 3);
        assert_eq!(decode(&framed), input);
    }

    #[test]
    fn test_encoder_reuse_does_not_leak_between_inputs() {
        let mut encoder = XerialEncoder::new();
        let long: Vec<u8> = (0..BLOCK_SIZE).map(|i| (i % 7) as u8).collect();
        let first = encoder.encode(&long).unwrap();
        let second = encoder.encode(b"short").unwrap();

        assert_eq!(decode(&first), long);
        assert_eq!(decode(&second), b"short");
        assert_eq!(second, encode(b"short").unwrap());
    }

    #[test]
    fn test_raw_decoder_rejects_framed_output() {
        let framed = encode(b"foo").unwrap();
        assert!(snap::raw::Decoder::new().decompress_vec(&framed).is_err());
    }
}
