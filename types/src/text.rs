//! Byte-string labels for campaign titles, option names, and URLs.
//!
//! Labels are explicit byte sequences with no implicit string coercion.
//! For storage schemes built on fixed-size words, a label can be split into
//! zero-padded 32-byte chunks and reassembled exactly, so titles longer than
//! one word round-trip without loss.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of one label storage chunk, in bytes.
pub const CHUNK_WIDTH: usize = 32;

/// An immutable byte-string label.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Label(Vec<u8>);

impl Label {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Split the label into zero-padded fixed-width chunks.
    ///
    /// An empty label yields no chunks.
    pub fn chunks(&self) -> Vec<[u8; CHUNK_WIDTH]> {
        self.0
            .chunks(CHUNK_WIDTH)
            .map(|part| {
                let mut word = [0u8; CHUNK_WIDTH];
                word[..part.len()].copy_from_slice(part);
                word
            })
            .collect()
    }

    /// Reassemble a label from its chunks and original byte length.
    ///
    /// Exact inverse of [`Label::chunks`] when `len` is the original length.
    pub fn from_chunks(chunks: &[[u8; CHUNK_WIDTH]], len: usize) -> Self {
        let mut bytes: Vec<u8> = chunks.iter().flatten().copied().collect();
        bytes.truncate(len);
        Self(bytes)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Label {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for Label {
    /// Lossy UTF-8 rendering, for logs only. Labels remain raw bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}
