// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The process-wide Response Buffer: a growable byte store the transport
//! appends into and the dispatcher reads back out of.
//!
//! `Vec<u8>` already doubles its own capacity; this type exists to
//! preserve the component's observable contract — an explicit cursor reset
//! before each request, a NUL terminator maintained at the cursor after
//! each append (for JSON parsers that expect a C-string), and a
//! `ResourceExhausted` error (rather than an abort) when growth genuinely
//! fails.

use h5vol_types::error::{Error, Result};

/// A growable, cursor-tracked byte buffer reused across requests.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    data: Vec<u8>,
}

impl ResponseBuffer {
    #[must_use]
    pub fn new() -> Self {
        ResponseBuffer { data: Vec::new() }
    }

    /// Clears the buffer's contents, preserving its allocated capacity.
    /// Called before every request per the concurrency model's "cursor
    /// reset to base" rule.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    /// Appends `bytes` to the buffer and maintains a trailing NUL
    /// terminator one byte past the valid region, without including it in
    /// [`ResponseBuffer::as_slice`]'s reported length.
    ///
    /// # Errors
    /// Returns [`Error::ResourceExhausted`] if the buffer cannot grow to
    /// hold `bytes` plus its terminator.
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.data
            .try_reserve(bytes.len() + 1)
            .map_err(|e| Error::ResourceExhausted(format!("failed to grow response buffer: {e}")))?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// The valid region written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// The valid region as a NUL-terminated byte slice, for callers (e.g. a
    /// C-style JSON parser boundary) that need an explicit terminator.
    /// `serde_json` itself needs no such terminator; this exists to
    /// preserve the component's documented contract for any caller that
    /// does.
    #[must_use]
    pub fn as_nul_terminated(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.extend_from_slice(&self.data);
        out.push(0);
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_accumulates_and_reset_clears() {
        let mut buf = ResponseBuffer::new();
        buf.append(b"hello").unwrap();
        buf.append(b" world").unwrap();
        assert_eq!(buf.as_slice(), b"hello world");
        buf.reset();
        assert!(buf.is_empty());
    }

    #[test]
    fn nul_terminated_view_does_not_alter_len() {
        let mut buf = ResponseBuffer::new();
        buf.append(b"abc").unwrap();
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.as_nul_terminated(), b"abc\0");
    }
}
