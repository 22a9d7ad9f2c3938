// SPDX-License-Identifier: MIT
//
// Output buffering.
//
// A repaint of the edited line is a burst of small pieces: row clears,
// the prompt, the line text, relative cursor moves. `OutputBuffer`
// accumulates all of them in memory so the whole repaint reaches the
// terminal in a single write. The terminal never sees a half-drawn line,
// and a write failure aborts the repaint as one unit.

use std::io::{self, Write};

use crate::terminal::Terminal;

/// Initial capacity: a prompt, a few rows of text and their escapes.
const DEFAULT_CAPACITY: usize = 256;

/// A byte buffer that accumulates ANSI output for a single write.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes (for testing and debugging).
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append raw bytes.
    #[inline]
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append `bytes` repeated `count` times.
    pub fn push_repeated(&mut self, bytes: &[u8], count: usize) {
        self.buf.reserve(bytes.len().saturating_mul(count));
        for _ in 0..count {
            self.buf.extend_from_slice(bytes);
        }
    }

    /// Write accumulated output to the terminal and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal write fails. The buffer is cleared
    /// either way; a failed repaint is not retried.
    pub fn flush_to<T: Terminal + ?Sized>(&mut self, term: &mut T) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let result = term.write_all(&self.buf);
        self.buf.clear();
        result
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing goes through flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
