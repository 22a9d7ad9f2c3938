//! Line buffer — growable, NUL-terminated byte storage with a cursor point.
//!
//! The buffer is byte-oriented: one byte is one column. Unicode width and
//! grapheme handling are out of scope for this editor, so a multi-byte
//! UTF-8 character typed at the keyboard simply occupies several slots.
//!
//! # Invariants
//!
//! After every operation:
//!
//! - `len <= capacity`
//! - `storage[len] == 0`
//! - `point <= len`
//!
//! Capacity only grows, and only by the exact amount an insertion
//! overflows it. Clearing keeps the storage.
//!
//! # Boundary policy
//!
//! Every edit and movement returns `bool`: `true` if the buffer or the
//! point changed. Operations at an edge (delete left at column 0, move
//! right at the end, ...) are no-ops returning `false`, which lets callers
//! skip a repaint.

use std::borrow::Cow;

use crate::error::{ReadlineError, Result};

/// Byte storage for the line being edited.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// `capacity + 1` bytes; the extra byte holds the terminator when full.
    storage: Vec<u8>,
    len: usize,
    point: usize,
}

impl TextBuffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer with zero capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: vec![0],
            len: 0,
            point: 0,
        }
    }

    // -- Queries ------------------------------------------------------------

    /// The text, without the terminator.
    ///
    /// The slice borrows the buffer, so it cannot outlive the next edit:
    /// growth may move the storage.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// The text including its terminating NUL.
    #[inline]
    #[must_use]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.storage[..=self.len]
    }

    /// The text as an owned string; invalid UTF-8 is replaced.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    /// The text as a string, borrowed when it is valid UTF-8.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Number of bytes in the line.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the line is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes the buffer can hold without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len() - 1
    }

    /// Cursor offset in bytes, `0..=len`.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> usize {
        self.point
    }

    // -- Point --------------------------------------------------------------

    /// Move the point to `point`.
    ///
    /// Out-of-range values are rejected, leaving the point unchanged.
    pub fn set_point(&mut self, point: usize) -> bool {
        if point == self.point || point > self.len {
            return false;
        }
        self.point = point;
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.point == 0 {
            return false;
        }
        self.point -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.point == self.len {
            return false;
        }
        self.point += 1;
        true
    }

    pub fn move_home(&mut self) -> bool {
        self.set_point(0)
    }

    pub fn move_end(&mut self) -> bool {
        self.set_point(self.len)
    }

    // -- Insertion ----------------------------------------------------------

    /// Insert one byte at the point and advance past it.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Alloc`] if the storage cannot grow.
    pub fn insert_char(&mut self, byte: u8) -> Result<()> {
        self.insert_text(&[byte])
    }

    /// Insert `text` at the point and advance past it.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Alloc`] if the storage cannot grow. The buffer is
    /// unchanged in that case.
    pub fn insert_text(&mut self, text: &[u8]) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let needed = self.len + text.len();
        if needed > self.capacity() {
            self.grow(needed - self.capacity())?;
        }

        let at = self.point;
        self.storage.copy_within(at..self.len, at + text.len());
        self.storage[at..at + text.len()].copy_from_slice(text);
        self.len = needed;
        self.point += text.len();
        self.storage[self.len] = 0;
        Ok(())
    }

    /// Replace the whole line with `text`, point at the end.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Alloc`] if the storage cannot grow.
    pub fn replace(&mut self, text: &[u8]) -> Result<()> {
        self.clear();
        self.insert_text(text)
    }

    fn grow(&mut self, extra: usize) -> Result<()> {
        self.storage
            .try_reserve_exact(extra)
            .map_err(|_| ReadlineError::Alloc)?;
        let new_len = self.storage.len() + extra;
        self.storage.resize(new_len, 0);
        Ok(())
    }

    // -- Deletion -----------------------------------------------------------

    /// Delete bytes `start..end`.
    ///
    /// A point past `end` shifts left by the deleted length; a point inside
    /// the range moves to `start`. The range is clamped to the line.
    pub fn delete_range(&mut self, start: usize, end: usize) -> bool {
        let end = end.min(self.len);
        if start >= end {
            return false;
        }
        let delta = end - start;

        // Moves the terminator along with the tail.
        self.storage.copy_within(end..=self.len, start);
        self.len -= delta;

        if self.point > end {
            self.point -= delta;
        } else if self.point > start {
            self.point = start;
        }
        true
    }

    /// Backspace: delete the byte left of the point.
    pub fn delete_left(&mut self) -> bool {
        if self.point == 0 {
            return false;
        }
        self.delete_range(self.point - 1, self.point)
    }

    /// Delete the byte at the point.
    pub fn delete_right(&mut self) -> bool {
        if self.point == self.len {
            return false;
        }
        self.delete_range(self.point, self.point + 1)
    }

    /// Delete the word left of the point: a run of spaces, then a run of
    /// non-spaces.
    pub fn delete_word_left(&mut self) -> bool {
        let text = self.as_bytes();
        let mut start = self.point;
        while start > 0 && text[start - 1] == b' ' {
            start -= 1;
        }
        while start > 0 && text[start - 1] != b' ' {
            start -= 1;
        }
        self.delete_range(start, self.point)
    }

    /// Delete from the point to the end of the line.
    pub fn delete_to_end_of_line(&mut self) -> bool {
        if self.point == self.len {
            return false;
        }
        self.len = self.point;
        self.storage[self.len] = 0;
        true
    }

    /// Delete everything left of the point.
    pub fn delete_all_left_of_cursor(&mut self) -> bool {
        self.delete_range(0, self.point)
    }

    /// Delete the whole line.
    pub fn delete_all(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.clear();
        true
    }

    /// Empty the line, keeping the storage.
    pub fn clear(&mut self) {
        self.len = 0;
        self.point = 0;
        self.storage[0] = 0;
    }

    // -- Transposition ------------------------------------------------------

    /// Swap the byte left of the point with the byte at the point.
    ///
    /// The point advances unless it already sits on the last byte, so
    /// repeated transposes at the end keep swapping the final pair.
    pub fn transpose_at_cursor(&mut self) -> bool {
        if self.point == 0 || self.point >= self.len {
            return false;
        }
        self.storage.swap(self.point - 1, self.point);
        if self.point != self.len - 1 {
            self.point += 1;
        }
        true
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Buffer holding `text` with the point at `point`.
    fn buf(text: &str, point: usize) -> TextBuffer {
        let mut b = TextBuffer::new();
        b.insert_text(text.as_bytes()).unwrap();
        assert!(b.set_point(point) || b.point() == point);
        b
    }

    fn assert_invariants(b: &TextBuffer) {
        assert!(b.len() <= b.capacity());
        assert!(b.point() <= b.len());
        assert_eq!(b.as_bytes_with_nul()[b.len()], 0);
    }

    fn text(b: &TextBuffer) -> &str {
        std::str::from_utf8(b.as_bytes()).unwrap()
    }

    // -- Construction / growth ----------------------------------------------

    #[test]
    fn new_buffer_is_empty_and_terminated() {
        let b = TextBuffer::new();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 0);
        assert_eq!(b.as_bytes_with_nul(), b"\0");
        assert_invariants(&b);
    }

    #[test]
    fn growth_is_exact() {
        let mut b = TextBuffer::new();
        b.insert_text(b"abc").unwrap();
        assert_eq!(b.capacity(), 3);
        b.insert_char(b'd').unwrap();
        assert_eq!(b.capacity(), 4);
        assert_invariants(&b);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut b = buf("hello", 5);
        b.clear();
        assert!(b.is_empty());
        assert_eq!(b.capacity(), 5);
        assert_invariants(&b);
    }

    // -- Insertion ----------------------------------------------------------

    #[test]
    fn insert_in_middle() {
        let mut b = buf("held", 3);
        b.insert_text(b"lo worl").unwrap();
        assert_eq!(text(&b), "hello world");
        assert_eq!(b.point(), 10);
        assert_invariants(&b);
    }

    #[test]
    fn insert_empty_is_noop() {
        let mut b = buf("x", 1);
        b.insert_text(b"").unwrap();
        assert_eq!(text(&b), "x");
        assert_eq!(b.capacity(), 1);
    }

    #[test]
    fn replace_moves_point_to_end() {
        let mut b = buf("old text", 2);
        b.replace(b"new").unwrap();
        assert_eq!(text(&b), "new");
        assert_eq!(b.point(), 3);
        assert_invariants(&b);
    }

    // -- Movement -----------------------------------------------------------

    #[test]
    fn movement_at_edges_reports_no_change() {
        let mut b = buf("ab", 0);
        assert!(!b.move_left());
        assert!(!b.move_home());
        assert!(b.move_end());
        assert!(!b.move_right());
        assert!(!b.move_end());
        assert!(b.move_left());
        assert_eq!(b.point(), 1);
    }

    #[test]
    fn set_point_rejects_out_of_range() {
        let mut b = buf("abc", 1);
        assert!(!b.set_point(4));
        assert_eq!(b.point(), 1);
        assert!(b.set_point(3));
        assert!(!b.set_point(3));
    }

    // -- Deletion -----------------------------------------------------------

    #[test]
    fn delete_left_and_right() {
        let mut b = buf("abc", 1);
        assert!(b.delete_left());
        assert_eq!(text(&b), "bc");
        assert_eq!(b.point(), 0);
        assert!(!b.delete_left());
        assert!(b.delete_right());
        assert_eq!(text(&b), "c");
        assert_eq!(b.point(), 0);
        assert_invariants(&b);
    }

    #[test]
    fn delete_right_at_end_is_noop() {
        let mut b = buf("abc", 3);
        assert!(!b.delete_right());
        assert_eq!(text(&b), "abc");
    }

    #[test]
    fn delete_range_adjusts_point_after_range() {
        let mut b = buf("0123456789", 8);
        assert!(b.delete_range(2, 5));
        assert_eq!(text(&b), "0156789");
        assert_eq!(b.point(), 5);
        assert_invariants(&b);
    }

    #[test]
    fn delete_range_moves_point_inside_range_to_start() {
        let mut b = buf("0123456789", 4);
        b.delete_range(2, 6);
        assert_eq!(b.point(), 2);
    }

    #[test]
    fn delete_range_leaves_point_before_range() {
        let mut b = buf("0123456789", 1);
        b.delete_range(2, 6);
        assert_eq!(b.point(), 1);
    }

    #[test]
    fn delete_range_clamps_and_rejects_empty() {
        let mut b = buf("abc", 3);
        assert!(!b.delete_range(2, 2));
        assert!(!b.delete_range(5, 9));
        assert!(b.delete_range(1, 99));
        assert_eq!(text(&b), "a");
        assert_invariants(&b);
    }

    #[test]
    fn delete_word_left_removes_spaces_then_word() {
        let mut b = buf("git commit   ", 13);
        assert!(b.delete_word_left());
        assert_eq!(text(&b), "git ");
        assert_eq!(b.point(), 4);
        assert!(b.delete_word_left());
        assert_eq!(text(&b), "");
        assert!(!b.delete_word_left());
        assert_invariants(&b);
    }

    #[test]
    fn delete_word_left_mid_line_keeps_tail() {
        let mut b = buf("one two three", 7);
        b.delete_word_left();
        assert_eq!(text(&b), "one  three");
        assert_eq!(b.point(), 4);
    }

    #[test]
    fn delete_to_end_of_line() {
        let mut b = buf("hello world", 5);
        assert!(b.delete_to_end_of_line());
        assert_eq!(text(&b), "hello");
        assert!(!b.delete_to_end_of_line());
        assert_invariants(&b);
    }

    #[test]
    fn delete_all_left_of_cursor() {
        let mut b = buf("hello world", 6);
        assert!(b.delete_all_left_of_cursor());
        assert_eq!(text(&b), "world");
        assert_eq!(b.point(), 0);
        assert!(!b.delete_all_left_of_cursor());
    }

    #[test]
    fn delete_all() {
        let mut b = buf("abc", 2);
        assert!(b.delete_all());
        assert!(b.is_empty());
        assert_eq!(b.point(), 0);
        assert!(!b.delete_all());
        assert_invariants(&b);
    }

    // -- Transposition ------------------------------------------------------

    #[test]
    fn transpose_advances_point() {
        let mut b = buf("abcd", 1);
        assert!(b.transpose_at_cursor());
        assert_eq!(text(&b), "bacd");
        assert_eq!(b.point(), 2);
    }

    #[test]
    fn transpose_on_last_byte_stays() {
        let mut b = buf("abcd", 3);
        assert!(b.transpose_at_cursor());
        assert_eq!(text(&b), "abdc");
        assert_eq!(b.point(), 3);
    }

    #[test]
    fn transpose_at_edges_is_noop() {
        let mut b = buf("ab", 0);
        assert!(!b.transpose_at_cursor());
        b.move_end();
        assert!(!b.transpose_at_cursor());
        assert_eq!(text(&b), "ab");
    }

    // -- Invariant sweep ----------------------------------------------------

    #[test]
    fn invariants_hold_across_mixed_edits() {
        let mut b = TextBuffer::new();
        b.insert_text(b"the quick brown fox").unwrap();
        assert_invariants(&b);
        b.set_point(9);
        b.delete_word_left();
        assert_invariants(&b);
        b.insert_text(b"slow").unwrap();
        assert_invariants(&b);
        b.transpose_at_cursor();
        assert_invariants(&b);
        b.delete_to_end_of_line();
        assert_invariants(&b);
        b.delete_all_left_of_cursor();
        assert_invariants(&b);
        b.insert_char(b'!').unwrap();
        assert_invariants(&b);
        b.delete_all();
        assert_invariants(&b);
    }

    #[test]
    fn lossy_text_view() {
        let mut b = TextBuffer::new();
        b.insert_text("é".as_bytes()).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b.text(), "é");
        b.delete_left();
        assert_eq!(b.to_string_lossy(), "\u{fffd}");
    }
}
