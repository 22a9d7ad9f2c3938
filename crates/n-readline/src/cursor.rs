//! Cursor model — where a byte offset of the line lands on screen.
//!
//! The prompt and the line are laid out left to right, wrapping at the
//! terminal width. A `\n` in the line also starts a new row. The prompt is
//! assumed to contain no newline.

/// A screen position relative to the row the prompt starts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Where the cursor of a prompt of `prompt_len` columns rests.
    #[must_use]
    pub const fn after_prompt(width: usize, prompt_len: usize) -> Self {
        let width = if width == 0 { 1 } else { width };
        Self {
            row: prompt_len / width,
            col: prompt_len % width,
        }
    }

    /// Advance past one written byte.
    ///
    /// Filling the last column wraps to the next row, as does `\n`.
    pub const fn advance(&mut self, byte: u8, width: usize) {
        self.col += 1;
        if self.col >= width || byte == b'\n' {
            self.row += 1;
            self.col = 0;
        }
    }
}

/// Position after the prompt and the first `max_chars` bytes of `text`.
#[must_use]
pub fn position(width: usize, prompt_len: usize, text: &[u8], max_chars: usize) -> Position {
    let width = width.max(1);
    let mut pos = Position::after_prompt(width, prompt_len);
    for &byte in text.iter().take(max_chars) {
        pos.advance(byte, width);
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_line_sits_after_prompt() {
        assert_eq!(position(80, 2, b"", 0), Position::new(0, 2));
    }

    #[test]
    fn wraps_at_width() {
        let text = [b'x'; 85];
        assert_eq!(position(80, 2, &text, 85), Position::new(1, 7));
    }

    #[test]
    fn filling_the_row_lands_on_next_row_col_zero() {
        let text = [b'x'; 78];
        assert_eq!(position(80, 2, &text, 78), Position::new(1, 0));
    }

    #[test]
    fn newline_starts_a_row() {
        assert_eq!(position(80, 2, b"ab\ncd", 5), Position::new(1, 2));
        assert_eq!(position(80, 0, b"ab\n", 3), Position::new(1, 0));
    }

    #[test]
    fn max_chars_limits_the_walk() {
        assert_eq!(position(80, 2, b"hello", 3), Position::new(0, 5));
        assert_eq!(position(80, 2, b"hi", 10), Position::new(0, 4));
    }

    #[test]
    fn long_prompt_spans_rows() {
        assert_eq!(position(10, 25, b"", 0), Position::new(2, 5));
    }

    #[test]
    fn zero_width_is_treated_as_one_column() {
        assert_eq!(position(0, 0, b"ab", 2), Position::new(2, 0));
    }
}
