//! Render engine — repaints the prompt line on a terminal.
//!
//! The line may span several rows. The engine never asks the terminal where
//! the cursor is; it remembers where the previous render left the cursor
//! and the end of the line, and moves relative to that. Every repaint is
//! accumulated in an [`OutputBuffer`] and reaches the terminal in one write.
//!
//! Three paths, cheapest first:
//!
//! - **echo**: a byte appended at the end of the line that leaves the
//!   cursor on the same row is written as-is (see [`Editor`](crate::Editor)).
//! - **cursor**: only the point moved; emit relative moves.
//! - **full**: clear the rows in use, rewrite prompt and text, place the
//!   cursor.

use std::io;

use n_term::{OutputBuffer, Terminal, ansi};

use crate::config::Config;
use crate::cursor::position;
use crate::editor::EditState;

/// Full repaint.
///
/// Rows used by the previous render are cleared first when `clear_rows` is
/// set or the terminal width changed since the last render. Pass `false`
/// only when the cursor already sits at the start of a fresh row, as after
/// printing a completion table.
pub(crate) fn refresh_line(
    state: &mut EditState,
    term: &mut dyn Terminal,
    config: &Config,
    clear_rows: bool,
) -> io::Result<()> {
    let old_width = state.width;
    state.width = term.width();
    let width = state.width;

    let prompt_len = state.prompt.len();
    let text = state.buf.as_bytes();
    let point = state.buf.point();
    let end = position(width, prompt_len, text, text.len());
    let cursor = position(width, prompt_len, text, point);

    let mut out = OutputBuffer::new();

    if clear_rows || old_width != width {
        // Go to the last row used, clear upward, then clear the first row.
        if state.max_rows > 1 {
            let down = state.max_rows.saturating_sub(state.prev_cursor.row + 1);
            ansi::cursor_down(&mut out, down)?;
            for _ in 1..state.max_rows {
                ansi::clear_row(&mut out)?;
                ansi::reverse_index(&mut out)?;
            }
        }
        ansi::clear_row(&mut out)?;
    }

    out.push(state.prompt.as_bytes());
    if config.mask_mode {
        push_masked(&mut out, config.mask_char, text);
    } else {
        out.push(text);
    }

    // The terminal holds a cursor that just filled the last column on that
    // row until the next byte arrives. Force the wrap.
    if point > 0
        && point == text.len()
        && cursor.row > 0
        && cursor.col == 0
        && text[point - 1] != b'\n'
    {
        out.push(b"\n\r");
    }

    ansi::cursor_up(&mut out, end.row.saturating_sub(cursor.row))?;
    ansi::cursor_to_column(&mut out, cursor.col)?;

    state.prev_cursor = cursor;
    state.prev_end = end;
    state.max_rows = state.max_rows.max(end.row + 1);

    out.flush_to(term)
}

/// Move the cursor from where the last render left it to the point.
///
/// Writes nothing when the position is unchanged.
pub(crate) fn refresh_cursor(state: &mut EditState, term: &mut dyn Terminal) -> io::Result<()> {
    let cursor = position(
        state.width,
        state.prompt.len(),
        state.buf.as_bytes(),
        state.buf.point(),
    );
    let prev = state.prev_cursor;
    if cursor == prev {
        return Ok(());
    }

    let mut out = OutputBuffer::new();
    if cursor.row < prev.row {
        ansi::cursor_up(&mut out, prev.row - cursor.row)?;
    } else {
        ansi::cursor_down(&mut out, cursor.row - prev.row)?;
    }
    if cursor.col > prev.col {
        ansi::cursor_forward(&mut out, cursor.col - prev.col)?;
    } else {
        ansi::cursor_back(&mut out, prev.col - cursor.col)?;
    }

    state.prev_cursor = cursor;
    out.flush_to(term)
}

/// Echo one byte just appended at the end of the line.
///
/// Returns `false`, writing nothing, when the byte would wrap the row; the
/// caller then needs a full repaint.
pub(crate) fn echo(
    state: &mut EditState,
    term: &mut dyn Terminal,
    config: &Config,
    byte: u8,
) -> io::Result<bool> {
    let mut end = state.prev_cursor;
    end.advance(byte, state.width.max(1));
    if end.col == 0 && byte != b'\n' {
        return Ok(false);
    }

    state.prev_cursor = end;
    state.prev_end = end;
    state.max_rows = state.max_rows.max(end.row + 1);

    if config.mask_mode {
        let mut out = OutputBuffer::new();
        push_masked(&mut out, config.mask_char, &[byte]);
        out.flush_to(term)?;
    } else {
        term.write_all(&[byte])?;
    }
    Ok(true)
}

/// One mask character per byte of `text`. Line breaks pass through, since
/// the cursor model starts a new row at each of them.
fn push_masked(out: &mut OutputBuffer, mask: char, text: &[u8]) {
    let mut utf8 = [0; 4];
    let mask = mask.encode_utf8(&mut utf8).as_bytes();
    for (i, segment) in text.split(|&b| b == b'\n').enumerate() {
        if i > 0 {
            out.push(b"\n");
        }
        out.push_repeated(mask, segment.len());
    }
}
