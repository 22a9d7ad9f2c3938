// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the line renderer's job. This
// module just knows the byte-level encoding of the handful of VT100 commands
// a line editor needs: relative cursor motion, row erase, reverse index and
// full-screen clear.
//
// Relative moves take a count and write nothing for zero. A VT100 treats
// `CSI 0 A` as `CSI 1 A`, so emitting a zero count would move the cursor.
use std::io::{self, Write};

// ─── Relative Cursor Motion ──────────────────────────────────────────────────

/// Move the cursor up `n` rows (CUU).
#[inline]
pub fn cursor_up(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor down `n` rows (CUD).
#[inline]
pub fn cursor_down(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}B")
}

/// Move the cursor right `n` columns (CUF).
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}C")
}

/// Move the cursor left `n` columns (CUB).
#[inline]
pub fn cursor_back(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}D")
}

/// Return to column 0, then move right to `col`.
///
/// Column 0 is a bare carriage return.
#[inline]
pub fn cursor_to_column(w: &mut impl Write, col: usize) -> io::Result<()> {
    w.write_all(b"\r")?;
    cursor_forward(w, col)
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// Return to column 0 and erase to the end of the row (CR + EL 0).
#[inline]
pub fn clear_row(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r\x1b[0K")
}

/// Move up one row (RI, reverse index).
///
/// Unlike `CSI 1 A`, this scrolls the screen down when the cursor is
/// already on the top row.
#[inline]
pub fn reverse_index(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1bM")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Home the cursor and clear the entire screen (CUP + ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H\x1b[2J")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
