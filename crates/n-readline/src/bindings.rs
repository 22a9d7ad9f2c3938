//! Default key bindings.
//!
//! Emacs-style control keys plus the common VT100/xterm escape sequences
//! for arrows, Home, End, Delete and Insert. Printable bytes, including
//! every byte of a multi-byte UTF-8 character, insert themselves.

use std::rc::Rc;

use crate::buffer::TextBuffer;
use crate::editor::Editor;
use crate::error::Result;
use crate::keymap::{KeyHandler, Keymap};

const ENTER: u8 = 13;
const BACKSPACE: u8 = 127;

/// The control code generated by Ctrl plus `c`.
#[must_use]
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// Bind the default handlers into `map`.
pub(crate) fn install(map: &mut Keymap) -> Result<()> {
    let insert: Rc<dyn KeyHandler> = Rc::new(self_insert);
    for byte in 32..=u8::MAX {
        map.bind(&[byte], Rc::clone(&insert))?;
    }

    let keys: [(u8, fn(&mut Editor<'_>, &[u8]) -> Result<()>); 16] = [
        (ENTER, accept_line),
        (BACKSPACE, delete_left),
        (ctrl(b'h'), delete_left),
        (ctrl(b'a'), move_home),
        (ctrl(b'b'), move_left),
        (ctrl(b'c'), abandon_line),
        (ctrl(b'd'), delete_right_or_eof),
        (ctrl(b'e'), move_end),
        (ctrl(b'f'), move_right),
        (ctrl(b'k'), kill_to_end),
        (ctrl(b'l'), clear_screen),
        (ctrl(b'n'), history_next),
        (ctrl(b'p'), history_prev),
        (ctrl(b't'), transpose),
        (ctrl(b'u'), kill_to_start),
        (ctrl(b'w'), kill_word_left),
    ];
    for (key, handler) in keys {
        map.bind(&[key], Rc::new(handler))?;
    }

    let seqs: [(&[u8], fn(&mut Editor<'_>, &[u8]) -> Result<()>); 10] = [
        (b"\x1b[A", history_prev),
        (b"\x1b[B", history_next),
        (b"\x1b[C", move_right),
        (b"\x1b[D", move_left),
        (b"\x1b[H", move_home),
        (b"\x1b[F", move_end),
        (b"\x1bOH", move_home),
        (b"\x1bOF", move_end),
        (b"\x1b[3~", delete_right),
        (b"\x1b[2~", ignore),
    ];
    for (seq, handler) in seqs {
        map.bind(seq, Rc::new(handler))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn self_insert(ed: &mut Editor<'_>, key: &[u8]) -> Result<()> {
    ed.insert_text(key)
}

fn accept_line(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.set_done();
    Ok(())
}

/// Ctrl-C: drop the line and submit it empty.
fn abandon_line(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.edit(TextBuffer::delete_all);
    ed.set_done();
    Ok(())
}

/// Ctrl-D: delete forward, or end input on an empty line.
fn delete_right_or_eof(ed: &mut Editor<'_>, key: &[u8]) -> Result<()> {
    if ed.is_empty() {
        ed.signal_end_of_input();
        return Ok(());
    }
    delete_right(ed, key)
}

fn delete_left(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.edit(TextBuffer::delete_left);
    Ok(())
}

fn delete_right(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.edit(TextBuffer::delete_right);
    Ok(())
}

fn kill_to_end(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.edit(TextBuffer::delete_to_end_of_line);
    Ok(())
}

fn kill_to_start(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.edit(TextBuffer::delete_all_left_of_cursor);
    Ok(())
}

fn kill_word_left(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.edit(TextBuffer::delete_word_left);
    Ok(())
}

fn transpose(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.edit(TextBuffer::transpose_at_cursor);
    Ok(())
}

fn move_left(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.move_point(TextBuffer::move_left);
    Ok(())
}

fn move_right(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.move_point(TextBuffer::move_right);
    Ok(())
}

fn move_home(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.move_point(TextBuffer::move_home);
    Ok(())
}

fn move_end(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.move_point(TextBuffer::move_end);
    Ok(())
}

fn history_prev(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.history_prev().map(drop)
}

fn history_next(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.history_next().map(drop)
}

fn clear_screen(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    ed.clear_screen()
}

/// Swallows keys whose sequence should not insert anything (Insert).
fn ignore(_: &mut Editor<'_>, _: &[u8]) -> Result<()> {
    Ok(())
}
