//! Editor — the context a key handler works through.
//!
//! A [`Session`](crate::Session) owns the long-lived pieces (terminal,
//! bindings, history, configuration) and an [`EditState`] that is reset at
//! the start of every line read. For each resolved key it lends them to an
//! [`Editor`] and calls the bound handler with it.
//!
//! Handlers edit the line and report what should happen next through
//! [`Outcome`] flags. The read loop resets the flags before each dispatch
//! and applies them afterwards in a fixed priority:
//!
//! 1. `ERROR` aborts the read.
//! 2. `END_OF_INPUT` ends the read with no line.
//! 3. `REFRESH` repaints the whole line, else `CURSOR_REFRESH` moves only
//!    the cursor.
//! 4. `DONE` submits the line.

use std::borrow::Cow;

use bitflags::bitflags;
use n_term::{Terminal, ansi};
use tracing::trace;

use crate::buffer::TextBuffer;
use crate::config::Config;
use crate::cursor::Position;
use crate::error::{ReadlineError, Result};
use crate::history::{Direction, History};
use crate::render;

bitflags! {
    /// What a key handler asked the read loop to do.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Outcome: u8 {
        /// Submit the line.
        const DONE           = 0b0000_0001;
        /// Repaint the whole line.
        const REFRESH        = 0b0000_0010;
        /// Only the point moved.
        const CURSOR_REFRESH = 0b0000_0100;
        /// Abort the read with an error.
        const ERROR          = 0b0000_1000;
        /// End the read with no line, as at end of input.
        const END_OF_INPUT   = 0b0001_0000;
    }
}

// ---------------------------------------------------------------------------
// EditState
// ---------------------------------------------------------------------------

/// Per-read editing state.
#[derive(Debug, Default)]
pub(crate) struct EditState {
    pub buf: TextBuffer,
    pub prompt: String,
    /// Terminal width as of the last full render.
    pub width: usize,
    /// Browse position, counted back from the newest history entry.
    pub history_index: usize,
    /// Most rows the line has occupied during this read.
    pub max_rows: usize,
    pub prev_cursor: Position,
    pub prev_end: Position,
    pub outcome: Outcome,
    /// Whether the scratch history entry for this read was stored.
    pub mirror: bool,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh line. The buffer keeps its storage.
    pub fn reset(&mut self, prompt: &str, width: usize) {
        self.buf.clear();
        prompt.clone_into(&mut self.prompt);
        self.width = width;
        self.history_index = 0;
        self.max_rows = 1;
        self.prev_cursor = Position::after_prompt(width, prompt.len());
        self.prev_end = self.prev_cursor;
        self.outcome = Outcome::empty();
        self.mirror = false;
    }
}

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// Handler-facing view of a line read in progress.
///
/// Borrowed views such as [`line`](Self::line) cannot be held across a
/// mutating call; buffer growth may move the text.
pub struct Editor<'a> {
    pub(crate) state: &'a mut EditState,
    pub(crate) history: &'a mut History,
    pub(crate) term: &'a mut dyn Terminal,
    pub(crate) config: &'a Config,
}

impl<'a> Editor<'a> {
    pub(crate) fn new(
        state: &'a mut EditState,
        history: &'a mut History,
        term: &'a mut dyn Terminal,
        config: &'a Config,
    ) -> Self {
        Self {
            state,
            history,
            term,
            config,
        }
    }

    // -- Line access ----------------------------------------------------------

    /// The line as bytes, without terminator.
    #[must_use]
    pub fn line(&self) -> &[u8] {
        self.state.buf.as_bytes()
    }

    /// The line as text; invalid UTF-8 is replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        self.state.buf.text()
    }

    #[must_use]
    pub fn point(&self) -> usize {
        self.state.buf.point()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.buf.is_empty()
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.state.prompt
    }

    /// Move the point. Out-of-range values are ignored.
    ///
    /// Returns whether the point moved; a move requests a cursor refresh.
    pub fn set_point(&mut self, point: usize) -> bool {
        let moved = self.state.buf.set_point(point);
        if moved {
            self.request_cursor_refresh();
        }
        moved
    }

    // -- Editing --------------------------------------------------------------

    /// Insert `text` at the point.
    ///
    /// Bytes appended at the end of the line are echoed straight away when
    /// that keeps the cursor on its row and the terminal width is unchanged;
    /// anything else requests a repaint.
    ///
    /// # Errors
    ///
    /// Allocation or terminal write failure. Either also marks the read as
    /// failed, so it aborts even if the handler drops the error.
    pub fn insert_text(&mut self, text: &[u8]) -> Result<()> {
        for &byte in text {
            self.insert_byte(byte)?;
        }
        Ok(())
    }

    fn insert_byte(&mut self, byte: u8) -> Result<()> {
        if let Err(err) = self.state.buf.insert_char(byte) {
            return Err(self.failed(err));
        }

        let at_end = self.state.buf.point() == self.state.buf.len();
        let pending = self
            .state
            .outcome
            .intersects(Outcome::REFRESH | Outcome::CURSOR_REFRESH);
        let resized = self.term.width() != self.state.width;
        if !at_end || pending || resized {
            self.request_refresh();
            return Ok(());
        }

        match render::echo(self.state, self.term, self.config, byte) {
            Ok(true) => Ok(()),
            Ok(false) => {
                self.request_refresh();
                Ok(())
            }
            Err(err) => Err(self.failed(ReadlineError::Write(err))),
        }
    }

    /// Mark the read as failed and hand `err` back for propagation.
    fn failed(&mut self, err: ReadlineError) -> ReadlineError {
        self.state.outcome |= Outcome::ERROR;
        err
    }

    /// Delete bytes `start..end`, adjusting the point.
    pub fn delete_text(&mut self, start: usize, end: usize) {
        if self.state.buf.delete_range(start, end) {
            self.request_refresh();
        }
    }

    /// Apply a buffer edit, requesting a repaint if it changed anything.
    pub(crate) fn edit(&mut self, op: impl FnOnce(&mut TextBuffer) -> bool) -> bool {
        let changed = op(&mut self.state.buf);
        if changed {
            self.request_refresh();
        }
        changed
    }

    /// Apply a point movement, requesting a cursor refresh if it moved.
    pub(crate) fn move_point(&mut self, op: impl FnOnce(&mut TextBuffer) -> bool) -> bool {
        let moved = op(&mut self.state.buf);
        if moved {
            self.request_cursor_refresh();
        }
        moved
    }

    // -- History --------------------------------------------------------------

    /// Replace the line with the previous (older) history entry.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Alloc`] if the recalled line does not fit.
    pub fn history_prev(&mut self) -> Result<bool> {
        self.history_step(Direction::Prev)
    }

    /// Replace the line with the next (newer) history entry.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Alloc`] if the recalled line does not fit.
    pub fn history_next(&mut self) -> Result<bool> {
        self.history_step(Direction::Next)
    }

    fn history_step(&mut self, direction: Direction) -> Result<bool> {
        // Without a mirror the newest entry belongs to the client.
        if !self.state.mirror {
            return Ok(false);
        }
        let current = self.state.buf.to_string_lossy();
        let Some((index, line)) = self
            .history
            .browse(self.state.history_index, &current, direction)
        else {
            return Ok(false);
        };
        trace!(index, "history recall");
        self.state.history_index = index;
        if let Err(err) = self.state.buf.replace(line.as_bytes()) {
            return Err(self.failed(err));
        }
        self.request_refresh();
        Ok(true)
    }

    // -- Terminal -------------------------------------------------------------

    /// Current terminal width in columns.
    #[must_use]
    pub fn terminal_width(&self) -> usize {
        self.term.width()
    }

    /// Write `text` to the terminal as-is.
    ///
    /// The render engine does not know about it; call
    /// [`reset_line_state`](Self::reset_line_state) and request a refresh to
    /// redraw the prompt below it.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Write`] if the terminal write fails.
    pub fn print(&mut self, text: &[u8]) -> Result<()> {
        self.term.write_all(text).map_err(ReadlineError::Write)
    }

    /// Clear the screen and schedule a repaint of the line at the top.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Write`] if the terminal write fails.
    pub fn clear_screen(&mut self) -> Result<()> {
        let mut seq = Vec::new();
        ansi::clear_screen(&mut seq).map_err(ReadlineError::Write)?;
        self.print(&seq)?;
        self.reset_line_state();
        self.request_refresh();
        Ok(())
    }

    /// Forget where the line was drawn.
    ///
    /// The next full repaint then starts on the row the cursor is on,
    /// instead of clearing rows the previous render used.
    pub fn reset_line_state(&mut self) {
        let width = self.state.width;
        self.state.max_rows = 1;
        self.state.prev_cursor = Position::after_prompt(width, self.state.prompt.len());
        self.state.prev_end = self.state.prev_cursor;
    }

    /// Repaint the whole line now.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Write`] if the terminal write fails.
    pub fn refresh(&mut self) -> Result<()> {
        self.repaint(true)
    }

    pub(crate) fn repaint(&mut self, clear_rows: bool) -> Result<()> {
        render::refresh_line(self.state, self.term, self.config, clear_rows)
            .map_err(ReadlineError::Write)?;
        self.state.outcome -= Outcome::REFRESH | Outcome::CURSOR_REFRESH;
        Ok(())
    }

    /// Move the terminal cursor to the point now.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Write`] if the terminal write fails.
    pub fn refresh_cursor(&mut self) -> Result<()> {
        render::refresh_cursor(self.state, self.term).map_err(ReadlineError::Write)?;
        self.state.outcome -= Outcome::CURSOR_REFRESH;
        Ok(())
    }

    // -- Outcome --------------------------------------------------------------

    /// Flags set so far in this dispatch.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    /// Submit the line once the handler returns.
    pub fn set_done(&mut self) {
        self.state.outcome |= Outcome::DONE;
    }

    pub fn request_refresh(&mut self) {
        self.state.outcome |= Outcome::REFRESH;
    }

    pub fn request_cursor_refresh(&mut self) {
        self.state.outcome |= Outcome::CURSOR_REFRESH;
    }

    /// Abort the read.
    ///
    /// The read returns the error the handler itself returned, if any, else
    /// [`ReadlineError::Aborted`].
    pub fn fail(&mut self) {
        self.state.outcome |= Outcome::ERROR;
    }

    /// End the read with no line, as if input had ended.
    pub fn signal_end_of_input(&mut self) {
        self.state.outcome |= Outcome::END_OF_INPUT;
    }
}

impl std::fmt::Debug for Editor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("line", &self.state.buf.text())
            .field("point", &self.state.buf.point())
            .field("outcome", &self.state.outcome)
            .finish_non_exhaustive()
    }
}
