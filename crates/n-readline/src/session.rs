//! Session — the long-lived line reader a client creates once.
//!
//! A [`Session`] owns a terminal, the key bindings, the history and the
//! configuration. Each [`readline`](Session::readline) picks one of three
//! ways to read a line:
//!
//! - **unedited**: the input is not a terminal (a pipe or a file). Read up
//!   to `\n` with no prompt, no echo and no length limit.
//! - **basic**: the terminal is on the incapable list. Write the prompt and
//!   read one cooked line.
//! - **raw**: the full editor. Raw mode is held by a [`RawMode`] guard for
//!   the duration of the read and released on every exit path.
//!
//! Forcing tty mode skips both fallbacks.
//!
//! ```no_run
//! use n_readline::Session;
//! use n_term::Tty;
//!
//! let mut session = Session::new(Tty::stdio()?)?;
//! while let Some(line) = session.readline("> ")? {
//!     session.history_add(&line);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::rc::Rc;

use n_term::{RawMode, Terminal, ansi};
use tracing::{debug, trace, warn};

use crate::bindings;
use crate::config::Config;
use crate::editor::{EditState, Editor, Outcome};
use crate::error::{ReadlineError, Result};
use crate::history::History;
use crate::keymap::{KeyHandler, Keymap};
use crate::render;

/// How a read is carried out, decided per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Unedited,
    Basic,
    Raw,
}

/// A line reader bound to one terminal.
#[derive(Debug)]
pub struct Session<T: Terminal> {
    term: T,
    keymap: Keymap,
    history: History,
    state: EditState,
    config: Config,
    term_name: Option<String>,
}

impl<T: Terminal> Session<T> {
    /// A session with the default configuration and bindings.
    ///
    /// # Errors
    ///
    /// Propagates a failure to install the default bindings.
    pub fn new(term: T) -> Result<Self> {
        Self::with_config(term, Config::default())
    }

    /// A session with `config` and the default bindings.
    ///
    /// # Errors
    ///
    /// Propagates a failure to install the default bindings.
    pub fn with_config(term: T, config: Config) -> Result<Self> {
        let mut keymap = Keymap::new();
        bindings::install(&mut keymap)?;
        let term_name = n_term::term_name();
        debug!(tty = term.is_tty(), term = ?term_name, "session created");
        Ok(Self {
            term,
            keymap,
            history: History::new(config.history_max_len),
            state: EditState::new(),
            config,
            term_name,
        })
    }

    // -- Reading --------------------------------------------------------------

    /// Read one line.
    ///
    /// Returns `Ok(None)` at end of input, and after Ctrl-D on an empty
    /// line. A line abandoned with Ctrl-C comes back as `Some("")`. The
    /// line is not added to history; call [`history_add`](Self::history_add).
    ///
    /// When the result is `None` or empty a single `\n` is written, so the
    /// next prompt starts on a fresh row. A failure to write it is logged,
    /// not returned.
    ///
    /// # Errors
    ///
    /// Setup, allocation, read or write failure, or a key handler error.
    /// Terminal attributes are restored either way.
    pub fn readline(&mut self, prompt: &str) -> Result<Option<String>> {
        let mode = self.mode();
        trace!(?mode, "readline");
        let result = match mode {
            Mode::Unedited => self.read_unedited(),
            Mode::Basic => self.read_basic(prompt),
            Mode::Raw => self.read_raw(prompt),
        };

        let needs_newline = !matches!(&result, Ok(Some(line)) if !line.is_empty());
        if needs_newline {
            // Best effort: the outcome of the read stands either way.
            if let Err(err) = self.term.write_all(b"\n") {
                warn!(%err, "failed to write newline after read");
            }
        }
        result
    }

    fn mode(&self) -> Mode {
        if self.config.force_tty {
            return Mode::Raw;
        }
        if !self.term.is_tty() {
            return Mode::Unedited;
        }
        if self
            .term_name
            .as_deref()
            .is_some_and(|name| self.config.is_incapable(name))
        {
            return Mode::Basic;
        }
        Mode::Raw
    }

    fn read_unedited(&mut self) -> Result<Option<String>> {
        let line = read_cooked_line(&mut self.term)?;
        Ok(line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
    }

    fn read_basic(&mut self, prompt: &str) -> Result<Option<String>> {
        self.term
            .write_all(prompt.as_bytes())
            .map_err(ReadlineError::Write)?;
        let line = read_cooked_line(&mut self.term)?;
        Ok(line.map(|mut bytes| {
            while bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            String::from_utf8_lossy(&bytes).into_owned()
        }))
    }

    fn read_raw(&mut self, prompt: &str) -> Result<Option<String>> {
        let Self {
            term,
            keymap,
            history,
            state,
            config,
            ..
        } = self;

        let mut raw = RawMode::enable(term)?;
        let term: &mut dyn Terminal = &mut *raw;

        state.reset(prompt, term.width());
        state.mirror = history.add("");

        let result = edit(term, keymap, history, state, config);
        if state.mirror {
            history.pop();
            state.mirror = false;
        }
        result
    }

    // -- Bindings -------------------------------------------------------------

    /// Bind a single byte.
    ///
    /// # Errors
    ///
    /// Never fails for a single byte; the signature matches
    /// [`bind_keyseq`](Self::bind_keyseq).
    pub fn bind_key(&mut self, key: u8, handler: impl KeyHandler + 'static) -> Result<()> {
        self.keymap.bind(&[key], Rc::new(handler))
    }

    /// Bind a byte sequence, such as an escape sequence.
    ///
    /// A binding on a prefix of `seq` takes precedence: lookup stops at
    /// the first bound byte.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::EmptyKeySequence`] if `seq` is empty.
    pub fn bind_keyseq(&mut self, seq: &[u8], handler: impl KeyHandler + 'static) -> Result<()> {
        self.keymap.bind(seq, Rc::new(handler))
    }

    // -- History --------------------------------------------------------------

    /// Add `line` to history. Returns whether it was stored.
    pub fn history_add(&mut self, line: &str) -> bool {
        self.history.add(line)
    }

    /// Change the history capacity, keeping the newest entries.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::InvalidHistoryLength`] if `max_len` is 0.
    pub fn history_set_max_len(&mut self, max_len: usize) -> Result<()> {
        self.history.set_max_len(max_len)?;
        self.config.history_max_len = max_len;
        Ok(())
    }

    /// Stored lines, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    // -- Configuration ----------------------------------------------------------

    /// Treat the input as an editable terminal whatever it looks like.
    pub fn force_tty(&mut self) {
        self.config.force_tty = true;
    }

    /// Echo the mask character instead of typed text.
    pub fn set_mask_mode(&mut self, enable: bool) {
        self.config.mask_mode = enable;
    }

    /// Override the `$TERM` value captured when the session was created.
    pub fn set_term_name(&mut self, name: Option<&str>) {
        self.term_name = name.map(str::to_owned);
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    // -- Terminal -------------------------------------------------------------

    #[must_use]
    pub const fn terminal(&self) -> &T {
        &self.term
    }

    #[must_use]
    pub fn terminal_width(&self) -> usize {
        self.term.width()
    }

    /// Clear the screen and home the cursor.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Write`] if the terminal write fails.
    pub fn clear_screen(&mut self) -> Result<()> {
        let mut seq = Vec::new();
        ansi::clear_screen(&mut seq).map_err(ReadlineError::Write)?;
        self.print(&seq)
    }

    /// Write `text` to the terminal as-is.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Write`] if the terminal write fails.
    pub fn print(&mut self, text: &[u8]) -> Result<()> {
        self.term.write_all(text).map_err(ReadlineError::Write)
    }

    /// Tear the session down, reporting a failure to restore the terminal.
    ///
    /// Dropping the session restores the terminal too, but can only log a
    /// failure.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Setup`] if the saved attributes cannot be reapplied.
    pub fn close(mut self) -> Result<()> {
        self.term.disable_raw()?;
        Ok(())
    }
}

impl<T: Terminal> Drop for Session<T> {
    fn drop(&mut self) {
        if self.term.is_raw() {
            if let Err(err) = self.term.disable_raw() {
                warn!(%err, "failed to restore terminal attributes");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Read loops
// ---------------------------------------------------------------------------

/// The raw-mode edit loop.
///
/// Expects raw mode to be active and `state` reset for this read.
fn edit(
    term: &mut dyn Terminal,
    keymap: &Keymap,
    history: &mut History,
    state: &mut EditState,
    config: &Config,
) -> Result<Option<String>> {
    term.write_all(state.prompt.as_bytes())
        .map_err(ReadlineError::Write)?;
    let timeout = config.escape_timeout();

    loop {
        let Some(first) = term.read_byte(None).map_err(ReadlineError::Read)? else {
            debug!(len = state.buf.len(), "end of input while editing");
            if state.buf.is_empty() {
                return Ok(None);
            }
            return Ok(Some(state.buf.to_string_lossy()));
        };

        let binding = keymap.lookup(first, || match term.read_byte(Some(timeout)) {
            Ok(byte) => byte,
            Err(err) => {
                trace!(%err, "continuation read failed");
                None
            }
        });
        let Some(binding) = binding else {
            trace!(byte = first, "unbound input discarded");
            continue;
        };

        state.outcome = Outcome::empty();
        let handled = {
            let mut editor = Editor::new(state, history, term, config);
            binding.handler.handle(&mut editor, &binding.key)
        };
        let outcome = state.outcome;
        trace!(key = ?binding.key, ?outcome, "dispatched");

        handled?;
        if outcome.contains(Outcome::ERROR) {
            return Err(ReadlineError::Aborted);
        }
        if outcome.contains(Outcome::END_OF_INPUT) {
            return Ok(None);
        }

        if outcome.contains(Outcome::REFRESH) {
            render::refresh_line(state, term, config, true).map_err(ReadlineError::Write)?;
        } else if outcome.contains(Outcome::CURSOR_REFRESH) {
            render::refresh_cursor(state, term).map_err(ReadlineError::Write)?;
        }

        if outcome.contains(Outcome::DONE) {
            if state.mirror {
                history.pop();
                state.mirror = false;
            }
            state.buf.move_end();
            render::refresh_cursor(state, term).map_err(ReadlineError::Write)?;
            return Ok(Some(state.buf.to_string_lossy()));
        }
    }
}

/// Read up to `\n` (consumed, not returned). `None` at end of input with
/// nothing read.
fn read_cooked_line(term: &mut dyn Terminal) -> Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    loop {
        match term.read_byte(None).map_err(ReadlineError::Read)? {
            Some(b'\n') => return Ok(Some(line)),
            Some(byte) => line.push(byte),
            None if line.is_empty() => return Ok(None),
            None => return Ok(Some(line)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::ctrl;
    use n_term::{ScriptedTerminal, TermError};
    use pretty_assertions::assert_eq;

    fn session(term: ScriptedTerminal) -> Session<ScriptedTerminal> {
        let mut s = Session::new(term).unwrap();
        s.set_term_name(Some("xterm"));
        s
    }

    fn read(s: &mut Session<ScriptedTerminal>) -> Option<String> {
        s.readline("> ").unwrap()
    }

    fn complete_commands(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
        ed.complete(0, &["status", "stop"], false).map(drop)
    }

    fn complete_status(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
        ed.complete(0, &["status"], false).map(drop)
    }

    fn bang(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
        ed.insert_text(b"!")
    }

    fn give_up(ed: &mut Editor<'_>, _: &[u8]) -> Result<()> {
        ed.fail();
        Ok(())
    }

    // -- Fallback modes -------------------------------------------------------

    #[test]
    fn non_tty_reads_plain_lines() {
        let mut s = session(ScriptedTerminal::new().non_tty().input(b"hello\nworld\n"));
        assert_eq!(read(&mut s).as_deref(), Some("hello"));
        assert_eq!(read(&mut s).as_deref(), Some("world"));
        assert_eq!(read(&mut s), None);
        // No prompt, no echo; only the newline that follows end of input.
        assert_eq!(s.term.output_str(), "\n");
    }

    #[test]
    fn non_tty_last_line_without_newline() {
        let mut s = session(ScriptedTerminal::new().non_tty().input(b"tail"));
        assert_eq!(read(&mut s).as_deref(), Some("tail"));
        assert_eq!(read(&mut s), None);
    }

    #[test]
    fn incapable_terminal_gets_basic_read() {
        let mut s = session(ScriptedTerminal::new().input(b"ls -l\r\n"));
        s.set_term_name(Some("dumb"));
        let before = s.term.attributes();
        assert_eq!(read(&mut s).as_deref(), Some("ls -l"));
        assert_eq!(s.term.output_str(), "> ");
        assert_eq!(s.term.attributes(), before);
    }

    #[test]
    fn configured_incapable_terminal() {
        let config = Config {
            incapable_terms: vec!["vt52".into()],
            ..Config::default()
        };
        let mut s = Session::with_config(ScriptedTerminal::new().input(b"x\n"), config).unwrap();
        s.set_term_name(Some("vt52"));
        assert_eq!(read(&mut s).as_deref(), Some("x"));
        assert_eq!(s.term.output_str(), "> ");
    }

    #[test]
    fn forced_tty_on_a_pipe_fails_setup() {
        let mut s = session(ScriptedTerminal::new().non_tty().input(b"x\n"));
        s.force_tty();
        assert!(matches!(
            s.readline("> "),
            Err(ReadlineError::Setup(TermError::NotATerminal))
        ));
    }

    // -- Raw mode basics ------------------------------------------------------

    #[test]
    fn typed_line_is_echoed_and_returned() {
        let mut s = session(ScriptedTerminal::new().input(b"hello\r"));
        let before = s.term.attributes();
        assert_eq!(read(&mut s).as_deref(), Some("hello"));
        assert_eq!(s.term.output_str(), "> hello");
        assert_eq!(s.term.attributes(), before);
        assert!(!s.term.is_raw());
    }

    #[test]
    fn consecutive_reads() {
        let mut s = session(ScriptedTerminal::new().input(b"a\rb\r"));
        assert_eq!(read(&mut s).as_deref(), Some("a"));
        assert_eq!(read(&mut s).as_deref(), Some("b"));
        assert!(s.history().is_empty());
    }

    #[test]
    fn ctrl_d_on_empty_line_is_end_of_input() {
        let mut s = session(ScriptedTerminal::new().input(&[ctrl(b'd')]));
        assert_eq!(read(&mut s), None);
        assert_eq!(s.term.output_str(), "> \n");
        assert!(s.history().is_empty());
    }

    #[test]
    fn ctrl_d_deletes_forward_on_non_empty_line() {
        let mut s = session(ScriptedTerminal::new().input(b"ab\x01\x04\r"));
        assert_eq!(read(&mut s).as_deref(), Some("b"));
    }

    #[test]
    fn ctrl_c_returns_empty_line() {
        let mut s = session(ScriptedTerminal::new().input(b"abc\x03"));
        assert_eq!(read(&mut s).as_deref(), Some(""));
        assert!(s.term.output_str().ends_with("\r\x1b[0K> \r\x1b[2C\n"));
    }

    #[test]
    fn end_of_input_mid_line_returns_partial_text() {
        let mut s = session(ScriptedTerminal::new().input(b"abc"));
        assert_eq!(read(&mut s).as_deref(), Some("abc"));
        assert_eq!(read(&mut s), None);
    }

    #[test]
    fn editing_keys() {
        // "ac", Left, "b", End, Backspace, Home, "x"
        let mut s = session(ScriptedTerminal::new().input(b"ac\x1b[Db\x1b[F\x7f\x1b[Hx\r"));
        assert_eq!(read(&mut s).as_deref(), Some("xab"));
    }

    #[test]
    fn word_and_line_kills() {
        let mut s = session(ScriptedTerminal::new().input(b"one two\x17\r"));
        assert_eq!(read(&mut s).as_deref(), Some("one "));
        s.term.push_input(b"hello world\x01\x06\x06\x0b\r");
        assert_eq!(read(&mut s).as_deref(), Some("he"));
        s.term.push_input(b"hello world\x02\x02\x15\r");
        assert_eq!(read(&mut s).as_deref(), Some("ld"));
    }

    #[test]
    fn transpose_and_delete_key() {
        let mut s = session(ScriptedTerminal::new().input(b"abc\x02\x14\r"));
        assert_eq!(read(&mut s).as_deref(), Some("acb"));
        s.term.push_input(b"abc\x01\x1b[3~\r");
        assert_eq!(read(&mut s).as_deref(), Some("bc"));
    }

    #[test]
    fn insert_key_is_ignored() {
        let mut s = session(ScriptedTerminal::new().input(b"a\x1b[2~b\r"));
        assert_eq!(read(&mut s).as_deref(), Some("ab"));
    }

    #[test]
    fn unbound_control_bytes_are_discarded() {
        let mut s = session(ScriptedTerminal::new().input(b"a\x00\tb\r"));
        assert_eq!(read(&mut s).as_deref(), Some("ab"));
    }

    #[test]
    fn ctrl_l_clears_screen_and_redraws() {
        let mut s = session(ScriptedTerminal::new().input(b"hi\x0c\r"));
        assert_eq!(read(&mut s).as_deref(), Some("hi"));
        assert_eq!(
            s.term.output_str(),
            "> hi\x1b[H\x1b[2J\r\x1b[0K> hi\r\x1b[4C"
        );
    }

    // -- Escape sequences -----------------------------------------------------

    #[test]
    fn incomplete_escape_sequence_is_discarded() {
        let mut s = session(ScriptedTerminal::new().input(b"\x1b[").pause().input(b"x\r"));
        assert_eq!(read(&mut s).as_deref(), Some("x"));
    }

    #[test]
    fn short_binding_shadows_escape_sequences() {
        let mut s = session(ScriptedTerminal::new().input(b"\x1b[A\r"));
        s.bind_key(0x1b, bang).unwrap();
        assert_eq!(read(&mut s).as_deref(), Some("![A"));
    }

    #[test]
    fn empty_key_sequence_is_rejected() {
        let mut s = session(ScriptedTerminal::new());
        assert!(matches!(
            s.bind_keyseq(b"", bang),
            Err(ReadlineError::EmptyKeySequence)
        ));
    }

    #[test]
    fn custom_sequence_binding() {
        let mut s = session(ScriptedTerminal::new().input(b"a\x1b[1;5C\r"));
        s.bind_keyseq(b"\x1b[1;5C", bang).unwrap();
        assert_eq!(read(&mut s).as_deref(), Some("a!"));
    }

    // -- Rendering ------------------------------------------------------------

    #[test]
    fn filling_the_row_repaints_with_wrap() {
        let mut s = session(ScriptedTerminal::new().with_width(10).input(b"abcdefgh\r"));
        assert_eq!(read(&mut s).as_deref(), Some("abcdefgh"));
        assert_eq!(
            s.term.output_str(),
            "> abcdefg\r\x1b[0K> abcdefgh\n\r\r"
        );
    }

    #[test]
    fn shrinking_mid_read_repaints_at_new_width() {
        let term = ScriptedTerminal::new()
            .input(b"abc")
            .resize(10)
            .input(b"defgh\r");
        let mut s = session(term);
        assert_eq!(read(&mut s).as_deref(), Some("abcdefgh"));
        assert_eq!(
            s.term.output_str(),
            "> abc\r\x1b[0K> abcd\r\x1b[6Cefg\r\x1b[0K> abcdefgh\n\r\r"
        );
        assert_eq!(s.state.width, 10);
        assert_eq!(s.state.prev_cursor, crate::cursor::Position::new(1, 0));
    }

    #[test]
    fn enter_mid_line_moves_cursor_to_end() {
        let mut s = session(ScriptedTerminal::new().input(b"abc\x01\r"));
        assert_eq!(read(&mut s).as_deref(), Some("abc"));
        assert_eq!(s.term.output_str(), "> abc\x1b[3D\x1b[3C");
    }

    #[test]
    fn mask_mode_echoes_mask_char() {
        let mut s = session(ScriptedTerminal::new().input(b"pw\r"));
        s.set_mask_mode(true);
        assert_eq!(read(&mut s).as_deref(), Some("pw"));
        assert_eq!(s.term.output_str(), "> **");
    }

    // -- History --------------------------------------------------------------

    #[test]
    fn up_arrow_recalls_previous_line() {
        let mut s = session(ScriptedTerminal::new().input(b"\x1b[A\r"));
        s.history_add("first");
        assert_eq!(read(&mut s).as_deref(), Some("first"));
        assert_eq!(s.history(), ["first"]);
    }

    #[test]
    fn browsing_back_down_restores_draft() {
        let mut s = session(ScriptedTerminal::new().input(b"dr\x10\x0e\r"));
        s.history_add("old");
        assert_eq!(read(&mut s).as_deref(), Some("dr"));
        assert_eq!(s.history(), ["old"]);
    }

    #[test]
    fn history_limits() {
        let mut s = session(ScriptedTerminal::new());
        assert!(s.history_add("x"));
        assert!(!s.history_add("x"));
        assert!(matches!(
            s.history_set_max_len(0),
            Err(ReadlineError::InvalidHistoryLength)
        ));
        s.history_set_max_len(3).unwrap();
        for line in ["a", "b", "c", "d"] {
            s.history_add(line);
        }
        assert_eq!(s.history(), ["b", "c", "d"]);
        assert_eq!(s.config().history_max_len, 3);
    }

    #[test]
    fn full_history_keeps_client_entries_after_read() {
        let mut s = session(ScriptedTerminal::new().input(b"\x1b[A\r"));
        s.history_set_max_len(2).unwrap();
        s.history_add("a");
        s.history_add("b");
        // The scratch entry evicts "a" for the duration of the read.
        assert_eq!(read(&mut s).as_deref(), Some("b"));
        assert_eq!(s.history(), ["b"]);
    }

    // -- Completion -----------------------------------------------------------

    #[test]
    fn ambiguous_completion_lists_candidates() {
        let mut s = session(ScriptedTerminal::new().input(b"st\t\r"));
        s.bind_key(b'\t', complete_commands).unwrap();
        assert_eq!(read(&mut s).as_deref(), Some("st"));
        assert_eq!(
            s.term.output_str(),
            "> st\r\nstatus stop   \r\n> st\r\x1b[4C"
        );
    }

    #[test]
    fn unique_completion_inserts_suffix() {
        let mut s = session(ScriptedTerminal::new().input(b"st\t\r"));
        s.bind_key(b'\t', complete_status).unwrap();
        assert_eq!(read(&mut s).as_deref(), Some("status"));
        assert_eq!(s.term.output_str(), "> status");
    }

    // -- Failures -------------------------------------------------------------

    #[test]
    fn setup_failure_leaves_attributes() {
        let mut s = session(ScriptedTerminal::new().failing_setup().input(b"x\r"));
        let before = s.term.attributes();
        assert!(matches!(s.readline("> "), Err(ReadlineError::Setup(_))));
        assert_eq!(s.term.attributes(), before);
        assert_eq!(s.term.output_str(), "\n");
    }

    #[test]
    fn read_failure_restores_terminal_and_history() {
        let mut s = session(ScriptedTerminal::new().input(b"ab").failing_reads());
        s.history_add("kept");
        let before = s.term.attributes();
        assert!(matches!(s.readline("> "), Err(ReadlineError::Read(_))));
        assert_eq!(s.term.attributes(), before);
        assert!(!s.term.is_raw());
        assert_eq!(s.history(), ["kept"]);
    }

    #[test]
    fn handler_failure_aborts_read() {
        let mut s = session(ScriptedTerminal::new().input(b"ab\x18cd\r"));
        s.bind_key(ctrl(b'x'), give_up).unwrap();
        let before = s.term.attributes();
        assert!(matches!(s.readline("> "), Err(ReadlineError::Aborted)));
        assert_eq!(s.term.attributes(), before);
        assert!(s.history().is_empty());
        // The rest of the input is left for the next read.
        assert_eq!(read(&mut s).as_deref(), Some("cd"));
    }

    #[test]
    fn write_failure_aborts_read() {
        let mut s = session(ScriptedTerminal::new().failing_writes().input(b"x\r"));
        assert!(matches!(s.readline("> "), Err(ReadlineError::Write(_))));
        assert!(!s.term.is_raw());
    }

    #[test]
    fn end_of_input_survives_failed_newline() {
        let mut s = session(ScriptedTerminal::new().non_tty().failing_writes().input(b"\n"));
        assert_eq!(read(&mut s).as_deref(), Some(""));
        assert_eq!(read(&mut s), None);
    }

    // -- Misc -----------------------------------------------------------------

    #[test]
    fn print_and_clear_screen() {
        let mut s = session(ScriptedTerminal::new().with_width(132));
        s.print(b"note\r\n").unwrap();
        s.clear_screen().unwrap();
        assert_eq!(s.term.output_str(), "note\r\n\x1b[H\x1b[2J");
        assert_eq!(s.terminal_width(), 132);
    }

    #[test]
    fn close_restores_terminal() {
        let s = session(ScriptedTerminal::new());
        assert!(s.close().is_ok());
    }
}
