// SPDX-License-Identifier: MIT
//
// Scripted terminal — an in-memory `Terminal` for driving the line editor
// without a real tty.
//
// Input is a queue of bytes and pauses. A pause models a gap in arrival
// long enough to expire a bounded read: a timed read that meets a pause
// consumes it and returns nothing, while a blocking read skips it. This is
// how tests reproduce a sender that transmits only a prefix of an escape
// sequence. A queued resize changes the reported width once reading
// reaches it, so a window can shrink partway through a line.
//
// Terminal attributes are simulated as a single mode word so tests can
// assert that what was observed before a read is what is observed after.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::terminal::{DEFAULT_WIDTH, TermError, Terminal};

/// Mode word reported while raw mode is active.
const RAW_ATTRIBUTES: u32 = 0;

/// Mode word of a freshly created cooked terminal.
const COOKED_ATTRIBUTES: u32 = 0x8a3b;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Byte(u8),
    Pause,
    Resize(usize),
}

/// An in-memory terminal with scripted input and captured output.
#[derive(Debug)]
pub struct ScriptedTerminal {
    input: VecDeque<Input>,
    output: Vec<u8>,
    writes: usize,
    width: usize,
    tty: bool,
    attributes: u32,
    saved: Option<u32>,
    fail_setup: bool,
    fail_writes: bool,
    fail_reads: bool,
}

impl ScriptedTerminal {
    /// An interactive 80-column terminal with no pending input.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: VecDeque::new(),
            output: Vec::new(),
            writes: 0,
            width: DEFAULT_WIDTH,
            tty: true,
            attributes: COOKED_ATTRIBUTES,
            saved: None,
            fail_setup: false,
            fail_writes: false,
            fail_reads: false,
        }
    }

    /// Queue `bytes` as input.
    #[must_use]
    pub fn input(mut self, bytes: &[u8]) -> Self {
        self.push_input(bytes);
        self
    }

    /// Queue a pause that expires the next bounded read.
    #[must_use]
    pub fn pause(mut self) -> Self {
        self.input.push_back(Input::Pause);
        self
    }

    /// Queue a width change that takes effect when reading reaches it.
    #[must_use]
    pub fn resize(mut self, width: usize) -> Self {
        self.input.push_back(Input::Resize(width));
        self
    }

    /// Set the reported width.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Report the input as a pipe or file rather than a terminal.
    #[must_use]
    pub const fn non_tty(mut self) -> Self {
        self.tty = false;
        self
    }

    /// Make attribute application fail, as for a revoked terminal.
    #[must_use]
    pub const fn failing_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }

    /// Make every write fail.
    #[must_use]
    pub const fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make every read fail once the scripted input is exhausted.
    #[must_use]
    pub const fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Queue more input after construction.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied().map(Input::Byte));
    }

    /// Change the reported width, as after a resize.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Everything written so far.
    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Take the captured output, leaving it empty.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Number of successful `write_all` calls.
    #[must_use]
    pub const fn write_count(&self) -> usize {
        self.writes
    }

    /// The simulated attribute word.
    #[must_use]
    pub const fn attributes(&self) -> u32 {
        self.attributes
    }
}

impl Default for ScriptedTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for ScriptedTerminal {
    fn is_tty(&self) -> bool {
        self.tty
    }

    fn enable_raw(&mut self) -> Result<(), TermError> {
        if self.saved.is_some() {
            return Ok(());
        }
        if !self.tty {
            return Err(TermError::NotATerminal);
        }
        if self.fail_setup {
            return Err(TermError::SetAttributes(io::Error::other(
                "scripted attribute failure",
            )));
        }
        self.saved = Some(self.attributes);
        self.attributes = RAW_ATTRIBUTES;
        Ok(())
    }

    fn disable_raw(&mut self) -> Result<(), TermError> {
        if let Some(saved) = self.saved.take() {
            self.attributes = saved;
        }
        Ok(())
    }

    fn is_raw(&self) -> bool {
        self.saved.is_some()
    }

    fn width(&self) -> usize {
        if self.width == 0 {
            DEFAULT_WIDTH
        } else {
            self.width
        }
    }

    fn read_byte(&mut self, timeout: Option<Duration>) -> io::Result<Option<u8>> {
        loop {
            match self.input.pop_front() {
                Some(Input::Byte(b)) => return Ok(Some(b)),
                Some(Input::Pause) if timeout.is_some() => return Ok(None),
                Some(Input::Pause) => {}
                Some(Input::Resize(width)) => self.set_width(width),
                None if self.fail_reads => {
                    return Err(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "scripted read failure",
                    ));
                }
                None => return Ok(None),
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted write failure",
            ));
        }
        self.output.extend_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
