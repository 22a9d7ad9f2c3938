// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, width query, tty detection, byte I/O.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty and poll. These are the standard
// POSIX interfaces for terminal control — there is no safe alternative.
// Each unsafe block is minimal and only touches stack-owned structs and
// descriptors this module owns.
#![allow(unsafe_code)]
//
// The line editor talks to the terminal through the `Terminal` trait, so
// the whole edit loop can run against an in-memory script in tests. `Tty`
// is the real implementation over a pair of owned file descriptors.
//
// Raw mode here is deliberately milder than `cfmakeraw`: output
// postprocessing stays on with newline translation (`OPOST | ONLCR`), so
// a `\n` written by the client still lands at column 0. Everything else
// (canonical mode, echo, signal keys, input translation) is off.
//
// Raw mode is descriptor-global state. `RawMode` is the scope guard: it
// enables raw mode on construction and restores the saved attributes on
// drop, on every exit path including `?` returns and unwinding.

use std::io;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

/// Width assumed when the terminal cannot report one.
pub const DEFAULT_WIDTH: usize = 80;

/// Terminals known to mishandle the escape sequences used for editing.
const INCAPABLE_TERMS: &[&str] = &["dumb", "cons25", "emacs"];

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Raw mode could not be entered or left.
#[derive(Debug, Error)]
pub enum TermError {
    #[error("input is not a terminal")]
    NotATerminal,

    #[error("failed to read terminal attributes: {0}")]
    GetAttributes(#[source] io::Error),

    #[error("failed to apply terminal attributes: {0}")]
    SetAttributes(#[source] io::Error),
}

// ─── Terminal Trait ─────────────────────────────────────────────────────────

/// The byte-level terminal service the line editor runs on.
///
/// `read_byte` and `write_all` are the "read one byte with an optional
/// bounded wait" and "write all bytes" primitives. Implementations retry
/// transient interruption (`EINTR`) internally and never surface it.
pub trait Terminal {
    /// Whether the input side is an interactive terminal.
    fn is_tty(&self) -> bool;

    /// Enter raw mode, saving the current attributes.
    ///
    /// # Errors
    ///
    /// [`TermError::NotATerminal`] if the input is not a terminal, or an
    /// attribute error if the attributes cannot be read or applied.
    fn enable_raw(&mut self) -> Result<(), TermError>;

    /// Restore the attributes saved by [`enable_raw`](Self::enable_raw).
    ///
    /// A no-op when raw mode is not active.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved attributes cannot be reapplied.
    fn disable_raw(&mut self) -> Result<(), TermError>;

    /// Whether raw mode is currently active.
    fn is_raw(&self) -> bool;

    /// Terminal width in columns, or [`DEFAULT_WIDTH`] if unknown.
    fn width(&self) -> usize;

    /// Read one byte.
    ///
    /// `None` blocks until a byte arrives. `Some(wait)` gives up after
    /// `wait` and returns `Ok(None)`. End of input also returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor fails.
    fn read_byte(&mut self, timeout: Option<Duration>) -> io::Result<Option<u8>>;

    /// Write every byte of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output descriptor fails.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn is_tty(&self) -> bool {
        (**self).is_tty()
    }

    fn enable_raw(&mut self) -> Result<(), TermError> {
        (**self).enable_raw()
    }

    fn disable_raw(&mut self) -> Result<(), TermError> {
        (**self).disable_raw()
    }

    fn is_raw(&self) -> bool {
        (**self).is_raw()
    }

    fn width(&self) -> usize {
        (**self).width()
    }

    fn read_byte(&mut self, timeout: Option<Duration>) -> io::Result<Option<u8>> {
        (**self).read_byte(timeout)
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_all(bytes)
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Whether `name` (a `$TERM` value) is known not to support editing.
#[must_use]
pub fn is_incapable_terminal(name: &str) -> bool {
    INCAPABLE_TERMS.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// The `$TERM` value of this process, if set.
#[must_use]
pub fn term_name() -> Option<String> {
    std::env::var("TERM").ok()
}

// ─── RawMode Guard ──────────────────────────────────────────────────────────

/// Scope guard for raw mode.
///
/// Derefs to the wrapped terminal. Dropping the guard restores the
/// original attributes; a failed restore is logged since `Drop` cannot
/// report it.
///
/// # Example
///
/// ```no_run
/// use n_term::terminal::{RawMode, Terminal, Tty};
///
/// let mut tty = Tty::stdio()?;
/// {
///     let mut raw = RawMode::enable(&mut tty)?;
///     raw.write_all(b"press a key")?;
///     let _ = raw.read_byte(None)?;
/// } // attributes restored here
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RawMode<'a, T: Terminal + ?Sized> {
    term: &'a mut T,
}

impl<'a, T: Terminal + ?Sized> RawMode<'a, T> {
    /// Enter raw mode on `term`.
    ///
    /// # Errors
    ///
    /// Propagates the setup error from [`Terminal::enable_raw`]; the
    /// terminal is left untouched in that case.
    pub fn enable(term: &'a mut T) -> Result<Self, TermError> {
        term.enable_raw()?;
        Ok(Self { term })
    }
}

impl<T: Terminal + ?Sized> Deref for RawMode<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.term
    }
}

impl<T: Terminal + ?Sized> DerefMut for RawMode<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.term
    }
}

impl<T: Terminal + ?Sized> Drop for RawMode<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.term.disable_raw() {
            warn!(%err, "failed to restore terminal attributes");
        }
    }
}

// ─── Tty ────────────────────────────────────────────────────────────────────

#[cfg(unix)]
pub use self::unix::Tty;

#[cfg(unix)]
mod unix {
    use std::fs::File;
    use std::io::{self, Read, Write};
    use std::os::fd::{AsFd, AsRawFd, OwnedFd};
    use std::time::Duration;

    use tracing::debug;

    use super::{DEFAULT_WIDTH, TermError, Terminal};

    /// A terminal over an owned input and output descriptor.
    ///
    /// Restores the original attributes on drop if raw mode is still active.
    pub struct Tty {
        input: File,
        output: File,
        /// Attributes saved when raw mode was entered. `Some` while raw.
        original: Option<libc::termios>,
        /// Cached at construction: whether the input is a terminal.
        is_tty: bool,
    }

    impl std::fmt::Debug for Tty {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Tty")
                .field("input", &self.input.as_raw_fd())
                .field("output", &self.output.as_raw_fd())
                .field("raw", &self.original.is_some())
                .field("is_tty", &self.is_tty)
                .finish()
        }
    }

    impl Tty {
        /// Wrap an input and an output descriptor.
        pub fn new(input: impl Into<OwnedFd>, output: impl Into<OwnedFd>) -> Self {
            let input = File::from(input.into());
            let output = File::from(output.into());
            let is_tty = unsafe { libc::isatty(input.as_raw_fd()) != 0 };
            Self {
                input,
                output,
                original: None,
                is_tty,
            }
        }

        /// A terminal over duplicates of this process's stdin and stdout.
        ///
        /// # Errors
        ///
        /// Returns an error if either descriptor cannot be duplicated.
        pub fn stdio() -> io::Result<Self> {
            let input = io::stdin().as_fd().try_clone_to_owned()?;
            let output = io::stdout().as_fd().try_clone_to_owned()?;
            Ok(Self::new(input, output))
        }

        /// Wait until the input is readable or `timeout` expires.
        fn wait_readable(&self, timeout: Duration) -> io::Result<bool> {
            let ms = libc::c_int::try_from(timeout.as_millis()).unwrap_or(libc::c_int::MAX);
            loop {
                let ready = unsafe {
                    let mut pfd = libc::pollfd {
                        fd: self.input.as_raw_fd(),
                        events: libc::POLLIN,
                        revents: 0,
                    };
                    libc::poll(&raw mut pfd, 1, ms)
                };
                if ready >= 0 {
                    return Ok(ready > 0);
                }
                let err = io::Error::last_os_error();
                if err.kind() != io::ErrorKind::Interrupted {
                    return Err(err);
                }
            }
        }
    }

    impl Terminal for Tty {
        fn is_tty(&self) -> bool {
            self.is_tty
        }

        fn enable_raw(&mut self) -> Result<(), TermError> {
            if self.original.is_some() {
                return Ok(());
            }
            if !self.is_tty {
                return Err(TermError::NotATerminal);
            }

            let fd = self.input.as_raw_fd();
            let mut termios: libc::termios = unsafe { std::mem::zeroed() };
            if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
                return Err(TermError::GetAttributes(io::Error::last_os_error()));
            }
            let original = termios;

            // No input translation, no flow control, no canonical mode,
            // no echo, no signal keys. Output keeps newline translation.
            termios.c_iflag = 0;
            termios.c_oflag = libc::OPOST | libc::ONLCR;
            termios.c_lflag = 0;

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if unsafe { libc::tcsetattr(fd, libc::TCSADRAIN, &raw const termios) } != 0 {
                return Err(TermError::SetAttributes(io::Error::last_os_error()));
            }

            self.original = Some(original);
            debug!(fd, "entered raw mode");
            Ok(())
        }

        fn disable_raw(&mut self) -> Result<(), TermError> {
            if let Some(ref original) = self.original {
                let fd = self.input.as_raw_fd();
                if unsafe { libc::tcsetattr(fd, libc::TCSADRAIN, original) } != 0 {
                    return Err(TermError::SetAttributes(io::Error::last_os_error()));
                }
                self.original = None;
                debug!(fd, "left raw mode");
            }
            Ok(())
        }

        fn is_raw(&self) -> bool {
            self.original.is_some()
        }

        fn width(&self) -> usize {
            let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
            let result =
                unsafe { libc::ioctl(self.output.as_raw_fd(), libc::TIOCGWINSZ, &raw mut ws) };
            if result == 0 && ws.ws_col > 0 {
                usize::from(ws.ws_col)
            } else {
                DEFAULT_WIDTH
            }
        }

        fn read_byte(&mut self, timeout: Option<Duration>) -> io::Result<Option<u8>> {
            if let Some(wait) = timeout {
                if !self.wait_readable(wait)? {
                    return Ok(None);
                }
            }

            let mut byte = [0u8; 1];
            loop {
                match self.input.read(&mut byte) {
                    Ok(0) => return Ok(None),
                    Ok(_) => return Ok(Some(byte[0])),
                    Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                    Err(err) => return Err(err),
                }
            }
        }

        fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
            // `Write::write_all` already retries `Interrupted`.
            self.output.write_all(bytes)?;
            self.output.flush()
        }
    }

    impl Drop for Tty {
        fn drop(&mut self) {
            if self.original.is_some() {
                let _ = self.disable_raw();
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
