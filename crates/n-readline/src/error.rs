//! Error type for the line editor.
//!
//! Only failures surface here. End of input is not an error: `readline`
//! reports it as `Ok(None)`, distinct from a submitted empty line. Unbound
//! input is not an error either; it is discarded.

use std::io;

use n_term::TermError;
use thiserror::Error;

/// Everything that can make a line read or a configuration call fail.
#[derive(Debug, Error)]
pub enum ReadlineError {
    /// Raw mode could not be entered.
    #[error("terminal setup failed: {0}")]
    Setup(#[from] TermError),

    /// The line buffer could not grow.
    #[error("line buffer allocation failed")]
    Alloc,

    /// Writing to the terminal failed.
    #[error("failed to write to terminal: {0}")]
    Write(#[source] io::Error),

    /// Reading from the terminal failed.
    #[error("failed to read from terminal: {0}")]
    Read(#[source] io::Error),

    /// A key binding was requested for an empty byte sequence.
    #[error("key sequence must not be empty")]
    EmptyKeySequence,

    /// A key handler called [`Editor::fail`](crate::Editor::fail).
    #[error("line read aborted by key handler")]
    Aborted,

    /// A history capacity below 1 was requested.
    #[error("history length must be at least 1")]
    InvalidHistoryLength,
}

/// Result alias used across the crate.
pub type Result<T, E = ReadlineError> = std::result::Result<T, E>;
