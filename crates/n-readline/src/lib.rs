//! n-readline — an embeddable interactive line editor.
//!
//! Reads one line at a time from a terminal with in-place editing: cursor
//! movement, deletion and kill commands, history recall, and completion
//! driven by the host. Long lines wrap across rows and are repainted with
//! relative cursor moves, so no terminal database is needed.
//!
//! # Architecture
//!
//! ```text
//!   Session ──► RawMode guard (n-term)
//!      │
//!      ├─ read byte ──► Keymap (byte trie) ──► KeyHandler
//!      │                                          │
//!      │                        Editor ◄──────────┘
//!      │                  (TextBuffer, History, Outcome flags)
//!      │
//!      └─ apply Outcome ──► render: echo | cursor move | full repaint
//! ```
//!
//! Everything terminal-specific sits behind [`n_term::Terminal`], so a
//! whole session can run against [`n_term::ScriptedTerminal`] in tests.
//!
//! The editor works on bytes: one byte is one column. Wide characters and
//! combining marks are not measured.

pub mod bindings;
pub mod buffer;
mod complete;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod history;
pub mod keymap;
mod render;
pub mod session;

pub use buffer::TextBuffer;
pub use config::Config;
pub use editor::{Editor, Outcome};
pub use error::{ReadlineError, Result};
pub use history::History;
pub use keymap::KeyHandler;
pub use session::Session;
