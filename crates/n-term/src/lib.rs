// SPDX-License-Identifier: MIT
//
// n-term — Terminal layer for n-line.
//
// Everything the line editor needs from a terminal and nothing more:
// raw-mode entry and scoped restore via termios, width query, tty and
// incapable-terminal detection, byte-at-a-time reads with an optional
// bounded wait, and the handful of ANSI sequences used to repaint a
// wrapped prompt line.
//
// This crate intentionally avoids external terminal abstractions
// (crossterm, termion) in favor of direct control via ANSI escape
// sequences and raw termios. Every byte sent to the terminal is
// accounted for.

pub mod ansi;
pub mod output;
pub mod script;
pub mod terminal;

pub use output::OutputBuffer;
pub use script::ScriptedTerminal;
#[cfg(unix)]
pub use terminal::Tty;
pub use terminal::{DEFAULT_WIDTH, RawMode, TermError, Terminal, is_incapable_terminal, term_name};
