//! History log — a bounded list of previously entered lines.
//!
//! Oldest first. No two adjacent entries are equal. While a line is being
//! edited the newest entry is a scratch mirror of the live buffer; browsing
//! writes the edited text back into whichever entry is on screen before
//! moving, so edits to recalled lines survive until the read ends.

use tracing::debug;

use crate::error::{ReadlineError, Result};

/// Entries kept unless configured otherwise.
pub const DEFAULT_HISTORY_MAX_LEN: usize = 100;

/// Browse direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward older entries.
    Prev,
    /// Toward newer entries.
    Next,
}

/// Bounded line history.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    max_len: usize,
}

impl History {
    #[must_use]
    pub const fn new(max_len: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_len,
        }
    }

    /// Append `line`.
    ///
    /// Returns `false` without storing anything when history is disabled
    /// (capacity 0), `line` equals the newest entry, or the entry list
    /// cannot grow. At capacity the oldest entry is discarded first.
    pub fn add(&mut self, line: &str) -> bool {
        if self.max_len == 0 {
            return false;
        }
        if self.entries.last().is_some_and(|last| last == line) {
            return false;
        }
        if self.entries.len() >= self.max_len {
            self.entries.remove(0);
        } else if let Err(err) = self.entries.try_reserve(1) {
            debug!(%err, "history entry not stored");
            return false;
        }
        self.entries.push(line.to_owned());
        true
    }

    /// Change the capacity, keeping the newest entries.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::InvalidHistoryLength`] if `max_len` is 0; nothing
    /// changes in that case.
    pub fn set_max_len(&mut self, max_len: usize) -> Result<()> {
        if max_len < 1 {
            return Err(ReadlineError::InvalidHistoryLength);
        }
        if self.entries.len() > max_len {
            let excess = self.entries.len() - max_len;
            self.entries.drain(..excess);
            debug!(excess, max_len, "history trimmed");
        }
        self.max_len = max_len;
        Ok(())
    }

    /// Remove and return the newest entry.
    pub fn pop(&mut self) -> Option<String> {
        self.entries.pop()
    }

    #[must_use]
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Step through history while editing.
    ///
    /// `index` counts back from the newest entry. `current` is stored into
    /// the entry at `index`, then the index moves one step in `direction`.
    /// Returns the new index and the entry to show, or `None` when the step
    /// would leave the list or there is nothing to browse (one entry or
    /// fewer). On `None` the index stays where it was.
    pub fn browse(
        &mut self,
        index: usize,
        current: &str,
        direction: Direction,
    ) -> Option<(usize, &str)> {
        let len = self.entries.len();
        if len <= 1 || index >= len {
            return None;
        }

        let slot = len - 1 - index;
        if self.entries[slot] != current {
            current.clone_into(&mut self.entries[slot]);
        }

        let next = match direction {
            Direction::Prev if index + 1 < len => index + 1,
            Direction::Next if index > 0 => index - 1,
            _ => return None,
        };
        Some((next, &self.entries[len - 1 - next]))
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_MAX_LEN)
    }
}
