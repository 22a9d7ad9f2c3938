//! Completion — common-prefix insertion and the candidate table.
//!
//! The editor has no idea what is being completed. A handler (usually
//! bound to Tab) works out the word under the cursor, produces candidates
//! and calls [`Editor::complete`] with the offset where that word starts.

use std::fmt::Write as _;

use crate::editor::Editor;
use crate::error::Result;

impl Editor<'_> {
    /// Complete the word that starts at `anchor` and ends at the point.
    ///
    /// Inserts whatever the candidates share beyond what is already typed.
    /// Returns `true` when the completion is settled: there was a single
    /// candidate, or `allow_prefix` is set and the shared prefix is itself
    /// a candidate. When nothing could be inserted and several candidates
    /// remain, they are listed below the line and the line is redrawn.
    ///
    /// An empty candidate list changes nothing and returns `false`.
    ///
    /// # Errors
    ///
    /// Allocation or terminal write failure.
    pub fn complete<S: AsRef<str>>(
        &mut self,
        anchor: usize,
        candidates: &[S],
        allow_prefix: bool,
    ) -> Result<bool> {
        let Some((first, rest)) = candidates.split_first() else {
            return Ok(false);
        };
        let first = first.as_ref().as_bytes();

        let common = rest.iter().fold(first.len(), |len, c| {
            common_prefix_len(&first[..len], c.as_ref().as_bytes())
        });

        let typed = self.point().saturating_sub(anchor);
        let inserted = common > typed;
        if inserted {
            self.insert_text(&first[typed..common])?;
        }

        if rest.is_empty() {
            return Ok(true);
        }
        if allow_prefix && candidates.iter().any(|c| c.as_ref().len() == common) {
            return Ok(true);
        }
        if !inserted {
            self.display_matches(candidates)?;
            self.repaint(false)?;
        }
        Ok(false)
    }

    /// Print `candidates` as a table below the line.
    ///
    /// Columns are as wide as the longest candidate plus one space, and as
    /// many as fit the terminal width (at least one). The cursor ends at the
    /// start of the row after the table.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::Write`](crate::ReadlineError::Write) if the terminal
    /// write fails.
    pub fn display_matches<S: AsRef<str>>(&mut self, candidates: &[S]) -> Result<()> {
        let table = format_matches(candidates, self.terminal_width());
        self.print(table.as_bytes())
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn format_matches<S: AsRef<str>>(candidates: &[S], width: usize) -> String {
    let max = candidates
        .iter()
        .map(|c| c.as_ref().len())
        .max()
        .unwrap_or(0);
    let cols = (width / (max + 1)).max(1);

    let mut out = String::from("\r\n");
    for row in candidates.chunks(cols) {
        for c in row {
            // Infallible for String.
            let _ = write!(out, "{:<max$} ", c.as_ref());
        }
        out.push_str("\r\n");
    }
    out
}
