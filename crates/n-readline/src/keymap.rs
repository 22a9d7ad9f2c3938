//! Key bindings — a byte trie from input sequences to handlers.
//!
//! Every node has 256 slots, one per byte value. A slot can hold a handler,
//! a child node, or both. Lookup is greedy: the first slot on the path that
//! holds a handler wins, even when a longer bound sequence shares the
//! prefix. Binding `ESC` alone therefore shadows every escape sequence.
//!
//! Multi-byte sequences may arrive split across reads, so the lookup pulls
//! continuation bytes through a caller-supplied source. The session gives
//! it a bounded read: a sender that stops mid-sequence produces an unbound
//! result rather than a hang.

use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::editor::Editor;
use crate::error::{ReadlineError, Result};

/// Something a key sequence can be bound to.
///
/// Handlers communicate with the read loop only through the [`Editor`]:
/// they edit the line and set outcome flags (done, refresh, error, ...).
/// A returned error aborts the read the same way [`Editor::fail`] does.
/// State a handler needs lives in the implementor; closures capture it.
pub trait KeyHandler {
    /// Handle `key`, the complete byte sequence that matched.
    ///
    /// # Errors
    ///
    /// Any error aborts the current read and is returned from it.
    fn handle(&self, editor: &mut Editor<'_>, key: &[u8]) -> Result<()>;
}

impl<F> KeyHandler for F
where
    F: Fn(&mut Editor<'_>, &[u8]) -> Result<()>,
{
    fn handle(&self, editor: &mut Editor<'_>, key: &[u8]) -> Result<()> {
        self(editor, key)
    }
}

/// A resolved lookup: the handler and the bytes that selected it.
pub struct Binding {
    pub handler: Rc<dyn KeyHandler>,
    pub key: Vec<u8>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("key", &self.key).finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Slot {
    handler: Option<Rc<dyn KeyHandler>>,
    child: Option<Box<Node>>,
}

struct Node {
    slots: Box<[Slot]>,
}

impl Node {
    fn new() -> Self {
        Self {
            slots: (0..=u8::MAX).map(|_| Slot::default()).collect(),
        }
    }
}

/// Byte-sequence → handler table.
pub struct Keymap {
    root: Node,
}

impl Keymap {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { root: Node::new() }
    }

    /// Bind `seq` to `handler`, replacing any handler at exactly `seq`.
    ///
    /// Intermediate nodes are created as needed.
    ///
    /// # Errors
    ///
    /// [`ReadlineError::EmptyKeySequence`] if `seq` is empty.
    pub fn bind(&mut self, seq: &[u8], handler: Rc<dyn KeyHandler>) -> Result<()> {
        let Some((&last, prefix)) = seq.split_last() else {
            return Err(ReadlineError::EmptyKeySequence);
        };

        let mut node = &mut self.root;
        for (depth, &byte) in prefix.iter().enumerate() {
            let slot = &mut node.slots[usize::from(byte)];
            if slot.handler.is_some() {
                warn!(
                    seq = ?seq,
                    shadowed_by = ?&seq[..=depth],
                    "binding is unreachable behind a shorter sequence"
                );
            }
            node = slot.child.get_or_insert_with(|| Box::new(Node::new()));
        }

        let slot = &mut node.slots[usize::from(last)];
        if slot.child.is_some() {
            warn!(seq = ?seq, "binding shadows longer sequences");
        }
        slot.handler = Some(handler);
        Ok(())
    }

    /// Resolve the sequence starting with `first`.
    ///
    /// `next` supplies continuation bytes and returns `None` when none
    /// arrives in time. Returns `None` for an unbound sequence; the bytes
    /// consumed so far are dropped.
    pub fn lookup(&self, first: u8, mut next: impl FnMut() -> Option<u8>) -> Option<Binding> {
        let mut node = &self.root;
        let mut key = vec![first];
        let mut byte = first;

        loop {
            let slot = &node.slots[usize::from(byte)];
            if let Some(handler) = &slot.handler {
                return Some(Binding {
                    handler: Rc::clone(handler),
                    key,
                });
            }
            node = slot.child.as_deref()?;
            let Some(b) = next() else {
                trace!(key = ?key, "incomplete key sequence discarded");
                return None;
            };
            byte = b;
            key.push(byte);
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Keymap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn count(node: &Node) -> usize {
            node.slots
                .iter()
                .map(|s| usize::from(s.handler.is_some()) + s.child.as_deref().map_or(0, count))
                .sum()
        }
        f.debug_struct("Keymap")
            .field("bindings", &count(&self.root))
            .finish()
    }
}
