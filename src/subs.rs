//! The substitution table (spec §3.3, §4.4).
//!
//! Append-only for the duration of one `demangle` call: entries are pushed
//! as substitutable components are parsed and never removed, only rolled
//! back to a shorter length when a checkpoint restores (spec §4.1). Looked
//! up by the index `<seq-id>` decodes to (see [`crate::lex::parse_seq_id`]).

use crate::ast::Node;

#[derive(Debug, Default)]
pub(crate) struct Substitutions<'a> {
    entries: Vec<Node<'a>>,
}

impl<'a> Substitutions<'a> {
    pub(crate) fn new() -> Self {
        Substitutions { entries: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Roll back to a previously observed length, per [`crate::context::Checkpoint`].
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Record a newly parsed substitutable component. Returns its index.
    pub(crate) fn push(&mut self, node: Node<'a>) -> usize {
        self.entries.push(node);
        self.entries.len() - 1
    }

    /// Resolve a `<seq-id>`-decoded index to its substitution table entry.
    /// Substitutions are cloned out rather than borrowed, matching the
    /// AST's general clone-on-reuse rendering (spec §3.2's deep-clone
    /// allowance; see DESIGN.md).
    pub(crate) fn get(&self, index: usize) -> Option<Node<'a>> {
        self.entries.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_get_round_trips() {
        let mut subs = Substitutions::new();
        let idx = subs.push(Node::Builtin("int"));
        assert_eq!(idx, 0);
        assert!(matches!(subs.get(0), Some(Node::Builtin("int"))));
        assert!(subs.get(1).is_none());
    }

    #[test]
    fn truncate_rolls_back_to_checkpoint() {
        let mut subs = Substitutions::new();
        subs.push(Node::Builtin("int"));
        let checkpoint = subs.len();
        subs.push(Node::Builtin("float"));
        assert_eq!(subs.len(), 2);
        subs.truncate(checkpoint);
        assert_eq!(subs.len(), 1);
        assert!(subs.get(1).is_none());
    }
}
