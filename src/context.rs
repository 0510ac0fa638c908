//! Parser state threaded through every grammar production (spec §4.1).
//!
//! Mirrors the reference parser's `DemParser` struct: one cursor, one
//! substitution table, one template-parameter environment, a recursion
//! counter, and a couple of mode flags consulted by a handful of
//! productions (`nested_name`'s "are we still inside `::` components" and
//! `template_param`'s forward-reference permission).

use crate::cursor::Cursor;
use crate::error::{DemangleError, PResult};
use crate::subs::Substitutions;
use crate::template_env::TemplateEnv;
use crate::Opts;

/// A restore point captured by [`Context::checkpoint`] and handed back to
/// [`Context::restore`] when an ordered-choice alternative fails after
/// having partially committed state (substitutions pushed, template frames
/// entered, forward refs recorded).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    cursor_pos: usize,
    subs_len: usize,
    template_frames: usize,
    forward_refs: usize,
}

pub(crate) struct Context<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) subs: Substitutions<'a>,
    pub(crate) templates: TemplateEnv<'a>,
    pub(crate) opts: Opts,
    recursion_depth: u32,
}

impl<'a> Context<'a> {
    pub(crate) fn new(bytes: &'a [u8], opts: Opts) -> Self {
        Context {
            cursor: Cursor::new(bytes),
            subs: Substitutions::new(),
            templates: TemplateEnv::new(),
            opts,
            recursion_depth: 0,
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor_pos: self.cursor.pos(),
            subs_len: self.subs.len(),
            template_frames: self.templates.frame_count(),
            forward_refs: self.templates.forward_ref_count(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor.restore_to(checkpoint.cursor_pos);
        self.subs.truncate(checkpoint.subs_len);
        self.templates.truncate_frames(checkpoint.template_frames);
        self.templates.truncate_forward_refs(checkpoint.forward_refs);
    }

    /// Guards every recursive grammar entry point against pathologically
    /// deep or cyclic input (spec §4.1's "Edge cases": a crafted input must
    /// not blow the call stack). Callers wrap their body in
    /// `ctx.enter_recursion()?; let r = ...; ctx.exit_recursion(); r`.
    pub(crate) fn enter_recursion(&mut self) -> PResult<()> {
        self.recursion_depth += 1;
        if self.recursion_depth > crate::MAX_RECURSION_DEPTH {
            return Err(DemangleError::RecursionLimitExceeded);
        }
        Ok(())
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth -= 1;
    }

    /// Runs one ordered-choice alternative, restoring the checkpoint it
    /// started from if it fails. This is the sole backtracking primitive the
    /// grammar modules use; every `parse_*` alternative is tried through it.
    pub(crate) fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let checkpoint = self.checkpoint();
        let result = f(self);
        if result.is_err() {
            self.restore(checkpoint);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoint_restores_all_tracked_state() {
        let mut ctx = Context::new(b"abcdef", Opts::default());
        ctx.cursor.advance();
        ctx.subs.push(crate::ast::Node::Builtin("int"));
        ctx.templates.push_frame(vec![crate::ast::Node::Builtin("float")]);
        let cp = ctx.checkpoint();

        ctx.cursor.advance();
        ctx.subs.push(crate::ast::Node::Builtin("double"));
        ctx.templates.push_frame(vec![]);

        ctx.restore(cp);
        assert_eq!(ctx.cursor.pos(), 1);
        assert_eq!(ctx.subs.len(), 1);
        assert_eq!(ctx.templates.frame_count(), 1);
    }

    #[test]
    fn recursion_guard_trips_past_the_limit() {
        let mut ctx = Context::new(b"", Opts::default());
        for _ in 0..crate::MAX_RECURSION_DEPTH {
            ctx.enter_recursion().unwrap();
        }
        assert!(matches!(
            ctx.enter_recursion(),
            Err(DemangleError::RecursionLimitExceeded)
        ));
    }
}
