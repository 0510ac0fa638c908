//! Internal failure taxonomy for the demangler.
//!
//! Every grammar production signals failure by returning `false` (after
//! restoring its checkpoint, see [`crate::context::Checkpoint`]); this enum
//! exists only so that development-time assertions and tests can distinguish
//! *why* a parse failed. The public [`crate::demangle`] entry point collapses
//! every variant to `None`.

/// Reason a demangle attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DemangleError {
    /// No grammar alternative matched at the current position.
    #[error("no grammar alternative matched")]
    Syntax,
    /// A substitution or template-parameter index referenced a slot that
    /// does not exist.
    #[error("substitution or template-parameter index out of range")]
    OutOfRange,
    /// A forward template-parameter reference was never bound.
    #[error("unresolved forward template reference")]
    UnresolvedForwardRef,
    /// The cursor reached the end of input mid-production.
    #[error("unexpected end of input")]
    EndOfInput,
    /// A length field or base-10 literal overflowed.
    #[error("numeric literal overflowed")]
    Overflow,
    /// Recursion nested deeper than [`crate::MAX_RECURSION_DEPTH`].
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

pub(crate) type PResult<T> = Result<T, DemangleError>;
