//! Recursive-descent grammar for the Itanium mangling language (spec §4.5).
//!
//! Each production is an ordinary function over [`crate::context::Context`]
//! returning [`crate::error::PResult`]; ordered choice is expressed as plain
//! `match`/early-return code rather than a table, per the Design Notes.

pub(crate) mod expr;
pub(crate) mod mangled_name;
pub(crate) mod name;
pub(crate) mod operator;
pub(crate) mod special_name;
pub(crate) mod template_args;
pub(crate) mod ty;
