//! `<template-args>`, `<template-arg>`, and `<template-param>` (spec §4.5.6, §4.6).
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `rule_template_args`
//! and `rule_template_param`, including the forward-reference bookkeeping the
//! latter performs (spec §3.4): a `<template-param>` encountered while
//! `permit_forward_template_refs` is unset (we're still inside the very
//! `<template-args>` it would refer to) allocates a [`crate::ast::FwdRefId`]
//! instead of resolving immediately, to be patched in later by
//! [`crate::template_env::TemplateEnv::resolve`].

use crate::ast::Node;
use crate::context::Context;
use crate::error::{DemangleError, PResult};
use crate::grammar::expr::parse_expr;
use crate::grammar::ty::parse_type;
use crate::lex;

/// `<template-args>`: `I <template-arg>+ E`. `push_subst` also controls
/// whether this occurrence establishes a new template-parameter frame: the
/// entity-level call sites (a name's own trailing args, a nested-name
/// component's args) pass `true` and become addressable by later
/// `<template-param>`s in the same encoding (including outer-level `TL<n>_`
/// references from nested scopes); a plain type-argument list nested inside
/// another (`vector<pair<int, int>>`'s `pair<int, int>`) passes `false` and
/// is not separately addressable.
pub(crate) fn parse_template_args<'a>(ctx: &mut Context<'a>, push_subst: bool) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_char(b'I') {
        return Err(DemangleError::Syntax);
    }
    let prev = ctx.templates.enter_forward_ref_scope();
    let mut args = Vec::new();
    loop {
        args.push(parse_template_arg(ctx)?);
        if ctx.cursor.accept_char(b'E') {
            break;
        }
    }
    ctx.templates.restore_forward_ref_scope(prev);

    let args = if push_subst {
        let frame0 = args.clone();
        args.into_iter()
            .map(|a| ctx.templates.resolve(a, &frame0))
            .collect()
    } else {
        args
    };
    if push_subst {
        ctx.templates.push_frame(args.clone());
    }
    Ok(Node::TemplateArgs(args))
}

/// `<template-arg>`: a type, an expression, `X <expression> E`, a pack, or
/// one of the above followed by a discarded `Q <expression> E` constraint
/// (spec §4.5.6).
pub(crate) fn parse_template_arg<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.accept_char(b'X') {
        let expr = parse_expr(ctx)?;
        if !ctx.cursor.accept_char(b'E') {
            return Err(DemangleError::Syntax);
        }
        return finish_template_arg(ctx, expr);
    }
    if ctx.cursor.peek() == Some(b'J') {
        ctx.cursor.advance();
        let mut elems = Vec::new();
        while !ctx.cursor.accept_char(b'E') {
            elems.push(parse_template_arg(ctx)?);
        }
        return Ok(Node::TemplateArgumentPack(elems));
    }
    let checkpoint = ctx.checkpoint();
    match crate::grammar::expr::parse_expr_primary(ctx) {
        Ok(lit) => return finish_template_arg(ctx, lit),
        Err(_) => ctx.restore(checkpoint),
    }
    let ty = parse_type(ctx)?;
    finish_template_arg(ctx, ty)
}

/// Parses and discards an optional per-argument `Q <expression> E`
/// constraint that may trail a template argument (spec §4.5.6).
fn finish_template_arg<'a>(ctx: &mut Context<'a>, arg: Node<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.accept_char(b'Q') {
        parse_expr(ctx)?;
        if !ctx.cursor.accept_char(b'E') {
            return Err(DemangleError::Syntax);
        }
    }
    Ok(arg)
}

fn parse_nonneg_u32(ctx: &mut Context) -> PResult<u32> {
    let (_, digits) = lex::parse_number(&mut ctx.cursor, false);
    if digits.is_empty() {
        return Ok(0);
    }
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(DemangleError::Overflow)
}

/// `<template-param>`: `T_` / `T <parameter-2> _` (level 0, the innermost
/// enclosing template), or `TL <level> _ <parameter-2> _` (an outer level,
/// counting outward from the innermost). A level-0 reference encountered
/// before its own `<template-args>` has finished parsing (forward
/// references are legal: `template<class T, T* P> ...`) is represented as a
/// [`Node::FwdTemplateRef`] to be patched by [`crate::template_env::TemplateEnv::resolve`];
/// references to an already-complete outer level resolve immediately.
pub(crate) fn parse_template_param<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_char(b'T') {
        return Err(DemangleError::Syntax);
    }
    let level = if ctx.cursor.accept_char(b'L') {
        let n = parse_nonneg_u32(ctx)?;
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        n + 1
    } else {
        0
    };
    let index = parse_nonneg_u32(ctx)?;
    if !ctx.cursor.accept_char(b'_') {
        return Err(DemangleError::Syntax);
    }

    if level == 0 {
        if let Some(node) = ctx.templates.get(0, index) {
            return Ok(node);
        }
        if ctx.templates.permit_forward_refs() {
            let id = ctx.templates.alloc_forward_ref(index as usize);
            return Ok(Node::FwdTemplateRef(id));
        }
        return Err(DemangleError::UnresolvedForwardRef);
    }
    ctx.templates
        .get(level, index)
        .ok_or(DemangleError::UnresolvedForwardRef)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Opts;

    #[test]
    fn template_args_parses_a_single_type_arg() {
        let mut ctx = Context::new(b"IiE", Opts::default());
        let node = parse_template_args(&mut ctx, true).unwrap();
        match node {
            Node::TemplateArgs(args) => assert_eq!(args.len(), 1),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn template_param_t_underscore_outside_any_frame_is_an_error() {
        let mut ctx = Context::new(b"T_", Opts::default());
        assert!(parse_template_param(&mut ctx).is_err());
    }

    #[test]
    fn template_param_t_underscore_forward_ref_inside_its_own_args_list() {
        // `I T_ E`: inside the args list that defines index 0, a reference to
        // that very index can't resolve yet and becomes a forward ref.
        let mut ctx = Context::new(b"IT_E", Opts::default());
        let node = parse_template_args(&mut ctx, true).unwrap();
        match node {
            Node::TemplateArgs(args) => {
                assert_eq!(args.len(), 1);
                assert!(matches!(args[0], Node::FwdTemplateRef(_)));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
