//! `<name>` and its component productions (spec §4.5.2).
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `rule_name`,
//! `rule_nested_name`, `rule_unscoped_name`, `rule_unqualified_name`,
//! `rule_local_name`, `rule_ctor_dtor_name`, `parse_module_name`, and
//! `parse_abi_tags`.

use crate::ast::tag::{CvQuals, RefQuals, SpecialKind};
use crate::ast::{ElaboratedKeyword, LocalNameKind, Node};
use crate::context::Context;
use crate::error::{DemangleError, PResult};
use crate::grammar::operator;
use crate::grammar::template_args::parse_template_args;
use crate::grammar::ty::parse_type;
use crate::lex;

/// Threaded through a `name` parse; mirrors the reference parser's `NameState`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NameState {
    pub(crate) cv: CvQuals,
    pub(crate) ref_qual: RefQuals,
    pub(crate) is_conversion_ctor_dtor: bool,
    pub(crate) ends_with_template_args: bool,
}

/// `<name>`.
pub(crate) fn parse_name<'a>(ctx: &mut Context<'a>) -> PResult<(Node<'a>, NameState)> {
    ctx.enter_recursion()?;
    let result = parse_name_inner(ctx);
    ctx.exit_recursion();
    result
}

fn parse_name_inner<'a>(ctx: &mut Context<'a>) -> PResult<(Node<'a>, NameState)> {
    match ctx.cursor.peek() {
        Some(b'N') => parse_nested_name(ctx),
        Some(b'Z') => {
            let node = parse_local_name(ctx)?;
            Ok((node, NameState::default()))
        }
        _ => {
            let mut ns = NameState::default();
            let (mut node, is_subst) = parse_unscoped_name(ctx, &mut ns)?;
            // `<unscoped-template-name> <template-args>` — a plain unscoped
            // name or a back-reference to one may equally be followed by a
            // fresh `<template-args>` list (e.g. `SaIiE` = `std::allocator<int>`).
            // The pre-args name becomes a substitution candidate in its own
            // right, unless it already *is* one (no point re-adding a
            // back-reference); the combined name-with-args form is only
            // pushed by the caller when it's reached as a `<type>`.
            if ctx.cursor.peek() == Some(b'I') {
                if !is_subst {
                    ctx.subs.push(node.clone());
                }
                let args = parse_template_args(ctx, true)?;
                ns.ends_with_template_args = true;
                node = Node::NameWithTemplateArgs {
                    name: Box::new(node),
                    args: Box::new(args),
                };
            }
            Ok((node, ns))
        }
    }
}

/// `<unscoped-name>`: optional `St`, then a substitution or `<unqualified-name>`.
/// The returned bool is true iff the result is itself a raw substitution
/// reference (a back-reference or one of the seven special aliases) rather
/// than a freshly parsed name — callers use it to avoid re-adding a
/// back-reference to the substitution table under its own name.
fn parse_unscoped_name<'a>(ctx: &mut Context<'a>, ns: &mut NameState) -> PResult<(Node<'a>, bool)> {
    let is_std = ctx.cursor.accept_str(b"St");
    if !is_std && ctx.cursor.peek() == Some(b'S') {
        if let Some(subst) = try_parse_substitution(ctx)? {
            return Ok((subst, true));
        }
    }
    let inner = parse_unqualified_name(ctx, ns, None)?;
    if is_std {
        Ok((Node::StdQualified(Box::new(inner)), false))
    } else {
        Ok((inner, false))
    }
}

/// `<nested-name>`: `N [<CV-qualifiers>] [<ref-qualifier>] <prefix> E`.
fn parse_nested_name<'a>(ctx: &mut Context<'a>) -> PResult<(Node<'a>, NameState)> {
    if !ctx.cursor.accept_char(b'N') {
        return Err(DemangleError::Syntax);
    }
    let mut ns = NameState {
        cv: lex::parse_cv_qualifiers(&mut ctx.cursor),
        ref_qual: lex::parse_ref_qualifiers(&mut ctx.cursor),
        ..NameState::default()
    };

    // Every component parsed below pushes the *cumulative* prefix so far
    // (so a later `S_` referring to it reproduces the whole qualified path,
    // not just the bare leaf) onto the substitution table — except the
    // leading bare substitution used only as a starting scope. The very
    // last push is undone once the terminating `E` is reached: the nested
    // name's own complete value is never itself a substitution candidate;
    // only the generic `<type>`-level bookkeeping (if this name is in fact
    // being used as a type) adds an entry for the whole thing.
    let mut path: Vec<Node<'a>> = Vec::new();
    let mut scope: Option<Node<'a>> = None;
    let mut pushed_last = false;
    loop {
        if ctx.cursor.accept_char(b'E') {
            break;
        }
        ns.is_conversion_ctor_dtor = false;
        if ctx.cursor.peek() == Some(b'T') && !matches!(ctx.cursor.peek_at(1), Some(b's' | b'u' | b'e')) {
            let param = crate::grammar::template_args::parse_template_param(ctx)?;
            scope = Some(param.clone());
            path.push(param);
        } else if ctx.cursor.peek() == Some(b'I') {
            let args = parse_template_args(ctx, true)?;
            let prev = path.pop().ok_or(DemangleError::Syntax)?;
            let combined = Node::NameWithTemplateArgs {
                name: Box::new(prev),
                args: Box::new(args),
            };
            scope = Some(combined.clone());
            path.push(combined);
            ns.ends_with_template_args = true;
        } else if matches!(ctx.cursor.peek(), Some(b'D')) && matches!(ctx.cursor.peek_at(1), Some(b't' | b'T')) {
            let node = crate::grammar::expr::parse_decltype(ctx)?;
            scope = Some(node.clone());
            path.push(node);
        } else if ctx.cursor.peek() == Some(b'S') && path.is_empty() {
            // A substitution is only valid as the very first component,
            // used purely as a starting scope; it doesn't itself become a
            // fresh substitution entry (it already is one).
            if let Some(subst) = try_parse_substitution(ctx)? {
                scope = Some(subst.clone());
                path.push(subst);
                pushed_last = false;
                continue;
            }
            let component = parse_unqualified_name(ctx, &mut ns, scope.clone())?;
            scope = Some(component.clone());
            path.push(component);
        } else {
            let component = parse_unqualified_name(ctx, &mut ns, scope.clone())?;
            scope = Some(component.clone());
            path.push(component);
        }
        ctx.subs.push(Node::NestedName {
            path: path.clone(),
            cv: CvQuals::default(),
            ref_qual: RefQuals::default(),
        });
        pushed_last = true;
    }
    if pushed_last {
        ctx.subs.truncate(ctx.subs.len() - 1);
    }

    let node = Node::NestedName {
        path,
        cv: ns.cv,
        ref_qual: ns.ref_qual,
    };
    Ok((node, ns))
}

/// `<local-name>`: `Z <encoding> E` followed by one of the three entity shapes.
fn parse_local_name<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_char(b'Z') {
        return Err(DemangleError::Syntax);
    }
    let encoding = Box::new(crate::grammar::mangled_name::parse_encoding(ctx)?);
    if !ctx.cursor.accept_char(b'E') {
        return Err(DemangleError::Syntax);
    }
    if ctx.cursor.accept_char(b's') {
        let matched = lex::parse_discriminator(&mut ctx.cursor);
        let _ = matched;
        return Ok(Node::LocalName {
            encoding,
            kind: LocalNameKind::StringLiteral { discriminator: None },
        });
    }
    if ctx.cursor.accept_char(b'd') {
        let (_, digits) = lex::parse_number(&mut ctx.cursor, false);
        let arg_index = if digits.is_empty() {
            None
        } else {
            std::str::from_utf8(digits).ok().and_then(|s| s.parse().ok())
        };
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        let (name, _) = parse_name(ctx)?;
        return Ok(Node::LocalName {
            encoding,
            kind: LocalNameKind::DefaultArg {
                arg_index,
                name: Box::new(name),
            },
        });
    }
    let (name, _) = parse_name(ctx)?;
    lex::parse_discriminator(&mut ctx.cursor);
    Ok(Node::LocalName {
        encoding,
        kind: LocalNameKind::Name {
            name: Box::new(name),
            discriminator: None,
        },
    })
}

/// `<module-name>`: a chain of `W[P]<source-name>` segments.
pub(crate) fn parse_module_name<'a>(ctx: &mut Context<'a>) -> PResult<Option<Node<'a>>> {
    let mut parent: Option<Box<Node<'a>>> = None;
    let mut any = false;
    while ctx.cursor.peek() == Some(b'W') {
        let cp = ctx.checkpoint();
        ctx.cursor.advance();
        let partition = ctx.cursor.accept_char(b'P');
        match parse_source_name(ctx) {
            Ok(name) => {
                any = true;
                parent = Some(Box::new(Node::ModuleName {
                    partition,
                    parent: parent.take(),
                    name,
                }));
            }
            Err(_) => {
                ctx.restore(cp);
                break;
            }
        }
    }
    if any {
        Ok(parent.map(|b| *b))
    } else {
        Ok(None)
    }
}

/// `<unqualified-name>`.
fn parse_unqualified_name<'a>(
    ctx: &mut Context<'a>,
    ns: &mut NameState,
    scope: Option<Node<'a>>,
) -> PResult<Node<'a>> {
    let module = parse_module_name(ctx)?;
    let _is_member_like_friend = scope.is_some() && ctx.cursor.accept_char(b'F');
    ctx.cursor.accept_char(b'L');

    let mut result = if ctx.cursor.accept_str(b"DC") {
        let mut names = Vec::new();
        loop {
            names.push(Node::SourceName(parse_source_name(ctx)?));
            if ctx.cursor.accept_char(b'E') {
                break;
            }
        }
        Node::StructuredBinding(names)
    } else if ctx.cursor.peek() == Some(b'U') {
        parse_unnamed_type_name(ctx)?
    } else if matches!(ctx.cursor.peek(), Some(b'C' | b'D')) {
        let scope = scope.clone().ok_or(DemangleError::Syntax)?;
        if module.is_some() {
            return Err(DemangleError::Syntax);
        }
        parse_ctor_dtor_name(ctx, ns, scope)?
    } else if matches!(ctx.cursor.peek(), Some(b'0'..=b'9')) {
        Node::SourceName(parse_source_name(ctx)?)
    } else {
        parse_operator_name(ctx)?
    };

    if let Some(module) = module {
        result = Node::many(vec![result, module], "@");
    }
    result = parse_abi_tags(ctx, result)?;
    Ok(result)
}

/// `<source-name>`, rewriting the `_GLOBAL__N` anonymous-namespace marker.
pub(crate) fn parse_source_name<'a>(ctx: &mut Context<'a>) -> PResult<&'a [u8]> {
    let name = lex::parse_base_source_name(&mut ctx.cursor).ok_or(DemangleError::Syntax)?;
    if name.starts_with(b"_GLOBAL__N") {
        Ok(b"(anonymous namespace)")
    } else {
        Ok(name)
    }
}

fn parse_abi_tags<'a>(ctx: &mut Context<'a>, mut node: Node<'a>) -> PResult<Node<'a>> {
    while ctx.cursor.accept_char(b'B') {
        let tag = lex::parse_base_source_name(&mut ctx.cursor).ok_or(DemangleError::Syntax)?;
        node = Node::AbiTagTy {
            inner: Box::new(node),
            tag,
        };
    }
    Ok(node)
}

fn parse_ctor_dtor_name<'a>(
    ctx: &mut Context<'a>,
    ns: &mut NameState,
    mut scope: Node<'a>,
) -> PResult<Node<'a>> {
    if let Node::SpecialSubstitution(kind) = scope {
        scope = Node::ExpandedSpecialSubstitution(kind);
    }
    if ctx.cursor.accept_char(b'C') {
        let is_inherited = ctx.cursor.accept_char(b'I');
        match ctx.cursor.peek() {
            Some(b'1'..=b'5') => {
                ctx.cursor.advance();
            }
            _ => return Err(DemangleError::Syntax),
        }
        if is_inherited {
            parse_name(ctx)?;
        }
        ns.is_conversion_ctor_dtor = true;
        return Ok(Node::CtorDtorName {
            scope: Box::new(scope),
            is_dtor: false,
        });
    }
    if ctx.cursor.accept_char(b'D') {
        match ctx.cursor.peek() {
            Some(b'0'..=b'5') => {
                ctx.cursor.advance();
            }
            _ => return Err(DemangleError::Syntax),
        }
        ns.is_conversion_ctor_dtor = true;
        return Ok(Node::CtorDtorName {
            scope: Box::new(scope),
            is_dtor: true,
        });
    }
    Err(DemangleError::Syntax)
}

/// `<unnamed-type-name>` / closure-type-name, both introduced by `U`.
fn parse_unnamed_type_name<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.accept_str(b"Ut") {
        let start = ctx.cursor.pos();
        let (_, digits) = lex::parse_number(&mut ctx.cursor, false);
        let count = ctx.cursor.span_from(start);
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        let _ = digits;
        return Ok(Node::UnnamedTypeName(count));
    }
    if ctx.cursor.accept_str(b"Ul") {
        let mut params = Vec::new();
        if !ctx.cursor.accept_char(b'v') {
            while !matches!(ctx.cursor.peek(), Some(b'Q') | Some(b'E')) {
                params.push(parse_type(ctx)?);
            }
        }
        let requires1 = if ctx.cursor.accept_char(b'Q') {
            Some(Box::new(crate::grammar::expr::parse_expr(ctx)?))
        } else {
            None
        };
        if !ctx.cursor.accept_char(b'E') {
            return Err(DemangleError::Syntax);
        }
        let start = ctx.cursor.pos();
        lex::parse_non_neg_integer(&mut ctx.cursor);
        let count = ctx.cursor.span_from(start);
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        return Ok(Node::ClosureTyName {
            template_params: None,
            params,
            requires1,
            requires2: None,
            count,
        });
    }
    Err(DemangleError::Syntax)
}

pub(crate) fn parse_operator_name<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.accept_str(b"li") {
        let name = parse_source_name(ctx)?;
        return Ok(Node::LiteralOperatorName(name));
    }
    if ctx.cursor.peek() == Some(b'v') && matches!(ctx.cursor.peek_at(1), Some(b'0'..=b'9')) {
        let cp = ctx.checkpoint();
        ctx.cursor.advance();
        let index = ctx.cursor.advance().unwrap() - b'0';
        if let Ok(name) = parse_source_name(ctx) {
            return Ok(Node::VendorOperatorName { index, name });
        }
        ctx.restore(cp);
    }
    if ctx.cursor.peek() == Some(b'c') && ctx.cursor.peek_at(1) == Some(b'v') {
        ctx.cursor.advance();
        ctx.cursor.advance();
        let prev = ctx.templates.enter_forward_ref_scope();
        let ty = parse_type(ctx);
        ctx.templates.restore_forward_ref_scope(prev);
        let ty = ty?;
        return Ok(Node::ConvOpTy(Box::new(ty)));
    }
    if let Some(code) = ctx.cursor.remaining().get(0..2) {
        if let Some(entry) = operator::lookup(code) {
            ctx.cursor.advance();
            ctx.cursor.advance();
            return Ok(Node::OperatorName(entry));
        }
    }
    Err(DemangleError::Syntax)
}

/// `<substitution>`: `S_`, `S<seq-id>_`, or one of the seven special aliases.
/// Returns `Ok(None)` (consuming nothing) if the current position isn't `S`.
pub(crate) fn try_parse_substitution<'a>(ctx: &mut Context<'a>) -> PResult<Option<Node<'a>>> {
    if ctx.cursor.peek() != Some(b'S') {
        return Ok(None);
    }
    let cp = ctx.checkpoint();
    ctx.cursor.advance();
    let special = match ctx.cursor.peek() {
        Some(b't') => Some(SpecialKind::Std),
        Some(b'a') => Some(SpecialKind::Allocator),
        Some(b'b') => Some(SpecialKind::BasicString),
        Some(b's') => Some(SpecialKind::String),
        Some(b'i') => Some(SpecialKind::Istream),
        Some(b'o') => Some(SpecialKind::Ostream),
        Some(b'd') => Some(SpecialKind::Iostream),
        _ => None,
    };
    if let Some(kind) = special {
        ctx.cursor.advance();
        return Ok(Some(Node::SpecialSubstitution(kind)));
    }
    match lex::parse_seq_id(&mut ctx.cursor) {
        Some(index) => match ctx.subs.get(index) {
            Some(node) => Ok(Some(node)),
            None => {
                ctx.restore(cp);
                Err(DemangleError::OutOfRange)
            }
        },
        None => {
            ctx.restore(cp);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Opts;

    fn demangle_name(input: &[u8]) -> Node<'_> {
        let mut ctx = Context::new(input, Opts::default());
        parse_name(&mut ctx).unwrap().0
    }

    #[test]
    fn source_name_rewrites_anonymous_namespace() {
        let mut ctx = Context::new(b"13_GLOBAL__Nxx", Opts::default());
        let name = parse_source_name(&mut ctx).unwrap();
        assert_eq!(name, b"(anonymous namespace)");
    }

    #[test]
    fn unscoped_name_reads_plain_source_name() {
        let node = demangle_name(b"3foo");
        assert!(matches!(node, Node::SourceName(b"foo")));
    }

    #[test]
    fn std_prefixed_name_wraps_in_std_qualified() {
        let node = demangle_name(b"St3foo");
        match node {
            Node::StdQualified(inner) => assert!(matches!(*inner, Node::SourceName(b"foo"))),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
