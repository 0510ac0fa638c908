//! `<expression>`, `<expr-primary>`, `<braced-expression>`, and the
//! unresolved-name forms an expression bottoms out in when it names
//! something that couldn't be resolved at the point of instantiation
//! (spec §4.5.5, §4.5.6).
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `rule_expression`,
//! `rule_expr_primary`, `rule_fold_expression`, `rule_braced_expression`,
//! `rule_function_param`, `rule_unresolved_name`, `rule_base_unresolved_name`,
//! `rule_unresolved_type`, `rule_unresolved_qualifier_level`, `rule_simple_id`,
//! and `rule_destructor_name`.

use crate::ast::{CastKind, FoldKind, Node};
use crate::context::Context;
use crate::error::{DemangleError, PResult};
use crate::grammar::name::{parse_operator_name, parse_source_name, try_parse_substitution};
use crate::grammar::operator::{self, OpKind, OperatorEntry};
use crate::grammar::template_args::{parse_template_arg, parse_template_args, parse_template_param};
use crate::grammar::ty::parse_type;
use crate::lex;

/// `<expression>` (spec §4.5.5). The operator-table dispatch mirrors the
/// reference parser's `rule_expression` switch; non-operator forms follow
/// in the same order, with `<unresolved-name>` as the final fallback.
pub(crate) fn parse_expr<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    ctx.enter_recursion()?;
    let result = parse_expr_inner(ctx);
    ctx.exit_recursion();
    result
}

/// Consumes and returns the two-character operator code at the cursor, if
/// one is in the table. Unlike [`operator::lookup`] (a pure peek used by
/// `name::parse_operator_name`), this advances past the code on a match,
/// matching the reference parser's `parse_operator_info`.
fn lookup_operator(ctx: &mut Context) -> Option<&'static OperatorEntry> {
    let code = ctx.cursor.remaining();
    if code.len() < 2 {
        return None;
    }
    let entry = operator::lookup(&code[0..2])?;
    ctx.cursor.advance();
    ctx.cursor.advance();
    Some(entry)
}

fn parse_expr_inner<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    let is_global = ctx.cursor.accept_str(b"gs");

    if let Some(op) = lookup_operator(ctx) {
        return parse_operator_expr(ctx, op, is_global);
    }

    match ctx.cursor.peek() {
        Some(b'L') => return parse_expr_primary(ctx),
        Some(b'T') => return parse_template_param(ctx),
        _ => {}
    }
    if ctx.cursor.peek() == Some(b'f') {
        let is_function_param = ctx.cursor.peek_at(1) == Some(b'p')
            || (ctx.cursor.peek_at(1) == Some(b'L') && matches!(ctx.cursor.peek_at(2), Some(b'0'..=b'9')));
        return if is_function_param { parse_function_param(ctx) } else { parse_fold_expression(ctx) };
    }
    if ctx.cursor.accept_str(b"il") {
        let mut elems = Vec::new();
        while !ctx.cursor.accept_char(b'E') {
            elems.push(parse_expr(ctx)?);
        }
        return Ok(Node::ListInitExpr { ty: None, elems });
    }
    if ctx.cursor.accept_str(b"tl") {
        let ty = parse_type(ctx)?;
        let mut elems = Vec::new();
        while !ctx.cursor.accept_char(b'E') {
            elems.push(parse_braced_expression(ctx)?);
        }
        return Ok(Node::ListInitExpr { ty: Some(Box::new(ty)), elems });
    }
    if ctx.cursor.accept_str(b"nx") {
        let inner = parse_expr(ctx)?;
        return Ok(Node::NoexceptExpr(Box::new(inner)));
    }
    if ctx.cursor.accept_str(b"tw") {
        let inner = parse_expr(ctx)?;
        return Ok(Node::ThrowExpr(Some(Box::new(inner))));
    }
    if ctx.cursor.accept_str(b"tr") {
        return Ok(Node::ThrowExpr(None));
    }
    if ctx.cursor.accept_str(b"sZ") {
        return if ctx.cursor.peek() == Some(b'T') {
            Ok(Node::PackSizeofTypeExpr(Box::new(parse_template_param(ctx)?)))
        } else {
            Ok(Node::PackSizeofExprExpr(Box::new(parse_function_param(ctx)?)))
        };
    }
    if ctx.cursor.accept_str(b"sP") {
        let mut args = Vec::new();
        while !ctx.cursor.accept_char(b'E') {
            args.push(parse_template_arg(ctx)?);
        }
        return Ok(Node::PackSizeofArgsExpr(Box::new(Node::many(args, ", "))));
    }
    if ctx.cursor.accept_str(b"sp") {
        let inner = parse_expr(ctx)?;
        return Ok(Node::PackExpansionExpr(Box::new(inner)));
    }
    if ctx.cursor.accept_char(b'u') {
        return parse_vendor_expr(ctx);
    }

    parse_unresolved_name(ctx, is_global)
}

fn parse_operator_expr<'a>(ctx: &mut Context<'a>, op: &'static OperatorEntry, is_global: bool) -> PResult<Node<'a>> {
    match op.kind {
        OpKind::Prefix => Ok(Node::PrefixExpr { op, operand: Box::new(parse_expr(ctx)?) }),
        OpKind::PrefixOrPostfix => {
            if ctx.cursor.accept_char(b'_') {
                Ok(Node::PrefixExpr { op, operand: Box::new(parse_expr(ctx)?) })
            } else {
                Ok(Node::PostfixExpr { op, operand: Box::new(parse_expr(ctx)?) })
            }
        }
        OpKind::Binary => {
            let lhs = parse_expr(ctx)?;
            let rhs = parse_expr(ctx)?;
            Ok(Node::BinaryExpr { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
        }
        OpKind::Array => {
            let lhs = parse_expr(ctx)?;
            let rhs = parse_expr(ctx)?;
            Ok(Node::ArraySubscriptExpr { lhs: Box::new(lhs), rhs: Box::new(rhs) })
        }
        OpKind::Member | OpKind::PtrMem => {
            let lhs = parse_expr(ctx)?;
            let rhs = parse_expr(ctx)?;
            Ok(Node::MemberExpr { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
        }
        OpKind::New => {
            let mut placement = Vec::new();
            while !ctx.cursor.accept_char(b'_') {
                placement.push(parse_expr(ctx)?);
            }
            let ty = parse_type(ctx)?;
            let init = if ctx.cursor.accept_str(b"pi") {
                let mut inits = Vec::new();
                while !ctx.cursor.accept_char(b'E') {
                    inits.push(parse_expr(ctx)?);
                }
                Some(Box::new(Node::many(inits, ", ")))
            } else {
                if !ctx.cursor.accept_char(b'E') {
                    return Err(DemangleError::Syntax);
                }
                None
            };
            Ok(Node::NewExpr {
                global: is_global,
                is_array: op.spelling.ends_with("[]"),
                placement,
                ty: Box::new(ty),
                init,
            })
        }
        OpKind::Del => Ok(Node::DeleteExpr {
            global: is_global,
            is_array: op.spelling.ends_with("[]"),
            operand: Box::new(parse_expr(ctx)?),
        }),
        OpKind::Call => {
            let callee = parse_expr(ctx)?;
            let mut args = Vec::new();
            while !ctx.cursor.accept_char(b'E') {
                args.push(parse_expr(ctx)?);
            }
            Ok(Node::CallExpr { callee: Box::new(callee), args })
        }
        OpKind::Conditional => {
            let cond = parse_expr(ctx)?;
            let then_branch = parse_expr(ctx)?;
            let else_branch = parse_expr(ctx)?;
            Ok(Node::ConditionalExpr {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            })
        }
        OpKind::NamedCast => {
            let kind = match op.mangled {
                "dc" => CastKind::Dynamic,
                "sc" => CastKind::Static,
                "cc" => CastKind::Const,
                "rc" => CastKind::Reinterpret,
                _ => return Err(DemangleError::Syntax),
            };
            let ty = parse_type(ctx)?;
            let operand = parse_expr(ctx)?;
            Ok(Node::CastExpr { kind, ty: Box::new(ty), operand: Box::new(operand) })
        }
        OpKind::OfIdOp => {
            // Second mangled letter distinguishes a type operand (`t`/`i`:
            // `st`/`at`/`ti`) from an expression operand (`z`/`e`: `sz`/`az`/`te`).
            let takes_type = matches!(op.mangled.as_bytes()[1], b't' | b'i');
            if op.mangled.starts_with('s') {
                Ok(if takes_type {
                    Node::SizeofTypeExpr(Box::new(parse_type(ctx)?))
                } else {
                    Node::SizeofExprExpr(Box::new(parse_expr(ctx)?))
                })
            } else if op.mangled.starts_with('a') {
                Ok(if takes_type {
                    Node::AlignofTypeExpr(Box::new(parse_type(ctx)?))
                } else {
                    Node::AlignofExprExpr(Box::new(parse_expr(ctx)?))
                })
            } else {
                Ok(if takes_type {
                    Node::TypeidTypeExpr(Box::new(parse_type(ctx)?))
                } else {
                    Node::TypeidExprExpr(Box::new(parse_expr(ctx)?))
                })
            }
        }
        // `cv` (functional-style cast expression) and `li` (a literal-operator
        // name, never a bare expression) share this slot in the table; `li`
        // falls straight to failure, matching the reference's `NameOnly` case.
        OpKind::NameOnly if op.mangled == "cv" => {
            let ty = parse_type(ctx)?;
            let operand = if ctx.cursor.accept_char(b'_') {
                let mut args = Vec::new();
                while !ctx.cursor.accept_char(b'E') {
                    args.push(parse_expr(ctx)?);
                }
                Node::many(args, ", ")
            } else {
                parse_expr(ctx)?
            };
            Ok(Node::CastExpr { kind: CastKind::Functional, ty: Box::new(ty), operand: Box::new(operand) })
        }
        OpKind::NameOnly => Err(DemangleError::Syntax),
    }
}

/// `u <source-name> <template-arg>*`, a vendor-extended expression; the
/// `__uuidof` spelling gets the `t`/`z` single-operand forms MSVC uses.
fn parse_vendor_expr<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    let name = parse_source_name(ctx)?;
    if name == b"__uuidof" {
        if ctx.cursor.accept_char(b't') {
            let ty = parse_type(ctx)?;
            return Ok(Node::CallExpr { callee: Box::new(Node::SourceName(name)), args: vec![ty] });
        }
        if ctx.cursor.accept_char(b'z') {
            let inner = parse_expr(ctx)?;
            return Ok(Node::CallExpr { callee: Box::new(Node::SourceName(name)), args: vec![inner] });
        }
    }
    let mut args = Vec::new();
    loop {
        match ctx.attempt(parse_template_arg) {
            Ok(arg) => args.push(arg),
            Err(_) => break,
        }
    }
    Ok(Node::CallExpr { callee: Box::new(Node::SourceName(name)), args })
}

/// `<fold-expression>`: `f{L,R,l,r} <binary-operator-name> <expression> [<expression>]`.
fn parse_fold_expression<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_char(b'f') {
        return Err(DemangleError::Syntax);
    }
    let (kind, has_init) = match ctx.cursor.advance() {
        Some(b'L') => (FoldKind::LeftBinary, true),
        Some(b'R') => (FoldKind::RightBinary, true),
        Some(b'l') => (FoldKind::LeftUnary, false),
        Some(b'r') => (FoldKind::RightUnary, false),
        _ => return Err(DemangleError::Syntax),
    };
    let op = lookup_operator(ctx).ok_or(DemangleError::Syntax)?;
    if !(op.kind == OpKind::Binary || (op.kind == OpKind::PtrMem && op.mangled == "ds")) {
        return Err(DemangleError::Syntax);
    }
    let first = parse_expr(ctx)?;
    let (pack, init) = if has_init {
        let second = parse_expr(ctx)?;
        if matches!(kind, FoldKind::LeftBinary) {
            (second, Some(Box::new(first)))
        } else {
            (first, Some(Box::new(second)))
        }
    } else {
        (first, None)
    };
    Ok(Node::FoldExpr { kind, op, pack: Box::new(pack), init })
}

/// `<function-param>`: `fpT` (the implicit `this`), `fp [cv] [number] _`
/// (level 0), or `fL <level> p [cv] [number] _` (an outer level).
fn parse_function_param<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_char(b'f') {
        return Err(DemangleError::Syntax);
    }
    if ctx.cursor.accept_str(b"pT") {
        return Ok(Node::ThisExpr);
    }
    let level = if ctx.cursor.accept_char(b'L') {
        let n = lex::parse_non_neg_integer(&mut ctx.cursor).ok_or(DemangleError::Syntax)?;
        n as u32 + 1
    } else {
        0
    };
    if !ctx.cursor.accept_char(b'p') {
        return Err(DemangleError::Syntax);
    }
    lex::parse_cv_qualifiers(&mut ctx.cursor);
    let (_, digits) = lex::parse_number(&mut ctx.cursor, false);
    let index = if digits.is_empty() {
        None
    } else {
        std::str::from_utf8(digits).ok().and_then(|s| s.parse().ok())
    };
    ctx.cursor.accept_char(b'_');
    Ok(Node::FunctionParamExpr { level, index })
}

/// `<braced-expression>`: the items of a `tl <type> <braced-expression>* E`
/// typed initializer list, either a plain `<expression>` or one of the three
/// designated-initializer shapes (`di`, `dx`, `dX`).
pub(crate) fn parse_braced_expression<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    ctx.enter_recursion()?;
    let result = parse_braced_expression_inner(ctx);
    ctx.exit_recursion();
    result
}

fn parse_braced_expression_inner<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.peek() == Some(b'd') {
        if ctx.cursor.accept_str(b"dX") {
            let first = parse_expr(ctx)?;
            let last = parse_expr(ctx)?;
            let value = parse_braced_expression(ctx)?;
            return Ok(Node::BracedRangeExpr { first: Box::new(first), last: Box::new(last), value: Box::new(value) });
        }
        if ctx.cursor.accept_str(b"di") {
            let field = Node::SourceName(parse_source_name(ctx)?);
            let value = parse_braced_expression(ctx)?;
            return Ok(Node::BracedExpr { field: Box::new(field), value: Box::new(value) });
        }
        if ctx.cursor.accept_str(b"dx") {
            let field = parse_expr(ctx)?;
            let value = parse_braced_expression(ctx)?;
            return Ok(Node::BracedExpr { field: Box::new(field), value: Box::new(value) });
        }
    }
    parse_expr(ctx)
}

/// `Dt`/`DT <expression> E`: `decltype(...)`.
pub(crate) fn parse_decltype<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_str(b"Dt") && !ctx.cursor.accept_str(b"DT") {
        return Err(DemangleError::Syntax);
    }
    let expr = parse_expr(ctx)?;
    if !ctx.cursor.accept_char(b'E') {
        return Err(DemangleError::Syntax);
    }
    Ok(Node::Decltype(Box::new(expr)))
}

fn simple_integer_type_name(b: Option<u8>) -> Option<&'static str> {
    Some(match b? {
        b'i' => "int",
        b'j' => "unsigned int",
        b'l' => "long",
        b'm' => "unsigned long",
        b'x' => "long long",
        b'y' => "unsigned long long",
        b'c' => "char",
        b'a' => "signed char",
        b'h' => "unsigned char",
        _ => return None,
    })
}

fn parse_hex_float(ctx: &mut Context) {
    while matches!(ctx.cursor.peek(), Some(b'0'..=b'9' | b'a'..=b'f')) {
        ctx.cursor.advance();
    }
}

/// `<expr-primary>`: `L <...> E` (spec §4.5.6). Builtin-integer literals get
/// their own node carrying the type name and raw digits; everything else
/// falls back to a generic `(type)value` rendering.
pub(crate) fn parse_expr_primary<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_char(b'L') {
        return Err(DemangleError::Syntax);
    }
    if ctx.cursor.accept_str(b"_Z") {
        let encoding = crate::grammar::mangled_name::parse_encoding(ctx)?;
        if !ctx.cursor.accept_char(b'E') {
            return Err(DemangleError::Syntax);
        }
        return Ok(Node::MangledNameExpr(Box::new(encoding)));
    }
    if ctx.cursor.accept_str(b"Dn0E") {
        return Ok(Node::NullptrLiteral);
    }
    if ctx.cursor.accept_str(b"b0E") {
        return Ok(Node::BoolLiteral(false));
    }
    if ctx.cursor.accept_str(b"b1E") {
        return Ok(Node::BoolLiteral(true));
    }

    let checkpoint = ctx.checkpoint();
    if let Some(ty_name) = simple_integer_type_name(ctx.cursor.peek()) {
        let is_char = ctx.cursor.peek() == Some(b'c');
        ctx.cursor.advance();
        let (negative, digits) = lex::parse_number(&mut ctx.cursor, true);
        if !digits.is_empty() && ctx.cursor.accept_char(b'E') {
            return Ok(if is_char {
                Node::CharLiteral { digits, negative }
            } else {
                Node::IntegerLiteral { ty_name, digits, negative }
            });
        }
    }
    ctx.restore(checkpoint);

    // `L <type> <number> E`, or `L <type> <float>[_<float>] E` for a
    // floating-point non-type template argument: a generic `(type)value` cast.
    let ty = parse_type(ctx)?;
    let value_start = ctx.cursor.pos();
    let (_, digits) = lex::parse_number(&mut ctx.cursor, true);
    if !digits.is_empty() && ctx.cursor.accept_char(b'E') {
        let value = ctx.cursor.span_from(value_start);
        return Ok(Node::ExprPrimaryGeneric { ty: Box::new(ty), value: &value[..value.len() - 1] });
    }
    ctx.cursor.restore_to(value_start);

    parse_hex_float(ctx);
    if ctx.cursor.accept_char(b'E') {
        let value = ctx.cursor.span_from(value_start);
        return Ok(Node::ExprPrimaryGeneric { ty: Box::new(ty), value: &value[..value.len() - 1] });
    }
    ctx.cursor.restore_to(value_start);
    parse_hex_float(ctx);
    if ctx.cursor.accept_char(b'_') {
        parse_hex_float(ctx);
        if ctx.cursor.accept_char(b'E') {
            let value = ctx.cursor.span_from(value_start);
            return Ok(Node::ExprPrimaryGeneric { ty: Box::new(ty), value: &value[..value.len() - 1] });
        }
    }
    Err(DemangleError::Syntax)
}

/// `<simple-id>`: `<source-name> [<template-args>]`.
fn parse_simple_id<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    let name = parse_source_name(ctx)?;
    let mut node = Node::SourceName(name);
    if ctx.cursor.peek() == Some(b'I') {
        let args = parse_template_args(ctx, false)?;
        node = Node::NameWithTemplateArgs { name: Box::new(node), args: Box::new(args) };
    }
    Ok(node)
}

fn parse_unresolved_qualifier_level<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    parse_simple_id(ctx)
}

/// `<unresolved-type>`: a template-param, a decltype, or a substitution —
/// each pushed to the substitution table under the generic `<type>` rule,
/// since `<unresolved-type>` stands in for a `<type>` that couldn't be
/// resolved at the point of parsing.
fn parse_unresolved_type<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.peek() == Some(b'T') {
        if let Ok(mut node) = ctx.attempt(parse_template_param) {
            if ctx.cursor.peek() == Some(b'I') {
                let args = parse_template_args(ctx, false)?;
                node = Node::NameWithTemplateArgs { name: Box::new(node), args: Box::new(args) };
            }
            ctx.subs.push(node.clone());
            return Ok(node);
        }
    }
    if matches!(ctx.cursor.peek(), Some(b'D')) && matches!(ctx.cursor.peek_at(1), Some(b't' | b'T')) {
        let node = parse_decltype(ctx)?;
        ctx.subs.push(node.clone());
        return Ok(node);
    }
    try_parse_substitution(ctx)?.ok_or(DemangleError::Syntax)
}

/// `<destructor-name>`: an `<unresolved-type>` or a `<simple-id>`, the
/// operand of `dn` in `<base-unresolved-name>`.
fn parse_destructor_name<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if let Ok(node) = ctx.attempt(parse_unresolved_type) {
        return Ok(node);
    }
    parse_simple_id(ctx)
}

/// `<base-unresolved-name>`: a `<simple-id>`, `dn <destructor-name>`, or
/// `[on] <operator-name> [<template-args>]`.
fn parse_base_unresolved_name<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if let Ok(node) = ctx.attempt(parse_simple_id) {
        return Ok(node);
    }
    if ctx.cursor.accept_str(b"dn") {
        let scope = parse_destructor_name(ctx)?;
        return Ok(Node::CtorDtorName { scope: Box::new(scope), is_dtor: true });
    }
    ctx.cursor.accept_str(b"on");
    let mut node = parse_operator_name(ctx)?;
    if ctx.cursor.peek() == Some(b'I') {
        let args = parse_template_args(ctx, false)?;
        node = Node::NameWithTemplateArgs { name: Box::new(node), args: Box::new(args) };
    }
    Ok(node)
}

/// `<unresolved-name>`, the expression-grammar fallback for a name the
/// parser can't resolve without instantiation context — possibly
/// `::`-qualified (`gs`) and/or scoped through one or more
/// `<unresolved-qualifier-level>`s (`sr`/`srN`).
fn parse_unresolved_name<'a>(ctx: &mut Context<'a>, is_global: bool) -> PResult<Node<'a>> {
    let leading = if is_global { vec![Node::SourceName(b"")] } else { Vec::new() };

    if ctx.cursor.accept_str(b"srN") {
        let mut parts = leading;
        let mut ty = parse_unresolved_type(ctx)?;
        if ctx.cursor.peek() == Some(b'I') {
            let args = parse_template_args(ctx, false)?;
            ty = Node::NameWithTemplateArgs { name: Box::new(ty), args: Box::new(args) };
        }
        parts.push(ty);
        while !ctx.cursor.accept_char(b'E') {
            parts.push(parse_unresolved_qualifier_level(ctx)?);
        }
        parts.push(parse_base_unresolved_name(ctx)?);
        return Ok(Node::UnresolvedNameExpr(Box::new(Node::many(parts, "::"))));
    }

    if !ctx.cursor.accept_str(b"sr") {
        let base = parse_base_unresolved_name(ctx)?;
        let mut parts = leading;
        parts.push(base);
        let node = if parts.len() == 1 { parts.pop().unwrap() } else { Node::many(parts, "::") };
        return Ok(Node::UnresolvedNameExpr(Box::new(node)));
    }

    let mut parts = leading;
    if matches!(ctx.cursor.peek(), Some(b'0'..=b'9')) {
        parts.push(parse_unresolved_qualifier_level(ctx)?);
        while !ctx.cursor.accept_char(b'E') {
            parts.push(parse_unresolved_qualifier_level(ctx)?);
        }
    } else {
        let mut ty = parse_unresolved_type(ctx)?;
        if ctx.cursor.peek() == Some(b'I') {
            let args = parse_template_args(ctx, false)?;
            ty = Node::NameWithTemplateArgs { name: Box::new(ty), args: Box::new(args) };
        }
        parts.push(ty);
    }
    parts.push(parse_base_unresolved_name(ctx)?);
    Ok(Node::UnresolvedNameExpr(Box::new(Node::many(parts, "::"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Opts;

    #[test]
    fn binary_expression_parses_lhs_and_rhs() {
        let mut ctx = Context::new(b"pl1x1y", Opts::default());
        let node = parse_expr(&mut ctx).unwrap();
        assert!(matches!(node, Node::BinaryExpr { .. }));
        assert!(ctx.cursor.at_end());
    }

    #[test]
    fn integer_literal_carries_type_name_and_digits() {
        let mut ctx = Context::new(b"Li42E", Opts::default());
        match parse_expr_primary(&mut ctx).unwrap() {
            Node::IntegerLiteral { ty_name, digits, negative } => {
                assert_eq!(ty_name, "int");
                assert_eq!(digits, b"42");
                assert!(!negative);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bool_literal_true() {
        let mut ctx = Context::new(b"Lb1E", Opts::default());
        assert!(matches!(parse_expr_primary(&mut ctx).unwrap(), Node::BoolLiteral(true)));
    }

    #[test]
    fn nullptr_literal() {
        let mut ctx = Context::new(b"LDn0E", Opts::default());
        assert!(matches!(parse_expr_primary(&mut ctx).unwrap(), Node::NullptrLiteral));
    }

    #[test]
    fn sizeof_of_a_type_vs_an_expression() {
        let mut ctx = Context::new(b"sti", Opts::default());
        assert!(matches!(parse_expr(&mut ctx).unwrap(), Node::SizeofTypeExpr(_)));

        let mut ctx2 = Context::new(b"sz1x", Opts::default());
        assert!(matches!(parse_expr(&mut ctx2).unwrap(), Node::SizeofExprExpr(_)));
    }

    #[test]
    fn conditional_expression_has_three_operands() {
        let mut ctx = Context::new(b"qu1x1y1z", Opts::default());
        assert!(matches!(parse_expr(&mut ctx).unwrap(), Node::ConditionalExpr { .. }));
    }

    #[test]
    fn unresolved_name_falls_back_to_simple_id() {
        let mut ctx = Context::new(b"3foo", Opts::default());
        match parse_expr(&mut ctx).unwrap() {
            Node::UnresolvedNameExpr(inner) => assert!(matches!(*inner, Node::SourceName(b"foo"))),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn fold_expression_left_with_init_swaps_operands() {
        // fLpl <init> <pack> — left fold with initializer.
        let mut ctx = Context::new(b"fLpl1x1y", Opts::default());
        match parse_expr(&mut ctx).unwrap() {
            Node::FoldExpr { kind: FoldKind::LeftBinary, init: Some(_), .. } => {}
            other => panic!("unexpected: {other:?}"),
        }
    }
}
