//! `<mangled-name>`, `<encoding>`, and the `F`-prefixed `<function-type>`
//! (spec §4.5.1).
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `rule_mangled_name`,
//! `rule_encoding`, and `rule_function_type`.

use crate::ast::tag::RefQuals;
use crate::ast::{ExceptionSpec, Node};
use crate::context::Context;
use crate::error::{DemangleError, PResult};
use crate::grammar::expr::parse_expr;
use crate::grammar::name::parse_name;
use crate::grammar::special_name::parse_special_name;
use crate::grammar::ty::parse_type;

/// `<mangled-name>`: `_Z [L] <encoding>`. Any bytes left unconsumed after the
/// encoding are a vendor-specific suffix (spec §6, §4.8); this production
/// leaves them on the cursor rather than requiring end-of-input, so
/// [`crate::entry::demangle`] can inspect and render them itself.
pub(crate) fn parse_mangled_name<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if !ctx.cursor.accept_str(b"_Z") {
        return Err(DemangleError::Syntax);
    }
    ctx.cursor.accept_char(b'L');
    parse_encoding(ctx)
}

/// `<encoding>`: a `<special-name>`, or `<name> [<return-type>] <bare-function-type>`.
pub(crate) fn parse_encoding<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    ctx.enter_recursion()?;
    let result = parse_encoding_inner(ctx);
    ctx.exit_recursion();
    result
}

fn parse_encoding_inner<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if matches!(ctx.cursor.peek(), Some(b'G' | b'T')) {
        return parse_special_name(ctx);
    }

    let (name, ns) = parse_name(ctx)?;
    let name = ctx.templates.resolve_remaining(name)?;

    if is_end_of_encoding(ctx) {
        return Ok(name);
    }

    let ret = if ns.ends_with_template_args && !ns.is_conversion_ctor_dtor {
        Some(Box::new(parse_type(ctx)?))
    } else {
        None
    };

    let params = if ctx.cursor.accept_char(b'v') {
        Vec::new()
    } else {
        let mut params = Vec::new();
        loop {
            params.push(parse_type(ctx)?);
            if is_end_of_encoding(ctx) {
                break;
            }
        }
        params
    };

    Ok(Node::Encoding { name: Box::new(name), ret, params, cv: ns.cv, ref_qual: ns.ref_qual })
}

/// Characters that can follow an `<encoding>` but can't start a `<type>`;
/// used to decide (without backtracking) whether the just-parsed `<name>`
/// is itself the whole entity (a variable) or still needs a return
/// type/parameter list (a function).
fn is_end_of_encoding(ctx: &Context) -> bool {
    ctx.cursor.at_end() || matches!(ctx.cursor.peek(), Some(b'E' | b'.' | b'_'))
}

/// `F [<CV-qualifiers>] [<exception-spec>] [Dx] F [Y] <return-type>
/// <parameter-type>* [RE|OE] E`, the type of a `cl`/function-pointer
/// operand. Returns `Ok(None)` (consuming nothing) if the next byte isn't
/// `F` — the `ty.rs` dispatcher tries this before anything else, as a
/// function type's own leading `r`/`V`/`K` would otherwise be mistaken for a
/// plain `<qualified-type>`.
pub(crate) fn try_parse_function_type<'a>(ctx: &mut Context<'a>) -> PResult<Option<Node<'a>>> {
    let checkpoint = ctx.checkpoint();
    let cv = crate::lex::parse_cv_qualifiers(&mut ctx.cursor);

    let exception_spec = if ctx.cursor.accept_str(b"Do") {
        Some(ExceptionSpec::Noexcept)
    } else if ctx.cursor.accept_str(b"DO") {
        let expr = parse_expr(ctx)?;
        if !ctx.cursor.accept_char(b'E') {
            return Err(DemangleError::Syntax);
        }
        Some(ExceptionSpec::NoexceptIf(Box::new(expr)))
    } else if ctx.cursor.accept_str(b"Dw") {
        let mut types = Vec::new();
        while !ctx.cursor.accept_char(b'E') {
            types.push(parse_type(ctx)?);
        }
        Some(ExceptionSpec::Dynamic(types))
    } else {
        None
    };

    ctx.cursor.accept_str(b"Dx");

    if !ctx.cursor.accept_char(b'F') {
        // Speculative: cv-qualifiers with no following `F` are a plain
        // `<qualified-type>`, not a function type — let `ty::parse_type`
        // handle it from scratch.
        ctx.restore(checkpoint);
        let _ = cv;
        return Ok(None);
    }
    ctx.cursor.accept_char(b'Y');

    let ret = parse_type(ctx)?;
    let mut params = Vec::new();
    let mut ref_qual = RefQuals::default();
    loop {
        if ctx.cursor.accept_char(b'E') {
            break;
        }
        if ctx.cursor.accept_char(b'v') {
            continue;
        }
        if ctx.cursor.accept_str(b"RE") {
            ref_qual.lvalue = true;
            break;
        }
        if ctx.cursor.accept_str(b"OE") {
            ref_qual.rvalue = true;
            break;
        }
        params.push(parse_type(ctx)?);
    }

    Ok(Some(Node::FunctionTy {
        ret: Some(Box::new(ret)),
        params,
        requires: None,
        exception_spec,
        cv,
        ref_qual,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Opts;

    #[test]
    fn encoding_of_a_plain_variable_is_just_its_name() {
        let mut ctx = Context::new(b"1x", Opts::default());
        let node = parse_encoding(&mut ctx).unwrap();
        assert!(matches!(node, Node::SourceName(b"x")));
    }

    #[test]
    fn encoding_of_a_function_carries_params() {
        let mut ctx = Context::new(b"3fooi", Opts::default());
        match parse_encoding(&mut ctx).unwrap() {
            Node::Encoding { params, .. } => assert_eq!(params.len(), 1),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn function_type_parses_noexcept_spec() {
        let mut ctx = Context::new(b"DoFvvE", Opts::default());
        let node = try_parse_function_type(&mut ctx).unwrap().unwrap();
        assert!(matches!(
            node,
            Node::FunctionTy { exception_spec: Some(ExceptionSpec::Noexcept), .. }
        ));
    }
}
