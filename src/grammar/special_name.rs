//! `<special-name>` (spec §4.5.1 item 1) and `<call-offset>`.
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `rule_special_name`
//! and `rule_call_offset`. The reference parser builds these by directly
//! concatenating fixed strings ("vtable for ", "virtual thunk to ", ...)
//! with the demangled operand; here each alternative becomes a
//! [`SpecialNameKind`] tag carrying its operand node(s), with the fixed
//! string moved into the pretty-printer (spec §4.7).

use crate::ast::{Node, SpecialNameKind};
use crate::context::Context;
use crate::error::{DemangleError, PResult};
use crate::grammar::mangled_name::parse_encoding;
use crate::grammar::name::parse_name;
use crate::grammar::template_args::parse_template_arg;
use crate::grammar::ty::parse_type;
use crate::lex;

/// `<call-offset>`: `h <nv-offset> _` or `v <v-offset> _`. Only its kind
/// (virtual vs. non-virtual) matters for demangled output; the offsets
/// themselves are consumed and discarded, matching the reference parser
/// (which folds them straight into a fixed "thunk to" string).
fn parse_call_offset(ctx: &mut Context) -> PResult<bool> {
    if ctx.cursor.accept_char(b'h') {
        lex::parse_signed_number(&mut ctx.cursor);
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        return Ok(false);
    }
    if ctx.cursor.accept_char(b'v') {
        lex::parse_signed_number(&mut ctx.cursor);
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        lex::parse_signed_number(&mut ctx.cursor);
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        return Ok(true);
    }
    Err(DemangleError::Syntax)
}

/// `<special-name>`, dispatched on the `T`/`G` prefix already peeked by the
/// caller ([`crate::grammar::mangled_name::parse_encoding`]).
pub(crate) fn parse_special_name<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.accept_char(b'T') {
        return parse_t_special(ctx);
    }
    if ctx.cursor.accept_char(b'G') {
        return parse_g_special(ctx);
    }
    Err(DemangleError::Syntax)
}

fn parse_t_special<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.accept_char(b'V') {
        let ty = parse_type(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::VirtualTable, args: vec![ty] });
    }
    if ctx.cursor.accept_char(b'T') {
        let ty = parse_type(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::Vtt, args: vec![ty] });
    }
    if ctx.cursor.accept_char(b'I') {
        let ty = parse_type(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::Typeinfo, args: vec![ty] });
    }
    if ctx.cursor.accept_char(b'S') {
        let ty = parse_type(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::TypeinfoName, args: vec![ty] });
    }
    if ctx.cursor.accept_char(b'A') {
        let arg = parse_template_arg(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::TemplateParamObject, args: vec![arg] });
    }
    if ctx.cursor.accept_char(b'W') {
        let (name, _) = parse_name(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::TlsWrapper, args: vec![name] });
    }
    if ctx.cursor.accept_char(b'H') {
        let (name, _) = parse_name(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::TlsInit, args: vec![name] });
    }
    if ctx.cursor.accept_char(b'C') {
        // TC <derived-type> <offset> _ <base-type>  (construction vtable)
        let derived = parse_type(ctx)?;
        lex::parse_non_neg_integer(&mut ctx.cursor);
        if !ctx.cursor.accept_char(b'_') {
            return Err(DemangleError::Syntax);
        }
        let base = parse_type(ctx)?;
        return Ok(Node::SpecialName {
            kind: SpecialNameKind::ConstructionVtable,
            args: vec![derived, base],
        });
    }
    if ctx.cursor.accept_char(b'c') {
        // Tc <call-offset> <call-offset> <encoding>  (covariant return thunk)
        parse_call_offset(ctx)?;
        parse_call_offset(ctx)?;
        let encoding = parse_encoding(ctx)?;
        return Ok(Node::SpecialName {
            kind: SpecialNameKind::VirtualThunkCovariant,
            args: vec![encoding],
        });
    }
    // Plain thunk: `T <call-offset> <encoding>`.
    let is_virtual = parse_call_offset(ctx)?;
    let encoding = parse_encoding(ctx)?;
    let kind = if is_virtual { SpecialNameKind::VirtualThunk } else { SpecialNameKind::NonVirtualThunk };
    Ok(Node::SpecialName { kind, args: vec![encoding] })
}

fn parse_g_special<'a>(ctx: &mut Context<'a>) -> PResult<Node<'a>> {
    if ctx.cursor.accept_char(b'V') {
        let (name, _) = parse_name(ctx)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::GuardVariable, args: vec![name] });
    }
    if ctx.cursor.accept_char(b'R') {
        let (name, _) = parse_name(ctx)?;
        // Optional disambiguating `<seq-id>`, e.g. when a scope holds more
        // than one reference-binding temporary; its value never affects the
        // demangled text.
        let _ = lex::parse_seq_id(&mut ctx.cursor);
        return Ok(Node::SpecialName { kind: SpecialNameKind::ReferenceTemporary, args: vec![name] });
    }
    if ctx.cursor.accept_char(b'I') {
        let module = crate::grammar::name::parse_module_name(ctx)?.ok_or(DemangleError::Syntax)?;
        return Ok(Node::SpecialName { kind: SpecialNameKind::ModuleInit, args: vec![module] });
    }
    if ctx.cursor.accept_char(b'A') {
        // GA <encoding>: transparent alias. No dedicated printed wrapper in
        // the reference output beyond the aliased encoding itself.
        return parse_encoding(ctx);
    }
    if ctx.cursor.accept_char(b'T') {
        // GTt/GTn <encoding>: transaction-safe entry point clones. Treated
        // as transparent, matching `GA` above.
        if !ctx.cursor.accept_char(b't') && !ctx.cursor.accept_char(b'n') {
            return Err(DemangleError::Syntax);
        }
        return parse_encoding(ctx);
    }
    Err(DemangleError::Syntax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Opts;

    #[test]
    fn vtable_for_wraps_type() {
        let mut ctx = Context::new(b"TV3Foo", Opts::default());
        let node = parse_special_name(&mut ctx).unwrap();
        assert!(matches!(
            node,
            Node::SpecialName { kind: SpecialNameKind::VirtualTable, .. }
        ));
    }

    #[test]
    fn guard_variable_wraps_name() {
        let mut ctx = Context::new(b"GV1x", Opts::default());
        let node = parse_special_name(&mut ctx).unwrap();
        assert!(matches!(
            node,
            Node::SpecialName { kind: SpecialNameKind::GuardVariable, .. }
        ));
    }
}
