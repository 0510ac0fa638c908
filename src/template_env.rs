//! Template-parameter environment and forward-reference resolution (spec §3.4).
//!
//! `<template-param>` (`T_`, `T0_`, `TL1_0_`, ...) indexes into the args of
//! the innermost enclosing template by default, or an outer one via the
//! `L<level>_` prefix. Most of the time the referenced args are already on
//! the frame stack. The one case they are not is a template whose own
//! `<template-args>` refer back to itself (e.g. a defaulted argument naming
//! the primary template) — there, `level == 0` references are recorded as
//! [`crate::ast::Node::FwdTemplateRef`] placeholders and patched once the
//! full argument list is known, mirroring the reference parser's
//! `forward_template_refs` vector and its post-pass resolution
//! (`original_source/src/cplusplus/v3/v3.c`, `rule_template_param` /
//! `resolve_forward_template_refs`).

use crate::ast::{FwdRefId, Node};
use crate::error::{DemangleError, PResult};

#[derive(Debug, Default)]
pub(crate) struct TemplateEnv<'a> {
    /// `frames.last()` is the innermost (current) template's argument list;
    /// `level` in [`TemplateEnv::get`] counts outward from there. New frames
    /// are appended (not inserted at the front) so that [`TemplateEnv::truncate_frames`]
    /// can cheaply undo the most recently entered ones on backtrack.
    frames: Vec<Vec<Node<'a>>>,
    /// Whether level-0 `<template-param>` references that don't yet resolve
    /// should be recorded as forward refs instead of failing outright.
    permit_forward_refs: bool,
    /// `forward_refs[id]` is the level-0 index a given [`FwdRefId`] stands for.
    forward_refs: Vec<usize>,
}

impl<'a> TemplateEnv<'a> {
    pub(crate) fn new() -> Self {
        TemplateEnv::default()
    }

    pub(crate) fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push_frame(&mut self, args: Vec<Node<'a>>) {
        self.frames.push(args);
    }

    pub(crate) fn truncate_frames(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    pub(crate) fn forward_ref_count(&self) -> usize {
        self.forward_refs.len()
    }

    pub(crate) fn truncate_forward_refs(&mut self, len: usize) {
        self.forward_refs.truncate(len);
    }

    pub(crate) fn permit_forward_refs(&self) -> bool {
        self.permit_forward_refs
    }

    /// Enables forward-ref recording for the duration of parsing a name's
    /// own template-args (spec §3.4); returns the previous value to restore.
    pub(crate) fn enter_forward_ref_scope(&mut self) -> bool {
        std::mem::replace(&mut self.permit_forward_refs, true)
    }

    pub(crate) fn restore_forward_ref_scope(&mut self, previous: bool) {
        self.permit_forward_refs = previous;
    }

    /// Record a level-0 reference that couldn't be resolved yet.
    pub(crate) fn alloc_forward_ref(&mut self, index: usize) -> FwdRefId {
        self.forward_refs.push(index);
        self.forward_refs.len() - 1
    }

    /// Resolve `level`/`index` against the frame stack (level 0 = innermost,
    /// i.e. `frames.last()`; `level` counts outward from there).
    pub(crate) fn get(&self, level: u32, index: u32) -> Option<Node<'a>> {
        let level_idx = self.frames.len().checked_sub(1 + level as usize)?;
        self.frames.get(level_idx)?.get(index as usize).cloned()
    }

    /// Replace every `FwdTemplateRef` in `node` with the level-0 argument it
    /// was recorded against, now that `frame0` (the fully parsed innermost
    /// template-args list) is available. A reference that still can't be
    /// resolved against `frame0` (it targets an even more outward scope) is
    /// left as-is for a later, stricter pass to handle.
    pub(crate) fn resolve(&self, node: Node<'a>, frame0: &[Node<'a>]) -> Node<'a> {
        let forward_refs = &self.forward_refs;
        let resolver = |id: usize| forward_refs.get(id).and_then(|&idx| frame0.get(idx).cloned());
        resolve_node(node, &resolver, false).expect("non-strict resolve never fails")
    }

    /// Final pass, run once the enclosing `encoding` has finished parsing a
    /// `name` (spec §4.5.1 step 3): every forward reference still standing
    /// must now resolve against the current innermost frame, or the parse
    /// fails (spec §4.9, "unresolved forward references are failures").
    pub(crate) fn resolve_remaining(&self, node: Node<'a>) -> PResult<Node<'a>> {
        let resolver = |id: usize| self.forward_refs.get(id).and_then(|&idx| self.get(0, idx));
        resolve_node(node, &resolver, true)
    }
}

fn resolve_opt_box<'a>(
    n: Option<Box<Node<'a>>>,
    resolver: &impl Fn(usize) -> Option<Node<'a>>,
    strict: bool,
) -> PResult<Option<Box<Node<'a>>>> {
    n.map(|b| resolve_box(b, resolver, strict)).transpose()
}

fn resolve_box<'a>(
    n: Box<Node<'a>>,
    resolver: &impl Fn(usize) -> Option<Node<'a>>,
    strict: bool,
) -> PResult<Box<Node<'a>>> {
    Ok(Box::new(resolve_node(*n, resolver, strict)?))
}

fn resolve_vec<'a>(
    v: Vec<Node<'a>>,
    resolver: &impl Fn(usize) -> Option<Node<'a>>,
    strict: bool,
) -> PResult<Vec<Node<'a>>> {
    v.into_iter().map(|n| resolve_node(n, resolver, strict)).collect()
}

/// Recursively substitutes `FwdTemplateRef` leaves. Every variant that
/// carries a child `Node` must be listed here; leaf variants with no `Node`
/// children fall through to the catch-all arm unchanged. In non-strict mode
/// an unresolved reference is left as `FwdTemplateRef`; in strict mode it
/// fails the parse (spec §4.9).
fn resolve_node<'a>(
    node: Node<'a>,
    resolver: &impl Fn(usize) -> Option<Node<'a>>,
    strict: bool,
) -> PResult<Node<'a>> {
    Ok(match node {
        Node::FwdTemplateRef(id) => match resolver(id) {
            Some(n) => n,
            None if strict => return Err(DemangleError::UnresolvedForwardRef),
            None => Node::FwdTemplateRef(id),
        },
        Node::VendorBuiltin { name, args } => Node::VendorBuiltin {
            name,
            args: resolve_opt_box(args, resolver, strict)?,
        },
        Node::Qualified { inner, cv } => Node::Qualified {
            inner: resolve_box(inner, resolver, strict)?,
            cv,
        },
        Node::VendorExtQualified { inner, vendor_ext, args } => Node::VendorExtQualified {
            inner: resolve_box(inner, resolver, strict)?,
            vendor_ext,
            args: resolve_opt_box(args, resolver, strict)?,
        },
        Node::Decorated { kind, inner } => Node::Decorated {
            kind,
            inner: resolve_box(inner, resolver, strict)?,
        },
        Node::Array { dimension, inner } => Node::Array {
            dimension: resolve_opt_box(dimension, resolver, strict)?,
            inner: resolve_box(inner, resolver, strict)?,
        },
        Node::VectorTy { dimension, inner } => Node::VectorTy {
            dimension: resolve_opt_box(dimension, resolver, strict)?,
            inner: resolve_box(inner, resolver, strict)?,
        },
        Node::ComplexImaginary { imaginary, inner } => Node::ComplexImaginary {
            imaginary,
            inner: resolve_box(inner, resolver, strict)?,
        },
        Node::PointerToMember { class_ty, member_ty } => Node::PointerToMember {
            class_ty: resolve_box(class_ty, resolver, strict)?,
            member_ty: resolve_box(member_ty, resolver, strict)?,
        },
        Node::FunctionTy { ret, params, requires, exception_spec, cv, ref_qual } => {
            Node::FunctionTy {
                ret: resolve_opt_box(ret, resolver, strict)?,
                params: resolve_vec(params, resolver, strict)?,
                requires: resolve_opt_box(requires, resolver, strict)?,
                exception_spec: match exception_spec {
                    None => None,
                    Some(crate::ast::ExceptionSpec::Noexcept) => {
                        Some(crate::ast::ExceptionSpec::Noexcept)
                    }
                    Some(crate::ast::ExceptionSpec::NoexceptIf(e)) => Some(
                        crate::ast::ExceptionSpec::NoexceptIf(resolve_box(e, resolver, strict)?),
                    ),
                    Some(crate::ast::ExceptionSpec::Dynamic(v)) => Some(
                        crate::ast::ExceptionSpec::Dynamic(resolve_vec(v, resolver, strict)?),
                    ),
                },
                cv,
                ref_qual,
            }
        }
        Node::Decltype(inner) => Node::Decltype(resolve_box(inner, resolver, strict)?),
        Node::PackExpansionTy(inner) => Node::PackExpansionTy(resolve_box(inner, resolver, strict)?),
        Node::ClassEnumTy { inner, elaborate } => Node::ClassEnumTy {
            inner: resolve_box(inner, resolver, strict)?,
            elaborate,
        },
        Node::TemplateArgumentPack(v) => Node::TemplateArgumentPack(resolve_vec(v, resolver, strict)?),
        Node::ParameterPack(v) => Node::ParameterPack(resolve_vec(v, resolver, strict)?),
        Node::TemplateArgs(v) => Node::TemplateArgs(resolve_vec(v, resolver, strict)?),
        Node::NameWithTemplateArgs { name, args } => Node::NameWithTemplateArgs {
            name: resolve_box(name, resolver, strict)?,
            args: resolve_box(args, resolver, strict)?,
        },
        Node::NestedName { path, cv, ref_qual } => Node::NestedName {
            path: resolve_vec(path, resolver, strict)?,
            cv,
            ref_qual,
        },
        Node::LocalName { encoding, kind } => Node::LocalName {
            encoding: resolve_box(encoding, resolver, strict)?,
            kind,
        },
        Node::ClosureTyName { template_params, params, requires1, requires2, count } => {
            Node::ClosureTyName {
                template_params: resolve_opt_box(template_params, resolver, strict)?,
                params: resolve_vec(params, resolver, strict)?,
                requires1: resolve_opt_box(requires1, resolver, strict)?,
                requires2: resolve_opt_box(requires2, resolver, strict)?,
                count,
            }
        }
        Node::StructuredBinding(v) => Node::StructuredBinding(resolve_vec(v, resolver, strict)?),
        Node::CtorDtorName { scope, is_dtor } => Node::CtorDtorName {
            scope: resolve_box(scope, resolver, strict)?,
            is_dtor,
        },
        Node::ConvOpTy(inner) => Node::ConvOpTy(resolve_box(inner, resolver, strict)?),
        Node::AbiTagTy { inner, tag } => Node::AbiTagTy {
            inner: resolve_box(inner, resolver, strict)?,
            tag,
        },
        Node::StdQualified(inner) => Node::StdQualified(resolve_box(inner, resolver, strict)?),
        Node::Encoding { name, ret, params, cv, ref_qual } => Node::Encoding {
            name: resolve_box(name, resolver, strict)?,
            ret: resolve_opt_box(ret, resolver, strict)?,
            params: resolve_vec(params, resolver, strict)?,
            cv,
            ref_qual,
        },
        Node::SpecialName { kind, args } => Node::SpecialName {
            kind,
            args: resolve_vec(args, resolver, strict)?,
        },
        Node::BinaryExpr { op, lhs, rhs } => Node::BinaryExpr {
            op,
            lhs: resolve_box(lhs, resolver, strict)?,
            rhs: resolve_box(rhs, resolver, strict)?,
        },
        Node::PrefixExpr { op, operand } => Node::PrefixExpr {
            op,
            operand: resolve_box(operand, resolver, strict)?,
        },
        Node::PostfixExpr { op, operand } => Node::PostfixExpr {
            op,
            operand: resolve_box(operand, resolver, strict)?,
        },
        Node::MemberExpr { op, lhs, rhs } => Node::MemberExpr {
            op,
            lhs: resolve_box(lhs, resolver, strict)?,
            rhs: resolve_box(rhs, resolver, strict)?,
        },
        Node::ArraySubscriptExpr { lhs, rhs } => Node::ArraySubscriptExpr {
            lhs: resolve_box(lhs, resolver, strict)?,
            rhs: resolve_box(rhs, resolver, strict)?,
        },
        Node::CallExpr { callee, args } => Node::CallExpr {
            callee: resolve_box(callee, resolver, strict)?,
            args: resolve_vec(args, resolver, strict)?,
        },
        Node::ConditionalExpr { cond, then_branch, else_branch } => Node::ConditionalExpr {
            cond: resolve_box(cond, resolver, strict)?,
            then_branch: resolve_box(then_branch, resolver, strict)?,
            else_branch: resolve_box(else_branch, resolver, strict)?,
        },
        Node::CastExpr { kind, ty, operand } => Node::CastExpr {
            kind,
            ty: resolve_box(ty, resolver, strict)?,
            operand: resolve_box(operand, resolver, strict)?,
        },
        Node::TypeidTypeExpr(inner) => Node::TypeidTypeExpr(resolve_box(inner, resolver, strict)?),
        Node::TypeidExprExpr(inner) => Node::TypeidExprExpr(resolve_box(inner, resolver, strict)?),
        Node::SizeofTypeExpr(inner) => Node::SizeofTypeExpr(resolve_box(inner, resolver, strict)?),
        Node::SizeofExprExpr(inner) => Node::SizeofExprExpr(resolve_box(inner, resolver, strict)?),
        Node::AlignofTypeExpr(inner) => Node::AlignofTypeExpr(resolve_box(inner, resolver, strict)?),
        Node::AlignofExprExpr(inner) => Node::AlignofExprExpr(resolve_box(inner, resolver, strict)?),
        Node::NoexceptExpr(inner) => Node::NoexceptExpr(resolve_box(inner, resolver, strict)?),
        Node::ThrowExpr(inner) => Node::ThrowExpr(resolve_opt_box(inner, resolver, strict)?),
        Node::FoldExpr { kind, op, pack, init } => Node::FoldExpr {
            kind,
            op,
            pack: resolve_box(pack, resolver, strict)?,
            init: resolve_opt_box(init, resolver, strict)?,
        },
        Node::PackSizeofTypeExpr(inner) => {
            Node::PackSizeofTypeExpr(resolve_box(inner, resolver, strict)?)
        }
        Node::PackSizeofExprExpr(inner) => {
            Node::PackSizeofExprExpr(resolve_box(inner, resolver, strict)?)
        }
        Node::PackSizeofArgsExpr(inner) => {
            Node::PackSizeofArgsExpr(resolve_box(inner, resolver, strict)?)
        }
        Node::PackExpansionExpr(inner) => Node::PackExpansionExpr(resolve_box(inner, resolver, strict)?),
        Node::ListInitExpr { ty, elems } => Node::ListInitExpr {
            ty: resolve_opt_box(ty, resolver, strict)?,
            elems: resolve_vec(elems, resolver, strict)?,
        },
        Node::NewExpr { global, is_array, placement, ty, init } => Node::NewExpr {
            global,
            is_array,
            placement: resolve_vec(placement, resolver, strict)?,
            ty: resolve_box(ty, resolver, strict)?,
            init: resolve_opt_box(init, resolver, strict)?,
        },
        Node::DeleteExpr { global, is_array, operand } => Node::DeleteExpr {
            global,
            is_array,
            operand: resolve_box(operand, resolver, strict)?,
        },
        Node::BracedExpr { field, value } => Node::BracedExpr {
            field: resolve_box(field, resolver, strict)?,
            value: resolve_box(value, resolver, strict)?,
        },
        Node::BracedRangeExpr { first, last, value } => Node::BracedRangeExpr {
            first: resolve_box(first, resolver, strict)?,
            last: resolve_box(last, resolver, strict)?,
            value: resolve_box(value, resolver, strict)?,
        },
        Node::UnresolvedNameExpr(inner) => {
            Node::UnresolvedNameExpr(resolve_box(inner, resolver, strict)?)
        }
        Node::ExprPrimaryGeneric { ty, value } => Node::ExprPrimaryGeneric {
            ty: resolve_box(ty, resolver, strict)?,
            value,
        },
        Node::MangledNameExpr(inner) => Node::MangledNameExpr(resolve_box(inner, resolver, strict)?),
        Node::Many { children, sep } => Node::Many {
            children: resolve_vec(children, resolver, strict)?,
            sep,
        },
        // Leaf variants with no `Node` children: nothing to substitute into.
        leaf => leaf,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_level0_param_from_current_frame() {
        let mut env = TemplateEnv::new();
        env.push_frame(vec![Node::Builtin("int"), Node::Builtin("float")]);
        assert!(matches!(env.get(0, 1), Some(Node::Builtin("float"))));
        assert!(env.get(0, 2).is_none());
        assert!(env.get(1, 0).is_none());
    }

    #[test]
    fn forward_ref_patched_once_frame_is_known() {
        let mut env = TemplateEnv::new();
        let prev = env.enter_forward_ref_scope();
        assert!(!prev);
        let id = env.alloc_forward_ref(0);
        let tree = Node::PackExpansionTy(Box::new(Node::FwdTemplateRef(id)));
        env.restore_forward_ref_scope(prev);

        let frame0 = vec![Node::Builtin("int")];
        let resolved = env.resolve(tree, &frame0);
        match resolved {
            Node::PackExpansionTy(inner) => assert!(matches!(*inner, Node::Builtin("int"))),
            other => panic!("unexpected node: {other:?}"),
        }
    }

    #[test]
    fn resolve_remaining_fails_on_unbound_reference() {
        let env = TemplateEnv::new();
        let id = 0;
        let tree = Node::FwdTemplateRef(id);
        assert!(env.resolve_remaining(tree).is_err());
    }
}
