//! Qualifier-string accumulation for type printing (spec §4.7).
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `pp_type_quals` and
//! `pp_type_with_quals`: a chain of `Decorated`/`Qualified` wrappers around a
//! base type is peeled off once, accumulating a declarator-style suffix from
//! the inside out, then the base type is printed followed by (or, for
//! arrays/functions/member pointers, wrapping) that suffix.

use crate::ast::tag::{CvQuals, PtrKind};
use crate::ast::Node;

/// One layer of decoration peeled off by [`peel`], outermost first.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Layer {
    Ptr,
    LRef,
    RRef,
    Cv(CvQuals),
}

/// Strips `Decorated`/`Qualified` wrappers off `node` until a non-decoration
/// base type is reached. Returns the base and the layers applied around it,
/// in the order encountered walking outside-in (i.e. outermost first).
pub(crate) fn peel<'n, 'a>(mut node: &'n Node<'a>) -> (&'n Node<'a>, Vec<Layer>) {
    let mut layers = Vec::new();
    loop {
        match node {
            Node::Decorated { kind, inner } => {
                layers.push(match kind {
                    PtrKind::Pointer => Layer::Ptr,
                    PtrKind::LValueRef => Layer::LRef,
                    PtrKind::RValueRef => Layer::RRef,
                });
                node = inner;
            }
            Node::Qualified { inner, cv } => {
                layers.push(Layer::Cv(*cv));
                node = inner;
            }
            _ => return (node, layers),
        }
    }
}

/// Renders `layers` (outermost-first, as returned by [`peel`]) into a
/// declarator suffix, applied innermost-first so adjacent reference layers
/// collapse at the string level exactly where they'd be adjacent in the
/// rebuilt type (spec §4.7 "reference collapsing in the printer") — this
/// matters when an intervening substitution makes two reference layers meet
/// only after printing, e.g. `RKS1_` where `S1_` is itself `T&`: the cv
/// qualifier sits between the two `&`s in the string and must NOT let them
/// collapse into `&&`.
pub(crate) fn render(layers: &[Layer], ansi: bool) -> String {
    let mut out = String::new();
    for layer in layers.iter().rev() {
        match layer {
            Layer::Ptr => out.push('*'),
            Layer::LRef => push_reference(&mut out, "&"),
            Layer::RRef => push_reference(&mut out, "&&"),
            Layer::Cv(cv) => {
                if ansi && !cv.is_empty() {
                    cv.write_suffix(&mut out);
                }
            }
        }
    }
    out
}

fn push_reference(out: &mut String, sym: &str) {
    if out.ends_with("&&") {
        if sym == "&" {
            out.truncate(out.len() - 2);
            out.push('&');
        }
    } else if out.ends_with('&') {
        // Already an lvalue reference; either kind added on top stays `&`.
    } else {
        out.push_str(sym);
    }
}

/// Rebuilds a properly collapsed `Decorated`/`Qualified` chain around
/// `node`, applying `layers` (outermost-first, as returned by [`peel`])
/// innermost-first — used to wrap each element of an expanded parameter
/// pack by the decoration that surrounded the pack expansion itself, since
/// that decoration must collapse against whatever reference each expanded
/// element already carries rather than being printed as a blind string
/// suffix.
pub(crate) fn wrap_layers<'a>(mut node: Node<'a>, layers: &[Layer]) -> Node<'a> {
    for layer in layers.iter().rev() {
        node = match layer {
            Layer::Cv(cv) => Node::Qualified { inner: Box::new(node), cv: *cv },
            Layer::Ptr | Layer::LRef | Layer::RRef => {
                let outer = match layer {
                    Layer::Ptr => PtrKind::Pointer,
                    Layer::LRef => PtrKind::LValueRef,
                    Layer::RRef => PtrKind::RValueRef,
                    Layer::Cv(_) => unreachable!(),
                };
                if let Node::Decorated { kind: inner_kind, inner } = node {
                    match PtrKind::collapse_with(outer, inner_kind) {
                        Some(collapsed) => Node::Decorated { kind: collapsed, inner },
                        None => Node::Decorated {
                            kind: outer,
                            inner: Box::new(Node::Decorated { kind: inner_kind, inner }),
                        },
                    }
                } else {
                    Node::Decorated { kind: outer, inner: Box::new(node) }
                }
            }
        };
    }
    node
}

/// Whether `base` places its declarator suffix before its own bracket/paren
/// form (`int (&)[5]`, `void (*)()`) rather than trailing a pointer/reference
/// symbol directly after it (`int*`).
pub(crate) fn base_needs_declarator_form(base: &Node) -> bool {
    matches!(base, Node::Array { .. } | Node::FunctionTy { .. } | Node::PointerToMember { .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::tag::PtrKind;

    #[test]
    fn reference_collapsing_skips_over_an_intervening_const() {
        // R K (R T_) -> layers [LRef, Cv(const), LRef] outermost-first.
        let layers = vec![Layer::LRef, Layer::Cv(CvQuals { const_: true, ..Default::default() }), Layer::LRef];
        assert_eq!(render(&layers, true), "& const&");
    }

    #[test]
    fn adjacent_references_collapse_to_lvalue() {
        let layers = vec![Layer::LRef, Layer::RRef];
        assert_eq!(render(&layers, true), "&");
    }

    #[test]
    fn wrap_layers_collapses_outer_ref_with_already_referenced_node() {
        let inner = Node::Decorated { kind: PtrKind::RValueRef, inner: Box::new(Node::Builtin("int")) };
        let wrapped = wrap_layers(inner, &[Layer::LRef]);
        assert!(matches!(wrapped, Node::Decorated { kind: PtrKind::LValueRef, .. }));
    }
}
