//! The pretty-printer: walks a demangled [`Node`] tree into its textual form
//! (spec §4.7).
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `pp_*` family
//! (`pp_encoding`, `pp_expression`, `pp_template_args`, ...), which builds the
//! same string bottom-up from a parsed `dem_t` tree; here the recursion walks
//! a typed `Node<'a>` instead of a tagged union, and each `pp_*` counterpart
//! becomes a `Printer` method.

pub(crate) mod qualifiers;
pub(crate) mod simplify;

use crate::ast::tag::{Prec, SpecialKind};
use crate::ast::{ExceptionSpec, FoldKind, LocalNameKind, Node, SpecialNameKind};
use crate::grammar::operator::OperatorEntry;
use crate::Opts;

/// Entry point called by [`crate::entry::demangle`].
pub(crate) fn print<'a>(node: &Node<'a>, opts: Opts) -> String {
    let mut printer = Printer { opts, depth: 0 };
    let mut out = printer.print(node);
    if opts.simple {
        simplify::apply(&mut out);
    }
    out
}

struct Printer {
    opts: Opts,
    depth: u32,
}

impl Printer {
    fn print(&mut self, node: &Node) -> String {
        self.depth += 1;
        let out = if self.depth > crate::MAX_RECURSION_DEPTH { "...".to_string() } else { self.print_inner(node) };
        self.depth -= 1;
        out
    }

    /// Peels any `Decorated`/`Qualified` wrapping, renders the accumulated
    /// suffix, and hands the base off to [`Self::print_base`].
    fn print_inner(&mut self, node: &Node) -> String {
        let (base, layers) = qualifiers::peel(node);
        let suffix = qualifiers::render(&layers, self.opts.ansi);
        self.print_base(base, &suffix)
    }

    /// Places `suffix` either as a declarator wrapped around the base
    /// (`int (&)[5]`, `void (*)()`, `RET (CLASS::*)(ARGS)`) or trailing it
    /// directly (`int*`), depending on what kind of base it is.
    fn print_base(&mut self, base: &Node, suffix: &str) -> String {
        if !qualifiers::base_needs_declarator_form(base) {
            return format!("{}{}", self.print_leaf(base), suffix);
        }
        match base {
            Node::Array { dimension, inner } => {
                let dim = match dimension {
                    Some(d) => self.print(d),
                    None => String::new(),
                };
                let inner_str = self.print(inner);
                if suffix.is_empty() {
                    format!("{inner_str} [{dim}]")
                } else {
                    format!("{inner_str} ({suffix})[{dim}]")
                }
            }
            Node::FunctionTy { .. } => {
                let (ret, params_paren) = self.print_function_ty_parts(base);
                format!("{ret} ({suffix}){params_paren}")
            }
            Node::PointerToMember { class_ty, member_ty } => {
                let class_str = self.print(class_ty);
                if let Node::FunctionTy { .. } = member_ty.as_ref() {
                    let (ret, tail) = self.print_function_ty_parts(member_ty);
                    format!("{ret} ({class_str}::*{suffix}){tail}")
                } else {
                    format!("{} {class_str}::*{suffix}", self.print(member_ty))
                }
            }
            _ => unreachable!(),
        }
    }

    /// Splits a `FunctionTy` into its `"RET"` and `"(params) cv ref exc
    /// requires"` halves so declarator-form callers can interleave their own
    /// text between them.
    fn print_function_ty_parts(&mut self, node: &Node) -> (String, String) {
        let Node::FunctionTy { ret, params, requires, exception_spec, cv, ref_qual } = node else {
            unreachable!()
        };
        let ret_str = ret.as_ref().map(|r| self.print(r)).unwrap_or_default();
        let params_str = if self.opts.params { self.print_list(params, ", ") } else { String::new() };
        let mut tail = format!("({params_str})");
        if self.opts.ansi {
            cv.write_suffix(&mut tail);
            ref_qual.write_suffix(&mut tail);
        }
        if let Some(spec) = exception_spec {
            tail.push(' ');
            tail.push_str(&self.print_exception_spec(spec));
        }
        if let Some(req) = requires {
            tail.push_str(" requires(");
            tail.push_str(&self.print(req));
            tail.push(')');
        }
        (ret_str, tail)
    }

    fn print_exception_spec(&mut self, spec: &ExceptionSpec) -> String {
        match spec {
            ExceptionSpec::Noexcept => "noexcept".to_string(),
            ExceptionSpec::NoexceptIf(expr) => format!("noexcept({})", self.print(expr)),
            ExceptionSpec::Dynamic(tys) => format!("throw({})", self.print_list(tys, ", ")),
        }
    }

    /// The big dispatch over everything that isn't a declarator-form base.
    fn print_leaf(&mut self, node: &Node) -> String {
        match node {
            Node::Builtin(s) => (*s).to_string(),
            Node::VendorBuiltin { name, args } => {
                let args_str = args.as_ref().map(|a| self.print(a)).unwrap_or_default();
                format!("{}{args_str}", String::from_utf8_lossy(name))
            }
            Node::VendorExtQualified { inner, vendor_ext, args } => {
                let args_str = args.as_ref().map(|a| self.print(a)).unwrap_or_default();
                format!("{} {}{args_str}", self.print(inner), String::from_utf8_lossy(vendor_ext))
            }
            Node::VectorTy { dimension, inner } => match dimension {
                Some(d) => format!("{} __vector({})", self.print(inner), self.print(d)),
                None => format!("{} __vector", self.print(inner)),
            },
            Node::ComplexImaginary { imaginary, inner } => {
                format!("{} {}", if *imaginary { "_Imaginary" } else { "_Complex" }, self.print(inner))
            }
            Node::FunctionTy { .. } => {
                let (ret, tail) = self.print_function_ty_parts(node);
                format!("{ret} {tail}")
            }
            Node::Decltype(inner) => format!("decltype({})", self.print(inner)),
            Node::PackExpansionTy(inner) => format!("{}...", self.print(inner)),
            Node::ClassEnumTy { inner, elaborate } => {
                let prefix = elaborate.map(|e| e.spelling()).unwrap_or("");
                format!("{prefix}{}", self.print(inner))
            }

            Node::TemplateParam { .. } | Node::FwdTemplateRef(_) => "{unresolved template parameter}".to_string(),
            Node::TemplateArgumentPack(elems) => self.print_list(elems, ", "),
            Node::ParameterPack(elems) => self.print_list(elems, ", "),
            Node::TemplateArgs(args) => format!("<{}>", self.print_list(args, ", ")),
            Node::NameWithTemplateArgs { name, args } => format!("{}{}", self.print(name), self.print(args)),

            Node::NestedName { path, .. } => self.print_list(path, "::"),
            Node::LocalName { encoding, kind } => self.print_local_name(encoding, kind),
            Node::ModuleName { .. } => self.print_module_name(node),
            Node::ClosureTyName { params, requires1, count, .. } => {
                let params_str = self.print_list(params, ", ");
                let idx = seq_index(count) + 1;
                let mut s = format!("'lambda({params_str})#{idx}'");
                if let Some(req) = requires1 {
                    s.push_str(" requires(");
                    s.push_str(&self.print(req));
                    s.push(')');
                }
                s
            }
            Node::UnnamedTypeName(count) => format!("{{unnamed type#{}}}", seq_index(count) + 1),
            Node::StructuredBinding(names) => format!("[{}]", self.print_list(names, ", ")),
            Node::CtorDtorName { scope, is_dtor } => {
                format!("{}{}", if *is_dtor { "~" } else { "" }, self.ctor_dtor_base_name(scope))
            }
            Node::ConvOpTy(ty) => format!("operator {}", self.print(ty)),
            Node::AbiTagTy { inner, tag } => format!("{}[abi:{}]", self.print(inner), String::from_utf8_lossy(tag)),
            Node::SourceName(s) => String::from_utf8_lossy(s).into_owned(),
            Node::StdQualified(inner) => format!("std::{}", self.print(inner)),
            Node::OperatorName(entry) => print_operator_name(entry),
            Node::LiteralOperatorName(name) => format!("operator\"\" {}", String::from_utf8_lossy(name)),
            Node::VendorOperatorName { name, .. } => format!("operator {}", String::from_utf8_lossy(name)),

            Node::SpecialSubstitution(kind) => kind.short_form().to_string(),
            Node::ExpandedSpecialSubstitution(kind) => expanded_special(*kind).to_string(),

            Node::Encoding { .. } => self.print_encoding(node),
            Node::SpecialName { kind, args } => self.print_special_name(*kind, args),

            Node::BinaryExpr { op, lhs, rhs } => {
                let l = self.print_operand(lhs, op.prec, false);
                let r = self.print_operand(rhs, op.prec, true);
                format!("{l} {} {r}", op.spelling)
            }
            Node::PrefixExpr { op, operand } => {
                format!("{}{}", op.spelling, self.print_operand(operand, op.prec, false))
            }
            Node::PostfixExpr { op, operand } => {
                format!("{}{}", self.print_operand(operand, op.prec, false), op.spelling)
            }
            Node::MemberExpr { op, lhs, rhs } => {
                let l = self.print_operand(lhs, Prec::Postfix, false);
                let r = self.print(rhs);
                format!("{l}{}{r}", op.spelling)
            }
            Node::ArraySubscriptExpr { lhs, rhs } => {
                format!("{}[{}]", self.print_operand(lhs, Prec::Postfix, false), self.print(rhs))
            }
            Node::CallExpr { callee, args } => {
                format!("{}({})", self.print_operand(callee, Prec::Postfix, false), self.print_list(args, ", "))
            }
            Node::ConditionalExpr { cond, then_branch, else_branch } => {
                let c = self.print_operand(cond, Prec::Conditional, false);
                let t = self.print(then_branch);
                let e = self.print_operand(else_branch, Prec::Conditional, true);
                format!("{c} ? {t} : {e}")
            }
            Node::CastExpr { kind, ty, operand } => match kind.spelling() {
                None => format!("{}({})", self.print(ty), self.print(operand)),
                Some(spelling) => format!("{spelling}<{}>({})", self.print(ty), self.print(operand)),
            },
            Node::TypeidTypeExpr(inner) => format!("typeid({})", self.print(inner)),
            Node::TypeidExprExpr(inner) => format!("typeid({})", self.print(inner)),
            Node::SizeofTypeExpr(inner) => format!("sizeof({})", self.print(inner)),
            Node::SizeofExprExpr(inner) => format!("sizeof({})", self.print(inner)),
            Node::AlignofTypeExpr(inner) => format!("alignof({})", self.print(inner)),
            Node::AlignofExprExpr(inner) => format!("alignof({})", self.print(inner)),
            Node::NoexceptExpr(inner) => format!("noexcept({})", self.print(inner)),
            Node::ThrowExpr(inner) => match inner {
                Some(e) => format!("throw {}", self.print(e)),
                None => "throw".to_string(),
            },
            Node::FoldExpr { kind, op, pack, init } => self.print_fold_expr(*kind, op, pack, init.as_deref()),
            Node::PackSizeofTypeExpr(inner) => format!("sizeof...({})", self.print(inner)),
            Node::PackSizeofExprExpr(inner) => format!("sizeof...({})", self.print(inner)),
            Node::PackSizeofArgsExpr(inner) => format!("sizeof...({})", self.print(inner)),
            Node::PackExpansionExpr(inner) => format!("{}...", self.print(inner)),
            Node::ListInitExpr { ty, elems } => {
                let elems_str = self.print_list(elems, ", ");
                match ty {
                    Some(t) => format!("{}{{{elems_str}}}", self.print(t)),
                    None => format!("{{{elems_str}}}"),
                }
            }
            Node::NewExpr { global, is_array, placement, ty, init } => {
                self.print_new_expr(*global, *is_array, placement, ty, init.as_deref())
            }
            Node::DeleteExpr { global, is_array, operand } => {
                let kw = if *is_array { "delete[] " } else { "delete " };
                format!("{}{kw}{}", if *global { "::" } else { "" }, self.print_operand(operand, Prec::Unary, false))
            }
            Node::BracedExpr { field, value } => format!(".{} = {}", self.print(field), self.print(value)),
            Node::BracedRangeExpr { first, last, value } => {
                format!("[{} ... {}] = {}", self.print(first), self.print(last), self.print(value))
            }
            Node::FunctionParamExpr { index, .. } => {
                let human = index.map(|i| i + 1).unwrap_or(0) + 1;
                format!("{{parm#{human}}}")
            }
            Node::ThisExpr => "this".to_string(),
            Node::UnresolvedNameExpr(inner) => self.print(inner),

            Node::IntegerLiteral { ty_name, digits, negative } => {
                format!("{}{}{}", if *negative { "-" } else { "" }, String::from_utf8_lossy(digits), integer_suffix(ty_name))
            }
            Node::CharLiteral { digits, negative } => {
                format!("(char){}{}", if *negative { "-" } else { "" }, String::from_utf8_lossy(digits))
            }
            Node::BoolLiteral(b) => if *b { "true" } else { "false" }.to_string(),
            Node::NullptrLiteral | Node::NullMemberPointerLiteral => "nullptr".to_string(),
            Node::ExprPrimaryGeneric { ty, value } => format!("({}){}", self.print(ty), String::from_utf8_lossy(value)),
            Node::MangledNameExpr(inner) => self.print(inner),

            Node::Many { children, sep } => self.print_list(children, sep),

            // Decoration wrappers are always peeled off by `print_inner`
            // before `print_leaf` is reached.
            Node::Decorated { .. } | Node::Qualified { .. } => unreachable!("peeled by print_inner"),
            // Declarator-form bases are intercepted by `print_base`.
            Node::Array { .. } | Node::PointerToMember { .. } => unreachable!("handled by print_base"),
        }
    }

    fn print_encoding(&mut self, node: &Node) -> String {
        let Node::Encoding { name, ret, params, cv, ref_qual } = node else { unreachable!() };
        let name_str = self.print(name);
        let params_str = if self.opts.params { self.print_list(params, ", ") } else { String::new() };
        let mut tail = format!("({params_str})");
        if self.opts.ansi {
            cv.write_suffix(&mut tail);
            ref_qual.write_suffix(&mut tail);
        }
        match ret {
            Some(r) => format!("{} {name_str}{tail}", self.print(r)),
            None => format!("{name_str}{tail}"),
        }
    }

    fn print_special_name(&mut self, kind: SpecialNameKind, args: &[Node]) -> String {
        match kind {
            SpecialNameKind::VirtualTable => format!("vtable for {}", self.print(&args[0])),
            SpecialNameKind::Vtt => format!("VTT for {}", self.print(&args[0])),
            SpecialNameKind::Typeinfo => format!("typeinfo for {}", self.print(&args[0])),
            SpecialNameKind::TypeinfoName => format!("typeinfo name for {}", self.print(&args[0])),
            SpecialNameKind::ConstructionVtable => {
                format!("construction vtable for {}-in-{}", self.print(&args[0]), self.print(&args[1]))
            }
            SpecialNameKind::VirtualThunk => format!("virtual thunk to {}", self.print(&args[0])),
            SpecialNameKind::VirtualThunkCovariant => format!("covariant return thunk to {}", self.print(&args[0])),
            SpecialNameKind::NonVirtualThunk => format!("non-virtual thunk to {}", self.print(&args[0])),
            SpecialNameKind::GuardVariable => format!("guard variable for {}", self.print(&args[0])),
            SpecialNameKind::ReferenceTemporary => format!("reference temporary for {}", self.print(&args[0])),
            SpecialNameKind::TlsWrapper => format!("thread-local wrapper routine for {}", self.print(&args[0])),
            SpecialNameKind::TlsInit => format!("thread-local initialization routine for {}", self.print(&args[0])),
            SpecialNameKind::TemplateParamObject => format!("template parameter object for {}", self.print(&args[0])),
            SpecialNameKind::ModuleInit => format!("initializer for module {}", self.print(&args[0])),
        }
    }

    fn print_local_name(&mut self, encoding: &Node, kind: &LocalNameKind) -> String {
        let enc_str = self.print(encoding);
        match kind {
            LocalNameKind::Name { name, .. } => format!("{enc_str}::{}", self.print(name)),
            LocalNameKind::StringLiteral { .. } => format!("{enc_str}::string literal"),
            LocalNameKind::DefaultArg { arg_index, name } => {
                let idx = arg_index.unwrap_or(0) + 1;
                format!("{enc_str}::{{default arg#{idx}}}::{}", self.print(name))
            }
        }
    }

    fn print_module_name(&mut self, node: &Node) -> String {
        let Node::ModuleName { partition, parent, name } = node else { unreachable!() };
        let name_str = String::from_utf8_lossy(name);
        match parent {
            Some(p) => format!("{}{}{name_str}", self.print(p), if *partition { ":" } else { "." }),
            None => name_str.into_owned(),
        }
    }

    fn print_fold_expr(&mut self, kind: FoldKind, op: &OperatorEntry, pack: &Node, init: Option<&Node>) -> String {
        let pack_str = self.print(pack);
        match kind {
            FoldKind::LeftUnary => format!("(... {} {pack_str})", op.spelling),
            FoldKind::RightUnary => format!("({pack_str} {} ...)", op.spelling),
            FoldKind::LeftBinary => {
                let init_str = init.map(|n| self.print(n)).unwrap_or_default();
                format!("({init_str} {} ... {} {pack_str})", op.spelling, op.spelling)
            }
            FoldKind::RightBinary => {
                let init_str = init.map(|n| self.print(n)).unwrap_or_default();
                format!("({pack_str} {} ... {} {init_str})", op.spelling, op.spelling)
            }
        }
    }

    fn print_new_expr(&mut self, global: bool, is_array: bool, placement: &[Node], ty: &Node, init: Option<&Node>) -> String {
        let mut s = String::new();
        if global {
            s.push_str("::");
        }
        s.push_str(if is_array { "new[] " } else { "new " });
        if !placement.is_empty() {
            s.push('(');
            s.push_str(&self.print_list(placement, ", "));
            s.push_str(") ");
        }
        s.push_str(&self.print(ty));
        if let Some(init) = init {
            s.push('(');
            s.push_str(&self.print(init));
            s.push(')');
        }
        s
    }

    /// Descends a `CtorDtorName`'s `scope` to the bare class name it names,
    /// without re-printing the scope's own qualified prefix — the enclosing
    /// `NestedName`'s `"::"`-joined path already supplies that.
    fn ctor_dtor_base_name(&mut self, node: &Node) -> String {
        match node {
            Node::SourceName(s) => String::from_utf8_lossy(s).into_owned(),
            Node::NameWithTemplateArgs { name, .. } => self.ctor_dtor_base_name(name),
            Node::NestedName { path, .. } => match path.last() {
                Some(n) => self.ctor_dtor_base_name(n),
                None => String::new(),
            },
            Node::StdQualified(inner) => self.ctor_dtor_base_name(inner),
            Node::ClassEnumTy { inner, .. } => self.ctor_dtor_base_name(inner),
            Node::AbiTagTy { inner, .. } => self.ctor_dtor_base_name(inner),
            Node::Many { children, sep } if *sep == "@" => match children.first() {
                Some(n) => self.ctor_dtor_base_name(n),
                None => String::new(),
            },
            Node::SpecialSubstitution(kind) => special_class_name(*kind).to_string(),
            Node::ExpandedSpecialSubstitution(kind) => special_class_name(*kind).to_string(),
            other => self.print(other),
        }
    }

    /// Prints operands/elements of a comma (or `::`/`@`) separated list,
    /// flattening any `TemplateArgumentPack` or pack expansion encountered
    /// among them so a bound variadic template parameter expands in place
    /// rather than printing as one opaque child (spec §4.6 "Pack expansion").
    fn print_list(&mut self, items: &[Node], sep: &str) -> String {
        let mut parts = Vec::new();
        for item in items {
            self.push_list_item(item, &mut parts);
        }
        parts.join(sep)
    }

    fn push_list_item(&mut self, item: &Node, out: &mut Vec<String>) {
        match item {
            Node::TemplateArgumentPack(elems) => {
                for e in elems {
                    self.push_list_item(e, out);
                }
            }
            Node::PackExpansionTy(pattern) => self.push_pack_expansion(pattern, out),
            Node::PackExpansionExpr(pattern) => self.push_pack_expansion(pattern, out),
            other => out.push(self.print(other)),
        }
    }

    /// Locates a `TemplateArgumentPack` inside `pattern` (after peeling any
    /// decoration around it) and re-wraps each of its elements with that
    /// same decoration before printing; falls back to printing the pattern
    /// once with a literal `"..."` if no pack is found (deeply nested
    /// pack-expansion patterns that don't directly wrap a bound pack).
    fn push_pack_expansion(&mut self, pattern: &Node, out: &mut Vec<String>) {
        let (base, layers) = qualifiers::peel(pattern);
        if let Node::TemplateArgumentPack(elems) = base {
            for e in elems {
                let wrapped = qualifiers::wrap_layers(e.clone(), &layers);
                out.push(self.print(&wrapped));
            }
            return;
        }
        out.push(format!("{}...", self.print(pattern)));
    }

    fn print_operand(&mut self, node: &Node, parent_prec: Prec, is_rhs: bool) -> String {
        let prec = expr_prec(node);
        let s = self.print(node);
        let needs_paren = if is_rhs { prec >= parent_prec } else { prec > parent_prec };
        if needs_paren {
            format!("({s})")
        } else {
            s
        }
    }
}

fn integer_suffix(ty_name: &str) -> &'static str {
    match ty_name {
        "unsigned int" => "u",
        "long" => "l",
        "unsigned long" => "ul",
        "long long" => "ll",
        "unsigned long long" => "ull",
        _ => "",
    }
}

fn print_operator_name(entry: &OperatorEntry) -> String {
    let spelling = entry.spelling;
    match spelling.chars().next() {
        Some(c) if c.is_alphabetic() => format!("operator {}", spelling.trim_end()),
        _ => format!("operator{spelling}"),
    }
}

fn special_class_name(kind: SpecialKind) -> &'static str {
    match kind {
        SpecialKind::Std => "std",
        SpecialKind::Allocator => "allocator",
        SpecialKind::BasicString | SpecialKind::String => "basic_string",
        SpecialKind::Istream => "basic_istream",
        SpecialKind::Ostream => "basic_ostream",
        SpecialKind::Iostream => "basic_iostream",
    }
}

/// The fully-expanded spelling of a `S[absiod]` alias, used when it's the
/// scope of a constructor/destructor (spec §4.5.2) rather than referenced
/// plainly — `simplify::apply`'s table collapses these same strings back
/// down when `opts.simple` is set.
fn expanded_special(kind: SpecialKind) -> &'static str {
    match kind {
        SpecialKind::Std => "std",
        SpecialKind::Allocator => "std::allocator<char>",
        SpecialKind::BasicString | SpecialKind::String => {
            "std::basic_string<char, std::char_traits<char>, std::allocator<char>>"
        }
        SpecialKind::Istream => "std::basic_istream<char, std::char_traits<char>>",
        SpecialKind::Ostream => "std::basic_ostream<char, std::char_traits<char>>",
        SpecialKind::Iostream => "std::basic_iostream<char, std::char_traits<char>>",
    }
}

/// The closure/unnamed-type `<seq-id>`-like encoding: absent means index 0,
/// a decimal digit string `N` means index `N + 1`.
fn seq_index(raw: &[u8]) -> u32 {
    if raw.is_empty() {
        0
    } else {
        std::str::from_utf8(raw).ok().and_then(|s| s.parse::<u32>().ok()).map(|n| n + 1).unwrap_or(0)
    }
}

/// Precedence class used to decide whether an operand needs parenthesizing
/// against its parent expression (spec §4.7).
fn expr_prec(node: &Node) -> Prec {
    match node {
        Node::BinaryExpr { op, .. } | Node::MemberExpr { op, .. } => op.prec,
        Node::PrefixExpr { op, .. } | Node::PostfixExpr { op, .. } => op.prec,
        Node::ConditionalExpr { .. } => Prec::Conditional,
        Node::ArraySubscriptExpr { .. } | Node::CallExpr { .. } | Node::CastExpr { .. } => Prec::Postfix,
        Node::TypeidTypeExpr(_)
        | Node::TypeidExprExpr(_)
        | Node::SizeofTypeExpr(_)
        | Node::SizeofExprExpr(_)
        | Node::AlignofTypeExpr(_)
        | Node::AlignofExprExpr(_)
        | Node::PackSizeofTypeExpr(_)
        | Node::PackSizeofExprExpr(_)
        | Node::PackSizeofArgsExpr(_)
        | Node::NewExpr { .. }
        | Node::DeleteExpr { .. } => Prec::Unary,
        Node::ThrowExpr(_) | Node::NoexceptExpr(_) => Prec::Default,
        _ => Prec::Primary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::grammar::expr::parse_expr;
    use crate::grammar::ty::parse_type;

    fn print_type_str(input: &[u8]) -> String {
        let opts = Opts::default();
        let mut ctx = Context::new(input, opts);
        let node = parse_type(&mut ctx).unwrap();
        print(&node, opts)
    }

    fn print_expr_str(input: &[u8]) -> String {
        let opts = Opts::default();
        let mut ctx = Context::new(input, opts);
        let node = parse_expr(&mut ctx).unwrap();
        print(&node, opts)
    }

    #[test]
    fn prints_pointer_to_int() {
        assert_eq!(print_type_str(b"Pi"), "int*");
    }

    #[test]
    fn prints_reference_to_const_int() {
        assert_eq!(print_type_str(b"RKi"), "int const&");
    }

    #[test]
    fn prints_array_of_int() {
        assert_eq!(print_type_str(b"A5_i"), "int [5]");
    }

    #[test]
    fn prints_pointer_to_function() {
        assert_eq!(print_type_str(b"PFivE"), "int (*)()");
    }

    #[test]
    fn prints_std_allocator_substitution() {
        assert_eq!(print_type_str(b"Sa"), "std::allocator");
    }

    #[test]
    fn prints_template_args_with_adjacent_closing_brackets() {
        // vector<allocator<int>>
        let opts = Opts::default();
        let mut ctx = Context::new(b"St6vectorISaIiEE", opts);
        let node = crate::grammar::ty::parse_type(&mut ctx).unwrap();
        let out = print(&node, opts);
        assert!(out.ends_with(">>"), "expected adjacent `>>`, got {out}");
    }

    #[test]
    fn binary_expression_parenthesizes_looser_rhs() {
        // a * (b + c)
        assert_eq!(print_expr_str(b"ml1apl1b1c"), "a * (b + c)");
    }

    #[test]
    fn prints_conditional_expression() {
        assert_eq!(print_expr_str(b"qu1x1y1z"), "x ? y : z");
    }

    #[test]
    fn prints_integer_literal_with_suffix() {
        let opts = Opts::default();
        let mut ctx = Context::new(b"Ly42E", opts);
        let node = crate::grammar::expr::parse_expr_primary(&mut ctx).unwrap();
        assert_eq!(print(&node, opts), "42ull");
    }

    #[test]
    fn prints_bool_and_nullptr_literals() {
        let opts = Opts::default();
        let mut ctx = Context::new(b"Lb1E", opts);
        let node = crate::grammar::expr::parse_expr_primary(&mut ctx).unwrap();
        assert_eq!(print(&node, opts), "true");

        let mut ctx2 = Context::new(b"LDn0E", opts);
        let node2 = crate::grammar::expr::parse_expr_primary(&mut ctx2).unwrap();
        assert_eq!(print(&node2, opts), "nullptr");
    }

    #[test]
    fn snapshot_vector_of_allocator_template_id() {
        insta::assert_snapshot!(print_type_str(b"St6vectorISaIiEE"), @"std::vector<int, std::allocator<int>>");
    }

    #[test]
    fn snapshot_vector_of_pair_nested_template_id() {
        insta::assert_snapshot!(
            print_type_str(b"St6vectorISt4pairIiiESaIS1_EE"),
            @"std::vector<std::pair<int, int>, std::allocator<std::pair<int, int>>>"
        );
    }
}
