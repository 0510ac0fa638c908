//! The `<operator-name>` table (spec §4.5.3, §9 "Operator table").
//!
//! A sorted static array keyed by the two-character mangling, looked up by
//! binary search; a unit test below verifies the sort order stays correct as
//! entries are added, per the Design Notes' suggestion for this pattern.

use crate::ast::tag::Prec;

/// Broad category of an operator-name, used by the expression grammar to
/// decide how many operands to read and how to print them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpKind {
    Prefix,
    PrefixOrPostfix,
    Binary,
    Array,
    Member,
    PtrMem,
    New,
    Del,
    Call,
    Conditional,
    NameOnly,
    /// `cc`/`dc`/`rc`/`sc`: `const_cast`/`dynamic_cast`/`reinterpret_cast`/`static_cast<T>(expr)`.
    NamedCast,
    /// `at`/`az`/`st`/`sz`/`te`/`ti`: `alignof`/`sizeof`/`typeid` applied to a type or an expression.
    OfIdOp,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OperatorEntry {
    pub mangled: &'static str,
    pub kind: OpKind,
    pub prec: Prec,
    pub spelling: &'static str,
}

/// Sorted by `mangled`. Keep sorted — `operator_table_is_sorted` enforces it.
pub(crate) static OPERATORS: &[OperatorEntry] = &[
    OperatorEntry { mangled: "aN", kind: OpKind::Binary, prec: Prec::Assign, spelling: "&=" },
    OperatorEntry { mangled: "aS", kind: OpKind::Binary, prec: Prec::Assign, spelling: "=" },
    OperatorEntry { mangled: "aa", kind: OpKind::Binary, prec: Prec::AndIf, spelling: "&&" },
    OperatorEntry { mangled: "ad", kind: OpKind::Prefix, prec: Prec::Unary, spelling: "&" },
    OperatorEntry { mangled: "an", kind: OpKind::Binary, prec: Prec::And, spelling: "&" },
    OperatorEntry { mangled: "at", kind: OpKind::OfIdOp, prec: Prec::Unary, spelling: "alignof" },
    OperatorEntry { mangled: "aw", kind: OpKind::Prefix, prec: Prec::Unary, spelling: "co_await " },
    OperatorEntry { mangled: "az", kind: OpKind::OfIdOp, prec: Prec::Unary, spelling: "alignof" },
    OperatorEntry { mangled: "cc", kind: OpKind::NamedCast, prec: Prec::Postfix, spelling: "const_cast" },
    OperatorEntry { mangled: "cl", kind: OpKind::Call, prec: Prec::Postfix, spelling: "()" },
    OperatorEntry { mangled: "cm", kind: OpKind::Binary, prec: Prec::Comma, spelling: "," },
    OperatorEntry { mangled: "co", kind: OpKind::Prefix, prec: Prec::Unary, spelling: "~" },
    OperatorEntry { mangled: "cp", kind: OpKind::Call, prec: Prec::Postfix, spelling: "()" },
    OperatorEntry { mangled: "cv", kind: OpKind::NameOnly, prec: Prec::Cast, spelling: "" },
    OperatorEntry { mangled: "dV", kind: OpKind::Binary, prec: Prec::Assign, spelling: "/=" },
    OperatorEntry { mangled: "da", kind: OpKind::Del, prec: Prec::Unary, spelling: "delete[]" },
    OperatorEntry { mangled: "dc", kind: OpKind::NamedCast, prec: Prec::Postfix, spelling: "dynamic_cast" },
    OperatorEntry { mangled: "de", kind: OpKind::Prefix, prec: Prec::Unary, spelling: "*" },
    OperatorEntry { mangled: "dl", kind: OpKind::Del, prec: Prec::Unary, spelling: "delete" },
    OperatorEntry { mangled: "ds", kind: OpKind::PtrMem, prec: Prec::PtrMem, spelling: ".*" },
    OperatorEntry { mangled: "dt", kind: OpKind::Member, prec: Prec::Postfix, spelling: "." },
    OperatorEntry { mangled: "dv", kind: OpKind::Binary, prec: Prec::Multiplicative, spelling: "/" },
    OperatorEntry { mangled: "eO", kind: OpKind::Binary, prec: Prec::Assign, spelling: "^=" },
    OperatorEntry { mangled: "eo", kind: OpKind::Binary, prec: Prec::Xor, spelling: "^" },
    OperatorEntry { mangled: "eq", kind: OpKind::Binary, prec: Prec::Equality, spelling: "==" },
    OperatorEntry { mangled: "ge", kind: OpKind::Binary, prec: Prec::Relational, spelling: ">=" },
    OperatorEntry { mangled: "gt", kind: OpKind::Binary, prec: Prec::Relational, spelling: ">" },
    OperatorEntry { mangled: "ix", kind: OpKind::Array, prec: Prec::Postfix, spelling: "[]" },
    OperatorEntry { mangled: "lS", kind: OpKind::Binary, prec: Prec::Assign, spelling: "<<=" },
    OperatorEntry { mangled: "le", kind: OpKind::Binary, prec: Prec::Relational, spelling: "<=" },
    OperatorEntry { mangled: "li", kind: OpKind::NameOnly, prec: Prec::Default, spelling: "\"\" " },
    OperatorEntry { mangled: "ls", kind: OpKind::Binary, prec: Prec::Shift, spelling: "<<" },
    OperatorEntry { mangled: "lt", kind: OpKind::Binary, prec: Prec::Relational, spelling: "<" },
    OperatorEntry { mangled: "mI", kind: OpKind::Binary, prec: Prec::Assign, spelling: "-=" },
    OperatorEntry { mangled: "mL", kind: OpKind::Binary, prec: Prec::Assign, spelling: "*=" },
    OperatorEntry { mangled: "mi", kind: OpKind::Binary, prec: Prec::Additive, spelling: "-" },
    OperatorEntry { mangled: "ml", kind: OpKind::Binary, prec: Prec::Multiplicative, spelling: "*" },
    OperatorEntry { mangled: "mm", kind: OpKind::PrefixOrPostfix, prec: Prec::Unary, spelling: "--" },
    OperatorEntry { mangled: "na", kind: OpKind::New, prec: Prec::Unary, spelling: "new[]" },
    OperatorEntry { mangled: "ne", kind: OpKind::Binary, prec: Prec::Equality, spelling: "!=" },
    OperatorEntry { mangled: "ng", kind: OpKind::Prefix, prec: Prec::Unary, spelling: "-" },
    OperatorEntry { mangled: "nt", kind: OpKind::Prefix, prec: Prec::Unary, spelling: "!" },
    OperatorEntry { mangled: "nw", kind: OpKind::New, prec: Prec::Unary, spelling: "new" },
    OperatorEntry { mangled: "oR", kind: OpKind::Binary, prec: Prec::Assign, spelling: "|=" },
    OperatorEntry { mangled: "oo", kind: OpKind::Binary, prec: Prec::OrIf, spelling: "||" },
    OperatorEntry { mangled: "or", kind: OpKind::Binary, prec: Prec::Ior, spelling: "|" },
    OperatorEntry { mangled: "pL", kind: OpKind::Binary, prec: Prec::Assign, spelling: "+=" },
    OperatorEntry { mangled: "pl", kind: OpKind::Binary, prec: Prec::Additive, spelling: "+" },
    OperatorEntry { mangled: "pm", kind: OpKind::Member, prec: Prec::Postfix, spelling: "->*" },
    OperatorEntry { mangled: "pp", kind: OpKind::PrefixOrPostfix, prec: Prec::Unary, spelling: "++" },
    OperatorEntry { mangled: "ps", kind: OpKind::Prefix, prec: Prec::Unary, spelling: "+" },
    OperatorEntry { mangled: "pt", kind: OpKind::Member, prec: Prec::Postfix, spelling: "->" },
    OperatorEntry { mangled: "qu", kind: OpKind::Conditional, prec: Prec::Conditional, spelling: "?:" },
    OperatorEntry { mangled: "rM", kind: OpKind::Binary, prec: Prec::Assign, spelling: "%=" },
    OperatorEntry { mangled: "rS", kind: OpKind::Binary, prec: Prec::Assign, spelling: ">>=" },
    OperatorEntry { mangled: "rc", kind: OpKind::NamedCast, prec: Prec::Postfix, spelling: "reinterpret_cast" },
    OperatorEntry { mangled: "rm", kind: OpKind::Binary, prec: Prec::Multiplicative, spelling: "%" },
    OperatorEntry { mangled: "rs", kind: OpKind::Binary, prec: Prec::Shift, spelling: ">>" },
    OperatorEntry { mangled: "sc", kind: OpKind::NamedCast, prec: Prec::Postfix, spelling: "static_cast" },
    OperatorEntry { mangled: "ss", kind: OpKind::Binary, prec: Prec::Spaceship, spelling: "<=>" },
    OperatorEntry { mangled: "st", kind: OpKind::OfIdOp, prec: Prec::Unary, spelling: "sizeof" },
    OperatorEntry { mangled: "sz", kind: OpKind::OfIdOp, prec: Prec::Unary, spelling: "sizeof" },
    OperatorEntry { mangled: "te", kind: OpKind::OfIdOp, prec: Prec::Unary, spelling: "typeid" },
    OperatorEntry { mangled: "ti", kind: OpKind::OfIdOp, prec: Prec::Unary, spelling: "typeid" },
];

/// Binary-search lookup by mangled two-character code.
pub(crate) fn lookup(code: &[u8]) -> Option<&'static OperatorEntry> {
    let code = std::str::from_utf8(code).ok()?;
    OPERATORS
        .binary_search_by(|e| e.mangled.cmp(code))
        .ok()
        .map(|i| &OPERATORS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_table_is_sorted() {
        for pair in OPERATORS.windows(2) {
            assert!(
                pair[0].mangled < pair[1].mangled,
                "operator table out of order: {} >= {}",
                pair[0].mangled,
                pair[1].mangled
            );
        }
    }

    #[test]
    fn lookup_finds_known_codes() {
        assert_eq!(lookup(b"pl").unwrap().spelling, "+");
        assert_eq!(lookup(b"aS").unwrap().spelling, "=");
        assert!(lookup(b"zz").is_none());
    }
}
