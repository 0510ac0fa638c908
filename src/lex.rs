//! Lexical primitives shared across the grammar productions (spec §4.1).
//!
//! Each function mirrors one of the reference parser's small `parse_*`
//! helpers (`parse_non_neg_integer`, `parse_number`, `parse_base36`, ...);
//! grounded against `original_source/src/cplusplus/v3/v3.c`, which is the
//! pack's cleaner, non-macro-obfuscated rewrite of the same grammar.

use crate::ast::tag::{CvQuals, RefQuals};
use crate::cursor::Cursor;

/// `<non-negative number>`: a plain run of decimal digits, no sign. At least
/// one digit is required.
pub(crate) fn parse_non_neg_integer(cur: &mut Cursor) -> Option<u64> {
    let start = cur.pos();
    if !matches!(cur.peek(), Some(b'0'..=b'9')) {
        return None;
    }
    let mut out: u64 = 0;
    while let Some(b @ b'0'..=b'9') = cur.peek() {
        out = out.checked_mul(10)?.checked_add((b - b'0') as u64)?;
        cur.advance();
    }
    let _ = start;
    Some(out)
}

/// `<number>`: an optional `n` sign followed by decimal digits. Unlike
/// [`parse_non_neg_integer`], an absent digit run is not a failure — it
/// yields `0` with zero bytes consumed (matching the reference's
/// `parse_number`, which always returns `true`).
pub(crate) fn parse_number(cur: &mut Cursor, allow_negative: bool) -> (bool, &[u8]) {
    let start = cur.pos();
    let negative = allow_negative && cur.accept_char(b'n');
    while matches!(cur.peek(), Some(b'0'..=b'9')) {
        cur.advance();
    }
    let digits_start = if negative { start + 1 } else { start };
    (negative, cur.span_from(digits_start))
}

/// Reads a `<number>` and parses it as a signed `i64`, per the `expr_primary`
/// integer-literal grammar (spec §4.6). Returns `None` on overflow or an
/// empty digit run.
pub(crate) fn parse_signed_number(cur: &mut Cursor) -> Option<(bool, &[u8])> {
    let (negative, digits) = parse_number(cur, true);
    if digits.is_empty() {
        return None;
    }
    Some((negative, digits))
}

/// A run of base-36 digits (`0-9A-Z`), MSB first, with no overflow guard
/// beyond `u64` (substitution indices this large cannot occur in the
/// well-formed input the grammar otherwise requires).
pub(crate) fn parse_base36(cur: &mut Cursor) -> u64 {
    let mut x: u64 = 0;
    while let Some(b) = cur.peek() {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'A'..=b'Z' => b - b'A' + 10,
            _ => break,
        };
        x = x.saturating_mul(36).saturating_add(digit as u64);
        cur.advance();
    }
    x
}

/// `<seq-id> _`: the body of a `S_`/`S<seq-id>_` substitution reference.
/// Per spec §3.3/§9(a): absent digits select index 0; a present base-36 run
/// with value `v` selects index `v + 1`. Consumes the trailing `_` as part
/// of the match; returns `None` if the `_` is missing.
pub(crate) fn parse_seq_id(cur: &mut Cursor) -> Option<usize> {
    let has_digits = matches!(cur.peek(), Some(b'0'..=b'9' | b'A'..=b'Z'));
    let index = if has_digits {
        parse_base36(cur) as usize + 1
    } else {
        0
    };
    if !cur.accept_char(b'_') {
        return None;
    }
    Some(index)
}

/// `<source-name>`'s length-prefix + payload, without the `CvQuals` wrapper:
/// a `<non-negative number>` `N` followed by exactly `N` bytes. Fails if
/// fewer than `N` bytes remain.
pub(crate) fn parse_base_source_name<'a>(cur: &mut Cursor<'a>) -> Option<&'a [u8]> {
    let len = parse_non_neg_integer(cur)? as usize;
    if cur.remaining().len() < len {
        return None;
    }
    let start = cur.pos();
    for _ in 0..len {
        cur.advance();
    }
    Some(cur.span_from(start))
}

/// `<CV-qualifiers>`: optional `r`, `V`, `K` in that fixed order. Always
/// succeeds (an empty set is a legal parse); callers test
/// [`CvQuals::is_empty`] when they need to know whether anything matched.
pub(crate) fn parse_cv_qualifiers(cur: &mut Cursor) -> CvQuals {
    let mut quals = CvQuals::default();
    if cur.accept_char(b'r') {
        quals.restrict = true;
    }
    if cur.accept_char(b'V') {
        quals.volatile = true;
    }
    if cur.accept_char(b'K') {
        quals.const_ = true;
    }
    quals
}

/// `<ref-qualifier>`: optional `R` or `O`. Always succeeds.
pub(crate) fn parse_ref_qualifiers(cur: &mut Cursor) -> RefQuals {
    let mut quals = RefQuals::default();
    if cur.accept_char(b'R') {
        quals.lvalue = true;
    }
    if cur.accept_char(b'O') {
        quals.rvalue = true;
    }
    quals
}

/// `<discriminator>`: `_` optionally followed by a second `_` and a decimal
/// run. The value itself never affects the demangled text (spec §4.5.2), so
/// only whether the production matched is reported.
pub(crate) fn parse_discriminator(cur: &mut Cursor) -> bool {
    if !cur.accept_char(b'_') {
        return false;
    }
    cur.accept_char(b'_');
    parse_number(cur, false);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_neg_integer_requires_a_digit() {
        let mut cur = Cursor::new(b"42x");
        assert_eq!(parse_non_neg_integer(&mut cur), Some(42));
        assert_eq!(cur.remaining(), b"x");

        let mut cur = Cursor::new(b"x");
        assert_eq!(parse_non_neg_integer(&mut cur), None);
    }

    #[test]
    fn number_accepts_negative_sign_and_empty_run() {
        let mut cur = Cursor::new(b"n12");
        let (neg, digits) = parse_number(&mut cur, true);
        assert!(neg);
        assert_eq!(digits, b"12");

        let mut cur = Cursor::new(b"x");
        let (neg, digits) = parse_number(&mut cur, true);
        assert!(!neg);
        assert!(digits.is_empty());
    }

    #[test]
    fn seq_id_empty_digits_means_index_zero() {
        let mut cur = Cursor::new(b"_");
        assert_eq!(parse_seq_id(&mut cur), Some(0));
    }

    #[test]
    fn seq_id_base36_run_offsets_by_one() {
        let mut cur = Cursor::new(b"0_");
        assert_eq!(parse_seq_id(&mut cur), Some(1));

        let mut cur = Cursor::new(b"Z_");
        assert_eq!(parse_seq_id(&mut cur), Some(36));

        let mut cur = Cursor::new(b"10_");
        assert_eq!(parse_seq_id(&mut cur), Some(37));
    }

    #[test]
    fn seq_id_without_trailing_underscore_fails() {
        let mut cur = Cursor::new(b"0");
        assert_eq!(parse_seq_id(&mut cur), None);
    }

    #[test]
    fn base_source_name_reads_exact_length() {
        let mut cur = Cursor::new(b"3fooTAIL");
        assert_eq!(parse_base_source_name(&mut cur), Some(&b"foo"[..]));
        assert_eq!(cur.remaining(), b"TAIL");
    }

    #[test]
    fn base_source_name_rejects_truncated_payload() {
        let mut cur = Cursor::new(b"10ab");
        assert_eq!(parse_base_source_name(&mut cur), None);
    }

    #[test]
    fn cv_qualifiers_parse_fixed_order() {
        let mut cur = Cursor::new(b"rVKtail");
        let quals = parse_cv_qualifiers(&mut cur);
        assert!(quals.restrict && quals.volatile && quals.const_);
        assert_eq!(cur.remaining(), b"tail");
    }

    #[test]
    fn discriminator_consumes_double_underscore_form() {
        // The grammar's trailing `_` (present only when the count is >= 10)
        // is not part of <discriminator> itself — it belongs to whatever
        // follows, matching the reference parser's `parse_discriminator`.
        let mut cur = Cursor::new(b"__12_tail");
        assert!(parse_discriminator(&mut cur));
        assert_eq!(cur.remaining(), b"_tail");
    }
}
