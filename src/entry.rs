//! The public entry point (spec §4.8): strip vendor underscore prefixes,
//! run the grammar, and pretty-print on success.
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `cp_demangle_v3`
//! (underscore stripping) and `rule_mangled_name`/`rule_vendor_specific_suffix`
//! (the trailing `.`/`_`-introduced suffix).

use crate::context::Context;
use crate::grammar::mangled_name::parse_mangled_name;
use crate::Opts;

pub(crate) fn demangle(symbol: &[u8], opts: Opts) -> Option<String> {
    let input = strip_vendor_underscores(symbol);
    let mut ctx = Context::new(input, opts);
    let node = parse_mangled_name(&mut ctx).ok()?;
    let suffix = render_suffix(ctx.cursor.remaining())?;
    let mut out = crate::printer::print(&node, opts);
    out.push_str(&suffix);
    Some(out)
}

/// Some platforms (Apple's linker, notably) prefix an already-valid `_Z…`
/// symbol with extra leading underscores (`__Z…`, `___Z…`). Skip them down
/// to the single underscore that belongs to `_Z` itself; leave the input
/// untouched if no `_Z` follows the leading run (the subsequent grammar
/// will then, correctly, reject it).
fn strip_vendor_underscores(input: &[u8]) -> &[u8] {
    let mut count = 0;
    while input.get(count) == Some(&b'_') {
        count += 1;
    }
    if count > 0 && input.get(count) == Some(&b'Z') {
        &input[count - 1..]
    } else {
        input
    }
}

/// Renders whatever bytes are left on the cursor after the encoding into
/// the text that should be appended to the demangled output (spec §6):
/// nothing left at all is the common case (empty string); a suffix
/// introduced by `.` or `_` is `ptr` (dropped silently), `block_invoke`
/// optionally followed by `_<digits>` (rendered as `" block_invoke"` /
/// `" block_invoke_<n>"`), or anything else (preserved verbatim as
/// `" (<suffix>)"`). Anything left that isn't introduced by `.`/`_` fails
/// the whole parse — the grammar should have consumed all of it.
fn render_suffix(remaining: &[u8]) -> Option<String> {
    if remaining.is_empty() {
        return Some(String::new());
    }
    if !matches!(remaining[0], b'.' | b'_') {
        return None;
    }
    let suffix = &remaining[1..];
    if suffix == b"ptr" {
        return Some(String::new());
    }
    if let Some(rest) = suffix.strip_prefix(b"block_invoke") {
        if rest.is_empty() {
            return Some(" block_invoke".to_string());
        }
        if let Some(digits) = rest.strip_prefix(b"_") {
            if !digits.is_empty() && digits.iter().all(u8::is_ascii_digit) {
                let digits = String::from_utf8_lossy(digits);
                return Some(format!(" block_invoke_{digits}"));
            }
        }
    }
    Some(format!(" ({})", String::from_utf8_lossy(suffix)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_apple_style_double_underscore_prefix() {
        assert_eq!(strip_vendor_underscores(b"__Z3fooi"), b"_Z3fooi");
    }

    #[test]
    fn leaves_plain_mangled_name_untouched() {
        assert_eq!(strip_vendor_underscores(b"_Z3fooi"), b"_Z3fooi");
    }

    #[test]
    fn leaves_non_mangled_input_untouched() {
        assert_eq!(strip_vendor_underscores(b"NS0"), b"NS0");
    }

    #[test]
    fn ptr_suffix_is_dropped() {
        assert_eq!(render_suffix(b"_ptr").unwrap(), "");
    }

    #[test]
    fn block_invoke_suffix_with_index() {
        assert_eq!(render_suffix(b"_block_invoke_2").unwrap(), " block_invoke_2");
    }

    #[test]
    fn block_invoke_suffix_without_index() {
        assert_eq!(render_suffix(b".block_invoke").unwrap(), " block_invoke");
    }

    #[test]
    fn unrecognized_suffix_is_preserved_verbatim() {
        assert_eq!(render_suffix(b".cold").unwrap(), " (cold)");
    }

    #[test]
    fn garbage_not_introduced_by_dot_or_underscore_fails() {
        assert!(render_suffix(b"garbage").is_none());
    }

    #[test]
    fn demangle_plain_function() {
        assert_eq!(demangle(b"_Z3fooi", Opts::default()).as_deref(), Some("foo(int)"));
    }

    #[test]
    fn demangle_rejects_non_mangled_input() {
        assert_eq!(demangle(b"NS0", Opts::default()), None);
    }

    // The following mirror the worked scenarios a demangler implementation
    // is expected to match byte-for-byte.

    #[test]
    fn scenario_vector_and_allocator_substitutions() {
        assert_eq!(
            demangle(b"_Z3fooSt6vectorIiSaIiEES0_", Opts::default()).as_deref(),
            Some("foo(std::vector<int, std::allocator<int>>, std::allocator<int>)")
        );
    }

    #[test]
    fn scenario_function_member_target() {
        assert_eq!(
            demangle(b"_ZNSt8functionIFvvEE6targetEv", Opts::default()).as_deref(),
            Some("std::function<void ()>::target()")
        );
    }

    #[test]
    fn scenario_ostream_template_member() {
        assert_eq!(
            demangle(b"_ZNSo9_M_insertImEERSoT_", Opts::default()).as_deref(),
            Some("std::ostream& std::ostream::_M_insert<unsigned long>(unsigned long)")
        );
    }

    #[test]
    fn scenario_rb_tree_insert_and_rebalance() {
        assert_eq!(
            demangle(b"_ZSt29_Rb_tree_insert_and_rebalancebPSt18_Rb_tree_node_baseS0_RS_", Opts::default())
                .as_deref(),
            Some(
                "std::_Rb_tree_insert_and_rebalance(bool, std::_Rb_tree_node_base*, \
                 std::_Rb_tree_node_base*, std::_Rb_tree_node_base&)"
            )
        );
    }

    #[test]
    fn scenario_vector_of_pair_five_substitutions() {
        assert_eq!(
            demangle(b"_Z3barSt6vectorISt4pairIiiESaIS1_EE", Opts::default()).as_deref(),
            Some("bar(std::vector<std::pair<int, int>, std::allocator<std::pair<int, int>>>)")
        );
    }

    #[test]
    fn scenario_bare_identifier_without_buffer_overrun() {
        assert_eq!(demangle(b"NS0", Opts::default()), None);
    }
}
