//! The `opts.simple` output simplification table (spec §6, §4.7).
//!
//! Grounded on `original_source/src/cplusplus/v3/v3.c`'s `dem_simplify`: a
//! fixed, ordered list of whole-string replacements applied to the rendered
//! output. Longer/more qualified spellings are listed first so they're
//! replaced before a shorter entry could match a substring of them.

const TABLE: &[(&str, &str)] = &[
    ("basic_string<char, std::char_traits<char>, std::allocator<char>>", "string"),
    ("basic_iostream<char, std::char_traits<char>, std::allocator<char>>", "iostream"),
    ("basic_istream<char, std::char_traits<char>, std::allocator<char>>", "istream"),
    ("basic_ostream<char, std::char_traits<char>, std::allocator<char>>", "ostream"),
    ("basic_streambuf<char, std::char_traits<char>, std::allocator<char>>", "streambuf"),
    ("basic_string<char, std::char_traits<char>>", "string"),
    ("basic_iostream<char, std::char_traits<char>>", "iostream"),
    ("basic_istream<char, std::char_traits<char>>", "istream"),
    ("basic_ostream<char, std::char_traits<char>>", "ostream"),
    ("basic_streambuf<char, std::char_traits<char>>", "streambuf"),
    ("unsigned long long", "uint64_t"),
    ("long long", "int64_t"),
];

/// Applies every entry in [`TABLE`], in order, as a global replacement.
pub(crate) fn apply(out: &mut String) {
    for (from, to) in TABLE {
        if out.contains(from) {
            *out = out.replace(from, to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_full_allocator_form_to_string() {
        let mut s = "std::basic_string<char, std::char_traits<char>, std::allocator<char>>".to_string();
        apply(&mut s);
        assert_eq!(s, "std::string");
    }

    #[test]
    fn collapses_allocator_less_form_too() {
        let mut s = "std::basic_ostream<char, std::char_traits<char>>".to_string();
        apply(&mut s);
        assert_eq!(s, "std::ostream");
    }

    #[test]
    fn rewrites_integer_type_spellings() {
        let mut s = "foo(unsigned long long, long long)".to_string();
        apply(&mut s);
        assert_eq!(s, "foo(uint64_t, int64_t)");
    }

    #[test]
    fn leaves_unrelated_text_untouched() {
        let mut s = "foo(int, double)".to_string();
        apply(&mut s);
        assert_eq!(s, "foo(int, double)");
    }
}
