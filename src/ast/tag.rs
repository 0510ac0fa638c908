//! Precedence classes and small qualifier/kind enums shared by [`super::Node`].

/// Precedence class used by the pretty-printer to decide parenthesization
/// of expression operands (spec §3.2, §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Prec {
    Primary,
    Postfix,
    Unary,
    Cast,
    PtrMem,
    Multiplicative,
    Additive,
    Shift,
    Spaceship,
    Relational,
    Equality,
    And,
    Xor,
    Ior,
    AndIf,
    OrIf,
    Conditional,
    Assign,
    Comma,
    Default,
}

/// `r`/`V`/`K` qualifier set. Printed in the fixed order const, volatile,
/// restrict regardless of which subset is present (spec §4.5.4; confirmed
/// against `original_source/src/cplusplus/v3/v3.c`'s `pp_cv_qualifiers`,
/// which emits `"const"` before `"volatile"` before `"restrict"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CvQuals {
    pub restrict: bool,
    pub const_: bool,
    pub volatile: bool,
}

impl CvQuals {
    pub(crate) fn is_empty(&self) -> bool {
        !self.restrict && !self.const_ && !self.volatile
    }

    pub(crate) fn union(&self, other: CvQuals) -> CvQuals {
        CvQuals {
            restrict: self.restrict || other.restrict,
            const_: self.const_ || other.const_,
            volatile: self.volatile || other.volatile,
        }
    }

    /// Append this qualifier set's spelling (each with a leading space) to `out`.
    pub(crate) fn write_suffix(&self, out: &mut String) {
        if self.const_ {
            out.push_str(" const");
        }
        if self.volatile {
            out.push_str(" volatile");
        }
        if self.restrict {
            out.push_str(" restrict");
        }
    }
}

/// `R`/`O` reference-qualifier set on a member function (spec §4.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RefQuals {
    pub lvalue: bool,
    pub rvalue: bool,
}

impl RefQuals {
    pub(crate) fn is_empty(&self) -> bool {
        !self.lvalue && !self.rvalue
    }

    pub(crate) fn write_suffix(&self, out: &mut String) {
        if self.lvalue {
            out.push_str(" &");
        } else if self.rvalue {
            out.push_str(" &&");
        }
    }
}

/// The pointer-like decoration kind carried by [`super::Node::PointerLike`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PtrKind {
    Pointer,
    LValueRef,
    RValueRef,
}

impl PtrKind {
    /// Reference collapsing (spec §4.5.4): `&+& = &`, `&+&& = &`,
    /// `&&+& = &`, `&&+&& = &&`. Pointers never collapse with anything.
    pub(crate) fn collapse_with(outer: PtrKind, inner: PtrKind) -> Option<PtrKind> {
        use PtrKind::*;
        match (outer, inner) {
            (Pointer, _) | (_, Pointer) => None,
            (LValueRef, LValueRef) => Some(LValueRef),
            (LValueRef, RValueRef) => Some(LValueRef),
            (RValueRef, LValueRef) => Some(LValueRef),
            (RValueRef, RValueRef) => Some(RValueRef),
        }
    }

    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            PtrKind::Pointer => "*",
            PtrKind::LValueRef => "&",
            PtrKind::RValueRef => "&&",
        }
    }
}

/// Which of the seven two-letter `std::` aliases a special substitution names
/// (spec §3.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpecialKind {
    Std,
    Allocator,
    BasicString,
    String,
    Istream,
    Ostream,
    Iostream,
}

impl SpecialKind {
    pub(crate) fn short_form(&self) -> &'static str {
        match self {
            SpecialKind::Std => "std",
            SpecialKind::Allocator => "std::allocator",
            SpecialKind::BasicString => "std::basic_string",
            SpecialKind::String => "std::string",
            SpecialKind::Istream => "std::istream",
            SpecialKind::Ostream => "std::ostream",
            SpecialKind::Iostream => "std::iostream",
        }
    }
}
