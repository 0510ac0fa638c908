//! The demangled abstract syntax tree (spec §3.2).
//!
//! Rather than a single `struct Node { tag, val, prec, subtag, ... }` carrying
//! every field for every construct (as the C reference implementation does
//! with a tagged union), this is rendered as one Rust sum type: each spec
//! "tag" becomes an enum variant carrying exactly its own fields, and spec's
//! `subtag` notion becomes a small nested enum shared by closely related
//! variants (`PtrKind` for pointer/reference/rvalue-reference,
//! `SpecialNameKind` for the `special_name` alternatives, `LocalNameKind` for
//! the three `local_name` shapes). `Node` owns its children; the sole
//! exception is [`Node::FwdTemplateRef`], which holds a handle into the
//! per-parse forward-reference arena rather than a subtree (spec §3.4).

pub(crate) mod tag;

use crate::grammar::operator::OperatorEntry;
use tag::{CvQuals, PtrKind, RefQuals, SpecialKind};

pub(crate) type FwdRefId = usize;

/// `Ts`/`Tu`/`Te` elaborated-type-specifier keyword (spec §4.5.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElaboratedKeyword {
    Struct,
    Union,
    Enum,
}

impl ElaboratedKeyword {
    pub(crate) fn spelling(&self) -> &'static str {
        match self {
            ElaboratedKeyword::Struct => "struct ",
            ElaboratedKeyword::Union => "union ",
            ElaboratedKeyword::Enum => "enum ",
        }
    }
}

/// The three `local-name` entity shapes (spec §4.5.2).
#[derive(Debug, Clone)]
pub(crate) enum LocalNameKind<'a> {
    /// `Z <encoding> E <name> [<discriminator>]`
    Name {
        name: Box<Node<'a>>,
        discriminator: Option<u64>,
    },
    /// `Z <encoding> E s [<discriminator>]`
    StringLiteral { discriminator: Option<u64> },
    /// `Z <encoding> E d [<number>] _ <name>`
    DefaultArg {
        arg_index: Option<u64>,
        name: Box<Node<'a>>,
    },
}

/// `special_name` alternatives (spec §4.5.1 item 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SpecialNameKind {
    VirtualTable,
    Vtt,
    Typeinfo,
    TypeinfoName,
    ConstructionVtable,
    VirtualThunk,
    VirtualThunkCovariant,
    NonVirtualThunk,
    GuardVariable,
    ReferenceTemporary,
    TlsWrapper,
    TlsInit,
    TemplateParamObject,
    ModuleInit,
}

/// Fold-expression direction/arity (spec §4.5.5, `fL`/`fR`/`fl`/`fr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FoldKind {
    LeftBinary,
    RightBinary,
    LeftUnary,
    RightUnary,
}

/// `<exception-spec>` attached to a function type (`Do`, `DO<expr>E`, `Dw<type>*E`).
#[derive(Debug, Clone)]
pub(crate) enum ExceptionSpec<'a> {
    /// `Do`: plain `noexcept`.
    Noexcept,
    /// `DO <expression> E`: `noexcept(expr)`.
    NoexceptIf(Box<Node<'a>>),
    /// `Dw <type>+ E`: the deprecated dynamic `throw(T1, T2, ...)`.
    Dynamic(Vec<Node<'a>>),
}

/// Explicit-cast operator spelling (`cv`, `static_cast`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CastKind {
    Functional,
    Static,
    Dynamic,
    Reinterpret,
    Const,
}

impl CastKind {
    pub(crate) fn spelling(&self) -> Option<&'static str> {
        match self {
            CastKind::Functional => None,
            CastKind::Static => Some("static_cast"),
            CastKind::Dynamic => Some("dynamic_cast"),
            CastKind::Reinterpret => Some("reinterpret_cast"),
            CastKind::Const => Some("const_cast"),
        }
    }
}

/// A demangled construct. See the module docs for the rendering strategy.
#[derive(Debug, Clone)]
pub(crate) enum Node<'a> {
    // ---- types -------------------------------------------------------
    /// A non-vendor builtin type spelling (`int`, `unsigned long`, ...).
    /// Never substitutable (spec §9(b)).
    Builtin(&'static str),
    /// `u <source-name> [<template-args>]`
    VendorBuiltin {
        name: &'a [u8],
        args: Option<Box<Node<'a>>>,
    },
    Qualified {
        inner: Box<Node<'a>>,
        cv: CvQuals,
    },
    VendorExtQualified {
        inner: Box<Node<'a>>,
        vendor_ext: &'a [u8],
        args: Option<Box<Node<'a>>>,
    },
    /// Pointer, lvalue-reference, or rvalue-reference decoration.
    Decorated {
        kind: PtrKind,
        inner: Box<Node<'a>>,
    },
    Array {
        dimension: Option<Box<Node<'a>>>,
        inner: Box<Node<'a>>,
    },
    VectorTy {
        dimension: Option<Box<Node<'a>>>,
        inner: Box<Node<'a>>,
    },
    ComplexImaginary {
        imaginary: bool,
        inner: Box<Node<'a>>,
    },
    PointerToMember {
        class_ty: Box<Node<'a>>,
        member_ty: Box<Node<'a>>,
    },
    FunctionTy {
        ret: Option<Box<Node<'a>>>,
        params: Vec<Node<'a>>,
        requires: Option<Box<Node<'a>>>,
        exception_spec: Option<ExceptionSpec<'a>>,
        cv: CvQuals,
        ref_qual: RefQuals,
    },
    Decltype(Box<Node<'a>>),
    PackExpansionTy(Box<Node<'a>>),
    ClassEnumTy {
        inner: Box<Node<'a>>,
        elaborate: Option<ElaboratedKeyword>,
    },

    // ---- template machinery -------------------------------------------
    TemplateParam {
        level: u32,
        index: u32,
    },
    FwdTemplateRef(FwdRefId),
    TemplateArgumentPack(Vec<Node<'a>>),
    ParameterPack(Vec<Node<'a>>),
    TemplateArgs(Vec<Node<'a>>),
    NameWithTemplateArgs {
        name: Box<Node<'a>>,
        args: Box<Node<'a>>,
    },

    // ---- names ----------------------------------------------------------
    NestedName {
        path: Vec<Node<'a>>,
        cv: CvQuals,
        ref_qual: RefQuals,
    },
    LocalName {
        encoding: Box<Node<'a>>,
        kind: LocalNameKind<'a>,
    },
    ModuleName {
        partition: bool,
        parent: Option<Box<Node<'a>>>,
        name: &'a [u8],
    },
    ClosureTyName {
        template_params: Option<Box<Node<'a>>>,
        params: Vec<Node<'a>>,
        requires1: Option<Box<Node<'a>>>,
        requires2: Option<Box<Node<'a>>>,
        count: &'a [u8],
    },
    UnnamedTypeName(&'a [u8]),
    StructuredBinding(Vec<Node<'a>>),
    CtorDtorName {
        scope: Box<Node<'a>>,
        is_dtor: bool,
    },
    ConvOpTy(Box<Node<'a>>),
    AbiTagTy {
        inner: Box<Node<'a>>,
        tag: &'a [u8],
    },
    SourceName(&'a [u8]),
    /// `St <unqualified-name>` at the top level: `std::` + name.
    StdQualified(Box<Node<'a>>),
    OperatorName(&'static OperatorEntry),
    LiteralOperatorName(&'a [u8]),
    VendorOperatorName {
        index: u8,
        name: &'a [u8],
    },

    // ---- substitution markers -------------------------------------------
    SpecialSubstitution(SpecialKind),
    ExpandedSpecialSubstitution(SpecialKind),

    // ---- the encoding itself ---------------------------------------------
    Encoding {
        name: Box<Node<'a>>,
        /// Present only for a template function whose return type isn't
        /// encoded in its own `<template-args>` (spec §4.5.1): the ABI omits
        /// it entirely for non-template functions and for constructors,
        /// destructors, and conversion operators, which recover it from the
        /// class/conversion-target type instead.
        ret: Option<Box<Node<'a>>>,
        params: Vec<Node<'a>>,
        cv: CvQuals,
        ref_qual: RefQuals,
    },
    SpecialName {
        kind: SpecialNameKind,
        args: Vec<Node<'a>>,
    },

    // ---- expressions ------------------------------------------------------
    BinaryExpr {
        op: &'static OperatorEntry,
        lhs: Box<Node<'a>>,
        rhs: Box<Node<'a>>,
    },
    PrefixExpr {
        op: &'static OperatorEntry,
        operand: Box<Node<'a>>,
    },
    PostfixExpr {
        op: &'static OperatorEntry,
        operand: Box<Node<'a>>,
    },
    MemberExpr {
        op: &'static OperatorEntry,
        lhs: Box<Node<'a>>,
        rhs: Box<Node<'a>>,
    },
    ArraySubscriptExpr {
        lhs: Box<Node<'a>>,
        rhs: Box<Node<'a>>,
    },
    CallExpr {
        callee: Box<Node<'a>>,
        args: Vec<Node<'a>>,
    },
    ConditionalExpr {
        cond: Box<Node<'a>>,
        then_branch: Box<Node<'a>>,
        else_branch: Box<Node<'a>>,
    },
    CastExpr {
        kind: CastKind,
        ty: Box<Node<'a>>,
        operand: Box<Node<'a>>,
    },
    TypeidTypeExpr(Box<Node<'a>>),
    TypeidExprExpr(Box<Node<'a>>),
    SizeofTypeExpr(Box<Node<'a>>),
    SizeofExprExpr(Box<Node<'a>>),
    AlignofTypeExpr(Box<Node<'a>>),
    AlignofExprExpr(Box<Node<'a>>),
    NoexceptExpr(Box<Node<'a>>),
    ThrowExpr(Option<Box<Node<'a>>>),
    FoldExpr {
        kind: FoldKind,
        op: &'static OperatorEntry,
        pack: Box<Node<'a>>,
        init: Option<Box<Node<'a>>>,
    },
    PackSizeofTypeExpr(Box<Node<'a>>),
    PackSizeofExprExpr(Box<Node<'a>>),
    PackSizeofArgsExpr(Box<Node<'a>>),
    PackExpansionExpr(Box<Node<'a>>),
    ListInitExpr {
        ty: Option<Box<Node<'a>>>,
        elems: Vec<Node<'a>>,
    },
    NewExpr {
        global: bool,
        is_array: bool,
        placement: Vec<Node<'a>>,
        ty: Box<Node<'a>>,
        init: Option<Box<Node<'a>>>,
    },
    DeleteExpr {
        global: bool,
        is_array: bool,
        operand: Box<Node<'a>>,
    },
    BracedExpr {
        field: Box<Node<'a>>,
        value: Box<Node<'a>>,
    },
    BracedRangeExpr {
        first: Box<Node<'a>>,
        last: Box<Node<'a>>,
        value: Box<Node<'a>>,
    },
    FunctionParamExpr {
        level: u32,
        index: Option<u32>,
    },
    ThisExpr,
    UnresolvedNameExpr(Box<Node<'a>>),

    // ---- expr_primary literals --------------------------------------------
    IntegerLiteral {
        ty_name: &'static str,
        digits: &'a [u8],
        negative: bool,
    },
    CharLiteral {
        digits: &'a [u8],
        negative: bool,
    },
    BoolLiteral(bool),
    NullptrLiteral,
    NullMemberPointerLiteral,
    ExprPrimaryGeneric {
        ty: Box<Node<'a>>,
        value: &'a [u8],
    },
    MangledNameExpr(Box<Node<'a>>),

    /// A sequence with a fixed printing separator (parameter lists, nested
    /// name chains built up generically, etc.)
    Many {
        children: Vec<Node<'a>>,
        sep: &'static str,
    },
}

impl<'a> Node<'a> {
    pub(crate) fn many(children: Vec<Node<'a>>, sep: &'static str) -> Node<'a> {
        Node::Many { children, sep }
    }
}
