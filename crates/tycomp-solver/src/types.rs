//! Type representation.
//!
//! Types are interned: a `TypeId` is a handle into a `TypeInterner` and two
//! structurally equal types always share the same id, so `==` on `TypeId` is
//! semantic type identity.

use serde::Serialize;
use smallvec::SmallVec;
use tycomp_common::Atom;

/// Handle to an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Sentinel for "no information". Never an error: completion treats it as
    /// a type it knows nothing about.
    pub const UNKNOWN: TypeId = TypeId(0);
    /// A type that failed to lower (unknown annotation name).
    pub const ERROR: TypeId = TypeId(1);
    pub const VOID: TypeId = TypeId(2);
    pub const INT: TypeId = TypeId(3);
    pub const DOUBLE: TypeId = TypeId(4);
    pub const BOOL: TypeId = TypeId(5);
    pub const STRING: TypeId = TypeId(6);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: TypeId = TypeId(7);

    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER.0
    }

    /// Holes unify with anything and absorb member lookups.
    #[inline]
    pub fn is_hole(self) -> bool {
        self == Self::UNKNOWN || self == Self::ERROR
    }
}

/// Builtin types, registered in `TypeId` order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Unknown,
    Error,
    Void,
    Int,
    Double,
    Bool,
    String,
}

impl IntrinsicKind {
    /// Registration order; index `i` is interned as `TypeId(i)`.
    pub const ALL: [IntrinsicKind; 7] = [
        IntrinsicKind::Unknown,
        IntrinsicKind::Error,
        IntrinsicKind::Void,
        IntrinsicKind::Int,
        IntrinsicKind::Double,
        IntrinsicKind::Bool,
        IntrinsicKind::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Unknown => "_",
            IntrinsicKind::Error => "<<error type>>",
            IntrinsicKind::Void => "Void",
            IntrinsicKind::Int => "Int",
            IntrinsicKind::Double => "Double",
            IntrinsicKind::Bool => "Bool",
            IntrinsicKind::String => "String",
        }
    }

    /// Intrinsic named by a type annotation, if any.
    pub fn from_name(name: &str) -> Option<IntrinsicKind> {
        match name {
            "Void" => Some(IntrinsicKind::Void),
            "Int" => Some(IntrinsicKind::Int),
            "Double" => Some(IntrinsicKind::Double),
            "Bool" => Some(IntrinsicKind::Bool),
            "String" => Some(IntrinsicKind::String),
            _ => None,
        }
    }
}

/// A solver type variable. Bindings live in the constraint system's
/// unification table, never in the interner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVar(pub u32);

/// Index of a nominal (enum or struct) declaration in the type environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NominalId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    /// Argument label; `None` for an unlabeled parameter.
    pub label: Option<Atom>,
    pub type_id: TypeId,
}

impl ParamInfo {
    pub fn unlabeled(type_id: TypeId) -> Self {
        ParamInfo {
            label: None,
            type_id,
        }
    }

    pub fn labeled(label: Atom, type_id: TypeId) -> Self {
        ParamInfo {
            label: Some(label),
            type_id,
        }
    }
}

/// Function signature. Labels take part in call matching but not in
/// unification of two function types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: SmallVec<[ParamInfo; 4]>,
    pub result: TypeId,
    pub is_async: bool,
}

/// Structural type data behind a `TypeId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// `[Element]`
    Array(TypeId),
    Function(FunctionShape),
    Nominal(NominalId),
    Var(TypeVar),
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod types_tests;
