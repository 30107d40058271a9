//! Constraints and solver failures.

use crate::env::OverloadChoice;
use crate::types::{TypeId, TypeVar};
use smallvec::SmallVec;
use tycomp_ast::NodeIndex;
use tycomp_common::Atom;

/// Which literal produced a defaultable type variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    /// Defaults to Int; may also become Double.
    Int,
    /// Defaults to Double.
    Float,
}

impl LiteralKind {
    pub fn default_type(self) -> TypeId {
        match self {
            LiteralKind::Int => TypeId::INT,
            LiteralKind::Float => TypeId::DOUBLE,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct LiteralVar {
    pub var: TypeVar,
    pub kind: LiteralKind,
    pub node: NodeIndex,
}

#[derive(Clone, Debug)]
pub(crate) struct CallArg {
    pub label: Option<Atom>,
    pub type_id: TypeId,
    /// An unlabeled completion point, which may stand for any label.
    pub any_label: bool,
}

/// A pending relation between types.
#[derive(Clone, Debug)]
pub(crate) enum Constraint {
    /// `left == right`
    Equal { left: TypeId, right: TypeId },
    /// `base.name` has type `result`.
    Member {
        node: NodeIndex,
        base: TypeId,
        name: Atom,
        result: TypeId,
    },
    /// `.name` resolves to a static member of `base` whose type is `base`.
    UnresolvedMember {
        node: NodeIndex,
        base: TypeId,
        name: Atom,
    },
    /// `callee(args)` has type `result`.
    Call {
        node: NodeIndex,
        callee: TypeId,
        args: SmallVec<[CallArg; 4]>,
        result: TypeId,
    },
    /// `type_id` is bound to exactly one of `choices`.
    Disjunction {
        node: NodeIndex,
        type_id: TypeId,
        choices: SmallVec<[OverloadChoice; 2]>,
    },
    /// A closure literal with the given syntactic shape. Resolved last: if
    /// context has already given `var` a function type the shapes are
    /// merged, otherwise `var` takes the closure's own shape.
    Closure {
        node: NodeIndex,
        var: TypeId,
        params: SmallVec<[TypeId; 4]>,
        result: TypeId,
        is_async: bool,
    },
}

impl Constraint {
    pub(crate) fn is_disjunction(&self) -> bool {
        matches!(self, Constraint::Disjunction { .. })
    }
}

/// Why a branch of the search failed. In relaxed mode every failure except
/// `StepLimit` is counted as a fix instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveFailure {
    /// Two types could not be unified.
    Mismatch { expected: TypeId, found: TypeId },
    /// Binding `var` would produce an infinite type.
    OccursCheck { var: TypeVar, type_id: TypeId },
    /// The base type has no member with this name.
    NoSuchMember { base: TypeId, name: Atom },
    /// A name that is neither local nor a declared function.
    UnknownName { name: Atom },
    ArityMismatch { expected: usize, found: usize },
    LabelMismatch {
        expected: Option<Atom>,
        found: Option<Atom>,
    },
    /// The callee of a call has a non-function type.
    NotCallable { type_id: TypeId },
    /// A literal ended up with a type it cannot express.
    LiteralMismatch { node: NodeIndex, type_id: TypeId },
    /// An async closure was used where a synchronous function is expected.
    AsyncMismatch { node: NodeIndex },
    /// Constraints that could never be decided (e.g. a member access on a
    /// base whose type was never determined).
    Unsolved { remaining: usize },
    /// The step budget ran out.
    StepLimit,
    /// The expression nests deeper than generation will walk.
    DepthLimit { node: NodeIndex },
}

impl std::fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveFailure::Mismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected.0, found.0)
            }
            SolveFailure::OccursCheck { var, type_id } => {
                write!(f, "infinite type: $T{} occurs in {}", var.0, type_id.0)
            }
            SolveFailure::NoSuchMember { base, name } => {
                write!(f, "type {} has no member {}", base.0, name.0)
            }
            SolveFailure::UnknownName { name } => write!(f, "unknown name {}", name.0),
            SolveFailure::ArityMismatch { expected, found } => {
                write!(f, "expected {expected} arguments, found {found}")
            }
            SolveFailure::LabelMismatch { expected, found } => {
                write!(f, "argument label mismatch: expected {expected:?}, found {found:?}")
            }
            SolveFailure::NotCallable { type_id } => {
                write!(f, "type {} is not callable", type_id.0)
            }
            SolveFailure::LiteralMismatch { node, type_id } => {
                write!(f, "literal {} cannot have type {}", node.0, type_id.0)
            }
            SolveFailure::AsyncMismatch { node } => {
                write!(f, "async closure {} used in a synchronous context", node.0)
            }
            SolveFailure::Unsolved { remaining } => {
                write!(f, "{remaining} constraints left unsolved")
            }
            SolveFailure::StepLimit => write!(f, "solver step limit reached"),
            SolveFailure::DepthLimit { node } => {
                write!(f, "expression nesting too deep at node {}", node.0)
            }
        }
    }
}

impl std::error::Error for SolveFailure {}
