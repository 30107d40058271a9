//! Expression type checker for completion.
//!
//! Types are interned (`TypeInterner`), declarations are collected into a
//! `TypeEnvironment`, and a `ConstraintSystem` generates and solves
//! constraints for one expression or statement at a time. Every complete
//! assignment of types is handed to a `SolutionListener` as a `Solution`.
//!
//! Two modes are supported:
//! - `SolveMode::Strict`: any failure kills the branch.
//! - `SolveMode::Relaxed`: failures are counted as fixes and only the
//!   solutions with the fewest fixes are delivered.

pub mod constraint;
pub mod env;
pub mod format;
pub mod infer;
pub mod intern;
pub mod scope;
pub mod solution;
pub mod system;
pub mod types;

mod generate;

pub use constraint::{LiteralKind, SolveFailure};
pub use env::{
    MemberInfo, MemberKind, MemberLookupResult, NominalInfo, NominalKind, OverloadChoice,
    TypeEnvironment,
};
pub use format::TypeFormatter;
pub use intern::TypeInterner;
pub use scope::LocalScope;
pub use solution::{
    ListenerFn, Solution, SolutionListener, SolveMode, SolveSummary, SolveTarget, SolverLimits,
};
pub use system::ConstraintSystem;
pub use types::{
    FunctionShape, IntrinsicKind, NominalId, ParamInfo, TypeData, TypeId, TypeVar,
};

#[cfg(test)]
#[path = "../tests/solve_tests.rs"]
mod solve_tests;
