//! Centralized limits and thresholds for solving and completion.
//!
//! Completion runs inside an editor request, so every search the solver
//! performs is bounded. Defaults live here; `CompletionOptions` in
//! `tycomp-ide` can override the solver ones per request.

// =============================================================================
// Solver limits
// =============================================================================

/// Maximum number of solutions delivered for a single solve.
///
/// Overloaded callees multiply the solution space. Completion only needs a
/// representative set of typings for the completion node, so enumeration stops
/// once this many solutions have been produced.
pub const MAX_SOLUTIONS: usize = 64;

/// Maximum number of constraint simplification steps for a single solve.
///
/// Each processed constraint and each attempted disjunction choice counts as a
/// step. When exceeded the current branch is abandoned and no further
/// solutions are produced.
pub const MAX_SOLVER_STEPS: usize = 20_000;

/// Maximum depth when resolving or rewriting a type structurally.
///
/// Type variables are bound with an occurs check, so cycles should not exist;
/// this guard keeps a bad binding from overflowing the stack.
pub const MAX_TYPE_DEPTH: u32 = 64;

/// Maximum syntactic nesting walked by constraint generation.
///
/// Generation recurses once per nested expression or statement. Deeper
/// input fails the solve instead of overflowing the stack.
pub const MAX_EXPR_DEPTH: u32 = 256;

// =============================================================================
// Locator limits
// =============================================================================

/// Maximum nesting of `let` pre-solves when building the visible scope.
///
/// A local's initializer can mention earlier locals, whose initializers are
/// solved in turn. Past this depth, locals are typed as unknown.
pub const MAX_SCOPE_PRESOLVE_DEPTH: u32 = 32;
