//! Solver outputs and the listener interface that receives them.

use crate::env::{OverloadChoice, TypeEnvironment};
use crate::scope::LocalScope;
use crate::types::TypeId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tycomp_ast::{DeclContext, NodeIndex};
use tycomp_common::limits::{MAX_SOLUTIONS, MAX_SOLVER_STEPS};

/// How the solver treats failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveMode {
    /// Any failure kills the branch. Solutions are delivered as found.
    Strict,
    /// Failures are recorded as fixes and solving continues. Only the
    /// solutions with the fewest fixes are delivered, after the search.
    Relaxed,
}

/// Bounds on a single solve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverLimits {
    /// Stop after this many complete solutions.
    pub max_solutions: usize,
    /// Stop after this many constraint simplification steps.
    pub max_steps: usize,
}

impl Default for SolverLimits {
    fn default() -> Self {
        SolverLimits {
            max_solutions: MAX_SOLUTIONS,
            max_steps: MAX_SOLVER_STEPS,
        }
    }
}

/// What to solve: an expression or statement, the context it lives in, and
/// the types of names bound before it.
#[derive(Clone, Debug)]
pub struct SolveTarget {
    pub root: NodeIndex,
    pub dc: DeclContext,
    pub scope: LocalScope,
}

/// One complete assignment of types to the nodes of a solved target.
///
/// Node types are fully substituted; type variables that stayed unbound
/// remain as `TypeData::Var` and are erased by consumers that need a
/// concrete answer.
#[derive(Clone, Debug)]
pub struct Solution<'a> {
    env: &'a TypeEnvironment<'a>,
    pub(crate) node_types: FxHashMap<NodeIndex, TypeId>,
    pub(crate) overload_choices: FxHashMap<NodeIndex, OverloadChoice>,
    pub(crate) fixes: u32,
    pub(crate) mode: SolveMode,
}

impl<'a> Solution<'a> {
    pub(crate) fn new(
        env: &'a TypeEnvironment<'a>,
        node_types: FxHashMap<NodeIndex, TypeId>,
        overload_choices: FxHashMap<NodeIndex, OverloadChoice>,
        fixes: u32,
        mode: SolveMode,
    ) -> Self {
        Solution {
            env,
            node_types,
            overload_choices,
            fixes,
            mode,
        }
    }

    pub fn env(&self) -> &'a TypeEnvironment<'a> {
        self.env
    }

    /// Type assigned to `node`, or `None` if the node was not part of the
    /// solved target.
    pub fn type_of(&self, node: NodeIndex) -> Option<TypeId> {
        self.node_types.get(&node).copied()
    }

    pub fn has_type(&self, node: NodeIndex) -> bool {
        self.node_types.contains_key(&node)
    }

    /// Declaration chosen for a name or member reference node.
    pub fn overload_choice(&self, node: NodeIndex) -> Option<&OverloadChoice> {
        self.overload_choices.get(&node)
    }

    /// Number of failures repaired to reach this solution. Always 0 in
    /// strict mode.
    pub fn fixes(&self) -> u32 {
        self.fixes
    }

    pub fn mode(&self) -> SolveMode {
        self.mode
    }

    /// Nodes with recorded types, in no particular order.
    pub fn typed_nodes(&self) -> impl Iterator<Item = (NodeIndex, TypeId)> + '_ {
        self.node_types.iter().map(|(node, ty)| (*node, *ty))
    }
}

/// Receives solutions from the solver, one call per solution.
pub trait SolutionListener {
    fn saw_solution(&mut self, solution: &Solution<'_>);
}

/// Adapts a closure into a [`SolutionListener`].
pub struct ListenerFn<F>(pub F);

impl<F> SolutionListener for ListenerFn<F>
where
    F: FnMut(&Solution<'_>),
{
    fn saw_solution(&mut self, solution: &Solution<'_>) {
        (self.0)(solution)
    }
}

/// Counters from one solve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SolveSummary {
    /// Solutions handed to the listener.
    pub delivered: usize,
    /// Constraint simplification steps taken.
    pub steps: usize,
    /// True if the search stopped early on a limit.
    pub hit_limit: bool,
}
