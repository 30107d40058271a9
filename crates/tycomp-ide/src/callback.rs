//! The solution-observation protocol.
//!
//! A `TypeCheckCompletionCallback` is handed to the solver as its
//! `SolutionListener`. It records that at least one solution was seen and
//! forwards each one to a per-kind `CompletionSolutionHandler`, which keeps
//! whatever it needs from the solution before the call returns.
//!
//! ```text
//! NotStarted ──saw_solution──▶ HasSolution
//!     │
//!     └──fallback_type_check──▶ HasSolution | NoSolution
//! ```

use crate::locator::CompletionContextFinder;
use serde::Serialize;
use tracing::debug;
use tycomp_ast::NodeIndex;
use tycomp_solver::{
    ConstraintSystem, Solution, SolutionListener, SolveMode, SolveSummary, SolverLimits,
    TypeEnvironment,
};

/// Per-kind handling of solutions. Implementations must not retain the
/// solution past the call and must not re-enter the solver.
pub trait CompletionSolutionHandler {
    fn saw_solution_impl(&mut self, solution: &Solution<'_>);
}

/// Observable state of a callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CallbackState {
    NotStarted,
    HasSolution,
    /// The fallback ran and produced nothing. Terminal.
    NoSolution,
}

#[derive(Debug, Default)]
pub struct TypeCheckCompletionCallback<H> {
    got_callback: bool,
    fallback_ran: bool,
    handler: H,
}

impl<H: CompletionSolutionHandler> TypeCheckCompletionCallback<H> {
    pub fn new(handler: H) -> Self {
        TypeCheckCompletionCallback {
            got_callback: false,
            fallback_ran: false,
            handler,
        }
    }

    /// Called for each solution produced while type checking an expression
    /// the completion node participates in.
    pub fn saw_solution(&mut self, solution: &Solution<'_>) {
        self.got_callback = true;
        self.handler.saw_solution_impl(solution);
    }

    /// True once at least one solution was passed to `saw_solution`.
    pub fn got_callback(&self) -> bool {
        self.got_callback
    }

    pub fn fallback_ran(&self) -> bool {
        self.fallback_ran
    }

    pub fn state(&self) -> CallbackState {
        if self.got_callback {
            CallbackState::HasSolution
        } else if self.fallback_ran {
            CallbackState::NoSolution
        } else {
            CallbackState::NotStarted
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    /// Type check the completion node in its outermost expression context,
    /// calling `saw_solution` for each solution formed.
    ///
    /// Only for when the primary solve produced nothing. The expression is
    /// solved without its statement (annotations and return types are
    /// dropped) and in relaxed mode, so only the solutions with the fewest
    /// fixes arrive. Finding nothing leaves the callback in `NoSolution`.
    pub fn fallback_type_check(
        &mut self,
        env: &TypeEnvironment<'_>,
        completion: NodeIndex,
        limits: SolverLimits,
    ) -> SolveSummary {
        debug_assert!(
            !self.got_callback,
            "fallback type check requested after a solution was seen"
        );
        self.fallback_ran = true;

        let finder = CompletionContextFinder::new(env.arena(), completion);
        let Some(target) = finder.fallback_target(env, limits) else {
            debug!(completion = completion.0, "no expression to fall back to");
            return SolveSummary::default();
        };
        debug!(root = target.root.0, "running fallback type check");
        ConstraintSystem::solve(env, &target, SolveMode::Relaxed, limits, self)
    }
}

impl<H: CompletionSolutionHandler> SolutionListener for TypeCheckCompletionCallback<H> {
    fn saw_solution(&mut self, solution: &Solution<'_>) {
        TypeCheckCompletionCallback::saw_solution(self, solution);
    }
}

#[cfg(test)]
#[path = "../tests/callback_tests.rs"]
mod callback_tests;
