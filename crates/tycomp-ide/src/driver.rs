//! Entry points tying the locator, solver and handlers together.

use crate::callback::{CompletionSolutionHandler, TypeCheckCompletionCallback};
use crate::handlers::{ArgumentHandler, MemberAccessHandler, UnresolvedMemberHandler};
use crate::locator::{CompletionContextFinder, CompletionKind};
use crate::options::CompletionOptions;
use crate::results::CompletionItem;
use serde::Serialize;
use tracing::{debug, info};
use tycomp_ast::NodeIndex;
use tycomp_solver::{ConstraintSystem, SolveMode, TypeEnvironment};

/// How the solutions a callback saw were obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TypeCheckOutcome {
    /// The statement around the completion point type checked.
    Solved,
    /// Only the fallback type check found solutions.
    RecoveredByFallback,
    NoSolution,
}

/// Type check the code around `completion`, feeding every solution to
/// `callback`. Falls back to the expression-only check when the statement
/// has no solution and `options` allow it.
#[tracing::instrument(level = "debug", skip_all, fields(completion = completion.0))]
pub fn typecheck_for_completion<H: CompletionSolutionHandler>(
    env: &TypeEnvironment<'_>,
    completion: NodeIndex,
    callback: &mut TypeCheckCompletionCallback<H>,
    options: &CompletionOptions,
) -> TypeCheckOutcome {
    let finder = CompletionContextFinder::new(env.arena(), completion);
    let target = finder.primary_target(env, options.limits);
    let summary = ConstraintSystem::solve(env, &target, SolveMode::Strict, options.limits, callback);
    debug!(
        delivered = summary.delivered,
        steps = summary.steps,
        hit_limit = summary.hit_limit,
        "primary solve finished"
    );
    if callback.got_callback() {
        return TypeCheckOutcome::Solved;
    }
    if !options.enable_fallback {
        return TypeCheckOutcome::NoSolution;
    }

    let summary = callback.fallback_type_check(env, completion, options.limits);
    debug!(delivered = summary.delivered, "fallback solve finished");
    if callback.got_callback() {
        TypeCheckOutcome::RecoveredByFallback
    } else {
        TypeCheckOutcome::NoSolution
    }
}

/// Completion results for one request.
#[derive(Clone, Debug, Serialize)]
pub struct CompletionResponse {
    pub kind: CompletionKind,
    pub outcome: TypeCheckOutcome,
    pub items: Vec<CompletionItem>,
}

impl CompletionResponse {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Run the handler matching the shape of `completion` and collect its
/// items. Bare expression completions get no items.
pub fn complete_at(
    env: &TypeEnvironment<'_>,
    completion: NodeIndex,
    options: &CompletionOptions,
) -> CompletionResponse {
    let arena = env.arena();
    let kind = CompletionContextFinder::new(arena, completion).completion_kind();

    let (outcome, items) = match kind {
        CompletionKind::MemberAccess { .. } => match MemberAccessHandler::new(arena, completion) {
            Some(handler) => {
                let (outcome, handler) = run(env, completion, handler, options);
                (outcome, handler.completion_items(env, options.async_members))
            }
            None => (TypeCheckOutcome::NoSolution, Vec::new()),
        },
        CompletionKind::UnresolvedMember => {
            match UnresolvedMemberHandler::new(arena, completion) {
                Some(handler) => {
                    let (outcome, handler) = run(env, completion, handler, options);
                    (outcome, handler.completion_items(env))
                }
                None => (TypeCheckOutcome::NoSolution, Vec::new()),
            }
        }
        CompletionKind::Argument { .. } => match ArgumentHandler::new(arena, completion) {
            Some(handler) => {
                let (outcome, handler) = run(env, completion, handler, options);
                (outcome, handler.completion_items(env))
            }
            None => (TypeCheckOutcome::NoSolution, Vec::new()),
        },
        CompletionKind::Expression => (TypeCheckOutcome::NoSolution, Vec::new()),
    };

    info!(?kind, ?outcome, items = items.len(), "completion");
    CompletionResponse {
        kind,
        outcome,
        items,
    }
}

fn run<H: CompletionSolutionHandler>(
    env: &TypeEnvironment<'_>,
    completion: NodeIndex,
    handler: H,
    options: &CompletionOptions,
) -> (TypeCheckOutcome, H) {
    let mut callback = TypeCheckCompletionCallback::new(handler);
    let outcome = typecheck_for_completion(env, completion, &mut callback, options);
    (outcome, callback.into_handler())
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
