//! `.<cc>` completion, including `case .<cc>:` patterns.

use super::{dedup_items, enum_case_items};
use crate::callback::CompletionSolutionHandler;
use crate::results::{CompletionItem, sort_completion_items};
use crate::utils::{get_pattern_match_type, get_type_for_completion, nullable_types_equal};
use serde::Serialize;
use tracing::trace;
use tycomp_ast::{Node, NodeArena, NodeIndex};
use tycomp_solver::{Solution, TypeEnvironment, TypeId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UnresolvedMemberResult {
    /// Contextual type of the `.<cc>` expression.
    pub expected_type: TypeId,
    /// Switch subject type when the completion is a case pattern.
    pub pattern_match_type: Option<TypeId>,
}

#[derive(Debug)]
pub struct UnresolvedMemberHandler {
    completion: NodeIndex,
    results: Vec<UnresolvedMemberResult>,
}

impl UnresolvedMemberHandler {
    /// `None` unless `completion` is a `.<cc>` node.
    pub fn new(arena: &NodeArena, completion: NodeIndex) -> Option<Self> {
        match arena.get(completion) {
            Some(Node::CodeCompletion {
                base,
                leading_dot: true,
            }) if base.is_none() => Some(UnresolvedMemberHandler {
                completion,
                results: Vec::new(),
            }),
            _ => None,
        }
    }

    pub fn results(&self) -> &[UnresolvedMemberResult] {
        &self.results
    }

    /// Enum cases of every contextual and pattern type seen, sorted.
    pub fn completion_items(&self, env: &TypeEnvironment<'_>) -> Vec<CompletionItem> {
        let mut items = Vec::new();
        for result in &self.results {
            let types = std::iter::once(result.expected_type).chain(result.pattern_match_type);
            for type_id in types.filter(|type_id| !type_id.is_hole()) {
                items.extend(enum_case_items(env, type_id));
            }
        }
        dedup_items(&mut items);
        sort_completion_items(&mut items);
        items
    }
}

impl CompletionSolutionHandler for UnresolvedMemberHandler {
    fn saw_solution_impl(&mut self, solution: &Solution<'_>) {
        let expected_type = get_type_for_completion(solution, self.completion);
        let pattern_match_type = get_pattern_match_type(solution, self.completion);
        trace!(
            expected_type = expected_type.0,
            pattern = ?pattern_match_type,
            "unresolved member solution"
        );

        let seen = self.results.iter().any(|result| {
            result.expected_type == expected_type
                && nullable_types_equal(result.pattern_match_type, pattern_match_type)
        });
        if !seen {
            self.results.push(UnresolvedMemberResult {
                expected_type,
                pattern_match_type,
            });
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unresolved_member_tests.rs"]
mod unresolved_member_tests;
