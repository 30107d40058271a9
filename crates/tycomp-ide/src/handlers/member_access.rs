//! `base.<cc>` completion.

use super::{dedup_items, member_label};
use crate::callback::CompletionSolutionHandler;
use crate::options::AsyncMemberPolicy;
use crate::results::{
    CompletionItem, CompletionItemKind, compute_type_relation, sort_completion_items,
};
use crate::utils::{
    get_type_for_completion, is_context_async, is_implicit_single_expression_return,
    nullable_types_equal,
};
use serde::Serialize;
use tracing::trace;
use tycomp_ast::{DeclContext, Node, NodeArena, NodeIndex};
use tycomp_solver::{MemberKind, Solution, TypeEnvironment, TypeId};

/// What one or more solutions said about the receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberAccessResult {
    pub base_type: TypeId,
    /// Type the context wants from the completed expression.
    pub expected_type: Option<TypeId>,
    pub is_implicit_single_expression_return: bool,
    pub is_in_async_context: bool,
}

#[derive(Debug)]
pub struct MemberAccessHandler {
    completion: NodeIndex,
    base: NodeIndex,
    dc: DeclContext,
    implicit_return: bool,
    results: Vec<MemberAccessResult>,
}

impl MemberAccessHandler {
    /// `None` unless `completion` is a `base.<cc>` node.
    pub fn new(arena: &NodeArena, completion: NodeIndex) -> Option<Self> {
        let Some(Node::CodeCompletion { base, .. }) = arena.get(completion) else {
            return None;
        };
        if base.is_none() {
            return None;
        }
        Some(MemberAccessHandler {
            completion,
            base: *base,
            dc: arena
                .enclosing_decl_context(completion)
                .unwrap_or(DeclContext(NodeIndex::NONE)),
            implicit_return: is_implicit_single_expression_return(arena, completion),
            results: Vec::new(),
        })
    }

    pub fn results(&self) -> &[MemberAccessResult] {
        &self.results
    }

    /// Instance members of every receiver type seen, sorted.
    pub fn completion_items(
        &self,
        env: &TypeEnvironment<'_>,
        async_members: AsyncMemberPolicy,
    ) -> Vec<CompletionItem> {
        let mut items = Vec::new();
        for result in &self.results {
            for member in env.members_of(result.base_type) {
                if member.is_static {
                    continue;
                }
                let name = env.names().resolve(member.name);
                let (kind, value_type, is_async) = match member.kind {
                    MemberKind::Method => {
                        let shape = env.interner().function_shape(member.type_id);
                        (
                            CompletionItemKind::Method,
                            shape.as_ref().map_or(TypeId::UNKNOWN, |shape| shape.result),
                            shape.as_ref().is_some_and(|shape| shape.is_async),
                        )
                    }
                    MemberKind::Property | MemberKind::EnumCase => {
                        (CompletionItemKind::Property, member.type_id, false)
                    }
                };
                let requires_async = is_async && !result.is_in_async_context;
                if requires_async && async_members == AsyncMemberPolicy::Hide {
                    continue;
                }

                let relation = compute_type_relation(
                    value_type,
                    result.expected_type,
                    result.is_implicit_single_expression_return,
                );
                let mut item = match kind {
                    CompletionItemKind::Method => CompletionItem::new(
                        member_label(env, &name, member.type_id),
                        CompletionItemKind::Method,
                    )
                    .with_insert_text(name.to_string()),
                    _ => CompletionItem::new(name.to_string(), kind),
                };
                item = item
                    .with_detail(env.format_type(member.type_id))
                    .with_type_relation(relation)
                    .with_requires_async_context(requires_async);
                items.push(item);
            }
        }
        dedup_items(&mut items);
        sort_completion_items(&mut items);
        items
    }
}

impl CompletionSolutionHandler for MemberAccessHandler {
    fn saw_solution_impl(&mut self, solution: &Solution<'_>) {
        let base_type = get_type_for_completion(solution, self.base);
        let expected = get_type_for_completion(solution, self.completion);
        let expected_type = (!expected.is_hole()).then_some(expected);
        let is_async = is_context_async(solution, self.dc);
        trace!(
            base_type = base_type.0,
            expected = ?expected_type,
            is_async,
            "member access solution"
        );

        if let Some(existing) = self.results.iter_mut().find(|result| {
            result.base_type == base_type
                && nullable_types_equal(result.expected_type, expected_type)
        }) {
            existing.is_in_async_context |= is_async;
            return;
        }
        self.results.push(MemberAccessResult {
            base_type,
            expected_type,
            is_implicit_single_expression_return: self.implicit_return,
            is_in_async_context: is_async,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/member_access_tests.rs"]
mod member_access_tests;
