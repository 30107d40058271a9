//! `callee(<cc>)` completion.

use super::{dedup_items, enum_case_items};
use crate::callback::CompletionSolutionHandler;
use crate::results::{
    CompletionItem, CompletionItemKind, TypeRelation, sort_completion_items, sort_priority,
};
use crate::utils::get_type_for_completion;
use serde::Serialize;
use tracing::trace;
use tycomp_ast::{Node, NodeArena, NodeIndex};
use tycomp_common::Atom;
use tycomp_solver::{Solution, TypeEnvironment, TypeId};

/// The parameter the completion argument binds to under one callee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArgumentResult {
    /// Declaration of the chosen overload; NONE for builtins and values of
    /// function type.
    pub callee_decl: NodeIndex,
    pub func_type: TypeId,
    pub param_index: usize,
    pub label: Option<Atom>,
    pub expected_type: TypeId,
}

#[derive(Debug)]
pub struct ArgumentHandler {
    callee: NodeIndex,
    param_index: usize,
    results: Vec<ArgumentResult>,
}

impl ArgumentHandler {
    /// `None` unless `completion` is an argument of a call.
    pub fn new(arena: &NodeArena, completion: NodeIndex) -> Option<Self> {
        let Some(Node::Call { callee, args }) = arena.get(arena.parent(completion)) else {
            return None;
        };
        let param_index = args.iter().position(|arg| arg.value == completion)?;
        Some(ArgumentHandler {
            callee: *callee,
            param_index,
            results: Vec::new(),
        })
    }

    pub fn results(&self) -> &[ArgumentResult] {
        &self.results
    }

    /// Argument labels and enum cases for each parameter seen, sorted.
    pub fn completion_items(&self, env: &TypeEnvironment<'_>) -> Vec<CompletionItem> {
        let mut items = Vec::new();
        for result in &self.results {
            let detail = env.format_type(result.expected_type);
            if let Some(label) = result.label {
                let item = CompletionItem::new(
                    format!("{}:", env.names().resolve(label)),
                    CompletionItemKind::Parameter,
                )
                .with_detail(detail)
                .with_type_relation(TypeRelation::Unknown)
                .with_sort_text(sort_priority::ARGUMENT_LABEL);
                items.push(item);
            }
            if !result.expected_type.is_hole() {
                items.extend(enum_case_items(env, result.expected_type));
            }
        }
        dedup_items(&mut items);
        sort_completion_items(&mut items);
        items
    }
}

impl CompletionSolutionHandler for ArgumentHandler {
    fn saw_solution_impl(&mut self, solution: &Solution<'_>) {
        let func_type = get_type_for_completion(solution, self.callee);
        let Some(shape) = solution.env().interner().function_shape(func_type) else {
            trace!(func_type = func_type.0, "callee has no function type");
            return;
        };
        let Some(param) = shape.params.get(self.param_index) else {
            trace!(index = self.param_index, "argument past the last parameter");
            return;
        };
        let callee_decl = solution
            .overload_choice(self.callee)
            .map_or(NodeIndex::NONE, |choice| choice.decl);

        let seen = self.results.iter().any(|result| {
            result.callee_decl == callee_decl
                && result.func_type == func_type
                && result.param_index == self.param_index
        });
        if seen {
            return;
        }
        self.results.push(ArgumentResult {
            callee_decl,
            func_type,
            param_index: self.param_index,
            label: param.label,
            expected_type: param.type_id,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/argument_tests.rs"]
mod argument_tests;
