//! Queries that completion handlers run against a solution or the tree.

use tycomp_ast::{DeclContext, Node, NodeArena, NodeIndex};
use tycomp_solver::{Solution, TypeId};

/// The type `node` has in `solution`, with unbound type variables erased to
/// the unknown type. Nodes the solution does not cover are unknown too.
pub fn get_type_for_completion(solution: &Solution<'_>, node: NodeIndex) -> TypeId {
    match solution.type_of(node) {
        Some(type_id) => solution.env().interner().erase_type_vars(type_id),
        None => TypeId::UNKNOWN,
    }
}

/// If `node` is a pattern of a `case` label, the type of the switch subject
/// it is matched against.
///
/// Returns `None` outside patterns, including for expressions in a case
/// body, and when the subject is not covered by `solution`.
pub fn get_pattern_match_type(solution: &Solution<'_>, node: NodeIndex) -> Option<TypeId> {
    let arena = solution.env().arena();
    let mut child = node;
    for (idx, ancestor) in arena.ancestors(node) {
        match ancestor {
            Node::Case { patterns, .. } => {
                if !patterns.contains(&child) {
                    return None;
                }
                let Some(Node::Switch { subject, .. }) = arena.get(arena.parent(idx)) else {
                    return None;
                };
                if !solution.has_type(*subject) {
                    return None;
                }
                return Some(get_type_for_completion(solution, *subject));
            }
            Node::Block { .. } => return None,
            other if other.is_decl_context() => return None,
            _ => {}
        }
        child = idx;
    }
    None
}

/// Whether `node` is itself the only statement of a body, and so acts as
/// the body's return value.
///
/// `{ x.foo }` qualifies for `x.foo`, but not for `x` or for anything nested
/// in an argument list. `{ return x.foo }` and `{ let y = 1; x.foo }` do not
/// qualify. Function bodies qualify the same way closure bodies do.
pub fn is_implicit_single_expression_return(arena: &NodeArena, node: NodeIndex) -> bool {
    let block = arena.parent(node);
    let Some(Node::Block { statements }) = arena.get(block) else {
        return false;
    };
    if statements.as_slice() != [node] {
        return false;
    }
    matches!(
        arena.get(arena.parent(block)),
        Some(Node::Closure { .. } | Node::FuncDecl { .. })
    )
}

/// Whether code in `dc` may use `await`.
///
/// Functions are async when declared so. A closure is async when marked,
/// when its body awaits, or when the solution gave it an async function
/// type from context. Top level code is not async.
pub fn is_context_async(solution: &Solution<'_>, dc: DeclContext) -> bool {
    let env = solution.env();
    let arena = env.arena();
    match arena.get(dc.node()) {
        Some(Node::FuncDecl { is_async, .. }) => *is_async,
        Some(Node::Closure { is_async, body, .. }) => {
            if *is_async || arena.contains_await(*body) {
                return true;
            }
            solution
                .type_of(dc.node())
                .and_then(|type_id| env.interner().function_shape(type_id))
                .is_some_and(|shape| shape.is_async)
        }
        _ => false,
    }
}

/// Equality where two absent types are equal and absent never equals
/// present.
pub fn nullable_types_equal(a: Option<TypeId>, b: Option<TypeId>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../tests/utils_tests.rs"]
mod utils_tests;
