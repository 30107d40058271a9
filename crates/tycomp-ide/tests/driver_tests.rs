use super::*;
use crate::options::AsyncMemberPolicy;
use tycomp_ast::NodeArena;
use tycomp_solver::{TypeId, TypeInterner};

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

/// func f(_ x: Int) -> Int
/// let s: String = f(1.<cc>)
fn mismatched_statement(arena: &mut NodeArena) -> (NodeIndex, NodeIndex) {
    let int = arena.named_type("Int");
    let string = arena.named_type("String");
    let x = arena.unlabeled_param("x", Some(int.clone()));
    let f = arena.func("f", vec![x], Some(int), false, vec![]);
    let one = arena.int(1);
    let cc = arena.completion(one);
    let callee = arena.decl_ref("f");
    let call = arena.call(callee, vec![(None, cc)]);
    let stmt = arena.let_stmt("s", Some(string), call);
    let file = arena.source_file(vec![f, stmt]);
    (file, cc)
}

#[test]
fn test_member_completion_on_array_literal() {
    let mut arena = NodeArena::new();
    let elements = vec![arena.int(1), arena.int(2), arena.int(3)];
    let array = arena.array(elements);
    let cc = arena.completion(array);
    let file = arena.source_file(vec![cc]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let response = complete_at(&env, cc, &CompletionOptions::default());
    assert_eq!(response.kind, CompletionKind::MemberAccess { base: array });
    assert_eq!(response.outcome, TypeCheckOutcome::Solved);
    assert!(labels(&response.items).contains(&"count"));
    assert!(labels(&response.items).contains(&"reversed()"));

    let json = response.to_json().expect("serializes");
    assert!(json.contains("\"label\": \"count\""));
    assert!(json.contains("\"outcome\": \"Solved\""));
}

#[test]
fn test_fallback_recovers_from_contextual_mismatch() {
    let mut arena = NodeArena::new();
    let (file, cc) = mismatched_statement(&mut arena);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let response = complete_at(&env, cc, &CompletionOptions::default());
    assert_eq!(response.outcome, TypeCheckOutcome::RecoveredByFallback);
    assert_eq!(
        labels(&response.items),
        vec!["advanced(by:)", "description", "isMultiple(of:)"]
    );
}

#[test]
fn test_disabled_fallback_reports_no_solution() {
    let mut arena = NodeArena::new();
    let (file, cc) = mismatched_statement(&mut arena);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let options = CompletionOptions {
        enable_fallback: false,
        ..CompletionOptions::default()
    };
    let mut callback =
        TypeCheckCompletionCallback::new(MemberAccessHandler::new(&arena, cc).expect("member"));
    let outcome = typecheck_for_completion(&env, cc, &mut callback, &options);
    assert_eq!(outcome, TypeCheckOutcome::NoSolution);
    assert!(!callback.fallback_ran());
    assert!(callback.handler().results().is_empty());

    let response = complete_at(&env, cc, &options);
    assert_eq!(response.outcome, TypeCheckOutcome::NoSolution);
    assert!(response.items.is_empty());
}

#[test]
fn test_preceding_let_flows_into_completion() {
    // let xs = [1, 2]
    // xs.<cc>
    let mut arena = NodeArena::new();
    let elements = vec![arena.int(1), arena.int(2)];
    let array = arena.array(elements);
    let xs_decl = arena.let_stmt("xs", None, array);
    let xs = arena.decl_ref("xs");
    let cc = arena.completion(xs);
    let file = arena.source_file(vec![xs_decl, cc]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let mut callback =
        TypeCheckCompletionCallback::new(MemberAccessHandler::new(&arena, cc).expect("member"));
    let outcome = typecheck_for_completion(&env, cc, &mut callback, &CompletionOptions::default());
    assert_eq!(outcome, TypeCheckOutcome::Solved);
    assert_eq!(
        callback.handler().results()[0].base_type,
        types.array(TypeId::INT)
    );
}

#[test]
fn test_bare_expression_gets_no_items() {
    let mut arena = NodeArena::new();
    let cc = arena.bare_completion();
    let file = arena.source_file(vec![cc]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let options = CompletionOptions {
        async_members: AsyncMemberPolicy::Hide,
        ..CompletionOptions::default()
    };
    let response = complete_at(&env, cc, &options);
    assert_eq!(response.kind, CompletionKind::Expression);
    assert_eq!(response.outcome, TypeCheckOutcome::NoSolution);
    assert!(response.items.is_empty());
}

#[test]
fn test_deeply_nested_receiver_yields_no_items() {
    // [[[ ... [1] ... ]]].<cc>
    let mut arena = NodeArena::new();
    let mut base = arena.int(1);
    for _ in 0..1_000 {
        base = arena.array(vec![base]);
    }
    let cc = arena.completion(base);
    let file = arena.source_file(vec![cc]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let response = complete_at(&env, cc, &CompletionOptions::default());
    assert_eq!(response.kind, CompletionKind::MemberAccess { base });
    assert_eq!(response.outcome, TypeCheckOutcome::NoSolution);
    assert!(response.items.is_empty());
}
