use super::*;
use crate::callback::TypeCheckCompletionCallback;
use crate::driver::{TypeCheckOutcome, typecheck_for_completion};
use crate::locator::CompletionContextFinder;
use crate::options::CompletionOptions;
use crate::results::{TypeRelation, sort_priority};
use tycomp_solver::{ConstraintSystem, SolveMode, SolverLimits, TypeInterner};

fn run_handler(env: &TypeEnvironment<'_>, cc: NodeIndex) -> (TypeCheckOutcome, MemberAccessHandler) {
    let handler = MemberAccessHandler::new(env.arena(), cc).expect("member completion");
    let mut callback = TypeCheckCompletionCallback::new(handler);
    let outcome = typecheck_for_completion(env, cc, &mut callback, &CompletionOptions::default());
    (outcome, callback.into_handler())
}

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|item| item.label.as_str()).collect()
}

fn item<'a>(items: &'a [CompletionItem], label: &str) -> &'a CompletionItem {
    items
        .iter()
        .find(|item| item.label == label)
        .unwrap_or_else(|| panic!("no item {label}"))
}

#[test]
fn test_only_member_completions_get_a_handler() {
    let mut arena = NodeArena::new();
    let one = arena.int(1);
    let member = arena.completion(one);
    let dot = arena.dot_completion();
    arena.source_file(vec![member, dot]);
    assert!(MemberAccessHandler::new(&arena, member).is_some());
    assert!(MemberAccessHandler::new(&arena, dot).is_none());
    assert!(MemberAccessHandler::new(&arena, one).is_none());
}

#[test]
fn test_array_literal_receiver() {
    // [1, 2, 3].<cc>
    let mut arena = NodeArena::new();
    let elements = vec![arena.int(1), arena.int(2), arena.int(3)];
    let array = arena.array(elements);
    let cc = arena.completion(array);
    let file = arena.source_file(vec![cc]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let (outcome, handler) = run_handler(&env, cc);
    assert_eq!(outcome, TypeCheckOutcome::Solved);
    assert_eq!(
        handler.results(),
        &[MemberAccessResult {
            base_type: types.array(TypeId::INT),
            expected_type: None,
            is_implicit_single_expression_return: false,
            is_in_async_context: false,
        }]
    );

    let items = handler.completion_items(&env, AsyncMemberPolicy::Flag);
    assert_eq!(
        labels(&items),
        vec!["append(_:)", "contains(_:)", "count", "first", "isEmpty", "reversed()"]
    );
    assert_eq!(item(&items, "first").detail.as_deref(), Some("Int"));
    let reversed = item(&items, "reversed()");
    assert_eq!(reversed.kind, CompletionItemKind::Method);
    assert_eq!(reversed.detail.as_deref(), Some("() -> [Int]"));
    assert_eq!(reversed.insert_text.as_deref(), Some("reversed"));
    assert!(items.iter().all(|item| item.type_relation == TypeRelation::Unknown));
}

#[test]
fn test_expected_type_ranks_members() {
    // let n: Int = "hi".<cc>
    let mut arena = NodeArena::new();
    let int = arena.named_type("Int");
    let hi = arena.string("hi");
    let cc = arena.completion(hi);
    let stmt = arena.let_stmt("n", Some(int), cc);
    let file = arena.source_file(vec![stmt]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let (_, handler) = run_handler(&env, cc);
    assert_eq!(handler.results().len(), 1);
    assert_eq!(handler.results()[0].base_type, TypeId::STRING);
    assert_eq!(handler.results()[0].expected_type, Some(TypeId::INT));

    let items = handler.completion_items(&env, AsyncMemberPolicy::Flag);
    assert_eq!(
        labels(&items),
        vec!["count", "hasPrefix(_:)", "isEmpty", "uppercased()"]
    );
    assert_eq!(item(&items, "count").type_relation, TypeRelation::Convertible);
    assert_eq!(
        item(&items, "count").sort_text.as_deref(),
        Some(sort_priority::EXPECTED_TYPE)
    );
    assert_eq!(item(&items, "isEmpty").type_relation, TypeRelation::Unrelated);
}

#[test]
fn test_single_expression_closure_softens_mismatches() {
    // func run(_ body: () -> Int) -> Int
    // let s = "hi"
    // run { s.<cc> }
    let mut arena = NodeArena::new();
    let int = arena.named_type("Int");
    let body_ty = arena.function_type(vec![], int.clone(), false);
    let body = arena.unlabeled_param("body", Some(body_ty));
    let run = arena.func("run", vec![body], Some(int), false, vec![]);
    let hi = arena.string("hi");
    let s_decl = arena.let_stmt("s", None, hi);
    let s = arena.decl_ref("s");
    let cc = arena.completion(s);
    let closure = arena.closure(vec![], None, false, vec![cc]);
    let run_ref = arena.decl_ref("run");
    let call = arena.call(run_ref, vec![(None, closure)]);
    let file = arena.source_file(vec![run, s_decl, call]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let (outcome, handler) = run_handler(&env, cc);
    assert_eq!(outcome, TypeCheckOutcome::Solved);
    let result = &handler.results()[0];
    assert_eq!(result.base_type, TypeId::STRING);
    assert_eq!(result.expected_type, Some(TypeId::INT));
    assert!(result.is_implicit_single_expression_return);
    assert!(!result.is_in_async_context);

    let items = handler.completion_items(&env, AsyncMemberPolicy::Flag);
    assert_eq!(item(&items, "count").type_relation, TypeRelation::Convertible);
    assert_eq!(item(&items, "isEmpty").type_relation, TypeRelation::Unknown);
}

#[test]
fn test_argument_position_is_not_an_implicit_return() {
    // func f(_ x: Int) -> Int
    // func g() -> Int { f(1.<cc>) }
    let mut arena = NodeArena::new();
    let int = arena.named_type("Int");
    let x = arena.unlabeled_param("x", Some(int.clone()));
    let f = arena.func("f", vec![x], Some(int.clone()), false, vec![]);
    let one = arena.int(1);
    let cc = arena.completion(one);
    let f_ref = arena.decl_ref("f");
    let call = arena.call(f_ref, vec![(None, cc)]);
    let g = arena.func("g", vec![], Some(int), false, vec![call]);
    let file = arena.source_file(vec![f, g]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let (_, handler) = run_handler(&env, cc);
    let result = &handler.results()[0];
    assert_eq!(result.expected_type, Some(TypeId::INT));
    assert!(!result.is_implicit_single_expression_return);

    let items = handler.completion_items(&env, AsyncMemberPolicy::Flag);
    assert_eq!(item(&items, "advanced(by:)").type_relation, TypeRelation::Convertible);
    assert_eq!(item(&items, "description").type_relation, TypeRelation::Unrelated);
    assert_eq!(item(&items, "isMultiple(of:)").type_relation, TypeRelation::Unrelated);
}

#[test]
fn test_async_members_are_flagged_or_hidden() {
    // struct Worker { let id: Int; func fetch() async -> Int }
    // let w: Worker
    // w.<cc>
    // func main() async { w.<cc> }
    let mut arena = NodeArena::new();
    let int = arena.named_type("Int");
    let id = arena.stored_property("id", int.clone());
    let fetch = arena.func("fetch", vec![], Some(int), true, vec![]);
    let worker = arena.struct_decl("Worker", vec![id, fetch]);
    let worker_ty = arena.named_type("Worker");
    let w_decl = arena.let_stmt("w", Some(worker_ty), NodeIndex::NONE);
    let w_sync = arena.decl_ref("w");
    let sync_cc = arena.completion(w_sync);
    let w_async = arena.decl_ref("w");
    let async_cc = arena.completion(w_async);
    let main = arena.func("main", vec![], None, true, vec![async_cc]);
    let file = arena.source_file(vec![worker, w_decl, sync_cc, main]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let (_, handler) = run_handler(&env, sync_cc);
    assert!(!handler.results()[0].is_in_async_context);
    let flagged = handler.completion_items(&env, AsyncMemberPolicy::Flag);
    assert_eq!(labels(&flagged), vec!["fetch()", "id"]);
    let fetch_item = item(&flagged, "fetch()");
    assert!(fetch_item.requires_async_context);
    assert_eq!(fetch_item.detail.as_deref(), Some("() async -> Int"));
    assert!(!item(&flagged, "id").requires_async_context);

    let hidden = handler.completion_items(&env, AsyncMemberPolicy::Hide);
    assert_eq!(labels(&hidden), vec!["id"]);

    let (_, handler) = run_handler(&env, async_cc);
    assert!(handler.results()[0].is_in_async_context);
    let items = handler.completion_items(&env, AsyncMemberPolicy::Hide);
    assert!(!item(&items, "fetch()").requires_async_context);
}

#[test]
fn test_solutions_with_the_same_receiver_are_merged() {
    // func g(_ x: Int) -> String
    // func g(_ x: Double) -> String
    // g(1).<cc>
    let mut arena = NodeArena::new();
    let int = arena.named_type("Int");
    let double = arena.named_type("Double");
    let string = arena.named_type("String");
    let x_int = arena.unlabeled_param("x", Some(int));
    let x_double = arena.unlabeled_param("x", Some(double));
    let g_int = arena.func("g", vec![x_int], Some(string.clone()), false, vec![]);
    let g_double = arena.func("g", vec![x_double], Some(string), false, vec![]);
    let one = arena.int(1);
    let g = arena.decl_ref("g");
    let call = arena.call(g, vec![(None, one)]);
    let cc = arena.completion(call);
    let file = arena.source_file(vec![g_int, g_double, cc]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let mut callback = TypeCheckCompletionCallback::new(
        MemberAccessHandler::new(&arena, cc).expect("member completion"),
    );
    let finder = CompletionContextFinder::new(&arena, cc);
    let target = finder.primary_target(&env, SolverLimits::default());
    let summary = ConstraintSystem::solve(
        &env,
        &target,
        SolveMode::Strict,
        SolverLimits::default(),
        &mut callback,
    );

    assert_eq!(summary.delivered, 2);
    assert_eq!(callback.handler().results().len(), 1);
    assert_eq!(callback.handler().results()[0].base_type, TypeId::STRING);
}
