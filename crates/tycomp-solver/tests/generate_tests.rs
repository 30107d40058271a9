use super::*;
use crate::env::TypeEnvironment;
use crate::intern::TypeInterner;
use crate::scope::LocalScope;
use crate::solution::{SolveMode, SolverLimits};
use tycomp_ast::{DeclContext, NodeArena};

fn target(root: NodeIndex, dc: NodeIndex) -> SolveTarget {
    SolveTarget {
        root,
        dc: DeclContext(dc),
        scope: LocalScope::new(),
    }
}

#[test]
fn test_every_expression_node_gets_a_type() {
    let mut arena = NodeArena::new();
    let one = arena.int(1);
    let text = arena.string("a");
    let array = arena.array(vec![one]);
    let access = arena.member(array, "count");
    let file = arena.source_file(vec![access, text]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);
    let mut cs = ConstraintSystem::new(&env, SolveMode::Strict, SolverLimits::default());

    assert!(cs.generate(&target(access, file)).is_ok());
    for node in [one, array, access] {
        assert!(cs.node_types.contains_key(&node), "node {node:?} untyped");
    }
    // Not part of the target.
    assert!(!cs.node_types.contains_key(&text));
    assert_eq!(cs.literals.len(), 1);
    assert!(
        cs.constraints
            .iter()
            .any(|c| matches!(c, Constraint::Member { node, .. } if *node == access))
    );
}

#[test]
fn test_scope_binding_shadows_globals() {
    let mut arena = NodeArena::new();
    let f = arena.func("value", vec![], None, false, vec![]);
    let reference = arena.decl_ref("value");
    let file = arena.source_file(vec![f, reference]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);
    let mut cs = ConstraintSystem::new(&env, SolveMode::Strict, SolverLimits::default());

    let mut scope = LocalScope::new();
    scope.bind(arena.intern("value"), TypeId::INT);
    scope.bind(arena.intern("value"), TypeId::STRING);
    let target = SolveTarget {
        root: reference,
        dc: DeclContext(file),
        scope,
    };
    assert!(cs.generate(&target).is_ok());
    assert_eq!(cs.node_types.get(&reference), Some(&TypeId::STRING));
    assert!(cs.choices.is_empty());
}

#[test]
fn test_unknown_name_is_a_generation_failure_in_strict_mode() {
    let mut arena = NodeArena::new();
    let reference = arena.decl_ref("nowhere");
    let file = arena.source_file(vec![reference]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let mut strict = ConstraintSystem::new(&env, SolveMode::Strict, SolverLimits::default());
    assert!(matches!(
        strict.generate(&target(reference, file)),
        Err(SolveFailure::UnknownName { .. })
    ));

    let mut relaxed = ConstraintSystem::new(&env, SolveMode::Relaxed, SolverLimits::default());
    assert!(relaxed.generate(&target(reference, file)).is_ok());
    assert_eq!(relaxed.fixes, 1);
}

#[test]
fn test_deep_nesting_is_a_generation_failure() {
    // [[[ ... [1] ... ]]]
    let mut arena = NodeArena::new();
    let mut expr = arena.int(1);
    for _ in 0..1_000 {
        expr = arena.array(vec![expr]);
    }
    let shallow_one = arena.int(1);
    let shallow = arena.array(vec![shallow_one]);
    let file = arena.source_file(vec![expr, shallow]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    for mode in [SolveMode::Strict, SolveMode::Relaxed] {
        let mut cs = ConstraintSystem::new(&env, mode, SolverLimits::default());
        assert!(matches!(
            cs.generate(&target(expr, file)),
            Err(SolveFailure::DepthLimit { .. })
        ));
        assert_eq!(cs.gen_depth, 0);
        assert_eq!(cs.fixes, 0);
    }

    let mut cs = ConstraintSystem::new(&env, SolveMode::Strict, SolverLimits::default());
    assert!(cs.generate(&target(shallow, file)).is_ok());
}

#[test]
fn test_switch_patterns_are_equated_with_subject() {
    let mut arena = NodeArena::new();
    let color = arena.enum_decl("Color", &["red", "green"]);
    let subject = arena.decl_ref("c");
    let red = arena.unresolved_member("red");
    let green = arena.unresolved_member("green");
    let first = arena.case(vec![red], vec![]);
    let second = arena.case(vec![green], vec![]);
    let switch = arena.switch_stmt(subject, vec![first, second]);
    let file = arena.source_file(vec![color, switch]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);
    let mut cs = ConstraintSystem::new(&env, SolveMode::Strict, SolverLimits::default());

    let color_type = env
        .nominal_by_name(arena.intern("Color"))
        .map(|info| info.type_id)
        .expect("Color is declared");
    let mut scope = LocalScope::new();
    scope.bind(arena.intern("c"), color_type);
    let target = SolveTarget {
        root: switch,
        dc: DeclContext(file),
        scope,
    };
    assert!(cs.generate(&target).is_ok());

    let equalities = cs
        .constraints
        .iter()
        .filter(|c| matches!(c, Constraint::Equal { left, .. } if *left == color_type))
        .count();
    assert_eq!(equalities, 2);
    assert!(cs.node_types.contains_key(&red));
    assert!(cs.node_types.contains_key(&green));
}

#[test]
fn test_closure_records_syntactic_asyncness() {
    let mut arena = NodeArena::new();
    let work = arena.func("work", vec![], None, true, vec![]);
    let work_ref = arena.decl_ref("work");
    let work_call = arena.call(work_ref, vec![]);
    let awaited = arena.await_expr(work_call);
    let closure = arena.closure(vec![], None, false, vec![awaited]);
    let file = arena.source_file(vec![work, closure]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);
    let mut cs = ConstraintSystem::new(&env, SolveMode::Strict, SolverLimits::default());

    assert!(cs.generate(&target(closure, file)).is_ok());
    let is_async = cs.constraints.iter().find_map(|c| match c {
        Constraint::Closure { node, is_async, .. } if *node == closure => Some(*is_async),
        _ => None,
    });
    assert_eq!(is_async, Some(true));
}

#[test]
fn test_closure_parameters_are_scoped_to_the_body() {
    let mut arena = NodeArena::new();
    let int = arena.named_type("Int");
    let param = arena.param("n", Some(int));
    let inner = arena.decl_ref("n");
    let closure = arena.closure(vec![param], None, false, vec![inner]);
    let outer = arena.decl_ref("n");
    let array = arena.array(vec![closure, outer]);
    let file = arena.source_file(vec![array]);
    let types = TypeInterner::new();
    let env = TypeEnvironment::new(&arena, &types, file);

    let mut relaxed = ConstraintSystem::new(&env, SolveMode::Relaxed, SolverLimits::default());
    assert!(relaxed.generate(&target(array, file)).is_ok());
    assert_eq!(relaxed.node_types.get(&inner), Some(&TypeId::INT));
    // `n` is out of scope after the closure.
    assert_eq!(relaxed.node_types.get(&outer), Some(&TypeId::UNKNOWN));
    assert_eq!(relaxed.fixes, 1);
}
