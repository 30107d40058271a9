use super::*;

#[test]
fn test_add_links_parents() {
    let mut arena = NodeArena::new();
    let one = arena.int(1);
    let two = arena.int(2);
    let array = arena.array(vec![one, two]);
    let cc = arena.completion(array);

    assert_eq!(arena.parent(one), array);
    assert_eq!(arena.parent(two), array);
    assert_eq!(arena.parent(array), cc);
    assert!(arena.parent(cc).is_none());
}

#[test]
fn test_ancestors_innermost_first() {
    let mut arena = NodeArena::new();
    let x = arena.decl_ref("x");
    let access = arena.member(x, "foo");
    let func = arena.func("f", vec![], None, false, vec![access]);
    let file = arena.source_file(vec![func]);

    let chain: Vec<NodeIndex> = arena.ancestors(x).map(|(idx, _)| idx).collect();
    assert_eq!(chain.len(), 4);
    assert_eq!(chain[0], access);
    assert_eq!(chain[2], func);
    assert_eq!(chain[3], file);
}

#[test]
fn test_enclosing_decl_context_prefers_closure() {
    let mut arena = NodeArena::new();
    let x = arena.decl_ref("x");
    let closure = arena.closure(vec![], None, false, vec![x]);
    let stmt = arena.let_stmt("c", None, closure);
    let func = arena.func("f", vec![], None, true, vec![stmt]);
    let file = arena.source_file(vec![func]);

    assert_eq!(arena.enclosing_decl_context(x), Some(DeclContext(closure)));
    assert_eq!(arena.enclosing_decl_context(closure), Some(DeclContext(func)));
    assert_eq!(arena.enclosing_decl_context(func), Some(DeclContext(file)));
    assert_eq!(arena.enclosing_decl_context(file), None);
}

#[test]
fn test_is_within() {
    let mut arena = NodeArena::new();
    let a = arena.int(1);
    let b = arena.int(2);
    let array = arena.array(vec![a]);

    assert!(arena.is_within(a, array));
    assert!(arena.is_within(array, array));
    assert!(!arena.is_within(b, array));
}

#[test]
fn test_none_index_is_safe() {
    let arena = NodeArena::new();
    assert!(arena.get(NodeIndex::NONE).is_none());
    assert!(arena.parent(NodeIndex::NONE).is_none());
    assert_eq!(arena.ancestors(NodeIndex::NONE).count(), 0);
}

#[test]
fn test_children_skip_absent() {
    let mut arena = NodeArena::new();
    let bare = arena.return_stmt(NodeIndex::NONE);
    assert!(arena.get(bare).map(|n| n.children().is_empty()).unwrap_or(false));

    let ty = arena.named_type("Int");
    let prop = arena.stored_property("x", ty);
    assert!(arena.get(prop).map(|n| n.children().is_empty()).unwrap_or(false));
}

#[test]
fn test_builder_interns_names() {
    let mut arena = NodeArena::new();
    let r = arena.decl_ref("value");
    match arena.get(r) {
        Some(Node::DeclRef { name }) => assert_eq!(&*arena.name(*name), "value"),
        other => panic!("expected DeclRef, got {other:?}"),
    }
}

#[test]
fn test_body_queries_stop_at_nested_closures() {
    let mut arena = NodeArena::new();
    let work = arena.decl_ref("work");
    let awaited = arena.await_expr(work);
    let inner = arena.closure(vec![], None, true, vec![awaited]);
    let value = arena.int(1);
    let ret = arena.return_stmt(value);
    let outer = arena.closure(vec![], None, false, vec![inner, ret]);

    let Some(Node::Closure { body: inner_body, .. }) = arena.get(inner).cloned() else {
        panic!("expected closure");
    };
    let Some(Node::Closure { body: outer_body, .. }) = arena.get(outer).cloned() else {
        panic!("expected closure");
    };

    assert!(arena.contains_await(inner_body));
    assert!(!arena.contains_await(outer_body));
    assert!(arena.contains_return(outer_body));
    assert!(!arena.contains_return(inner_body));
}
