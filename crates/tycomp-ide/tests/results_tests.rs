use super::*;

#[test]
fn test_type_relation() {
    assert_eq!(
        compute_type_relation(TypeId::INT, Some(TypeId::INT), false),
        TypeRelation::Convertible
    );
    assert_eq!(
        compute_type_relation(TypeId::BOOL, Some(TypeId::INT), false),
        TypeRelation::Unrelated
    );
    assert_eq!(
        compute_type_relation(TypeId::BOOL, Some(TypeId::INT), true),
        TypeRelation::Unknown
    );
    // A match is still a match in a single-expression body.
    assert_eq!(
        compute_type_relation(TypeId::INT, Some(TypeId::INT), true),
        TypeRelation::Convertible
    );
    assert_eq!(
        compute_type_relation(TypeId::INT, None, false),
        TypeRelation::Unknown
    );
    assert_eq!(
        compute_type_relation(TypeId::UNKNOWN, Some(TypeId::INT), false),
        TypeRelation::Unknown
    );
    assert_eq!(
        compute_type_relation(TypeId::INT, Some(TypeId::ERROR), false),
        TypeRelation::Unknown
    );
}

#[test]
fn test_relation_drives_sort_text() {
    let item = CompletionItem::new("count".to_string(), CompletionItemKind::Property);
    assert_eq!(item.effective_sort_text(), sort_priority::MEMBER);

    let item = item.with_type_relation(TypeRelation::Convertible);
    assert_eq!(item.sort_text.as_deref(), Some(sort_priority::EXPECTED_TYPE));
    let item = item.with_type_relation(TypeRelation::Unrelated);
    assert_eq!(item.sort_text.as_deref(), Some(sort_priority::UNRELATED));
}

#[test]
fn test_sort_completion_items() {
    let mut items = vec![
        CompletionItem::new("zeta".to_string(), CompletionItemKind::Property)
            .with_type_relation(TypeRelation::Unrelated),
        CompletionItem::new("beta".to_string(), CompletionItemKind::Property),
        CompletionItem::new("alpha".to_string(), CompletionItemKind::Property),
        CompletionItem::new("omega".to_string(), CompletionItemKind::Method)
            .with_type_relation(TypeRelation::Convertible),
        CompletionItem::new("to:".to_string(), CompletionItemKind::Parameter)
            .with_sort_text(sort_priority::ARGUMENT_LABEL),
    ];
    sort_completion_items(&mut items);
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    assert_eq!(labels, vec!["to:", "omega", "alpha", "beta", "zeta"]);
}

#[test]
fn test_item_serialization() {
    let item = CompletionItem::new("fetch()".to_string(), CompletionItemKind::Method)
        .with_detail("() async -> Int".to_string())
        .with_insert_text("fetch".to_string())
        .with_type_relation(TypeRelation::Convertible);
    let json = serde_json::to_value(&item).expect("serializes");
    assert_eq!(json["label"], "fetch()");
    assert_eq!(json["kind"], "Method");
    assert_eq!(json["sortText"], "10");
    assert_eq!(json["insertText"], "fetch");
    assert_eq!(json["typeRelation"], "convertible");
    assert!(json.get("requiresAsyncContext").is_none());

    let flagged = item.with_requires_async_context(true);
    let json = serde_json::to_value(&flagged).expect("serializes");
    assert_eq!(json["requiresAsyncContext"], true);

    let back: CompletionItem = serde_json::from_value(json).expect("deserializes");
    assert_eq!(back, flagged);
}
