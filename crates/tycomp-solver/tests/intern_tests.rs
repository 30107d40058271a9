use super::*;

#[test]
fn test_intrinsics_have_fixed_ids() {
    let interner = TypeInterner::new();
    assert_eq!(
        interner.lookup(TypeId::INT),
        Some(TypeData::Intrinsic(IntrinsicKind::Int))
    );
    assert_eq!(
        interner.lookup(TypeId::STRING),
        Some(TypeData::Intrinsic(IntrinsicKind::String))
    );
    assert_eq!(
        interner.intern(TypeData::Intrinsic(IntrinsicKind::Bool)),
        TypeId::BOOL
    );
    assert!(interner.is_empty());
}

#[test]
fn test_structural_types_are_deduplicated() {
    let interner = TypeInterner::new();
    let a = interner.array(TypeId::INT);
    let b = interner.array(TypeId::INT);
    let c = interner.array(TypeId::STRING);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a.0 >= TypeId::FIRST_USER.0);
    assert_eq!(interner.array_element(a), Some(TypeId::INT));
    assert_eq!(interner.array_element(TypeId::INT), None);

    let f = interner.function([ParamInfo::unlabeled(TypeId::INT)], TypeId::BOOL, false);
    let g = interner.function([ParamInfo::unlabeled(TypeId::INT)], TypeId::BOOL, true);
    assert_ne!(f, g);
    let shape = interner.function_shape(g).expect("function type");
    assert!(shape.is_async);
    assert_eq!(shape.result, TypeId::BOOL);
}

#[test]
fn test_type_var_queries() {
    let interner = TypeInterner::new();
    let var = TypeVar(3);
    let var_type = interner.type_var(var);
    let nested = interner.array(interner.function(Vec::<ParamInfo>::new(), var_type, false));

    assert_eq!(interner.as_type_var(var_type), Some(var));
    assert!(interner.contains_type_vars(nested));
    assert!(interner.mentions(nested, var));
    assert!(!interner.mentions(nested, TypeVar(4)));
    assert!(!interner.contains_type_vars(interner.array(TypeId::INT)));
}

#[test]
fn test_erase_type_vars_rebuilds_structure() {
    let interner = TypeInterner::new();
    let var_type = interner.type_var(TypeVar(0));
    let array = interner.array(var_type);
    assert_eq!(interner.erase_type_vars(var_type), TypeId::UNKNOWN);
    assert_eq!(
        interner.erase_type_vars(array),
        interner.array(TypeId::UNKNOWN)
    );

    let concrete = interner.array(TypeId::INT);
    assert_eq!(interner.erase_type_vars(concrete), concrete);
}

#[test]
fn test_lookup_out_of_range() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId(10_000)), None);
}
