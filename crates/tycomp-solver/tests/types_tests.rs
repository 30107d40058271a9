use super::*;

#[test]
fn test_intrinsic_ids_are_below_first_user() {
    for id in [
        TypeId::UNKNOWN,
        TypeId::ERROR,
        TypeId::VOID,
        TypeId::INT,
        TypeId::DOUBLE,
        TypeId::BOOL,
        TypeId::STRING,
    ] {
        assert!(id.is_intrinsic(), "{id:?} should be intrinsic");
    }
    assert!(!TypeId::FIRST_USER.is_intrinsic());
}

#[test]
fn test_holes() {
    assert!(TypeId::UNKNOWN.is_hole());
    assert!(TypeId::ERROR.is_hole());
    assert!(!TypeId::VOID.is_hole());
    assert!(!TypeId::INT.is_hole());
}

#[test]
fn test_intrinsic_names_round_trip_through_annotations() {
    for kind in IntrinsicKind::ALL {
        match kind {
            IntrinsicKind::Unknown | IntrinsicKind::Error => {
                assert_eq!(IntrinsicKind::from_name(kind.name()), None);
            }
            _ => assert_eq!(IntrinsicKind::from_name(kind.name()), Some(kind)),
        }
    }
    assert_eq!(IntrinsicKind::from_name("Color"), None);
}
