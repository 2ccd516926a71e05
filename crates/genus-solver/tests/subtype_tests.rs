use super::*;
use crate::db::{QueryDatabase, TypeDatabase, TypeStore};
use crate::types::{IntrinsicKind, WildcardBounds};

fn integer(store: &TypeStore) -> TypeId {
    store.core().box_type(IntrinsicKind::Int).expect("Integer")
}

#[test]
fn test_identity_and_object() {
    let store = TypeStore::new();
    let core = store.core();

    assert!(is_subtype_of(&store, core.string, core.string));
    assert!(is_subtype_of(&store, core.string, core.object));
    assert!(!is_subtype_of(&store, core.object, core.string));
}

#[test]
fn test_nominal_class_chains() {
    let store = TypeStore::new();
    let core = store.core();
    let integer = integer(&store);

    assert!(is_subtype_of(&store, integer, core.number));
    assert!(!is_subtype_of(&store, core.number, integer));

    let comparable_integer = store.class(core.comparable_def, vec![integer]);
    assert!(is_subtype_of(&store, integer, comparable_integer));

    let comparable_number = store.class(core.comparable_def, vec![core.number]);
    assert!(!is_subtype_of(&store, integer, comparable_number));
}

#[test]
fn test_null_type() {
    let store = TypeStore::new();
    let core = store.core();

    assert!(is_subtype_of(&store, TypeId::NULL, core.string));
    assert!(is_subtype_of(&store, TypeId::NULL, store.array(core.string)));
    assert!(!is_subtype_of(&store, core.string, TypeId::NULL));
    assert!(!is_subtype_of(&store, TypeId::NULL, TypeId::INT));
}

#[test]
fn test_primitives_are_identity_only() {
    let store = TypeStore::new();
    let core = store.core();

    assert!(is_subtype_of(&store, TypeId::INT, TypeId::INT));
    assert!(!is_subtype_of(&store, TypeId::INT, TypeId::LONG));
    assert!(!is_subtype_of(&store, TypeId::INT, core.object));
}

#[test]
fn test_generic_invariance() {
    let store = TypeStore::new();
    let core = store.core();

    let list_string = store.class(core.list_def, vec![core.string]);
    let list_object = store.class(core.list_def, vec![core.object]);
    let collection_string = store.class(core.collection_def, vec![core.string]);

    assert!(is_subtype_of(&store, list_string, collection_string));
    assert!(!is_subtype_of(&store, list_string, list_object));
    assert!(!is_subtype_of(&store, list_object, list_string));
}

#[test]
fn test_wildcard_containment() {
    let store = TypeStore::new();
    let core = store.core();
    let integer = integer(&store);

    let list_integer = store.class(core.list_def, vec![integer]);
    let extends_number = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let list_extends_number = store.class(core.list_def, vec![extends_number]);
    assert!(is_subtype_of(&store, list_integer, list_extends_number));

    let super_number = store.wildcard(WildcardBounds::super_(vec![core.number]));
    let list_super_number = store.class(core.list_def, vec![super_number]);
    let list_number = store.class(core.list_def, vec![core.number]);
    let list_object = store.class(core.list_def, vec![core.object]);
    assert!(is_subtype_of(&store, list_number, list_super_number));
    assert!(is_subtype_of(&store, list_object, list_super_number));
    assert!(!is_subtype_of(&store, list_integer, list_super_number));

    let unbounded = store.unbounded_wildcard();
    let list_unbounded = store.class(core.list_def, vec![unbounded]);
    assert!(is_subtype_of(&store, list_integer, list_unbounded));

    // Nested wildcard widening.
    let extends_integer = store.wildcard(WildcardBounds::extends(vec![integer]));
    let list_extends_integer = store.class(core.list_def, vec![extends_integer]);
    assert!(is_subtype_of(&store, list_extends_integer, list_extends_number));
    assert!(!is_subtype_of(&store, list_extends_number, list_extends_integer));
}

#[test]
fn test_arrays() {
    let store = TypeStore::new();
    let core = store.core();
    let integer = integer(&store);

    // Reference arrays are covariant.
    assert!(is_subtype_of(
        &store,
        store.array(integer),
        store.array(core.number)
    ));
    assert!(!is_subtype_of(
        &store,
        store.array(core.number),
        store.array(integer)
    ));

    // Primitive arrays are invariant.
    assert!(!is_subtype_of(
        &store,
        store.array(TypeId::INT),
        store.array(TypeId::LONG)
    ));

    // Array roots.
    assert!(is_subtype_of(&store, store.array(integer), core.object));
    assert!(is_subtype_of(&store, store.array(integer), core.cloneable));
    assert!(is_subtype_of(&store, store.array(integer), core.serializable));
    assert!(!is_subtype_of(&store, store.array(integer), core.number));
}

#[test]
fn test_intersections() {
    let store = TypeStore::new();
    let core = store.core();

    let both = store.intersection(vec![core.char_sequence, core.serializable]);

    // Any member from below; every member from above.
    assert!(is_subtype_of(&store, core.string, both));
    assert!(is_subtype_of(&store, both, core.char_sequence));
    assert!(is_subtype_of(&store, both, core.serializable));
    assert!(!is_subtype_of(&store, both, core.number));
}

#[test]
fn test_captured_variable_bounds() {
    let store = TypeStore::new();
    let core = store.core();
    let integer = integer(&store);

    let cap = store.fresh_capture(store.intern_string("CAP#1"));
    let cap_ty = store.captured(cap);
    store.set_capture_bounds(cap, vec![core.number], vec![integer]);

    // From below through the lower bound, from above through the upper.
    assert!(is_subtype_of(&store, cap_ty, core.number));
    assert!(is_subtype_of(&store, cap_ty, core.object));
    assert!(is_subtype_of(&store, integer, cap_ty));
    assert!(!is_subtype_of(&store, core.number, cap_ty));
}

#[test]
fn test_f_bounded_hierarchy_terminates() {
    let store = TypeStore::new();
    let core = store.core();
    let integer = integer(&store);

    // Integer <: Comparable<Integer> exercises the coinductive cycle guard.
    let comparable_integer = store.class(core.comparable_def, vec![integer]);
    for _ in 0..3 {
        assert!(is_subtype_of(&store, integer, comparable_integer));
    }
}

#[test]
fn test_error_sentinel_is_permissive() {
    let store = TypeStore::new();
    let core = store.core();

    assert!(is_subtype_of(&store, TypeId::ERROR, core.string));
    assert!(is_subtype_of(&store, core.string, TypeId::ERROR));
}
