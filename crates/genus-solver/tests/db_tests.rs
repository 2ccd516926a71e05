use super::*;
use crate::types::{TypeKey, WildcardBounds};

#[test]
fn test_store_construction_installs_core() {
    let store = TypeStore::new();
    let core = store.core();
    assert!(core.object_def.is_valid());
    assert_eq!(store.resolve_atom(store.def_name(core.object_def).expect("named")), "Object");
}

#[test]
fn test_class_construction_interned() {
    let store = TypeStore::new();
    let core = store.core();

    let a = store.class(core.list_def, vec![core.string]);
    let b = store.class(core.list_def, vec![core.string]);
    assert_eq!(a, b);

    let raw = store.class(core.list_def, vec![]);
    assert_ne!(a, raw);
}

#[test]
fn test_intersection_normalization() {
    let store = TypeStore::new();
    let core = store.core();

    // Singleton collapses to its member.
    assert_eq!(store.intersection(vec![core.number]), core.number);

    // Duplicates collapse; nesting flattens.
    let pair = store.intersection(vec![core.serializable, core.cloneable]);
    let nested = store.intersection(vec![pair, core.serializable]);
    assert_eq!(nested, pair);

    match store.lookup(pair) {
        Some(TypeKey::Intersection(members)) => {
            assert_eq!(
                store.type_list(members).as_ref(),
                &[core.serializable, core.cloneable]
            );
        }
        other => panic!("expected intersection, got {other:?}"),
    }
}

#[test]
fn test_wildcard_helpers() {
    let store = TypeStore::new();
    let core = store.core();

    let unbounded = store.unbounded_wildcard();
    match store.lookup(unbounded) {
        Some(TypeKey::Wildcard(w)) => assert!(store.wildcard_bounds(w).is_unbounded()),
        other => panic!("expected wildcard, got {other:?}"),
    }

    let extends = store.wildcard(WildcardBounds::extends(vec![core.number]));
    assert_ne!(unbounded, extends);
}

#[test]
fn test_fresh_inference_vars_distinct() {
    let store = TypeStore::new();
    let a = store.fresh_inference_var();
    let b = store.fresh_inference_var();
    assert_ne!(a, b);
    assert_ne!(store.infer(a), store.infer(b));
}

#[test]
fn test_fresh_capture_bounds_mutation() {
    let store = TypeStore::new();
    let core = store.core();

    let name = store.intern_string("CAP#1");
    let cap = store.fresh_capture(name);
    let cap_ty = store.captured(cap);

    // A self-referential bound is expressible because the id exists before
    // the bound is attached.
    let comparable_cap = store.class(core.comparable_def, vec![cap_ty]);
    store.set_capture_bounds(cap, vec![comparable_cap], vec![]);

    let info = store.capture_info(cap).expect("capture exists");
    assert_eq!(info.upper, vec![comparable_cap]);
}
