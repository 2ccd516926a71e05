use super::*;
use crate::db::{QueryDatabase, TypeDatabase, TypeStore};
use crate::types::WildcardBounds;

#[test]
fn test_intrinsics_and_classes() {
    let store = TypeStore::new();
    let core = store.core();

    assert_eq!(format_type(&store, TypeId::INT), "int");
    assert_eq!(format_type(&store, TypeId::NULL), "null");
    assert_eq!(format_type(&store, core.string), "String");
    assert_eq!(
        format_type(&store, store.class(core.list_def, vec![core.string])),
        "List<String>"
    );
}

#[test]
fn test_arrays_and_intersections() {
    let store = TypeStore::new();
    let core = store.core();

    assert_eq!(format_type(&store, store.array(TypeId::INT)), "int[]");
    assert_eq!(
        format_type(&store, store.array(store.array(core.number))),
        "Number[][]"
    );
    assert_eq!(
        format_type(
            &store,
            store.intersection(vec![core.serializable, core.cloneable])
        ),
        "Serializable & Cloneable"
    );
}

#[test]
fn test_wildcards() {
    let store = TypeStore::new();
    let core = store.core();

    let unbounded = store.unbounded_wildcard();
    let extends = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let super_ = store.wildcard(WildcardBounds::super_(vec![core.string]));

    assert_eq!(
        format_type(&store, store.class(core.list_def, vec![unbounded])),
        "List<?>"
    );
    assert_eq!(
        format_type(&store, store.class(core.list_def, vec![extends])),
        "List<? extends Number>"
    );
    assert_eq!(
        format_type(&store, store.class(core.list_def, vec![super_])),
        "List<? super String>"
    );
}

#[test]
fn test_inference_variables() {
    let store = TypeStore::new();
    let var = store.fresh_inference_var();
    let rendered = format_type(&store, store.infer(var));
    assert!(rendered.starts_with('α'));
}

#[test]
fn test_self_referential_capture_renders_finitely() {
    let store = TypeStore::new();
    let core = store.core();

    let cap = store.fresh_capture(store.intern_string("CAP#1"));
    let cap_ty = store.captured(cap);
    let comparable_cap = store.class(core.comparable_def, vec![cap_ty]);
    store.set_capture_bounds(cap, vec![comparable_cap], vec![]);

    let rendered = format_type(&store, cap_ty);
    assert_eq!(rendered, "CAP#1 of ? extends Comparable<CAP#1>");

    // Stable across repeated calls.
    assert_eq!(format_type(&store, cap_ty), rendered);
}
