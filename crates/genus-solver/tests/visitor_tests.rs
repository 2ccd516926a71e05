use super::*;
use crate::db::{QueryDatabase, TypeDatabase, TypeStore};
use crate::types::WildcardBounds;

#[test]
fn test_proper_types() {
    let store = TypeStore::new();
    let core = store.core();

    assert!(is_proper(&store, core.string));
    assert!(is_proper(&store, store.array(core.number)));
    assert!(is_proper(&store, store.class(core.list_def, vec![core.string])));

    let var = store.fresh_inference_var();
    assert!(!is_proper(&store, store.infer(var)));
}

#[test]
fn test_improper_through_nesting() {
    let store = TypeStore::new();
    let core = store.core();
    let var = store.fresh_inference_var();
    let var_ty = store.infer(var);

    // Inference variable buried in an argument list.
    let list_var = store.class(store.core().list_def, vec![var_ty]);
    assert!(!is_proper(&store, list_var));

    // ... in a wildcard bound.
    let wild = store.wildcard(WildcardBounds::extends(vec![var_ty]));
    let list_wild = store.class(core.list_def, vec![wild]);
    assert!(!is_proper(&store, list_wild));

    // ... in an array component.
    assert!(!is_proper(&store, store.array(var_ty)));
}

#[test]
fn test_mentioned_inference_variables() {
    let store = TypeStore::new();
    let core = store.core();
    let a = store.fresh_inference_var();
    let b = store.fresh_inference_var();

    let map = store.class(core.map_def, vec![store.infer(a), store.infer(b)]);
    let mentioned = mentioned_inference_variables(&store, map);
    assert_eq!(mentioned.len(), 2);
    assert!(mentioned.contains(&a));
    assert!(mentioned.contains(&b));

    assert!(mentioned_inference_variables(&store, core.string).is_empty());
}

#[test]
fn test_self_referential_capture_terminates() {
    let store = TypeStore::new();
    let core = store.core();

    let cap = store.fresh_capture(store.intern_string("CAP#1"));
    let cap_ty = store.captured(cap);
    let comparable_cap = store.class(core.comparable_def, vec![cap_ty]);
    store.set_capture_bounds(cap, vec![comparable_cap], vec![]);

    // Must terminate and be stable across repeated calls.
    let first = mentioned_inference_variables(&store, cap_ty);
    let second = mentioned_inference_variables(&store, cap_ty);
    assert!(first.is_empty());
    assert_eq!(first, second);
    assert!(is_proper(&store, cap_ty));
}

#[test]
fn test_contains_type_matching() {
    let store = TypeStore::new();
    let core = store.core();

    let list_string = store.class(core.list_def, vec![core.string]);
    assert!(contains_type_matching(&store, list_string, |t| t == core.string));
    assert!(!contains_type_matching(&store, list_string, |t| t == core.number));
}
