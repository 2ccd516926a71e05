use super::*;
use crate::TypeInterner;
use crate::types::TypeId;

#[test]
fn test_def_id_validity() {
    assert!(!DefId::INVALID.is_valid());
    assert!(DefId(1).is_valid());
    assert!(DefId(100).is_valid());
}

#[test]
fn test_definition_store_basic() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();

    let name = interner.intern_string("Widget");
    let def_id = store.register(DefinitionInfo::class(name, vec![], None));

    assert!(def_id.is_valid());
    assert!(store.contains(def_id));

    let retrieved = store.get(def_id).expect("definition exists");
    assert_eq!(retrieved.kind, DefKind::Class);
    assert_eq!(retrieved.name, name);
    assert!(retrieved.superclass.is_none());
}

#[test]
fn test_definition_store_two_step_registration() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();

    let def_id = store.allocate();
    assert!(!store.contains(def_id));

    let name = interner.intern_string("Node");
    store.fill(def_id, DefinitionInfo::class(name, vec![], None));
    assert!(store.contains(def_id));
    assert_eq!(store.name(def_id), Some(name));
}

#[test]
fn test_interface_flags() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();

    let info = DefinitionInfo::interface(interner.intern_string("Runnable"), vec![]);
    let def_id = store.register(info);

    let retrieved = store.get(def_id).expect("definition exists");
    assert!(retrieved.is_interface());
    assert!(retrieved.flags.contains(DefFlags::ABSTRACT));
}

#[test]
fn test_param_store_bounds_after_allocation() {
    let interner = TypeInterner::new();
    let params = ParamStore::new();

    let t = params.allocate(interner.intern_string("T"));
    assert!(params.get(t).expect("param exists").bounds.is_empty());

    params.set_bounds(t, vec![TypeId(200)]);
    assert_eq!(params.get(t).expect("param exists").bounds, vec![TypeId(200)]);
}

#[test]
fn test_capture_store_self_referential_bounds() {
    let interner = TypeInterner::new();
    let captures = CaptureStore::new();

    let cap = captures.allocate(interner.intern_string("CAP#1"));
    // The bound can only be built after the id exists; simulate with an
    // arbitrary id standing in for `Comparable<CAP#1>`.
    captures.set_bounds(cap, vec![TypeId(321)], vec![]);

    let info = captures.get(cap).expect("capture exists");
    assert_eq!(info.upper, vec![TypeId(321)]);
    assert!(info.lower.is_empty());
}

#[test]
fn test_distinct_ids() {
    let interner = TypeInterner::new();
    let store = DefinitionStore::new();
    let name = interner.intern_string("A");

    let a = store.register(DefinitionInfo::class(name, vec![], None));
    let b = store.register(DefinitionInfo::class(name, vec![], None));
    assert_ne!(a, b);
    assert_eq!(store.len(), 2);
}
