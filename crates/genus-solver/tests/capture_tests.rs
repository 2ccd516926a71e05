use super::*;
use crate::db::{QueryDatabase, TypeDatabase, TypeStore};
use crate::def::DefinitionInfo;
use crate::types::{TypeKey, WildcardBounds};
use crate::visitor::mentioned_inference_variables;

#[test]
fn test_no_capture_without_wildcards() {
    let store = TypeStore::new();
    let core = store.core();

    assert!(capture_conversion(&store, core.string).is_none());
    let list_string = store.class(core.list_def, vec![core.string]);
    assert!(capture_conversion(&store, list_string).is_none());
    let raw_list = store.class(core.list_def, vec![]);
    assert!(capture_conversion(&store, raw_list).is_none());
}

#[test]
fn test_capture_replaces_wildcards_with_fresh_variables() {
    let store = TypeStore::new();
    let core = store.core();

    let wild = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let list_wild = store.class(core.list_def, vec![wild]);

    let (captured, conv) = capture_conversion(&store, list_wild).expect("captures");
    assert_eq!(conv.source, list_wild);
    assert_eq!(conv.captured, captured);

    // The captured type's argument is exactly the fresh variable.
    let mentioned = mentioned_inference_variables(&store, captured);
    assert_eq!(mentioned.len(), 1);
    let var = *conv.items.keys().next().expect("one item");
    assert!(mentioned.contains(&var));

    match store.lookup(captured) {
        Some(TypeKey::Class(def, _)) => assert_eq!(def, core.list_def),
        other => panic!("expected class, got {other:?}"),
    }
}

#[test]
fn test_captures_are_fresh_each_time() {
    let store = TypeStore::new();
    let core = store.core();

    let wild = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let list_wild = store.class(core.list_def, vec![wild]);

    let (first, _) = capture_conversion(&store, list_wild).expect("captures");
    let (second, _) = capture_conversion(&store, list_wild).expect("captures");
    assert_ne!(first, second, "each capture introduces distinct variables");
}

#[test]
fn test_declared_bounds_are_substituted() {
    let store = TypeStore::new();
    let core = store.core();

    // class Chain<T extends Comparable<T>>
    let t = store.fresh_type_param("T");
    let t_ty = store.param(t);
    let comparable_t = store.class(core.comparable_def, vec![t_ty]);
    store.params().set_bounds(t, vec![comparable_t]);
    let chain_def = store.register(DefinitionInfo::class(
        store.intern_string("Chain"),
        vec![t],
        Some(core.object),
    ));

    let chain_wild = store.class(chain_def, vec![store.unbounded_wildcard()]);
    let (_, conv) = capture_conversion(&store, chain_wild).expect("captures");

    let (var, item) = conv.items.iter().next().expect("one item");
    // The declared bound `Comparable<T>` now mentions the fresh variable.
    assert_eq!(item.declared_bounds.len(), 1);
    let mentioned = mentioned_inference_variables(&store, item.declared_bounds[0]);
    assert!(mentioned.contains(var));
}

#[test]
fn test_mixed_arguments_capture_every_position() {
    let store = TypeStore::new();
    let core = store.core();

    let wild = store.wildcard(WildcardBounds::super_(vec![core.string]));
    let map_ty = store.class(core.map_def, vec![core.string, wild]);

    let (_, conv) = capture_conversion(&store, map_ty).expect("captures");
    assert_eq!(conv.items.len(), 2, "every position gets a variable");

    let arguments: Vec<_> = conv.items.values().map(|item| item.argument).collect();
    assert_eq!(arguments, vec![core.string, wild]);
}
