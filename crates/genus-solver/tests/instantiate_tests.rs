use super::*;
use crate::db::{QueryDatabase, TypeDatabase, TypeStore};
use crate::types::WildcardBounds;

#[test]
fn test_param_substitution() {
    let store = TypeStore::new();
    let core = store.core();

    let t = store.fresh_type_param("T");
    let t_ty = store.param(t);
    let list_t = store.class(core.list_def, vec![t_ty]);

    let mut subst = TypeSubstitution::new();
    subst.insert_param(t, core.string);

    let result = instantiate_type(&store, list_t, &subst);
    assert_eq!(result, store.class(core.list_def, vec![core.string]));
}

#[test]
fn test_var_substitution() {
    let store = TypeStore::new();
    let core = store.core();

    let var = store.fresh_inference_var();
    let array = store.array(store.infer(var));

    let mut subst = TypeSubstitution::new();
    subst.insert_var(var, core.number);

    assert_eq!(instantiate_type(&store, array, &subst), store.array(core.number));
}

#[test]
fn test_substitution_through_wildcard_bounds() {
    let store = TypeStore::new();
    let core = store.core();

    let t = store.fresh_type_param("T");
    let wild = store.wildcard(WildcardBounds::extends(vec![store.param(t)]));
    let list_wild = store.class(core.list_def, vec![wild]);

    let mut subst = TypeSubstitution::new();
    subst.insert_param(t, core.number);

    let expected_wild = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let expected = store.class(core.list_def, vec![expected_wild]);
    assert_eq!(instantiate_type(&store, list_wild, &subst), expected);
}

#[test]
fn test_unmapped_terms_unchanged() {
    let store = TypeStore::new();
    let core = store.core();

    let mut subst = TypeSubstitution::new();
    subst.insert_param(store.fresh_type_param("T"), core.string);

    // No occurrence of the mapped parameter: same interned id comes back.
    let list_number = store.class(core.list_def, vec![core.number]);
    assert_eq!(instantiate_type(&store, list_number, &subst), list_number);

    let empty = TypeSubstitution::new();
    assert!(empty.is_empty());
    assert_eq!(instantiate_type(&store, list_number, &empty), list_number);
}

#[test]
fn test_from_params_handles_raw_use() {
    let store = TypeStore::new();

    let t = store.fresh_type_param("T");
    let u = store.fresh_type_param("U");

    // Fewer arguments than parameters: the tail stays unmapped.
    let subst = TypeSubstitution::from_params(&[t, u], &[TypeId::INT]);
    assert_eq!(subst.param(t), Some(TypeId::INT));
    assert_eq!(subst.param(u), None);
}
