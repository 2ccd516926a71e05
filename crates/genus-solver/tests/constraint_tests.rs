use super::*;
use crate::bounds::BoundSet;
use crate::db::{QueryDatabase, TypeDatabase, TypeStore};
use crate::types::{IntrinsicKind, WildcardBounds};

fn integer(store: &TypeStore) -> TypeId {
    store.core().box_type(IntrinsicKind::Int).expect("Integer")
}

#[test]
fn test_proper_subtype_agrees_with_checker() {
    let store = TypeStore::new();
    let core = store.core();
    let integer = integer(&store);
    let list_string = store.class(core.list_def, vec![core.string]);
    let collection_string = store.class(core.collection_def, vec![core.string]);

    let samples = [
        (integer, core.number),
        (core.number, integer),
        (core.string, core.object),
        (list_string, collection_string),
        (collection_string, list_string),
        (store.array(integer), store.array(core.number)),
        (TypeId::NULL, core.string),
        (core.string, TypeId::NULL),
    ];

    for (s, t) in samples {
        let mut bounds = BoundSet::new([]);
        ConstraintReducer::new(&store).reduce(Constraint::Subtype(s, t), &mut bounds);
        assert_eq!(
            bounds.is_valid(),
            SubtypeChecker::new(&store).is_subtype(s, t),
            "reduction must agree with the oracle for proper pair"
        );
    }
}

#[test]
fn test_subtype_emits_bounds_for_variables() {
    let store = TypeStore::new();
    let core = store.core();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);
    let mut reducer = ConstraintReducer::new(&store);

    reducer.reduce(Constraint::Subtype(store.infer(alpha), core.number), &mut bounds);
    reducer.reduce(Constraint::Subtype(core.string, store.infer(alpha)), &mut bounds);

    let on_alpha = bounds.bounds_on(alpha).expect("tracked");
    assert!(on_alpha.upper_bounds().any(|t| t == core.number));
    assert!(on_alpha.lower_bounds().any(|t| t == core.string));
    assert!(bounds.is_valid());
}

#[test]
fn test_parameterized_subtype_reduces_to_containment() {
    let store = TypeStore::new();
    let core = store.core();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);

    // ArrayList<String> <: List<α> walks the hierarchy, then α = String.
    let array_list_string = store.class(core.array_list_def, vec![core.string]);
    let list_alpha = store.class(core.list_def, vec![store.infer(alpha)]);
    ConstraintReducer::new(&store).reduce(
        Constraint::Subtype(array_list_string, list_alpha),
        &mut bounds,
    );

    assert!(bounds.is_valid());
    assert_eq!(bounds.instantiation(alpha), Some(core.string));
}

#[test]
fn test_subtype_against_wrong_hierarchy_fails() {
    let store = TypeStore::new();
    let core = store.core();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);

    let set_alpha = store.class(core.set_def, vec![store.infer(alpha)]);
    let list_string = store.class(core.list_def, vec![core.string]);
    ConstraintReducer::new(&store).reduce(Constraint::Subtype(list_string, set_alpha), &mut bounds);

    assert!(!bounds.is_valid());
}

#[test]
fn test_loose_compat_boxes_primitive_sources() {
    let store = TypeStore::new();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);

    // int against α boxes to Integer and flows in as a lower bound.
    ConstraintReducer::new(&store).reduce(
        Constraint::LooseCompat(TypeId::INT, store.infer(alpha)),
        &mut bounds,
    );

    let on_alpha = bounds.bounds_on(alpha).expect("tracked");
    assert!(on_alpha.lower_bounds().any(|t| t == integer(&store)));
}

#[test]
fn test_loose_compat_boxes_primitive_targets_as_equality() {
    let store = TypeStore::new();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);

    ConstraintReducer::new(&store).reduce(
        Constraint::LooseCompat(store.infer(alpha), TypeId::INT),
        &mut bounds,
    );

    assert_eq!(bounds.instantiation(alpha), Some(integer(&store)));
}

#[test]
fn test_loose_compat_unchecked_conversion() {
    let store = TypeStore::new();
    let core = store.core();
    let mut bounds = BoundSet::new([]);

    // Raw ArrayList against List<String>: only the erasure relates them,
    // which loose compatibility accepts trivially.
    let raw_array_list = store.class(core.array_list_def, vec![]);
    let list_string = store.class(core.list_def, vec![core.string]);
    ConstraintReducer::new(&store).reduce(
        Constraint::LooseCompat(raw_array_list, list_string),
        &mut bounds,
    );
    assert!(bounds.is_valid());

    // Subtyping proper does not grant the unchecked conversion.
    let mut strict_bounds = BoundSet::new([]);
    ConstraintReducer::new(&store).reduce(
        Constraint::Subtype(raw_array_list, list_string),
        &mut strict_bounds,
    );
    assert!(!strict_bounds.is_valid());
}

#[test]
fn test_equality_with_variable() {
    let store = TypeStore::new();
    let core = store.core();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);

    let list_alpha = store.class(core.list_def, vec![store.infer(alpha)]);
    let list_string = store.class(core.list_def, vec![core.string]);
    ConstraintReducer::new(&store).reduce(Constraint::Equal(list_alpha, list_string), &mut bounds);

    assert!(bounds.is_valid());
    assert_eq!(bounds.instantiation(alpha), Some(core.string));
}

#[test]
fn test_equality_of_distinct_proper_types_fails() {
    let store = TypeStore::new();
    let core = store.core();
    let mut bounds = BoundSet::new([]);

    ConstraintReducer::new(&store).reduce(Constraint::Equal(core.string, core.number), &mut bounds);
    assert!(!bounds.is_valid());
}

#[test]
fn test_array_equality_recurses_on_components() {
    let store = TypeStore::new();
    let core = store.core();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);

    let array_alpha = store.array(store.infer(alpha));
    let array_string = store.array(core.string);
    ConstraintReducer::new(&store).reduce(Constraint::Equal(array_alpha, array_string), &mut bounds);

    assert_eq!(bounds.instantiation(alpha), Some(core.string));
}

#[test]
fn test_wildcard_equality_shapes() {
    let store = TypeStore::new();
    let core = store.core();
    let mut reducer = ConstraintReducer::new(&store);

    // Matching shapes succeed.
    let extends_a = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let extends_b = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let mut ok = BoundSet::new([]);
    reducer.reduce(Constraint::Equal(extends_a, extends_b), &mut ok);
    assert!(ok.is_valid());

    // The implicit Object bound equates `?` with `? extends Object`.
    let unbounded = store.unbounded_wildcard();
    let extends_object = store.wildcard(WildcardBounds::extends(vec![core.object]));
    let mut implicit = BoundSet::new([]);
    reducer.reduce(Constraint::Equal(unbounded, extends_object), &mut implicit);
    assert!(implicit.is_valid());

    // Mismatched shapes fail.
    let super_number = store.wildcard(WildcardBounds::super_(vec![core.number]));
    let mut mismatched = BoundSet::new([]);
    reducer.reduce(Constraint::Equal(extends_a, super_number), &mut mismatched);
    assert!(!mismatched.is_valid());

    // A wildcard never equals a concrete type.
    let mut concrete = BoundSet::new([]);
    reducer.reduce(Constraint::Equal(extends_a, core.number), &mut concrete);
    assert!(!concrete.is_valid());
}

#[test]
fn test_containment_cases() {
    let store = TypeStore::new();
    let core = store.core();
    let integer = integer(&store);
    let mut reducer = ConstraintReducer::new(&store);

    // Concrete under an extends-wildcard.
    let extends_number = store.wildcard(WildcardBounds::extends(vec![core.number]));
    let mut ok = BoundSet::new([]);
    reducer.reduce(Constraint::Contained(integer, extends_number), &mut ok);
    assert!(ok.is_valid());

    let mut not_contained = BoundSet::new([]);
    reducer.reduce(Constraint::Contained(core.string, extends_number), &mut not_contained);
    assert!(!not_contained.is_valid());

    // Concrete under a super-wildcard.
    let super_integer = store.wildcard(WildcardBounds::super_(vec![integer]));
    let mut super_ok = BoundSet::new([]);
    reducer.reduce(Constraint::Contained(core.number, super_integer), &mut super_ok);
    assert!(super_ok.is_valid());

    // Wildcard against a concrete argument position is invariant.
    let mut wild_vs_concrete = BoundSet::new([]);
    reducer.reduce(Constraint::Contained(extends_number, core.number), &mut wild_vs_concrete);
    assert!(!wild_vs_concrete.is_valid());

    // Unbounded target contains everything.
    let unbounded = store.unbounded_wildcard();
    let mut anything = BoundSet::new([]);
    reducer.reduce(Constraint::Contained(super_integer, unbounded), &mut anything);
    assert!(anything.is_valid());
}

#[test]
fn test_containment_uses_existing_instantiation() {
    let store = TypeStore::new();
    let core = store.core();
    let alpha = store.fresh_inference_var();
    let mut bounds = BoundSet::new([alpha]);
    bounds.equality(&store, store.infer(alpha), core.string);

    // α is already pinned to String, so containment dispatches on String
    // rather than emitting a fresh bound.
    let extends_number = store.wildcard(WildcardBounds::extends(vec![core.number]));
    ConstraintReducer::new(&store).reduce(
        Constraint::Contained(store.infer(alpha), extends_number),
        &mut bounds,
    );
    assert!(!bounds.is_valid(), "String does not fit ? extends Number");
}

#[test]
fn test_intersection_distribution() {
    let store = TypeStore::new();
    let core = store.core();
    let mut reducer = ConstraintReducer::new(&store);

    let both = store.intersection(vec![core.char_sequence, core.serializable]);

    // All-of on the right.
    let mut right = BoundSet::new([]);
    reducer.reduce(Constraint::Subtype(core.string, both), &mut right);
    assert!(right.is_valid());

    // Any-of on the left.
    let mut left = BoundSet::new([]);
    reducer.reduce(Constraint::Subtype(both, core.serializable), &mut left);
    assert!(left.is_valid());

    let mut neither = BoundSet::new([]);
    reducer.reduce(Constraint::Subtype(both, core.number), &mut neither);
    assert!(!neither.is_valid());
}
