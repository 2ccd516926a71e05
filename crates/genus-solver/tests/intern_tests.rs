use super::*;
use crate::def::DefId;
use crate::types::IntrinsicKind;

#[test]
fn test_intern_deduplicates() {
    let interner = TypeInterner::new();
    let args = interner.intern_type_list(vec![TypeId::INT]);

    let a = interner.intern(TypeKey::Class(DefId(7), args));
    let b = interner.intern(TypeKey::Class(DefId(7), args));
    assert_eq!(a, b);

    let c = interner.intern(TypeKey::Class(DefId(8), args));
    assert_ne!(a, c);
}

#[test]
fn test_lookup_round_trip() {
    let interner = TypeInterner::new();
    let key = TypeKey::Array(TypeId::INT);
    let id = interner.intern(key.clone());

    assert!(!id.is_intrinsic());
    assert_eq!(interner.lookup(id), Some(key));
}

#[test]
fn test_intrinsics_never_stored() {
    let interner = TypeInterner::new();
    let id = interner.intern(TypeKey::Intrinsic(IntrinsicKind::Int));
    assert_eq!(id, TypeId::INT);
    assert_eq!(
        interner.lookup(TypeId::INT),
        Some(TypeKey::Intrinsic(IntrinsicKind::Int))
    );
}

#[test]
fn test_type_list_interning() {
    let interner = TypeInterner::new();

    let empty = interner.intern_type_list(vec![]);
    assert_eq!(empty, TypeListId::EMPTY);
    assert!(interner.type_list(empty).is_empty());

    let a = interner.intern_type_list(vec![TypeId::INT, TypeId::LONG]);
    let b = interner.intern_type_list(vec![TypeId::INT, TypeId::LONG]);
    assert_eq!(a, b);
    assert_eq!(interner.type_list(a).as_ref(), &[TypeId::INT, TypeId::LONG]);

    let c = interner.intern_type_list(vec![TypeId::LONG, TypeId::INT]);
    assert_ne!(a, c);
}

#[test]
fn test_wildcard_interning() {
    let interner = TypeInterner::new();

    let a = interner.intern_wildcard(WildcardBounds::extends(vec![TypeId(300)]));
    let b = interner.intern_wildcard(WildcardBounds::extends(vec![TypeId(300)]));
    assert_eq!(a, b);

    let bounds = interner.wildcard_bounds(a);
    assert_eq!(bounds.upper, vec![TypeId(300)]);
    assert!(bounds.lower.is_empty());

    let unbounded = interner.intern_wildcard(WildcardBounds::UNBOUNDED);
    assert_ne!(a, unbounded);
}

#[test]
fn test_string_interning() {
    let interner = TypeInterner::new();
    let a = interner.intern_string("Comparable");
    let b = interner.intern_string("Comparable");
    assert_eq!(a, b);
    assert_eq!(interner.resolve_atom(a), "Comparable");
}

#[test]
fn test_concurrent_interning() {
    use rayon::prelude::*;

    let interner = TypeInterner::new();
    let keys: Vec<TypeKey> = (0..256)
        .map(|i| TypeKey::Class(DefId(i), TypeListId::EMPTY))
        .collect();

    // Interning the same keys from many threads must agree on ids.
    let first: Vec<TypeId> = keys.par_iter().map(|k| interner.intern(k.clone())).collect();
    let second: Vec<TypeId> = keys.par_iter().map(|k| interner.intern(k.clone())).collect();

    assert_eq!(first, second);
    for (key, id) in keys.iter().zip(&first) {
        assert_eq!(interner.lookup(*id).as_ref(), Some(key));
    }
}
