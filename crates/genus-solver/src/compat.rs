//! Conversions between proper types.
//!
//! Two tiers, matching the applicability tiers of overload selection:
//!
//! - **strict**: identity, widening primitive conversion, widening
//!   reference conversion (subtyping). No boxing.
//! - **loose**: strict plus boxing and unboxing, each optionally followed by
//!   the corresponding widening.

use crate::class_hierarchy::supertype_parameterization;
use crate::db::QueryDatabase;
use crate::subtype::SubtypeChecker;
use crate::types::{IntrinsicKind, TypeId, TypeKey};

/// Widening primitive conversion (`byte` → `int`, `int` → `double`, ...).
pub fn widens_to(from: IntrinsicKind, to: IntrinsicKind) -> bool {
    use IntrinsicKind::*;
    if from == to {
        return true;
    }
    match from {
        Byte => matches!(to, Short | Int | Long | Float | Double),
        Short => matches!(to, Int | Long | Float | Double),
        Char => matches!(to, Int | Long | Float | Double),
        Int => matches!(to, Long | Float | Double),
        Long => matches!(to, Float | Double),
        Float => matches!(to, Double),
        _ => false,
    }
}

/// The wrapper class type for a primitive, e.g. `int` → `Integer`.
pub fn box_type(db: &dyn QueryDatabase, ty: TypeId) -> Option<TypeId> {
    let kind = ty.intrinsic_kind()?;
    if !kind.is_primitive() {
        return None;
    }
    db.core().box_type(kind)
}

/// The primitive a wrapper class unboxes to, e.g. `Integer` → `int`.
pub fn unbox_type(db: &dyn QueryDatabase, ty: TypeId) -> Option<TypeId> {
    match db.lookup(ty) {
        Some(TypeKey::Class(def, _)) => db.core().unbox_type(def),
        _ => None,
    }
}

/// Strict assignability: identity, primitive widening, or widening
/// reference conversion. Never boxes.
pub fn is_strictly_assignable(db: &dyn QueryDatabase, from: TypeId, to: TypeId) -> bool {
    if from == to {
        return true;
    }
    match (from.intrinsic_kind(), to.intrinsic_kind()) {
        (Some(f), Some(t)) if f.is_primitive() && t.is_primitive() => widens_to(f, t),
        (Some(f), _) if f.is_primitive() => false,
        (_, Some(t)) if t.is_primitive() => false,
        _ => SubtypeChecker::new(db).is_subtype(from, to),
    }
}

/// Loose assignability: strict, or boxing/unboxing followed by widening.
pub fn is_loosely_assignable(db: &dyn QueryDatabase, from: TypeId, to: TypeId) -> bool {
    if is_strictly_assignable(db, from, to) {
        return true;
    }

    // Boxing: primitive source against a reference target.
    if from.is_primitive() && !to.is_primitive() {
        if let Some(boxed) = box_type(db, from) {
            return SubtypeChecker::new(db).is_subtype(boxed, to);
        }
        return false;
    }

    // Unboxing: wrapper source against a primitive target, optionally
    // widening afterwards.
    if !from.is_primitive() && to.is_primitive() {
        if let Some(unboxed) = unbox_type(db, from) {
            let (Some(f), Some(t)) = (unboxed.intrinsic_kind(), to.intrinsic_kind()) else {
                return false;
            };
            return widens_to(f, t);
        }
        return false;
    }

    // Unchecked conversion: a raw view of the target's erasure is the only
    // supertype relation available.
    if let Some(TypeKey::Class(def, args)) = db.lookup(to) {
        if !db.type_list(args).is_empty() {
            return matches!(supertype_parameterization(db, from, def), Some(None));
        }
    }

    false
}

#[cfg(test)]
#[path = "../tests/compat_tests.rs"]
mod tests;
