//! Recursive traversal over interned type terms.
//!
//! All walkers carry a per-call visited set: captured type-variables may
//! refer back to themselves through their own bounds (`T <: Comparable<T>`),
//! so unguarded recursion would diverge.

use crate::db::QueryDatabase;
use crate::types::{InferenceVar, TypeId, TypeKey};
use indexmap::IndexSet;
use rustc_hash::FxHashSet;

/// Visit `ty` and every type reachable from it through argument lists,
/// wildcard/captured bounds, and intersection members. `f` returning `false`
/// stops the walk early.
pub fn walk_reachable_types(
    db: &dyn QueryDatabase,
    ty: TypeId,
    f: &mut impl FnMut(TypeId) -> bool,
) -> bool {
    let mut visited = FxHashSet::default();
    walk(db, ty, &mut visited, f)
}

fn walk(
    db: &dyn QueryDatabase,
    ty: TypeId,
    visited: &mut FxHashSet<TypeId>,
    f: &mut impl FnMut(TypeId) -> bool,
) -> bool {
    if !visited.insert(ty) {
        return true;
    }
    if !f(ty) {
        return false;
    }

    let Some(key) = db.lookup(ty) else {
        return true;
    };

    match key {
        TypeKey::Intrinsic(_) | TypeKey::Infer(_) | TypeKey::Param(_) => true,
        TypeKey::Class(_, args) => {
            for &arg in db.type_list(args).iter() {
                if !walk(db, arg, visited, f) {
                    return false;
                }
            }
            true
        }
        TypeKey::Array(component) => walk(db, component, visited, f),
        TypeKey::Wildcard(w) => {
            let bounds = db.wildcard_bounds(w);
            for &bound in bounds.upper.iter().chain(bounds.lower.iter()) {
                if !walk(db, bound, visited, f) {
                    return false;
                }
            }
            true
        }
        TypeKey::Captured(c) => {
            let Some(info) = db.capture_info(c) else {
                return true;
            };
            for &bound in info.upper.iter().chain(info.lower.iter()) {
                if !walk(db, bound, visited, f) {
                    return false;
                }
            }
            true
        }
        TypeKey::Intersection(members) => {
            for &member in db.type_list(members).iter() {
                if !walk(db, member, visited, f) {
                    return false;
                }
            }
            true
        }
    }
}

/// A type is *proper* iff no inference variable is reachable through its
/// argument lists, bounds, or intersection members.
pub fn is_proper(db: &dyn QueryDatabase, ty: TypeId) -> bool {
    walk_reachable_types(db, ty, &mut |t| {
        !matches!(db.lookup(t), Some(TypeKey::Infer(_)))
    })
}

/// Collect every inference variable mentioned in `ty`, in first-visit order.
pub fn mentioned_inference_variables(
    db: &dyn QueryDatabase,
    ty: TypeId,
) -> IndexSet<InferenceVar> {
    let mut vars = IndexSet::new();
    walk_reachable_types(db, ty, &mut |t| {
        if let Some(TypeKey::Infer(var)) = db.lookup(t) {
            vars.insert(var);
        }
        true
    });
    vars
}

/// Whether any type reachable from `ty` satisfies `pred`.
pub fn contains_type_matching(
    db: &dyn QueryDatabase,
    ty: TypeId,
    mut pred: impl FnMut(TypeId) -> bool,
) -> bool {
    !walk_reachable_types(db, ty, &mut |t| !pred(t))
}

/// The inference variable a term directly denotes, if any.
pub fn as_inference_var(db: &dyn QueryDatabase, ty: TypeId) -> Option<InferenceVar> {
    match db.lookup(ty) {
        Some(TypeKey::Infer(var)) => Some(var),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/visitor_tests.rs"]
mod tests;
