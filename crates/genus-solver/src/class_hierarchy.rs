//! Supertype enumeration with type-parameter substitution.
//!
//! `raw_supertypes` maps every nominal ancestor of a type to its
//! parameterization as seen from that type: `ArrayList<String>` yields
//! `List<String>`, `Collection<String>`, `Iterable<String>`, `Object`, etc.
//! A `None` parameterization marks an ancestor reached through a raw
//! (erased) use of a generic definition.
//!
//! A consistent hierarchy mentions each ancestor with a single
//! parameterization; on diamond paths the first one found wins.

use crate::db::QueryDatabase;
use crate::def::DefId;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::types::{TypeId, TypeKey};
use indexmap::IndexMap;
use rustc_hash::FxHashSet;

/// Parameterized nominal ancestors of `ty`, most derived first, including
/// `ty`'s own class if it has one. Every reference type ends at `Object`.
pub fn raw_supertypes(
    db: &dyn QueryDatabase,
    ty: TypeId,
) -> IndexMap<DefId, Option<Vec<TypeId>>> {
    let mut out = IndexMap::new();
    let mut visited = FxHashSet::default();
    collect(db, ty, &mut out, &mut visited);

    // Object is the implicit root of every reference chain, including
    // interface-only hierarchies and arrays.
    if !out.is_empty() || is_reference(db, ty) {
        out.entry(db.core().object_def).or_insert(Some(Vec::new()));
    }
    out
}

/// The parameterization of `target` as a supertype of `s`, if any.
/// `Some(None)` marks a raw ancestor.
pub fn supertype_parameterization(
    db: &dyn QueryDatabase,
    s: TypeId,
    target: DefId,
) -> Option<Option<Vec<TypeId>>> {
    raw_supertypes(db, s).get(&target).cloned()
}

/// Erasure-level ancestry test between definitions.
pub fn is_nominal_ancestor(db: &dyn QueryDatabase, sub: DefId, sup: DefId) -> bool {
    if sub == sup {
        return true;
    }
    if sup == db.core().object_def {
        return true;
    }
    let mut visited = FxHashSet::default();
    let mut stack = vec![sub];
    while let Some(def) = stack.pop() {
        if !visited.insert(def) {
            continue;
        }
        if def == sup {
            return true;
        }
        let Some(info) = db.definition(def) else {
            continue;
        };
        for parent in info.superclass.iter().chain(info.interfaces.iter()) {
            if let Some(TypeKey::Class(parent_def, _)) = db.lookup(*parent) {
                stack.push(parent_def);
            }
        }
    }
    false
}

fn is_reference(db: &dyn QueryDatabase, ty: TypeId) -> bool {
    matches!(
        db.lookup(ty),
        Some(
            TypeKey::Class(..)
                | TypeKey::Array(_)
                | TypeKey::Captured(_)
                | TypeKey::Param(_)
                | TypeKey::Intersection(_)
        )
    )
}

fn collect(
    db: &dyn QueryDatabase,
    ty: TypeId,
    out: &mut IndexMap<DefId, Option<Vec<TypeId>>>,
    visited: &mut FxHashSet<TypeId>,
) {
    if !visited.insert(ty) {
        return;
    }

    match db.lookup(ty) {
        Some(TypeKey::Class(def, args)) => {
            let arg_list = db.type_list(args);
            let params = db.def_type_params(def);
            let raw = arg_list.is_empty() && !params.is_empty();

            collect_class(db, def, raw, &arg_list, out, &mut FxHashSet::default());
        }
        Some(TypeKey::Array(_)) => {
            // Array supertypes are the three core reference roots; component
            // covariance is the subtype checker's business, not ancestry.
            out.entry(db.core().cloneable_def).or_insert(Some(Vec::new()));
            out.entry(db.core().serializable_def)
                .or_insert(Some(Vec::new()));
        }
        Some(TypeKey::Captured(c)) => {
            if let Some(info) = db.capture_info(c) {
                for upper in info.upper {
                    collect(db, upper, out, visited);
                }
            }
        }
        Some(TypeKey::Wildcard(w)) => {
            let bounds = db.wildcard_bounds(w);
            for &upper in bounds.upper.iter() {
                collect(db, upper, out, visited);
            }
        }
        Some(TypeKey::Param(p)) => {
            if let Some(info) = db.type_param(p) {
                for bound in info.bounds {
                    collect(db, bound, out, visited);
                }
            }
        }
        Some(TypeKey::Intersection(members)) => {
            for &member in db.type_list(members).iter() {
                collect(db, member, out, visited);
            }
        }
        _ => {}
    }
}

fn collect_class(
    db: &dyn QueryDatabase,
    def: DefId,
    raw: bool,
    args: &[TypeId],
    out: &mut IndexMap<DefId, Option<Vec<TypeId>>>,
    seen_defs: &mut FxHashSet<DefId>,
) {
    if !seen_defs.insert(def) {
        return;
    }

    let entry_args = if raw { None } else { Some(args.to_vec()) };
    out.entry(def).or_insert(entry_args);

    let Some(info) = db.definition(def) else {
        return;
    };

    let subst = if raw {
        TypeSubstitution::new()
    } else {
        TypeSubstitution::from_params(&info.type_params, args)
    };

    for parent in info.superclass.iter().chain(info.interfaces.iter()) {
        let parent_ty = if raw {
            // Erasure: ancestors of a raw type are raw as well.
            *parent
        } else {
            instantiate_type(db, *parent, &subst)
        };
        if let Some(TypeKey::Class(parent_def, parent_args)) = db.lookup(parent_ty) {
            let parent_list = db.type_list(parent_args);
            let parent_generic = !db.def_type_params(parent_def).is_empty();
            let parent_raw = raw && parent_generic;
            collect_class(db, parent_def, parent_raw, &parent_list, out, seen_defs);
        }
    }
}

#[cfg(test)]
#[path = "../tests/class_hierarchy_tests.rs"]
mod tests;
