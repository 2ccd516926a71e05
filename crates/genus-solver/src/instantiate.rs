//! Type substitution: replacing declared parameters and inference variables
//! inside a term.
//!
//! Used for supertype parameterization (`List<E>` with `E := String`),
//! signature instantiation at a call site (`T` becomes a fresh inference
//! variable), and tentative-instantiation substitution during resolution.

use crate::db::QueryDatabase;
use crate::intern::TypeListBuffer;
use crate::types::{InferenceVar, TypeId, TypeKey, TypeParamId, WildcardBounds};
use rustc_hash::FxHashMap;

/// Maximum substitution depth; matched to the deepest term a realistic
/// signature produces. Exceeding it yields the error sentinel rather than a
/// stack overflow.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// A mapping from declared type parameters and/or inference variables to
/// replacement types.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    params: FxHashMap<TypeParamId, TypeId>,
    vars: FxHashMap<InferenceVar, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parameter substitution from parallel declaration/argument
    /// lists. Extra parameters (a raw-type use) are left unmapped.
    pub fn from_params(params: &[TypeParamId], args: &[TypeId]) -> Self {
        let mut subst = Self::new();
        for (&param, &arg) in params.iter().zip(args.iter()) {
            subst.params.insert(param, arg);
        }
        subst
    }

    pub fn insert_param(&mut self, param: TypeParamId, ty: TypeId) {
        self.params.insert(param, ty);
    }

    pub fn insert_var(&mut self, var: InferenceVar, ty: TypeId) {
        self.vars.insert(var, ty);
    }

    pub fn param(&self, param: TypeParamId) -> Option<TypeId> {
        self.params.get(&param).copied()
    }

    pub fn var(&self, var: InferenceVar) -> Option<TypeId> {
        self.vars.get(&var).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty() && self.vars.is_empty()
    }
}

/// Apply a substitution to a term, rebuilding interned structure as needed.
///
/// Captured type-variables are left untouched: their bounds live in the side
/// table and are fixed at capture-conversion time.
pub fn instantiate_type(db: &dyn QueryDatabase, ty: TypeId, subst: &TypeSubstitution) -> TypeId {
    if subst.is_empty() {
        return ty;
    }
    instantiate_at(db, ty, subst, 0)
}

fn instantiate_at(
    db: &dyn QueryDatabase,
    ty: TypeId,
    subst: &TypeSubstitution,
    depth: u32,
) -> TypeId {
    if depth > MAX_INSTANTIATION_DEPTH {
        return TypeId::ERROR;
    }

    let Some(key) = db.lookup(ty) else {
        return TypeId::ERROR;
    };

    match key {
        TypeKey::Intrinsic(_) | TypeKey::Captured(_) => ty,
        TypeKey::Param(p) => subst.param(p).unwrap_or(ty),
        TypeKey::Infer(v) => subst.var(v).unwrap_or(ty),
        TypeKey::Class(def, args) => {
            let list = db.type_list(args);
            if list.is_empty() {
                return ty;
            }
            let mut changed = false;
            let mut rebuilt = TypeListBuffer::with_capacity(list.len());
            for &arg in list.iter() {
                let new_arg = instantiate_at(db, arg, subst, depth + 1);
                changed |= new_arg != arg;
                rebuilt.push(new_arg);
            }
            if changed {
                db.class(def, rebuilt.into_vec())
            } else {
                ty
            }
        }
        TypeKey::Array(component) => {
            let new_component = instantiate_at(db, component, subst, depth + 1);
            if new_component == component {
                ty
            } else {
                db.array(new_component)
            }
        }
        TypeKey::Wildcard(w) => {
            let bounds = db.wildcard_bounds(w);
            let upper: Vec<TypeId> = bounds
                .upper
                .iter()
                .map(|&b| instantiate_at(db, b, subst, depth + 1))
                .collect();
            let lower: Vec<TypeId> = bounds
                .lower
                .iter()
                .map(|&b| instantiate_at(db, b, subst, depth + 1))
                .collect();
            if upper == bounds.upper && lower == bounds.lower {
                ty
            } else {
                db.wildcard(WildcardBounds { upper, lower })
            }
        }
        TypeKey::Intersection(members) => {
            let list = db.type_list(members);
            let mut changed = false;
            let mut rebuilt = Vec::with_capacity(list.len());
            for &member in list.iter() {
                let new_member = instantiate_at(db, member, subst, depth + 1);
                changed |= new_member != member;
                rebuilt.push(new_member);
            }
            if changed {
                db.intersection(rebuilt)
            } else {
                ty
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
