//! Nominal subtyping for proper types.
//!
//! This is the oracle side of the engine: constraint reduction delegates
//! here whenever both terms are proper, and resolution uses it to check
//! instantiations against their bounds.
//!
//! Cycle handling is coinductive: re-encountering a `(sub, super)` pair that
//! is already being checked answers `true`, which is the fixed point that
//! makes F-bounded hierarchies (`Integer <: Comparable<Integer>`) terminate.

use crate::class_hierarchy::supertype_parameterization;
use crate::db::QueryDatabase;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::types::{TypeId, TypeKey, WildcardBounds};
use tracing::trace;

/// Checks nominal subtyping between proper types.
pub struct SubtypeChecker<'a> {
    db: &'a dyn QueryDatabase,
    guard: RecursionGuard<(TypeId, TypeId)>,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(db: &'a dyn QueryDatabase) -> Self {
        SubtypeChecker {
            db,
            guard: RecursionGuard::with_profile(RecursionProfile::SubtypeCheck),
        }
    }

    /// Whether `sub` is a nominal subtype of `sup`. Both must be proper.
    pub fn is_subtype(&mut self, sub: TypeId, sup: TypeId) -> bool {
        if sub == sup {
            return true;
        }
        // The error sentinel is compatible with everything so one malformed
        // term does not cascade into spurious failures.
        if sub == TypeId::ERROR || sup == TypeId::ERROR {
            return true;
        }
        if sub == TypeId::NULL {
            return self.is_reference(sup);
        }
        if sup == TypeId::NULL {
            return false;
        }
        if sub.is_primitive() || sup.is_primitive() || sub == TypeId::VOID || sup == TypeId::VOID {
            // Primitive subtyping is identity; widening lives in compat.
            return sub == sup;
        }

        match self.guard.enter((sub, sup)) {
            r if r.is_cycle() => return true,
            r if r.is_exceeded() => {
                trace!(?sub, ?sup, "subtype check exceeded recursion limits");
                return false;
            }
            _ => {}
        }
        let result = self.check(sub, sup);
        self.guard.leave((sub, sup));
        result
    }

    fn check(&mut self, sub: TypeId, sup: TypeId) -> bool {
        let sub_key = self.db.lookup(sub);
        let sup_key = self.db.lookup(sup);

        // Intersections distribute before everything else: any member on the
        // left suffices, every member on the right is required.
        if let Some(TypeKey::Intersection(members)) = sub_key {
            return self
                .db
                .type_list(members)
                .iter()
                .any(|&m| self.is_subtype(m, sup));
        }
        if let Some(TypeKey::Intersection(members)) = sup_key {
            return self
                .db
                .type_list(members)
                .iter()
                .all(|&m| self.is_subtype(sub, m));
        }

        match (sub_key, sup_key) {
            (Some(TypeKey::Captured(c)), _) => {
                let Some(info) = self.db.capture_info(c) else {
                    return false;
                };
                if info.upper.is_empty() {
                    self.is_subtype(self.db.core().object, sup)
                } else {
                    info.upper.iter().any(|&u| self.is_subtype(u, sup))
                }
            }
            (_, Some(TypeKey::Captured(c))) => {
                // A captured variable is only reached from below through its
                // lower bound.
                let Some(info) = self.db.capture_info(c) else {
                    return false;
                };
                info.lower.iter().any(|&l| self.is_subtype(sub, l))
            }
            (Some(TypeKey::Param(p)), _) => {
                let Some(info) = self.db.type_param(p) else {
                    return false;
                };
                if info.bounds.is_empty() {
                    self.is_subtype(self.db.core().object, sup)
                } else {
                    info.bounds.iter().any(|&b| self.is_subtype(b, sup))
                }
            }
            (_, Some(TypeKey::Param(_))) => false,
            (Some(TypeKey::Wildcard(w)), _) => {
                // A standalone wildcard behaves like its upper bound.
                let bounds = self.db.wildcard_bounds(w);
                if bounds.upper.is_empty() {
                    self.is_subtype(self.db.core().object, sup)
                } else {
                    bounds.upper.iter().any(|&u| self.is_subtype(u, sup))
                }
            }
            (_, Some(TypeKey::Wildcard(w))) => {
                let bounds = self.db.wildcard_bounds(w);
                bounds.lower.iter().any(|&l| self.is_subtype(sub, l))
            }
            (Some(TypeKey::Array(sc)), Some(TypeKey::Array(tc))) => {
                if sc.is_primitive() || tc.is_primitive() {
                    sc == tc
                } else {
                    self.is_subtype(sc, tc)
                }
            }
            (Some(TypeKey::Array(_)), Some(TypeKey::Class(def, _))) => {
                let core = self.db.core();
                def == core.object_def || def == core.cloneable_def || def == core.serializable_def
            }
            (Some(TypeKey::Class(..)), Some(TypeKey::Class(sup_def, sup_args))) => {
                self.check_class(sub, sup_def, self.db.type_list(sup_args).to_vec())
            }
            _ => false,
        }
    }

    fn check_class(&mut self, sub: TypeId, sup_def: crate::def::DefId, sup_args: Vec<TypeId>) -> bool {
        let Some(found) = supertype_parameterization(self.db, sub, sup_def) else {
            return false;
        };

        if sup_args.is_empty() {
            // Plain or raw supertype: ancestry is all that matters.
            return true;
        }

        match found {
            // A raw subtype reaches a parameterized supertype only through
            // unchecked conversion, which is not subtyping.
            None => false,
            Some(found_args) => {
                if found_args.len() != sup_args.len() {
                    return false;
                }
                found_args
                    .iter()
                    .zip(sup_args.iter())
                    .all(|(&s_arg, &t_arg)| self.argument_contains(t_arg, s_arg))
            }
        }
    }

    /// Type-argument containment: whether the set of types denoted by
    /// `inner` is contained in the set denoted by `outer`.
    pub fn argument_contains(&mut self, outer: TypeId, inner: TypeId) -> bool {
        if outer == inner {
            return true;
        }

        let outer_bounds = self.wildcard_of(outer);
        let inner_bounds = self.wildcard_of(inner);

        match (outer_bounds, inner_bounds) {
            // Concrete argument position is invariant.
            (None, _) => false,
            (Some(outer), None) => {
                let upper_ok = outer.upper.iter().all(|&u| self.is_subtype(inner, u));
                let lower_ok = outer.lower.iter().all(|&l| self.is_subtype(l, inner));
                upper_ok && lower_ok
            }
            (Some(outer), Some(inner)) => {
                let object = self.db.core().object;
                let outer_upper = if outer.upper.is_empty() {
                    vec![object]
                } else {
                    outer.upper.clone()
                };
                let inner_upper = if inner.upper.is_empty() {
                    vec![object]
                } else {
                    inner.upper.clone()
                };

                if !inner.lower.is_empty() {
                    // `? super S` fits `? super T` iff T <: S; it fits an
                    // extends-wildcard only when that wildcard reaches Object.
                    if !outer.lower.is_empty() {
                        return outer
                            .lower
                            .iter()
                            .all(|&t| inner.lower.iter().any(|&s| self.is_subtype(t, s)));
                    }
                    return outer_upper.iter().all(|&u| u == object);
                }

                if !outer.lower.is_empty() {
                    return false;
                }

                // extends vs extends: inner's bound below outer's bound.
                inner_upper
                    .iter()
                    .all(|&s| outer_upper.iter().any(|&t| self.is_subtype(s, t)))
            }
        }
    }

    fn wildcard_of(&self, ty: TypeId) -> Option<WildcardBounds> {
        match self.db.lookup(ty) {
            Some(TypeKey::Wildcard(w)) => Some((*self.db.wildcard_bounds(w)).clone()),
            _ => None,
        }
    }

    fn is_reference(&self, ty: TypeId) -> bool {
        matches!(
            self.db.lookup(ty),
            Some(
                TypeKey::Class(..)
                    | TypeKey::Array(_)
                    | TypeKey::Captured(_)
                    | TypeKey::Param(_)
                    | TypeKey::Wildcard(_)
                    | TypeKey::Intersection(_)
            )
        )
    }
}

/// One-shot convenience wrapper.
pub fn is_subtype_of(db: &dyn QueryDatabase, sub: TypeId, sup: TypeId) -> bool {
    SubtypeChecker::new(db).is_subtype(sub, sup)
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
