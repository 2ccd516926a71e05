//! Overload selection over generic callable signatures.
//!
//! Consumes the resolver as a black box per applicability test: each
//! candidate gets fresh inference variables, a derived bound set seeded from
//! the argument types, and a validation pass. Applicability tiers run in
//! order (loose, then variable-arity as a fallback; strict as a narrowing of
//! the loose set), and surviving candidates are ranked by pairwise
//! specificity.

use crate::bounds::{BoundSet, InferenceError};
use crate::class_hierarchy::is_nominal_ancestor;
use crate::compat::is_strictly_assignable;
use crate::constraint::{Constraint, ConstraintReducer};
use crate::db::QueryDatabase;
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::resolve::Resolver;
use crate::subtype::SubtypeChecker;
use crate::types::{CallableSignature, InferenceVar, TypeId, TypeKey, TypeParamId};
use crate::visitor::is_proper;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// Result of selecting among overload candidates.
#[derive(Clone, Debug)]
pub enum SelectionResult {
    /// A single most specific candidate was chosen.
    Selected {
        /// Index into the candidate slice.
        index: usize,
        /// Inferred type arguments of the winning candidate.
        type_arguments: IndexMap<TypeParamId, TypeId>,
        /// The candidate's return type with type arguments substituted.
        return_type: TypeId,
    },
    /// Several equally specific candidates survived every tie-break.
    Ambiguous { candidates: Vec<usize> },
    /// No candidate was applicable under any tier; per-candidate reasons
    /// are recorded in candidate order.
    NoApplicable { failures: Vec<(usize, InferenceError)> },
}

/// A successful inference for a single callable.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub type_arguments: IndexMap<TypeParamId, TypeId>,
    pub return_type: TypeId,
}

#[derive(Clone, Debug)]
struct Applicable {
    index: usize,
    /// Applicable without boxing on every proper argument pair.
    strict: bool,
    type_arguments: IndexMap<TypeParamId, TypeId>,
    return_type: TypeId,
}

/// Ranks overload candidates against concrete argument types.
pub struct OverloadEvaluator<'a> {
    db: &'a dyn QueryDatabase,
}

impl<'a> OverloadEvaluator<'a> {
    pub fn new(db: &'a dyn QueryDatabase) -> Self {
        OverloadEvaluator { db }
    }

    /// Infer type arguments for a single callable against argument types.
    pub fn infer_invocation(
        &self,
        sig: &CallableSignature,
        arg_types: &[TypeId],
    ) -> Result<Invocation, InferenceError> {
        let applicable = self.check_applicability(0, sig, arg_types, false)?;
        Ok(Invocation {
            type_arguments: applicable.type_arguments,
            return_type: applicable.return_type,
        })
    }

    /// Select the most specific applicable candidate.
    pub fn select(
        &self,
        candidates: &[CallableSignature],
        arg_types: &[TypeId],
    ) -> SelectionResult {
        let mut failures: Vec<(usize, InferenceError)> = Vec::new();
        let mut applicable: Vec<Applicable> = Vec::new();

        for (index, sig) in candidates.iter().enumerate() {
            match self.check_applicability(index, sig, arg_types, false) {
                Ok(a) => applicable.push(a),
                Err(err) => failures.push((index, err)),
            }
        }

        // Variable-arity applicability is a fallback tier, not a widening
        // of an already successful one.
        if applicable.is_empty() {
            for (index, sig) in candidates.iter().enumerate() {
                if !sig.variadic {
                    continue;
                }
                if let Ok(a) = self.check_applicability(index, sig, arg_types, true) {
                    applicable.push(a);
                }
            }
        }

        if applicable.is_empty() {
            return SelectionResult::NoApplicable { failures };
        }

        // Narrow by strict applicability, keeping the loose set as
        // fallback.
        let strict: Vec<Applicable> = applicable.iter().filter(|a| a.strict).cloned().collect();
        let pool = if strict.is_empty() { applicable } else { strict };
        debug!(pool = pool.len(), "ranking applicable candidates");

        let mut survivors = self.most_specific(candidates, pool);
        if survivors.len() == 1 {
            let winner = survivors.remove(0);
            return SelectionResult::Selected {
                index: winner.index,
                type_arguments: winner.type_arguments,
                return_type: winner.return_type,
            };
        }
        SelectionResult::Ambiguous {
            candidates: survivors.iter().map(|a| a.index).collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Applicability
    // -------------------------------------------------------------------------

    fn check_applicability(
        &self,
        index: usize,
        sig: &CallableSignature,
        arg_types: &[TypeId],
        variadic: bool,
    ) -> Result<Applicable, InferenceError> {
        trace!(index, variadic, "checking applicability");

        if variadic {
            if !sig.variadic || sig.params.is_empty() || arg_types.len() + 1 < sig.params.len() {
                return Err(InferenceError::ArityMismatch {
                    expected: sig.params.len(),
                    actual: arg_types.len(),
                });
            }
        } else if sig.params.len() != arg_types.len() {
            return Err(InferenceError::ArityMismatch {
                expected: sig.params.len(),
                actual: arg_types.len(),
            });
        }

        // Fresh inference variables stand in for the signature's type
        // parameters.
        let vars: Vec<InferenceVar> = sig
            .type_params
            .iter()
            .map(|_| self.db.fresh_inference_var())
            .collect();
        let mut subst = TypeSubstitution::new();
        for (&param, &var) in sig.type_params.iter().zip(vars.iter()) {
            subst.insert_param(param, self.db.infer(var));
        }

        let mut bound_set = BoundSet::new(vars.iter().copied());
        let mut reducer = ConstraintReducer::new(self.db);

        // Declared parameter bounds become upper bounds on the variables.
        for (&param, &var) in sig.type_params.iter().zip(vars.iter()) {
            if let Some(info) = self.db.type_param(param) {
                let var_ty = self.db.infer(var);
                for &declared in &info.bounds {
                    let bound = instantiate_type(self.db, declared, &subst);
                    bound_set.subtype(self.db, var_ty, bound);
                }
            }
        }

        let targets = self.parameter_targets(sig, arg_types.len(), variadic, &subst)?;

        for (&arg, &target) in arg_types.iter().zip(targets.iter()) {
            reducer.reduce(Constraint::LooseCompat(arg, target), &mut bound_set);
            if !bound_set.is_valid() {
                let (left, right) = bound_set.conflict().unwrap_or((arg, target));
                return Err(InferenceError::Unsatisfiable { left, right });
            }
        }

        // Hand the derived bound set to the resolver.
        let mut resolver = Resolver::new(self.db, &bound_set);
        let resolution = resolver.resolve_all(&vars);
        let mut instantiations: IndexMap<InferenceVar, TypeId> = IndexMap::new();
        for &var in &vars {
            match resolution.get(&var) {
                Some(Some(ty)) => {
                    instantiations.insert(var, *ty);
                }
                _ => {
                    return Err(resolver
                        .error()
                        .cloned()
                        .unwrap_or(InferenceError::Unresolved(var)));
                }
            }
        }

        let mut var_subst = TypeSubstitution::new();
        for (&var, &ty) in &instantiations {
            var_subst.insert_var(var, ty);
        }

        let strict = !variadic
            && arg_types.iter().zip(targets.iter()).all(|(&arg, &target)| {
                let resolved = instantiate_type(self.db, target, &var_subst);
                if is_proper(self.db, arg) && is_proper(self.db, resolved) {
                    is_strictly_assignable(self.db, arg, resolved)
                } else {
                    true
                }
            });

        let mut type_arguments: IndexMap<TypeParamId, TypeId> = IndexMap::new();
        for (&param, &var) in sig.type_params.iter().zip(vars.iter()) {
            if let Some(&ty) = instantiations.get(&var) {
                type_arguments.insert(param, ty);
            }
        }

        let return_type = instantiate_type(
            self.db,
            instantiate_type(self.db, sig.return_type, &subst),
            &var_subst,
        );

        Ok(Applicable {
            index,
            strict,
            type_arguments,
            return_type,
        })
    }

    /// The effective target type for each argument position.
    fn parameter_targets(
        &self,
        sig: &CallableSignature,
        arg_count: usize,
        variadic: bool,
        subst: &TypeSubstitution,
    ) -> Result<Vec<TypeId>, InferenceError> {
        let mut targets = Vec::with_capacity(arg_count);

        if variadic {
            let fixed = sig.params.len() - 1;
            let last = sig.params[fixed];
            let element = match self.db.lookup(last) {
                Some(TypeKey::Array(component)) => component,
                _ => {
                    return Err(InferenceError::ArityMismatch {
                        expected: sig.params.len(),
                        actual: arg_count,
                    });
                }
            };
            for i in 0..arg_count {
                let raw = if i < fixed { sig.params[i] } else { element };
                targets.push(instantiate_type(self.db, raw, subst));
            }
        } else {
            for &param in &sig.params {
                targets.push(instantiate_type(self.db, param, subst));
            }
        }

        Ok(targets)
    }

    // -------------------------------------------------------------------------
    // Specificity
    // -------------------------------------------------------------------------

    fn most_specific(
        &self,
        candidates: &[CallableSignature],
        pool: Vec<Applicable>,
    ) -> Vec<Applicable> {
        if pool.len() <= 1 {
            return pool;
        }

        let beats = |a: usize, b: usize| -> bool {
            self.more_specific(&candidates[a], &candidates[b])
                && !self.more_specific(&candidates[b], &candidates[a])
        };

        let maximal: Vec<Applicable> = pool
            .iter()
            .filter(|a| !pool.iter().any(|b| b.index != a.index && beats(b.index, a.index)))
            .cloned()
            .collect();
        let pool = if maximal.is_empty() { pool } else { maximal };
        if pool.len() == 1 {
            return pool;
        }

        // Remaining ties break by declaring-type specificity: a candidate
        // declared in a more derived type wins.
        let derived: Vec<Applicable> = pool
            .iter()
            .filter(|a| {
                !pool.iter().any(|b| {
                    let a_owner = candidates[a.index].declared_in;
                    let b_owner = candidates[b.index].declared_in;
                    a_owner != b_owner && is_nominal_ancestor(self.db, b_owner, a_owner)
                })
            })
            .cloned()
            .collect();

        if derived.is_empty() { pool } else { derived }
    }

    /// Whether `a` is more specific than `b`: `b` accepts every invocation
    /// that fits `a`, i.e. `b` is applicable to `a`'s parameter types.
    fn more_specific(&self, a: &CallableSignature, b: &CallableSignature) -> bool {
        if a.params.len() != b.params.len() {
            return false;
        }

        if !b.is_generic() {
            let mut checker = SubtypeChecker::new(self.db);
            return a
                .params
                .iter()
                .zip(b.params.iter())
                .all(|(&a_param, &b_param)| checker.is_subtype(a_param, b_param));
        }

        // Generic comparison: substitute `a`'s parameter types as target
        // constraints for `b` and check resolver validity.
        let vars: Vec<InferenceVar> = b
            .type_params
            .iter()
            .map(|_| self.db.fresh_inference_var())
            .collect();
        let mut subst = TypeSubstitution::new();
        for (&param, &var) in b.type_params.iter().zip(vars.iter()) {
            subst.insert_param(param, self.db.infer(var));
        }

        let mut bound_set = BoundSet::new(vars.iter().copied());
        let mut reducer = ConstraintReducer::new(self.db);

        for (&param, &var) in b.type_params.iter().zip(vars.iter()) {
            if let Some(info) = self.db.type_param(param) {
                let var_ty = self.db.infer(var);
                for &declared in &info.bounds {
                    let bound = instantiate_type(self.db, declared, &subst);
                    bound_set.subtype(self.db, var_ty, bound);
                }
            }
        }

        for (&a_param, &b_param) in a.params.iter().zip(b.params.iter()) {
            let target = instantiate_type(self.db, b_param, &subst);
            reducer.reduce(Constraint::Subtype(a_param, target), &mut bound_set);
            if !bound_set.is_valid() {
                return false;
            }
        }

        crate::resolve::validate(self.db, &bound_set, &vars)
    }
}

#[cfg(test)]
#[path = "../tests/overload_tests.rs"]
mod tests;
