//! Least upper bound and greatest lower bound over nominal hierarchies.
//!
//! `lub` intersects the parameterized supertype sets of its inputs and
//! merges differing parameterizations argument-wise ("least containing type
//! argument"). Self-referential hierarchies (`Integer <: Comparable<Integer>`)
//! make the textbook computation recurse on its own input set; the analyzer
//! guards this by registering an in-progress entry keyed on the *exact*
//! input set and answering the unbounded wildcard on re-entry.

use crate::bounds::InferenceError;
use crate::class_hierarchy::{is_nominal_ancestor, raw_supertypes};
use crate::compat::box_type;
use crate::db::QueryDatabase;
use crate::def::DefKind;
use crate::subtype::SubtypeChecker;
use crate::types::{TypeId, TypeKey, WildcardBounds};
use rustc_hash::FxHashMap;
use tracing::trace;

/// Computes lub/glb with a per-resolution cache.
///
/// The cache is owned by the resolution context, never global state; a new
/// analyzer starts empty.
pub struct LubAnalyzer<'a> {
    db: &'a dyn QueryDatabase,
    /// `None` marks a computation in progress (cycle break); `Some` is a
    /// finished result memoized for the exact input set.
    cache: FxHashMap<Vec<TypeId>, Option<TypeId>>,
}

impl<'a> LubAnalyzer<'a> {
    pub fn new(db: &'a dyn QueryDatabase) -> Self {
        LubAnalyzer {
            db,
            cache: FxHashMap::default(),
        }
    }

    /// Least upper bound of a non-empty set of proper types.
    pub fn lub(&mut self, types: &[TypeId]) -> Result<TypeId, InferenceError> {
        let mut distinct: Vec<TypeId> = Vec::with_capacity(types.len());
        for &ty in types {
            if !distinct.contains(&ty) {
                distinct.push(ty);
            }
        }
        if distinct.len() == 1 {
            return Ok(distinct[0]);
        }

        let mut canonical: Vec<TypeId> = Vec::with_capacity(distinct.len());
        for ty in distinct {
            // Null contributes nothing to a least upper bound.
            if ty == TypeId::NULL {
                continue;
            }
            // lub is defined over reference types; primitives enter boxed.
            let ty = box_type(self.db, ty).unwrap_or(ty);
            if !canonical.contains(&ty) {
                canonical.push(ty);
            }
        }
        canonical.sort_unstable();

        match canonical.len() {
            0 => return Ok(TypeId::NULL),
            1 => return Ok(canonical[0]),
            _ => {}
        }

        match self.cache.get(&canonical) {
            Some(Some(result)) => return Ok(*result),
            Some(None) => {
                // Already computing the lub of this exact set: break the
                // cycle with the unbounded wildcard.
                trace!("lub cycle broken with unbounded wildcard");
                return Ok(self.db.unbounded_wildcard());
            }
            None => {}
        }
        self.cache.insert(canonical.clone(), None);

        let result = self.compute_lub(&canonical)?;
        self.cache.insert(canonical, Some(result));
        Ok(result)
    }

    /// Greatest lower bound: the intersection of the inputs, validated for
    /// mutual assignability.
    pub fn glb(&mut self, types: &[TypeId]) -> Result<TypeId, InferenceError> {
        let mut members: Vec<TypeId> = Vec::with_capacity(types.len());
        for &ty in types {
            if !members.contains(&ty) {
                members.push(ty);
            }
        }
        if members.len() == 1 {
            return Ok(members[0]);
        }

        // Drop members that are supertypes of another member.
        let mut checker = SubtypeChecker::new(self.db);
        let mut retained: Vec<TypeId> = Vec::with_capacity(members.len());
        for &candidate in &members {
            let implied = members
                .iter()
                .any(|&other| other != candidate && checker.is_subtype(other, candidate));
            if !implied {
                retained.push(candidate);
            }
        }
        if retained.len() == 1 {
            return Ok(retained[0]);
        }

        // Whatever remains is pairwise unrelated; two class-like members
        // can then never share a common subtype, and a final class admits
        // no subtype that could pick up further members at all.
        for (i, &left) in retained.iter().enumerate() {
            for &right in &retained[i + 1..] {
                if self.is_class_like(left) && self.is_class_like(right) {
                    return Err(InferenceError::IncompatibleIntersection { left, right });
                }
                if self.is_final_class(left) || self.is_final_class(right) {
                    return Err(InferenceError::IncompatibleIntersection { left, right });
                }
            }
        }

        Ok(self.db.intersection(retained))
    }

    fn is_final_class(&self, ty: TypeId) -> bool {
        match self.db.lookup(ty) {
            Some(TypeKey::Class(def, _)) => self
                .db
                .definition(def)
                .is_some_and(|d| d.flags.contains(crate::def::DefFlags::FINAL)),
            _ => false,
        }
    }

    fn is_class_like(&self, ty: TypeId) -> bool {
        match self.db.lookup(ty) {
            Some(TypeKey::Array(_)) => true,
            Some(TypeKey::Class(def, _)) => {
                self.db.definition(def).is_some_and(|d| d.kind == DefKind::Class)
            }
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // lub computation
    // -------------------------------------------------------------------------

    fn compute_lub(&mut self, types: &[TypeId]) -> Result<TypeId, InferenceError> {
        // All-array inputs lub their component types.
        let components: Vec<TypeId> = types
            .iter()
            .filter_map(|&ty| match self.db.lookup(ty) {
                Some(TypeKey::Array(c)) => Some(c),
                _ => None,
            })
            .collect();
        if components.len() == types.len() {
            if components.iter().any(|c| c.is_primitive()) {
                // Distinct primitive-component arrays only share the array
                // interfaces.
                let core = self.db.core();
                return Ok(self
                    .db
                    .intersection(vec![core.serializable, core.cloneable]));
            }
            let component_lub = self.lub(&components)?;
            return Ok(self.db.array(component_lub));
        }

        // Candidate nominal supertypes, intersected across all inputs.
        let supertype_maps: Vec<_> = types.iter().map(|&ty| raw_supertypes(self.db, ty)).collect();
        let first = &supertype_maps[0];

        let mut common: Vec<crate::def::DefId> = first
            .keys()
            .filter(|def| supertype_maps[1..].iter().all(|m| m.contains_key(*def)))
            .copied()
            .collect();

        if common.is_empty() {
            return Ok(self.db.core().object);
        }

        // Discard candidates implied by a more specific retained candidate.
        let implied: Vec<bool> = common
            .iter()
            .map(|&def| {
                common
                    .iter()
                    .any(|&other| other != def && is_nominal_ancestor(self.db, other, def))
            })
            .collect();
        let mut retained: Vec<crate::def::DefId> = Vec::new();
        for (&def, &is_implied) in common.iter().zip(implied.iter()) {
            if !is_implied {
                retained.push(def);
            }
        }
        if retained.is_empty() {
            retained.push(common.remove(0));
        }

        let mut members: Vec<TypeId> = Vec::with_capacity(retained.len());
        for def in retained {
            let mut raw = false;
            let mut merged: Option<Vec<TypeId>> = None;
            for map in &supertype_maps {
                match map.get(&def) {
                    Some(Some(args)) if args.is_empty() => {
                        merged = Some(Vec::new());
                    }
                    Some(Some(args)) => {
                        merged = Some(match merged {
                            None => args.clone(),
                            Some(prev) => {
                                let mut combined = Vec::with_capacity(prev.len());
                                for (&a, &b) in prev.iter().zip(args.iter()) {
                                    combined.push(self.least_containing_argument(a, b)?);
                                }
                                combined
                            }
                        });
                    }
                    Some(None) | None => {
                        // Any raw view of the ancestor erases the whole
                        // parameterization.
                        raw = true;
                    }
                }
            }
            let args = if raw { Vec::new() } else { merged.unwrap_or_default() };
            members.push(self.db.class(def, args));
        }

        Ok(self.db.intersection(members))
    }

    /// Least containing type argument of two parameterization arguments.
    fn least_containing_argument(
        &mut self,
        a: TypeId,
        b: TypeId,
    ) -> Result<TypeId, InferenceError> {
        if a == b {
            return Ok(a);
        }

        let a_wild = self.wildcard_of(a);
        let b_wild = self.wildcard_of(b);

        let result = match (a_wild, b_wild) {
            (None, None) => self.extends_lub(vec![a, b])?,
            (Some(aw), None) => self.combine_with_concrete(&aw, b)?,
            (None, Some(bw)) => self.combine_with_concrete(&bw, a)?,
            (Some(aw), Some(bw)) => {
                if aw.is_unbounded() || bw.is_unbounded() {
                    self.db.unbounded_wildcard()
                } else if aw.is_extends() && bw.is_extends() {
                    let mut uppers = aw.upper.clone();
                    uppers.extend(bw.upper.iter().copied());
                    self.extends_lub(uppers)?
                } else if aw.is_super() && bw.is_super() {
                    let mut lowers = aw.lower.clone();
                    lowers.extend(bw.lower.iter().copied());
                    let lower = self.glb(&lowers)?;
                    self.db.wildcard(WildcardBounds::super_(vec![lower]))
                } else {
                    // extends vs super: unbounded unless the bounds are the
                    // identical type.
                    let (extends, supers) = if aw.is_extends() {
                        (aw, bw)
                    } else {
                        (bw, aw)
                    };
                    if extends.upper == supers.lower && extends.upper.len() == 1 {
                        extends.upper[0]
                    } else {
                        self.db.unbounded_wildcard()
                    }
                }
            }
        };
        Ok(result)
    }

    fn combine_with_concrete(
        &mut self,
        wild: &WildcardBounds,
        concrete: TypeId,
    ) -> Result<TypeId, InferenceError> {
        if wild.is_super() {
            let mut lowers = wild.lower.clone();
            lowers.push(concrete);
            let lower = self.glb(&lowers)?;
            Ok(self.db.wildcard(WildcardBounds::super_(vec![lower])))
        } else if wild.is_extends() {
            let mut uppers = wild.upper.clone();
            uppers.push(concrete);
            self.extends_lub(uppers)
        } else {
            Ok(self.db.unbounded_wildcard())
        }
    }

    fn extends_lub(&mut self, types: Vec<TypeId>) -> Result<TypeId, InferenceError> {
        let upper = self.lub(&types)?;
        // A cycle-broken inner lub already is a wildcard; `? extends Object`
        // also collapses to the unbounded form.
        if upper == self.db.core().object
            || matches!(self.db.lookup(upper), Some(TypeKey::Wildcard(_)))
        {
            return Ok(self.db.unbounded_wildcard());
        }
        Ok(self.db.wildcard(WildcardBounds::extends(vec![upper])))
    }

    fn wildcard_of(&self, ty: TypeId) -> Option<WildcardBounds> {
        match self.db.lookup(ty) {
            Some(TypeKey::Wildcard(w)) => Some((*self.db.wildcard_bounds(w)).clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/lub_tests.rs"]
mod tests;
