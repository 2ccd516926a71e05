//! Constraint formulas and their reduction into bound-set operations.
//!
//! A constraint is a compatibility requirement between two type terms. The
//! reducer takes it apart by structural cases until only primitive bounds
//! remain, recursing into sub-constraints along the way. Unsatisfiability is
//! never signalled by a return value: the reducer invokes
//! [`BoundSet::falsehood_between`] so the bound set stays the single source
//! of truth for solver state.
//!
//! Reduction is coinductive: re-entering an in-flight `(kind, lhs, rhs)`
//! pair succeeds immediately, which keeps recursive containment constraints
//! over F-bounded types terminating.

use crate::bounds::BoundSet;
use crate::class_hierarchy::{raw_supertypes, supertype_parameterization};
use crate::compat::{box_type, is_loosely_assignable};
use crate::db::QueryDatabase;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::subtype::SubtypeChecker;
use crate::types::{TypeId, TypeKey, WildcardBounds};
use crate::visitor::{as_inference_var, is_proper};
use tracing::trace;

/// A high-level compatibility requirement between two type terms.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// The first term is loosely compatible with the second
    /// (method-invocation conversion).
    LooseCompat(TypeId, TypeId),
    /// The first term is a subtype of the second.
    Subtype(TypeId, TypeId),
    /// The first type argument is contained by the second.
    Contained(TypeId, TypeId),
    /// The two terms denote the same type.
    Equal(TypeId, TypeId),
}

impl Constraint {
    fn tag(self) -> u8 {
        match self {
            Constraint::LooseCompat(..) => 0,
            Constraint::Subtype(..) => 1,
            Constraint::Contained(..) => 2,
            Constraint::Equal(..) => 3,
        }
    }

    fn operands(self) -> (TypeId, TypeId) {
        match self {
            Constraint::LooseCompat(a, b)
            | Constraint::Subtype(a, b)
            | Constraint::Contained(a, b)
            | Constraint::Equal(a, b) => (a, b),
        }
    }
}

/// Reduces constraint formulas into bound-set operations.
pub struct ConstraintReducer<'a> {
    db: &'a dyn QueryDatabase,
    guard: RecursionGuard<(u8, TypeId, TypeId)>,
}

impl<'a> ConstraintReducer<'a> {
    pub fn new(db: &'a dyn QueryDatabase) -> Self {
        ConstraintReducer {
            db,
            guard: RecursionGuard::with_profile(RecursionProfile::ConstraintReduction),
        }
    }

    /// Reduce one constraint into `bounds`.
    pub fn reduce(&mut self, constraint: Constraint, bounds: &mut BoundSet) {
        if !bounds.is_valid() {
            return;
        }

        let (lhs, rhs) = constraint.operands();
        let key = (constraint.tag(), lhs, rhs);
        match self.guard.enter(key) {
            r if r.is_cycle() => return,
            r if r.is_exceeded() => {
                trace!(?constraint, "constraint reduction exceeded recursion limits");
                bounds.falsehood_between(lhs, rhs);
                return;
            }
            _ => {}
        }

        match constraint {
            Constraint::LooseCompat(s, t) => self.reduce_loose(s, t, bounds),
            Constraint::Subtype(s, t) => self.reduce_subtype(s, t, bounds),
            Constraint::Contained(s, t) => self.reduce_contained(s, t, bounds),
            Constraint::Equal(s, t) => self.reduce_equal(s, t, bounds),
        }

        self.guard.leave(key);
    }

    // -------------------------------------------------------------------------
    // Loose compatibility
    // -------------------------------------------------------------------------

    fn reduce_loose(&mut self, s: TypeId, t: TypeId, bounds: &mut BoundSet) {
        if is_proper(self.db, s) && is_proper(self.db, t) {
            if !is_loosely_assignable(self.db, s, t) {
                bounds.falsehood_between(s, t);
            }
            return;
        }

        if s.is_primitive() {
            if let Some(boxed) = box_type(self.db, s) {
                self.reduce(Constraint::LooseCompat(boxed, t), bounds);
            } else {
                bounds.falsehood_between(s, t);
            }
            return;
        }

        if t.is_primitive() {
            if let Some(boxed) = box_type(self.db, t) {
                self.reduce(Constraint::Equal(s, boxed), bounds);
            } else {
                bounds.falsehood_between(s, t);
            }
            return;
        }

        // Unchecked conversion: only the raw erasure of a parameterized
        // target is a supertype of the (proper) source.
        if is_proper(self.db, s) {
            if let Some(TypeKey::Class(def, args)) = self.db.lookup(t) {
                if !self.db.type_list(args).is_empty() {
                    if let Some(None) = supertype_parameterization(self.db, s, def) {
                        return;
                    }
                }
            }
        }

        self.reduce_subtype(s, t, bounds);
    }

    // -------------------------------------------------------------------------
    // Subtyping
    // -------------------------------------------------------------------------

    fn reduce_subtype(&mut self, s: TypeId, t: TypeId, bounds: &mut BoundSet) {
        if s == t {
            return;
        }

        if is_proper(self.db, s) && is_proper(self.db, t) {
            if !SubtypeChecker::new(self.db).is_subtype(s, t) {
                bounds.falsehood_between(s, t);
            }
            return;
        }

        // The null type is a subtype of everything and a supertype of
        // nothing.
        if s == TypeId::NULL {
            return;
        }
        if t == TypeId::NULL {
            bounds.falsehood_between(s, t);
            return;
        }

        // A tracked inference variable on either side becomes a primitive
        // bound, pairing the two variables when both sides are tracked.
        if as_inference_var(self.db, s).is_some() || as_inference_var(self.db, t).is_some() {
            bounds.subtype(self.db, s, t);
            return;
        }

        // Intersections distribute: any-of on the left, all-of on the right.
        if let Some(TypeKey::Intersection(members)) = self.db.lookup(s) {
            let members = self.db.type_list(members);
            let candidates: Vec<Constraint> =
                members.iter().map(|&m| Constraint::Subtype(m, t)).collect();
            self.reduce_any(&candidates, s, t, bounds);
            return;
        }
        if let Some(TypeKey::Intersection(members)) = self.db.lookup(t) {
            for &member in self.db.type_list(members).iter() {
                self.reduce(Constraint::Subtype(s, member), bounds);
            }
            return;
        }

        // Captured variables and declared parameters on the left reduce
        // through their upper bounds.
        match self.db.lookup(s) {
            Some(TypeKey::Captured(c)) => {
                let uppers = self
                    .db
                    .capture_info(c)
                    .map(|info| info.upper)
                    .unwrap_or_default();
                self.reduce_via_uppers(&uppers, s, t, bounds);
                return;
            }
            Some(TypeKey::Param(p)) => {
                let uppers = self
                    .db
                    .type_param(p)
                    .map(|info| info.bounds)
                    .unwrap_or_default();
                self.reduce_via_uppers(&uppers, s, t, bounds);
                return;
            }
            Some(TypeKey::Wildcard(w)) => {
                let uppers = self.db.wildcard_bounds(w).upper.clone();
                self.reduce_via_uppers(&uppers, s, t, bounds);
                return;
            }
            _ => {}
        }

        match self.db.lookup(t) {
            Some(TypeKey::Class(def, args)) => {
                let t_args = self.db.type_list(args);
                if t_args.is_empty() {
                    // Plain (or raw) nominal target: ancestry of the erasure
                    // is all that matters.
                    if !raw_supertypes(self.db, s).contains_key(&def) {
                        bounds.falsehood_between(s, t);
                    }
                    return;
                }
                match supertype_parameterization(self.db, s, def) {
                    None => bounds.falsehood_between(s, t),
                    // A raw source reaches a parameterized target only via
                    // unchecked conversion, which subtyping does not grant.
                    Some(None) => bounds.falsehood_between(s, t),
                    Some(Some(s_args)) => {
                        if s_args.len() != t_args.len() {
                            bounds.falsehood_between(s, t);
                            return;
                        }
                        for (&s_arg, &t_arg) in s_args.iter().zip(t_args.iter()) {
                            self.reduce(Constraint::Contained(s_arg, t_arg), bounds);
                        }
                    }
                }
            }
            Some(TypeKey::Array(t_component)) => match self.db.lookup(s) {
                Some(TypeKey::Array(s_component)) => {
                    if s_component.is_primitive() || t_component.is_primitive() {
                        if s_component != t_component {
                            bounds.falsehood_between(s, t);
                        }
                    } else {
                        self.reduce(Constraint::Subtype(s_component, t_component), bounds);
                    }
                }
                _ => bounds.falsehood_between(s, t),
            },
            Some(TypeKey::Captured(c)) => {
                // Only reachable from below through the capture's lower
                // bounds.
                let lowers = self
                    .db
                    .capture_info(c)
                    .map(|info| info.lower)
                    .unwrap_or_default();
                if lowers.is_empty() {
                    bounds.falsehood_between(s, t);
                } else {
                    let candidates: Vec<Constraint> = lowers
                        .iter()
                        .map(|&l| Constraint::Subtype(s, l))
                        .collect();
                    self.reduce_any(&candidates, s, t, bounds);
                }
            }
            _ => bounds.falsehood_between(s, t),
        }
    }

    fn reduce_via_uppers(
        &mut self,
        uppers: &[TypeId],
        s: TypeId,
        t: TypeId,
        bounds: &mut BoundSet,
    ) {
        if uppers.is_empty() {
            self.reduce(Constraint::Subtype(self.db.core().object, t), bounds);
            return;
        }
        let candidates: Vec<Constraint> =
            uppers.iter().map(|&u| Constraint::Subtype(u, t)).collect();
        self.reduce_any(&candidates, s, t, bounds);
    }

    /// Any-of reduction: succeed if any candidate reduces without
    /// falsehood, trying each against a scratch copy of the bound set.
    fn reduce_any(
        &mut self,
        candidates: &[Constraint],
        s: TypeId,
        t: TypeId,
        bounds: &mut BoundSet,
    ) {
        for &candidate in candidates {
            let mut trial = bounds.clone();
            self.reduce(candidate, &mut trial);
            if trial.is_valid() {
                *bounds = trial;
                return;
            }
        }
        bounds.falsehood_between(s, t);
    }

    // -------------------------------------------------------------------------
    // Containment
    // -------------------------------------------------------------------------

    fn reduce_contained(&mut self, s: TypeId, t: TypeId, bounds: &mut BoundSet) {
        // Deliberate deviation from the textbook reduction: an inference
        // variable that already has an instantiation is replaced by it
        // before dispatch, which breaks recursive containment constraints
        // over mutually-referential variables.
        let s = self.resolve_instantiated(s, bounds);
        let t = self.resolve_instantiated(t, bounds);

        if s == t {
            return;
        }

        let t_wild = self.wildcard_of(t);
        let s_wild = self.wildcard_of(s);

        let Some(t_bounds) = t_wild else {
            // A non-wildcard argument position is invariant.
            if s_wild.is_some() {
                bounds.falsehood_between(s, t);
            } else {
                self.reduce(Constraint::Equal(s, t), bounds);
            }
            return;
        };

        if t_bounds.is_unbounded() {
            return;
        }

        let object = self.db.core().object;

        if t_bounds.is_super() {
            // `? super T'` contains S iff T' <: S; for a super-wildcard S,
            // iff T' <: S'.
            match s_wild {
                None => {
                    for &t_lower in &t_bounds.lower {
                        self.reduce(Constraint::Subtype(t_lower, s), bounds);
                    }
                }
                Some(s_bounds) if s_bounds.is_super() => {
                    for &t_lower in &t_bounds.lower {
                        for &s_lower in &s_bounds.lower {
                            self.reduce(Constraint::Subtype(t_lower, s_lower), bounds);
                        }
                    }
                }
                Some(_) => bounds.falsehood_between(s, t),
            }
            return;
        }

        // `? extends T'`.
        match s_wild {
            None => {
                for &t_upper in &t_bounds.upper {
                    self.reduce(Constraint::Subtype(s, t_upper), bounds);
                }
            }
            Some(s_bounds) if s_bounds.is_extends() => {
                let subject = if s_bounds.upper.len() == 1 {
                    s_bounds.upper[0]
                } else {
                    self.db.intersection(s_bounds.upper.clone())
                };
                for &t_upper in &t_bounds.upper {
                    self.reduce(Constraint::Subtype(subject, t_upper), bounds);
                }
            }
            Some(s_bounds) if s_bounds.is_unbounded() => {
                // `? extends T'` contains `?` only when T' reaches Object.
                for &t_upper in &t_bounds.upper {
                    self.reduce(Constraint::Subtype(object, t_upper), bounds);
                }
            }
            Some(_) => {
                // A super-wildcard fits under `? extends T'` only when T'
                // reaches Object.
                for &t_upper in &t_bounds.upper {
                    self.reduce(Constraint::Subtype(object, t_upper), bounds);
                }
            }
        }
    }

    // -------------------------------------------------------------------------
    // Equality
    // -------------------------------------------------------------------------

    fn reduce_equal(&mut self, s: TypeId, t: TypeId, bounds: &mut BoundSet) {
        if s == t {
            return;
        }

        let s_wild = self.wildcard_of(s);
        let t_wild = self.wildcard_of(t);

        if let (Some(sb), Some(tb)) = (&s_wild, &t_wild) {
            self.reduce_wildcard_equal(sb, tb, s, t, bounds);
            return;
        }
        if s_wild.is_some() || t_wild.is_some() {
            // A wildcard never equals a concrete type.
            bounds.falsehood_between(s, t);
            return;
        }

        if is_proper(self.db, s) && is_proper(self.db, t) {
            // Interning makes structural identity an id comparison, and
            // `s == t` was already ruled out.
            bounds.falsehood_between(s, t);
            return;
        }

        if as_inference_var(self.db, s).is_some() || as_inference_var(self.db, t).is_some() {
            bounds.equality(self.db, s, t);
            return;
        }

        match (self.db.lookup(s), self.db.lookup(t)) {
            (Some(TypeKey::Array(sc)), Some(TypeKey::Array(tc))) => {
                self.reduce(Constraint::Equal(sc, tc), bounds);
            }
            (Some(TypeKey::Class(s_def, s_args)), Some(TypeKey::Class(t_def, t_args)))
                if s_def == t_def =>
            {
                let s_list = self.db.type_list(s_args);
                let t_list = self.db.type_list(t_args);
                if s_list.len() != t_list.len() {
                    bounds.falsehood_between(s, t);
                    return;
                }
                for (&s_arg, &t_arg) in s_list.iter().zip(t_list.iter()) {
                    self.reduce(Constraint::Equal(s_arg, t_arg), bounds);
                }
            }
            _ => bounds.falsehood_between(s, t),
        }
    }

    fn reduce_wildcard_equal(
        &mut self,
        sb: &WildcardBounds,
        tb: &WildcardBounds,
        s: TypeId,
        t: TypeId,
        bounds: &mut BoundSet,
    ) {
        let object = self.db.core().object;

        if sb.is_super() || tb.is_super() {
            if !(sb.is_super() && tb.is_super()) {
                bounds.falsehood_between(s, t);
                return;
            }
            if sb.lower.len() != tb.lower.len() {
                bounds.falsehood_between(s, t);
                return;
            }
            for (&s_lower, &t_lower) in sb.lower.iter().zip(tb.lower.iter()) {
                self.reduce(Constraint::Equal(s_lower, t_lower), bounds);
            }
            return;
        }

        // Both are unbounded or extends; an unbounded wildcard carries the
        // implicit `Object` upper bound.
        let s_upper = if sb.upper.is_empty() { vec![object] } else { sb.upper.clone() };
        let t_upper = if tb.upper.is_empty() { vec![object] } else { tb.upper.clone() };
        if s_upper.len() != t_upper.len() {
            bounds.falsehood_between(s, t);
            return;
        }
        for (&su, &tu) in s_upper.iter().zip(t_upper.iter()) {
            self.reduce(Constraint::Equal(su, tu), bounds);
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn resolve_instantiated(&self, ty: TypeId, bounds: &BoundSet) -> TypeId {
        match as_inference_var(self.db, ty) {
            Some(var) => bounds.instantiation(var).unwrap_or(ty),
            None => ty,
        }
    }

    fn wildcard_of(&self, ty: TypeId) -> Option<WildcardBounds> {
        match self.db.lookup(ty) {
            Some(TypeKey::Wildcard(w)) => Some((*self.db.wildcard_bounds(w)).clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../tests/constraint_tests.rs"]
mod tests;
