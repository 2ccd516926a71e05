//! Bound sets: the mutable solution state of an inference attempt.
//!
//! A `BoundSet` owns per-variable equality/upper/lower bound collections,
//! the active capture conversions, and a validity flag. It is the single
//! incorporation target for constraint reduction: reducers never return
//! booleans for tracked-variable cases, they record bounds or invoke
//! [`BoundSet::falsehood`].
//!
//! Bound sets are deep-copied (`Clone`) for speculative work — trying an
//! overload candidate, or validating resolvability — so shared bounds never
//! have to be re-derived when a trial fails.

use crate::db::QueryDatabase;
use crate::format::format_type;
use crate::types::{InferenceVar, TypeId};
use crate::visitor::{as_inference_var, is_proper};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

// =============================================================================
// Bound
// =============================================================================

/// A primitive fact accumulated about inference variables.
#[derive(Clone, Debug)]
pub enum Bound {
    /// The two terms denote the same type.
    Equality(TypeId, TypeId),
    /// The first term is a subtype of the second.
    Subtype(TypeId, TypeId),
    /// A wildcard capture relating fresh variables to source arguments.
    Capture(CaptureConversion),
    /// The bound set is unsatisfiable.
    Falsehood,
}

/// One captured argument position of a capture conversion.
#[derive(Clone, Debug)]
pub struct CaptureItem {
    /// The source type argument (a wildcard, or a plain argument).
    pub argument: TypeId,
    /// The declared parameter's bounds with the captured variables
    /// substituted for the declaration's own parameters.
    pub declared_bounds: Vec<TypeId>,
}

/// A capture conversion: fresh inference variables standing in for the
/// type arguments of a class type with wildcard arguments.
#[derive(Clone, Debug)]
pub struct CaptureConversion {
    /// The class type whose arguments were captured.
    pub source: TypeId,
    /// The resulting class type, with captured variables as arguments.
    pub captured: TypeId,
    /// Per-position mapping from fresh variable to its source argument.
    pub items: IndexMap<InferenceVar, CaptureItem>,
}

impl CaptureConversion {
    /// Whether `var` is one of this conversion's captured variables.
    pub fn captures(&self, var: InferenceVar) -> bool {
        self.items.contains_key(&var)
    }
}

// =============================================================================
// VariableBounds
// =============================================================================

/// The bounds accumulated for one inference variable.
#[derive(Clone, Debug, Default)]
pub struct VariableBounds {
    equalities: IndexSet<TypeId>,
    upper: IndexSet<TypeId>,
    lower: IndexSet<TypeId>,
    /// The unique proper member of `equalities`, if any.
    instantiation: Option<TypeId>,
}

impl VariableBounds {
    pub fn equalities(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.equalities.iter().copied()
    }

    pub fn upper_bounds(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.upper.iter().copied()
    }

    pub fn lower_bounds(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.lower.iter().copied()
    }

    pub fn instantiation(&self) -> Option<TypeId> {
        self.instantiation
    }

    pub fn is_empty(&self) -> bool {
        self.equalities.is_empty() && self.upper.is_empty() && self.lower.is_empty()
    }
}

// =============================================================================
// InferenceError
// =============================================================================

/// Typed inference failure, carrying the offending terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InferenceError {
    /// Two terms could not be reconciled.
    Unsatisfiable { left: TypeId, right: TypeId },
    /// An instantiation violated one of the variable's proper bounds.
    BoundsViolation {
        var: InferenceVar,
        instantiation: TypeId,
        bound: TypeId,
    },
    /// The variable could not be instantiated.
    Unresolved(InferenceVar),
    /// Resolution of a capture-converted variable fell off the supported
    /// path (the fresh-placeholder branch is deliberately unimplemented).
    UnsupportedCapture(InferenceVar),
    /// Greatest-lower-bound of two mutually unassignable classes.
    IncompatibleIntersection { left: TypeId, right: TypeId },
    /// Argument count does not fit the signature.
    ArityMismatch { expected: usize, actual: usize },
}

impl InferenceError {
    /// Render a human-readable diagnostic.
    pub fn render(&self, db: &dyn QueryDatabase) -> String {
        match self {
            InferenceError::Unsatisfiable { left, right } => format!(
                "incompatible constraints between `{}` and `{}`",
                format_type(db, *left),
                format_type(db, *right)
            ),
            InferenceError::BoundsViolation {
                var,
                instantiation,
                bound,
            } => format!(
                "inferred `{}` for α{} but it does not satisfy bound `{}`",
                format_type(db, *instantiation),
                var.0,
                format_type(db, *bound)
            ),
            InferenceError::Unresolved(var) => {
                format!("no instantiation found for α{}", var.0)
            }
            InferenceError::UnsupportedCapture(var) => format!(
                "unsupported: capture-dependent minimal set involving α{}",
                var.0
            ),
            InferenceError::IncompatibleIntersection { left, right } => format!(
                "`{}` and `{}` cannot be intersected",
                format_type(db, *left),
                format_type(db, *right)
            ),
            InferenceError::ArityMismatch { expected, actual } => {
                format!("expected {expected} arguments, found {actual}")
            }
        }
    }
}

// =============================================================================
// BoundSet
// =============================================================================

/// The mutable solution state for one inference attempt.
#[derive(Clone, Debug)]
pub struct BoundSet {
    bounds: IndexMap<InferenceVar, VariableBounds>,
    captures: Vec<CaptureConversion>,
    valid: bool,
    /// First conflicting pair seen, for diagnostics.
    conflict: Option<(TypeId, TypeId)>,
}

impl BoundSet {
    /// Create a bound set tracking the given variables.
    pub fn new(vars: impl IntoIterator<Item = InferenceVar>) -> Self {
        let mut bounds = IndexMap::new();
        for var in vars {
            bounds.entry(var).or_insert_with(VariableBounds::default);
        }
        BoundSet {
            bounds,
            captures: Vec::new(),
            valid: true,
            conflict: None,
        }
    }

    /// Track an additional variable (used by capture conversion).
    pub fn add_variable(&mut self, var: InferenceVar) {
        self.bounds.entry(var).or_insert_with(VariableBounds::default);
    }

    /// Whether the set tracks `var`.
    pub fn is_tracked(&self, var: InferenceVar) -> bool {
        self.bounds.contains_key(&var)
    }

    /// The tracked variables, in insertion order.
    pub fn variables(&self) -> impl Iterator<Item = InferenceVar> + '_ {
        self.bounds.keys().copied()
    }

    /// Whether no falsehood has been incorporated.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The first conflicting pair, if the set is invalid.
    pub fn conflict(&self) -> Option<(TypeId, TypeId)> {
        self.conflict
    }

    /// Bounds recorded for a tracked variable.
    pub fn bounds_on(&self, var: InferenceVar) -> Option<&VariableBounds> {
        self.bounds.get(&var)
    }

    /// The unique proper equality of a variable, if any.
    pub fn instantiation(&self, var: InferenceVar) -> Option<TypeId> {
        self.bounds.get(&var).and_then(|b| b.instantiation)
    }

    /// Variables whose equalities contain exactly one proper type.
    pub fn instantiated_variables(&self) -> Vec<(InferenceVar, TypeId)> {
        self.bounds
            .iter()
            .filter_map(|(&var, b)| b.instantiation.map(|ty| (var, ty)))
            .collect()
    }

    /// The active capture conversions.
    pub fn captures(&self) -> &[CaptureConversion] {
        &self.captures
    }

    /// The capture conversion that introduced `var`, if any.
    pub fn capture_for(&self, var: InferenceVar) -> Option<&CaptureConversion> {
        self.captures.iter().find(|c| c.captures(var))
    }

    /// Incorporate a single bound.
    pub fn incorporate(&mut self, db: &dyn QueryDatabase, bound: Bound) {
        match bound {
            Bound::Equality(a, b) => self.equality(db, a, b),
            Bound::Subtype(sub, sup) => self.subtype(db, sub, sup),
            Bound::Capture(conv) => self.capture(db, conv),
            Bound::Falsehood => self.falsehood(),
        }
    }

    /// Incorporate `a = b`.
    ///
    /// If either side is a tracked inference variable, the other side is
    /// recorded as an equality bound on it (both directions if both are
    /// tracked, with existing bounds cross-propagated). No-op if neither
    /// side is tracked.
    pub fn equality(&mut self, db: &dyn QueryDatabase, a: TypeId, b: TypeId) {
        if a == b {
            return;
        }

        let var_a = as_inference_var(db, a).filter(|v| self.is_tracked(*v));
        let var_b = as_inference_var(db, b).filter(|v| self.is_tracked(*v));

        trace!(?a, ?b, "incorporate equality");

        match (var_a, var_b) {
            (Some(alpha), Some(beta)) => {
                self.insert_equality(db, alpha, b);
                self.insert_equality(db, beta, a);
                self.merge_variable_bounds(db, alpha, beta);
            }
            (Some(alpha), None) => self.insert_equality(db, alpha, b),
            (None, Some(beta)) => self.insert_equality(db, beta, a),
            (None, None) => {}
        }
    }

    /// Incorporate `sub <: sup`.
    pub fn subtype(&mut self, db: &dyn QueryDatabase, sub: TypeId, sup: TypeId) {
        if sub == sup {
            return;
        }

        trace!(?sub, ?sup, "incorporate subtype");

        if let Some(alpha) = as_inference_var(db, sub).filter(|v| self.is_tracked(*v)) {
            self.insert_upper(db, alpha, sup);
        }
        if let Some(beta) = as_inference_var(db, sup).filter(|v| self.is_tracked(*v)) {
            self.insert_lower(db, beta, sub);
        }
    }

    /// Incorporate a capture conversion.
    ///
    /// For each captured variable whose source argument is a wildcard, the
    /// wildcard's own bounds and the declared parameter bounds become bounds
    /// of the variable. A non-wildcard source argument reduces to a plain
    /// equality.
    pub fn capture(&mut self, db: &dyn QueryDatabase, conv: CaptureConversion) {
        debug!(source = ?conv.source, vars = conv.items.len(), "incorporate capture conversion");

        for (&var, item) in &conv.items {
            self.add_variable(var);

            let wildcard = match db.lookup(item.argument) {
                Some(crate::types::TypeKey::Wildcard(w)) => Some(db.wildcard_bounds(w)),
                _ => None,
            };

            match wildcard {
                Some(bounds) => {
                    for &upper in bounds.upper.iter().chain(item.declared_bounds.iter()) {
                        self.insert_upper(db, var, upper);
                    }
                    for &lower in bounds.lower.iter() {
                        self.insert_lower(db, var, lower);
                    }
                }
                None => {
                    let var_ty = db.infer(var);
                    self.equality(db, var_ty, item.argument);
                }
            }
        }

        self.captures.push(conv);
    }

    /// Incorporate falsehood: the set becomes permanently invalid.
    pub fn falsehood(&mut self) {
        debug!("incorporate falsehood");
        self.valid = false;
    }

    /// Falsehood with the conflicting pair recorded for diagnostics.
    pub fn falsehood_between(&mut self, left: TypeId, right: TypeId) {
        if self.conflict.is_none() {
            self.conflict = Some((left, right));
        }
        self.falsehood();
    }

    // -------------------------------------------------------------------------
    // Internal insertion with propagation
    // -------------------------------------------------------------------------

    /// Tracked variables currently known equal to `var`.
    fn equal_variables(&self, db: &dyn QueryDatabase, var: InferenceVar) -> Vec<InferenceVar> {
        let Some(bounds) = self.bounds.get(&var) else {
            return Vec::new();
        };
        bounds
            .equalities
            .iter()
            .filter_map(|&ty| as_inference_var(db, ty))
            .filter(|v| self.is_tracked(*v))
            .collect()
    }

    fn insert_equality(&mut self, db: &dyn QueryDatabase, var: InferenceVar, ty: TypeId) {
        let var_ty = db.infer(var);
        if ty == var_ty {
            return;
        }

        let peers = self.equal_variables(db, var);
        let proper = is_proper(db, ty);
        let mut conflict = None;
        {
            let Some(bounds) = self.bounds.get_mut(&var) else {
                return;
            };
            if !bounds.equalities.insert(ty) {
                return;
            }
            if proper {
                match bounds.instantiation {
                    None => bounds.instantiation = Some(ty),
                    Some(existing) if existing != ty => {
                        // Two distinct proper equalities can never both hold.
                        conflict = Some((existing, ty));
                    }
                    Some(_) => {}
                }
            }
        }
        if let Some((left, right)) = conflict {
            self.falsehood_between(left, right);
            return;
        }

        // One-hop propagation to variables known equal to `var`.
        for peer in peers {
            if db.infer(peer) != ty {
                if let Some(peer_bounds) = self.bounds.get_mut(&peer) {
                    peer_bounds.equalities.insert(ty);
                    if proper && peer_bounds.instantiation.is_none() {
                        peer_bounds.instantiation = Some(ty);
                    }
                }
            }
        }
    }

    fn insert_upper(&mut self, db: &dyn QueryDatabase, var: InferenceVar, ty: TypeId) {
        let var_ty = db.infer(var);
        if ty == var_ty {
            return;
        }
        let peers = self.equal_variables(db, var);
        if let Some(bounds) = self.bounds.get_mut(&var) {
            bounds.upper.insert(ty);
        }
        for peer in peers {
            if let Some(peer_bounds) = self.bounds.get_mut(&peer) {
                peer_bounds.upper.insert(ty);
            }
        }
        // A bound relating two tracked variables is recorded symmetrically.
        if let Some(other) = as_inference_var(db, ty).filter(|v| self.is_tracked(*v)) {
            if let Some(other_bounds) = self.bounds.get_mut(&other) {
                other_bounds.lower.insert(var_ty);
            }
        }
    }

    fn insert_lower(&mut self, db: &dyn QueryDatabase, var: InferenceVar, ty: TypeId) {
        let var_ty = db.infer(var);
        if ty == var_ty {
            return;
        }
        let peers = self.equal_variables(db, var);
        if let Some(bounds) = self.bounds.get_mut(&var) {
            bounds.lower.insert(ty);
        }
        for peer in peers {
            if let Some(peer_bounds) = self.bounds.get_mut(&peer) {
                peer_bounds.lower.insert(ty);
            }
        }
        if let Some(other) = as_inference_var(db, ty).filter(|v| self.is_tracked(*v)) {
            if let Some(other_bounds) = self.bounds.get_mut(&other) {
                other_bounds.upper.insert(var_ty);
            }
        }
    }

    /// Cross-propagate all bounds between two newly equated variables.
    fn merge_variable_bounds(&mut self, db: &dyn QueryDatabase, alpha: InferenceVar, beta: InferenceVar) {
        let Some(alpha_bounds) = self.bounds.get(&alpha).cloned() else {
            return;
        };
        let Some(beta_bounds) = self.bounds.get(&beta).cloned() else {
            return;
        };

        let alpha_ty = db.infer(alpha);
        let beta_ty = db.infer(beta);

        for ty in alpha_bounds.upper {
            if ty != beta_ty {
                self.insert_upper(db, beta, ty);
            }
        }
        for ty in alpha_bounds.lower {
            if ty != beta_ty {
                self.insert_lower(db, beta, ty);
            }
        }
        for ty in alpha_bounds.equalities {
            if ty != beta_ty {
                self.insert_equality(db, beta, ty);
            }
        }
        for ty in beta_bounds.upper {
            if ty != alpha_ty {
                self.insert_upper(db, alpha, ty);
            }
        }
        for ty in beta_bounds.lower {
            if ty != alpha_ty {
                self.insert_lower(db, alpha, ty);
            }
        }
        for ty in beta_bounds.equalities {
            if ty != alpha_ty {
                self.insert_equality(db, alpha, ty);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/bounds_tests.rs"]
mod tests;
