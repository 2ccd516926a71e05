//! Centralized limits and thresholds for the inference engine.
//!
//! Recursion limits for the solver (subtype checking, constraint reduction,
//! lub computation, etc.) are centralized in
//! `genus_solver::recursion::RecursionProfile` rather than here; the profiles
//! are the single source of truth for solver recursion. This module holds the
//! remaining shared capacity constants.

/// Pre-allocation size for string interner storage.
///
/// Most inference sessions touch a few hundred distinct names (class names,
/// type-parameter names, member names); 1024 avoids early reallocation
/// without wasting memory on small sessions.
pub const INTERNER_PREALLOC: usize = 1024;

/// Maximum nesting depth when rendering a type term for diagnostics.
///
/// Rendering substitutes `...` past this depth. Cyclic terms are handled by a
/// visited set before the depth limit is reached; this bound covers terms
/// that are merely very deep, not cyclic.
pub const MAX_DISPLAY_DEPTH: usize = 32;
