//! Constraint-based generic type-argument inference.
//!
//! Given a generic callable signature containing unresolved inference
//! variables and a set of argument types at a call site, the engine
//! determines a consistent instantiation for every variable, or proves none
//! exists. It uses:
//!
//! - **Interned type terms**: O(1) type equality via `TypeId` comparison
//! - **Bound sets**: per-variable equality/upper/lower bounds as the single
//!   mutable solution state, deep-copied for speculative candidate trials
//! - **Cycle guards**: every recursive traversal carries a visited set, so
//!   self-referential (F-bounded) generics terminate
//!
//! The pipeline: a call site builds a [`BoundSet`], seeds it with
//! constraints from argument/target types via [`ConstraintReducer`], hands
//! it to [`resolve`] for instantiations, which [`OverloadEvaluator`] uses to
//! rank candidates.

pub mod bootstrap;
pub mod bounds;
pub mod capture;
pub mod class_hierarchy;
pub mod compat;
pub mod constraint;
pub mod db;
pub mod def;
pub mod format;
pub mod instantiate;
mod intern;
pub mod lub;
pub mod overload;
pub mod recursion;
pub mod resolve;
pub mod subtype;
pub mod types;
pub mod visitor;

pub use bootstrap::CoreDefs;
pub use bounds::{
    Bound, BoundSet, CaptureConversion, CaptureItem, InferenceError, VariableBounds,
};
pub use capture::capture_conversion;
pub use class_hierarchy::{is_nominal_ancestor, raw_supertypes, supertype_parameterization};
pub use compat::{is_loosely_assignable, is_strictly_assignable, widens_to};
pub use constraint::{Constraint, ConstraintReducer};
pub use db::{QueryDatabase, TypeDatabase, TypeStore};
pub use def::{DefFlags, DefId, DefKind, DefinitionInfo, DefinitionStore};
pub use format::{TypeFormatter, format_type};
pub use instantiate::{TypeSubstitution, instantiate_type};
pub use intern::TypeInterner;
pub use lub::LubAnalyzer;
pub use overload::{Invocation, OverloadEvaluator, SelectionResult};
pub use resolve::{Resolver, resolve, validate};
pub use subtype::{SubtypeChecker, is_subtype_of};
pub use types::{
    CallableSignature, CaptureId, CapturedInfo, InferenceVar, IntrinsicKind, TypeId, TypeKey,
    TypeListId, TypeParamId, TypeParamInfo, WildcardBounds, WildcardId,
};
pub use visitor::{is_proper, mentioned_inference_variables};

// Test modules are loaded by their source files via #[path = "tests/..."]
// declarations; only cross-module integration tests live here.
#[cfg(test)]
#[path = "../tests/integration_tests.rs"]
mod integration_tests;
