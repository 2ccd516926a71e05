//! Definition identifiers and storage for the solver.
//!
//! `DefId` is a solver-owned handle for a nominal class or interface
//! definition. Definitions carry the generic declaration data the engine
//! needs: type parameters, the superclass, and implemented interfaces.
//!
//! Two further side tables live here because their entries must be
//! constructible before their contents are complete:
//!
//! - `ParamStore`: declared type parameters. An F-bounded parameter
//!   (`T extends Comparable<T>`) needs its id allocated before its bound can
//!   be built.
//! - `CaptureStore`: captured type-variables from wildcard capture
//!   conversion, whose bounds may mention the capture itself.

use crate::types::{CaptureId, CapturedInfo, TypeId, TypeParamId, TypeParamInfo};
use bitflags::bitflags;
use dashmap::DashMap;
use genus_common::Atom;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

// =============================================================================
// DefId - Solver-Owned Definition Identifier
// =============================================================================

/// Solver-owned definition identifier for a nominal class or interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DefId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// DefKind / DefFlags
// =============================================================================

/// Kind of nominal definition.
///
/// Affects subtype checking and intersection validation: any number of
/// interfaces may be intersected, but two unrelated classes may not.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// Concrete or abstract class.
    Class,
    /// Interface.
    Interface,
}

bitflags! {
    /// Modifier flags on a definition.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DefFlags: u8 {
        /// No subclasses may exist; lets glb reject `Final & Unrelated`.
        const FINAL = 1 << 0;
        /// May not be instantiated directly.
        const ABSTRACT = 1 << 1;
    }
}

// =============================================================================
// DefinitionInfo
// =============================================================================

/// Complete declaration data for a nominal definition.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub kind: DefKind,
    pub flags: DefFlags,
    /// Name of the definition (for diagnostics)
    pub name: Atom,
    /// Declared type parameters, in declaration order
    pub type_params: Vec<TypeParamId>,
    /// Direct superclass, expressed in terms of this definition's own type
    /// parameters. `None` only for the root class and for interfaces.
    pub superclass: Option<TypeId>,
    /// Directly implemented (or extended, for interfaces) interfaces,
    /// expressed in terms of this definition's own type parameters.
    pub interfaces: Vec<TypeId>,
}

impl DefinitionInfo {
    /// Create a new class definition.
    pub fn class(name: Atom, type_params: Vec<TypeParamId>, superclass: Option<TypeId>) -> Self {
        Self {
            kind: DefKind::Class,
            flags: DefFlags::empty(),
            name,
            type_params,
            superclass,
            interfaces: Vec::new(),
        }
    }

    /// Create a new interface definition.
    pub fn interface(name: Atom, type_params: Vec<TypeParamId>) -> Self {
        Self {
            kind: DefKind::Interface,
            flags: DefFlags::ABSTRACT,
            name,
            type_params,
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    /// Set implemented/extended interfaces.
    pub fn with_interfaces(mut self, interfaces: Vec<TypeId>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Add modifier flags.
    pub fn with_flags(mut self, flags: DefFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Whether this definition is an interface.
    #[inline]
    pub fn is_interface(&self) -> bool {
        self.kind == DefKind::Interface
    }
}

// =============================================================================
// DefinitionStore
// =============================================================================

/// Thread-safe storage for nominal definitions.
///
/// Uses `DashMap` for concurrent access; per-key locking keeps unrelated
/// inference attempts from serializing on a global lock.
pub struct DefinitionStore {
    definitions: DashMap<DefId, DefinitionInfo>,
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self {
            definitions: DashMap::new(),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    /// Allocate a fresh `DefId`.
    ///
    /// Definitions may be registered in two steps (allocate, then `fill`)
    /// so a class can appear in its own member and bound types.
    pub fn allocate(&self) -> DefId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        trace!(def_id = id, "DefinitionStore::allocate");
        DefId(id)
    }

    /// Store the definition data for a previously allocated id.
    pub fn fill(&self, id: DefId, info: DefinitionInfo) {
        trace!(def_id = id.0, kind = ?info.kind, "DefinitionStore::fill");
        self.definitions.insert(id, info);
    }

    /// Register a new definition and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = self.allocate();
        self.fill(id, info);
        id
    }

    /// Get definition info by `DefId`.
    pub fn get(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    /// Check if a `DefId` exists.
    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Get the kind of a definition.
    pub fn kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get(&id).map(|r| r.kind)
    }

    /// Get the name of a definition.
    pub fn name(&self, id: DefId) -> Option<Atom> {
        self.definitions.get(&id).map(|r| r.name)
    }

    /// Get type parameters for a definition.
    pub fn type_params(&self, id: DefId) -> Vec<TypeParamId> {
        self.definitions
            .get(&id)
            .map(|r| r.type_params.clone())
            .unwrap_or_default()
    }

    /// Whether the definition declares type parameters.
    pub fn is_generic(&self, id: DefId) -> bool {
        self.definitions
            .get(&id)
            .is_some_and(|r| !r.type_params.is_empty())
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// =============================================================================
// ParamStore
// =============================================================================

/// Storage for declared type parameters.
pub struct ParamStore {
    params: DashMap<TypeParamId, TypeParamInfo>,
    next_id: AtomicU32,
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamStore {
    pub fn new() -> Self {
        Self {
            params: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Allocate a parameter with the implicit `Object` bound; bounds that
    /// mention the parameter itself are attached afterwards with
    /// [`set_bounds`](Self::set_bounds).
    pub fn allocate(&self, name: Atom) -> TypeParamId {
        let id = TypeParamId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.params.insert(
            id,
            TypeParamInfo {
                name,
                bounds: Vec::new(),
            },
        );
        id
    }

    /// Attach declared bounds to a parameter.
    pub fn set_bounds(&self, id: TypeParamId, bounds: Vec<TypeId>) {
        if let Some(mut entry) = self.params.get_mut(&id) {
            entry.bounds = bounds;
        }
    }

    pub fn get(&self, id: TypeParamId) -> Option<TypeParamInfo> {
        self.params.get(&id).map(|r| r.clone())
    }

    pub fn name(&self, id: TypeParamId) -> Option<Atom> {
        self.params.get(&id).map(|r| r.name)
    }
}

// =============================================================================
// CaptureStore
// =============================================================================

/// Storage for captured type-variables.
///
/// A capture is allocated first so its bounds can refer back to it
/// (`CAP#1 <: Comparable<CAP#1>`), then its bounds are attached.
pub struct CaptureStore {
    captures: DashMap<CaptureId, CapturedInfo>,
    next_id: AtomicU32,
}

impl Default for CaptureStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureStore {
    pub fn new() -> Self {
        Self {
            captures: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    pub fn allocate(&self, name: Atom) -> CaptureId {
        let id = CaptureId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.captures.insert(
            id,
            CapturedInfo {
                name,
                upper: Vec::new(),
                lower: Vec::new(),
            },
        );
        id
    }

    pub fn set_bounds(&self, id: CaptureId, upper: Vec<TypeId>, lower: Vec<TypeId>) {
        if let Some(mut entry) = self.captures.get_mut(&id) {
            entry.upper = upper;
            entry.lower = lower;
        }
    }

    pub fn get(&self, id: CaptureId) -> Option<CapturedInfo> {
        self.captures.get(&id).map(|r| r.clone())
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
