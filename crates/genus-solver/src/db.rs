//! Type database abstraction for the solver.
//!
//! `TypeDatabase` covers term construction and lookup; `QueryDatabase`
//! extends it with the nominal-definition queries the inference algorithms
//! need. Together they form the type-system oracle boundary: solver
//! components stay generic over storage and never reach into concrete
//! structures directly.

use crate::bootstrap::CoreDefs;
use crate::def::{CaptureStore, DefId, DefinitionInfo, DefinitionStore, ParamStore};
use crate::intern::TypeInterner;
use crate::types::{
    CaptureId, CapturedInfo, InferenceVar, TypeId, TypeKey, TypeListId, TypeParamId,
    TypeParamInfo, WildcardBounds, WildcardId,
};
use genus_common::Atom;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Term construction and lookup interface.
pub trait TypeDatabase {
    fn intern(&self, key: TypeKey) -> TypeId;
    fn lookup(&self, id: TypeId) -> Option<TypeKey>;
    fn intern_string(&self, s: &str) -> Atom;
    fn resolve_atom(&self, atom: Atom) -> String;
    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str>;
    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]>;
    fn wildcard_bounds(&self, id: WildcardId) -> Arc<WildcardBounds>;

    /// Construct a class type. An empty argument list on a generic
    /// definition denotes the raw type.
    fn class(&self, def: DefId, args: Vec<TypeId>) -> TypeId {
        let list = if args.is_empty() {
            TypeListId::EMPTY
        } else {
            self.intern_type_list(args)
        };
        self.intern(TypeKey::Class(def, list))
    }

    fn intern_type_list(&self, items: Vec<TypeId>) -> TypeListId;

    fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeKey::Array(element))
    }

    fn wildcard(&self, bounds: WildcardBounds) -> TypeId {
        let id = self.intern_wildcard(bounds);
        self.intern(TypeKey::Wildcard(id))
    }

    fn intern_wildcard(&self, bounds: WildcardBounds) -> WildcardId;

    fn unbounded_wildcard(&self) -> TypeId {
        self.wildcard(WildcardBounds::UNBOUNDED)
    }

    /// Construct an intersection, flattening nested intersections and
    /// deduplicating while preserving member order. A singleton collapses to
    /// its member; an empty list is a construction error.
    fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(members.len());
        for member in members {
            match self.lookup(member) {
                Some(TypeKey::Intersection(list)) => {
                    for &inner in self.type_list(list).iter() {
                        if !flat.contains(&inner) {
                            flat.push(inner);
                        }
                    }
                }
                _ => {
                    if !flat.contains(&member) {
                        flat.push(member);
                    }
                }
            }
        }
        match flat.len() {
            0 => TypeId::ERROR,
            1 => flat[0],
            _ => {
                let list = self.intern_type_list(flat);
                self.intern(TypeKey::Intersection(list))
            }
        }
    }

    fn infer(&self, var: InferenceVar) -> TypeId {
        self.intern(TypeKey::Infer(var))
    }

    fn param(&self, id: TypeParamId) -> TypeId {
        self.intern(TypeKey::Param(id))
    }

    fn captured(&self, id: CaptureId) -> TypeId {
        self.intern(TypeKey::Captured(id))
    }
}

impl TypeDatabase for TypeInterner {
    fn intern(&self, key: TypeKey) -> TypeId {
        TypeInterner::intern(self, key)
    }

    fn lookup(&self, id: TypeId) -> Option<TypeKey> {
        TypeInterner::lookup(self, id)
    }

    fn intern_string(&self, s: &str) -> Atom {
        TypeInterner::intern_string(self, s)
    }

    fn resolve_atom(&self, atom: Atom) -> String {
        TypeInterner::resolve_atom(self, atom)
    }

    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        TypeInterner::resolve_atom_ref(self, atom)
    }

    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        TypeInterner::type_list(self, id)
    }

    fn wildcard_bounds(&self, id: WildcardId) -> Arc<WildcardBounds> {
        TypeInterner::wildcard_bounds(self, id)
    }

    fn intern_type_list(&self, items: Vec<TypeId>) -> TypeListId {
        TypeInterner::intern_type_list(self, items)
    }

    fn intern_wildcard(&self, bounds: WildcardBounds) -> WildcardId {
        TypeInterner::intern_wildcard(self, bounds)
    }
}

/// Query interface for the solver: term construction plus nominal
/// definition data, fresh-variable allocation, and the core hierarchy.
pub trait QueryDatabase: TypeDatabase {
    fn definition(&self, id: DefId) -> Option<DefinitionInfo>;
    fn def_name(&self, id: DefId) -> Option<Atom>;
    fn def_type_params(&self, id: DefId) -> Vec<TypeParamId>;
    fn type_param(&self, id: TypeParamId) -> Option<TypeParamInfo>;
    fn capture_info(&self, id: CaptureId) -> Option<CapturedInfo>;

    fn fresh_inference_var(&self) -> InferenceVar;
    fn fresh_capture(&self, name: Atom) -> CaptureId;
    fn set_capture_bounds(&self, id: CaptureId, upper: Vec<TypeId>, lower: Vec<TypeId>);

    /// The pre-registered core class hierarchy and boxing tables.
    fn core(&self) -> &CoreDefs;
}

/// Canonical `QueryDatabase` implementation: interner + definition store +
/// side tables + the bootstrapped core hierarchy.
pub struct TypeStore {
    interner: TypeInterner,
    defs: DefinitionStore,
    params: ParamStore,
    captures: CaptureStore,
    core: CoreDefs,
    next_infer: AtomicU32,
}

impl TypeStore {
    /// Create a store with the core hierarchy installed.
    pub fn new() -> Self {
        let interner = TypeInterner::new();
        let defs = DefinitionStore::new();
        let params = ParamStore::new();
        let captures = CaptureStore::new();
        let core = CoreDefs::install(&interner, &defs, &params);
        TypeStore {
            interner,
            defs,
            params,
            captures,
            core,
            next_infer: AtomicU32::new(0),
        }
    }

    /// Direct access to the definition store for registration.
    pub fn defs(&self) -> &DefinitionStore {
        &self.defs
    }

    /// Direct access to the parameter store for registration.
    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    /// Register a class and return its id. Convenience over the stores.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        self.defs.register(info)
    }

    /// Allocate a fresh declared type parameter.
    pub fn fresh_type_param(&self, name: &str) -> TypeParamId {
        let atom = self.interner.intern_string(name);
        self.params.allocate(atom)
    }
}

impl Default for TypeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDatabase for TypeStore {
    fn intern(&self, key: TypeKey) -> TypeId {
        self.interner.intern(key)
    }

    fn lookup(&self, id: TypeId) -> Option<TypeKey> {
        self.interner.lookup(id)
    }

    fn intern_string(&self, s: &str) -> Atom {
        self.interner.intern_string(s)
    }

    fn resolve_atom(&self, atom: Atom) -> String {
        self.interner.resolve_atom(atom)
    }

    fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.interner.resolve_atom_ref(atom)
    }

    fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        self.interner.type_list(id)
    }

    fn wildcard_bounds(&self, id: WildcardId) -> Arc<WildcardBounds> {
        self.interner.wildcard_bounds(id)
    }

    fn intern_type_list(&self, items: Vec<TypeId>) -> TypeListId {
        self.interner.intern_type_list(items)
    }

    fn intern_wildcard(&self, bounds: WildcardBounds) -> WildcardId {
        self.interner.intern_wildcard(bounds)
    }
}

impl QueryDatabase for TypeStore {
    fn definition(&self, id: DefId) -> Option<DefinitionInfo> {
        self.defs.get(id)
    }

    fn def_name(&self, id: DefId) -> Option<Atom> {
        self.defs.name(id)
    }

    fn def_type_params(&self, id: DefId) -> Vec<TypeParamId> {
        self.defs.type_params(id)
    }

    fn type_param(&self, id: TypeParamId) -> Option<TypeParamInfo> {
        self.params.get(id)
    }

    fn capture_info(&self, id: CaptureId) -> Option<CapturedInfo> {
        self.captures.get(id)
    }

    fn fresh_inference_var(&self) -> InferenceVar {
        InferenceVar(self.next_infer.fetch_add(1, Ordering::SeqCst))
    }

    fn fresh_capture(&self, name: Atom) -> CaptureId {
        self.captures.allocate(name)
    }

    fn set_capture_bounds(&self, id: CaptureId, upper: Vec<TypeId>, lower: Vec<TypeId>) {
        self.captures.set_bounds(id, upper, lower);
    }

    fn core(&self) -> &CoreDefs {
        &self.core
    }
}

#[cfg(test)]
#[path = "../tests/db_tests.rs"]
mod tests;
