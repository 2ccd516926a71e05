//! Type interning for structural deduplication.
//!
//! Converts `TypeKey` structures into lightweight `TypeId` handles.
//!
//! Benefits:
//! - O(1) type equality (just compare `TypeId` values)
//! - Memory efficient (each unique structure stored once)
//! - Structural equality short-circuits on recursive self-reference for
//!   free: cycles only exist through side-table ids, which compare as ids

use crate::types::{TypeId, TypeKey, TypeListId, WildcardBounds, WildcardId};
use genus_common::interner::{Atom, ShardedInterner};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 64 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;
const TYPE_LIST_INLINE: usize = 8;

/// Inline buffer for building type-argument lists without heap allocation
/// in the common short case.
pub type TypeListBuffer = smallvec::SmallVec<[TypeId; TYPE_LIST_INLINE]>;

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeKey, u32>>,
    index_to_key: RwLock<Vec<TypeKey>>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: Vec<T>) -> u32 {
        if items.is_empty() {
            return 0;
        }

        if let Some(&id) = self.map.get(items.as_slice()) {
            return id;
        }

        let arc: Arc<[T]> = items.into();
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }

    fn empty(&self) -> Arc<[T]> {
        self.items[0].clone()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

/// Type interning table.
/// Thread-safe via sharded `RwLock`s for concurrent access.
pub struct TypeInterner {
    /// Sharded storage for structural type keys
    shards: [TypeShard; SHARD_COUNT],
    /// String interner for definition, parameter, and capture names
    pub string_interner: ShardedInterner,
    type_lists: RwLock<SliceInterner<TypeId>>,
    wildcards: RwLock<ValueInterner<WildcardBounds>>,
}

impl TypeInterner {
    /// Create a new type interner. Intrinsics occupy the reserved low id
    /// range and are never stored in the shards.
    pub fn new() -> Self {
        TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            string_interner: {
                let interner = ShardedInterner::new();
                interner.intern_common();
                interner
            },
            type_lists: RwLock::new(SliceInterner::new()),
            wildcards: RwLock::new(ValueInterner::new()),
        }
    }

    /// Intern a string into an Atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    /// Resolve an Atom back to its string value.
    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.string_interner.resolve(atom).to_string()
    }

    /// Resolve an Atom without allocating a new String.
    pub fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    /// Intern a type key, returning its stable `TypeId`.
    pub fn intern(&self, key: TypeKey) -> TypeId {
        if let TypeKey::Intrinsic(kind) = key {
            return kind.type_id();
        }

        let shard_idx = Self::shard_for(&key);
        let shard = &self.shards[shard_idx];

        {
            let Ok(map) = shard.key_to_index.read() else {
                return TypeId::ERROR;
            };
            if let Some(&local) = map.get(&key) {
                return Self::make_id(local, shard_idx as u32);
            }
        }

        let (Ok(mut map), Ok(mut keys)) = (shard.key_to_index.write(), shard.index_to_key.write())
        else {
            return TypeId::ERROR;
        };

        if let Some(&local) = map.get(&key) {
            return Self::make_id(local, shard_idx as u32);
        }

        let local = keys.len() as u32;
        if local > (u32::MAX - TypeId::FIRST_INTERNED) >> SHARD_BITS {
            return TypeId::ERROR;
        }
        keys.push(key.clone());
        map.insert(key, local);
        Self::make_id(local, shard_idx as u32)
    }

    /// Look up the structural key of a `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeKey> {
        if let Some(kind) = id.intrinsic_kind() {
            return Some(TypeKey::Intrinsic(kind));
        }
        if id.0 < TypeId::FIRST_INTERNED {
            return None;
        }

        let raw = id.0 - TypeId::FIRST_INTERNED;
        let shard_idx = (raw & SHARD_MASK) as usize;
        let local = (raw >> SHARD_BITS) as usize;

        let keys = self.shards[shard_idx].index_to_key.read().ok()?;
        keys.get(local).cloned()
    }

    /// Intern a list of types (type arguments or intersection members).
    pub fn intern_type_list(&self, items: Vec<TypeId>) -> TypeListId {
        let Ok(mut lists) = self.type_lists.write() else {
            return TypeListId::EMPTY;
        };
        TypeListId(lists.intern(items))
    }

    /// Resolve a type list.
    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let Ok(lists) = self.type_lists.read() else {
            return Arc::from(Vec::new());
        };
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    /// Intern a wildcard bound pair.
    pub fn intern_wildcard(&self, bounds: WildcardBounds) -> WildcardId {
        let Ok(mut wildcards) = self.wildcards.write() else {
            return WildcardId(0);
        };
        WildcardId(wildcards.intern(bounds))
    }

    /// Resolve a wildcard's bounds.
    pub fn wildcard_bounds(&self, id: WildcardId) -> Arc<WildcardBounds> {
        self.wildcards
            .read()
            .ok()
            .and_then(|w| w.get(id.0))
            .unwrap_or_else(|| Arc::new(WildcardBounds::UNBOUNDED))
    }

    #[inline]
    fn shard_for(key: &TypeKey) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() as u32 & SHARD_MASK) as usize
    }

    #[inline]
    fn make_id(local: u32, shard_idx: u32) -> TypeId {
        TypeId(TypeId::FIRST_INTERNED + ((local << SHARD_BITS) | shard_idx))
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
