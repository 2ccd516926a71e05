//! String interner for identifier deduplication.
//!
//! Type names, type-parameter names, and member names are interned into a
//! pool and passed around as u32 indices (Atoms). Comparisons become integer
//! comparisons (atom_a == atom_b) instead of string comparisons, and repeated
//! names like "T", "Object", or "toString" are stored once.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;
const COMMON_STRINGS: &[&str] = &[
    // Core class names
    "Object",
    "Number",
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Float",
    "Double",
    "Boolean",
    "Character",
    "Void",
    "String",
    "CharSequence",
    "Comparable",
    "Iterable",
    "Collection",
    "List",
    "Set",
    "Map",
    "ArrayList",
    "Serializable",
    "Cloneable",
    // Conventional type-parameter names
    "T",
    "E",
    "K",
    "V",
    "R",
    "U",
    "S",
    // Common member names
    "get",
    "set",
    "add",
    "put",
    "of",
    "compareTo",
    "equals",
    "hashCode",
    "toString",
    "iterator",
    "apply",
    "accept",
    "value",
    "name",
];

/// String interner that deduplicates strings and returns Atom handles.
///
/// # Example
/// ```
/// use genus_common::interner::Interner;
/// let mut interner = Interner::new();
/// let a1 = interner.intern("Comparable");
/// let a2 = interner.intern("Comparable");
/// assert_eq!(a1, a2); // Same atom for same string
/// assert_eq!(interner.resolve(a1), "Comparable");
/// ```
#[derive(Default)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Arc<str>, Atom>,
    /// Vector of all interned strings (index 0 is empty string)
    strings: Vec<Arc<str>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(crate::limits::INTERNER_PREALLOC),
        };
        // Index 0 is reserved for empty/none
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        interner
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds (safety for error recovery).
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<&str> {
        self.strings.get(atom.0 as usize).map(|s| s.as_ref())
    }

    /// Get the number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the interner is empty (only has the empty string).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    /// Pre-intern common class, parameter, and member names.
    /// Call this after creating the interner for better cache locality.
    pub fn intern_common(&mut self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }
}

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

struct InternerShard {
    state: RwLock<ShardState>,
}

impl InternerShard {
    fn new() -> Self {
        InternerShard {
            state: RwLock::new(ShardState::default()),
        }
    }
}

/// Sharded string interner for concurrent use.
///
/// Uses fixed buckets to reduce lock contention while keeping Atom lookups O(1).
pub struct ShardedInterner {
    shards: [InternerShard; SHARD_COUNT],
}

impl ShardedInterner {
    /// Create a new sharded interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|_| InternerShard::new());

        if let Ok(mut state) = shards[0].state.write() {
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }

        ShardedInterner { shards }
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }

        let shard_idx = Self::shard_for(s);
        let shard = &self.shards[shard_idx];
        let Ok(mut state) = shard.state.write() else {
            // Poisoned lock: keep the engine available, give up on this atom.
            return Atom::NONE;
        };

        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }

        let atom = Self::make_atom(local_index, shard_idx as u32);
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Resolve an Atom back to its string value.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        if atom.is_none() {
            return Arc::from("");
        }

        let shard_idx = (atom.0 & SHARD_MASK) as usize;
        let local_index = (atom.0 >> SHARD_BITS) as usize;

        let Ok(state) = self.shards[shard_idx].state.read() else {
            return Arc::from("");
        };
        state
            .strings
            .get(local_index)
            .cloned()
            .unwrap_or_else(|| Arc::from(""))
    }

    /// Pre-intern common class, parameter, and member names.
    pub fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as u32 & SHARD_MASK) as usize
    }

    #[inline]
    fn make_atom(local_index: u32, shard_idx: u32) -> Atom {
        Atom((local_index << SHARD_BITS) | shard_idx)
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut interner = Interner::new();
        let a = interner.intern("Comparable");
        let b = interner.intern("Comparable");
        assert_eq!(a, b);
        assert_eq!(interner.resolve(a), "Comparable");
    }

    #[test]
    fn test_none_atom() {
        let interner = Interner::new();
        assert!(Atom::NONE.is_none());
        assert_eq!(interner.resolve(Atom::NONE), "");
    }

    #[test]
    fn test_distinct_strings_distinct_atoms() {
        let mut interner = Interner::new();
        let a = interner.intern("T");
        let b = interner.intern("E");
        assert_ne!(a, b);
    }

    #[test]
    fn test_sharded_round_trip() {
        let interner = ShardedInterner::new();
        let a = interner.intern("ArrayList");
        assert_eq!(interner.resolve(a).as_ref(), "ArrayList");
        assert_eq!(interner.intern("ArrayList"), a);
    }

    #[test]
    fn test_sharded_empty_string() {
        let interner = ShardedInterner::new();
        assert_eq!(interner.intern(""), Atom::NONE);
    }

    #[test]
    fn test_sharded_concurrent_intern() {
        use rayon::prelude::*;

        let interner = ShardedInterner::new();
        let names: Vec<String> = (0..512).map(|i| format!("Type{i}")).collect();

        let atoms: Vec<Atom> = names.par_iter().map(|name| interner.intern(name)).collect();

        for (name, atom) in names.iter().zip(&atoms) {
            assert_eq!(interner.resolve(*atom).as_ref(), name.as_str());
            assert_eq!(interner.intern(name), *atom);
        }
    }
}
