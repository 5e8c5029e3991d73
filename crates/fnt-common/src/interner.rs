//! String interner for identifier deduplication.
//!
//! Intern strings into a pool and pass around u32 indices (Atoms).
//! Comparisons become integer comparisons (`atom_a == atom_b`) instead of
//! string comparisons, and every distinct identifier is allocated once.

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

/// Keywords and identifiers common enough to pre-intern at startup.
const COMMON_STRINGS: &[&str] = &[
    // Keywords
    "int",
    "long",
    "short",
    "byte",
    "bool",
    "char",
    "float",
    "double",
    "decimal",
    "string",
    "object",
    "void",
    "ref",
    "out",
    "in",
    "readonly",
    "var",
    "new",
    "null",
    "true",
    "false",
    "return",
    "this",
    // Common identifiers
    "x",
    "y",
    "z",
    "value",
    "result",
    "item",
    "index",
    "count",
    "args",
    "callback",
    "handler",
    "left",
    "right",
    // Well-known type names
    "ValueTuple",
    "List",
    "Dictionary",
    "Func",
    "Action",
    "Task",
    "String",
    "Object",
];

/// Single-threaded string interner.
///
/// Used where a scanner or arena owns its strings exclusively. For shared
/// concurrent interning, use [`ShardedInterner`].
#[derive(Default)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Arc<str>, Atom>,
    /// Vector of all interned strings (index 0 is empty string)
    strings: Vec<Arc<str>>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Interner {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(256),
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

    /// Pre-intern common keywords and identifiers.
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
    fn new() -> InternerShard {
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

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardedInterner {
    /// Create a new sharded interner with the empty string pre-interned at index 0.
    pub fn new() -> ShardedInterner {
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
            return Atom::NONE;
        };

        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            // Out of atom space in this shard; degrade instead of panicking
            return Atom::NONE;
        }

        let atom = Self::make_atom(local_index, shard_idx as u32);
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Resolve an Atom back to its string value.
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

    /// Pre-intern common keywords and identifiers.
    pub fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }

    #[inline]
    fn make_atom(local_index: u32, shard_idx: u32) -> Atom {
        Atom((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interner_dedup() {
        let mut interner = Interner::new();
        let a1 = interner.intern("callback");
        let a2 = interner.intern("callback");
        let a3 = interner.intern("handler");
        assert_eq!(a1, a2);
        assert_ne!(a1, a3);
        assert_eq!(interner.resolve(a1), "callback");
    }

    #[test]
    fn test_interner_empty_is_none() {
        let mut interner = Interner::new();
        assert_eq!(interner.intern(""), Atom::NONE);
        assert_eq!(interner.resolve(Atom::NONE), "");
    }

    #[test]
    fn test_sharded_interner_dedup() {
        let interner = ShardedInterner::new();
        let a1 = interner.intern("ValueTuple");
        let a2 = interner.intern("ValueTuple");
        assert_eq!(a1, a2);
        assert_eq!(interner.resolve(a1).as_ref(), "ValueTuple");
    }

    #[test]
    fn test_sharded_interner_concurrent() {
        let interner = ShardedInterner::new();
        let mut atoms: Vec<Atom> = Vec::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| interner.intern("shared-name")))
                .collect();
            for handle in handles {
                atoms.push(handle.join().expect("intern thread panicked"));
            }
        });
        assert!(atoms.windows(2).all(|w| w[0] == w[1]));
    }
}
