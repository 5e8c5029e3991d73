//! Type and signature interning for structural deduplication.
//!
//! Converts `TypeKey` structures into lightweight `TypeId` handles and
//! `Signature` values into `SignatureId` handles. A `TypeId`/`SignatureId`
//! comparison is O(1) and full-fidelity; mode-sensitive equality and
//! hashing (ignoring nullability annotations and/or custom modifiers) live
//! here too, because they need to look back through the interned structure.
//!
//! Concurrency: the type table is lock-sharded; signature dedup uses a
//! hash-keyed bucket map with an atomic insert-if-absent step, so racing
//! constructions of the same shape collapse to one canonical instance
//! without blocking.

use crate::signature::{ComparisonMode, Signature};
use crate::types::{
    IntrinsicKind, ModifierSeqId, SignatureId, TypeId, TypeKey, TypeRef,
};
use dashmap::DashMap;
use fnt_common::interner::{Atom, ShardedInterner};
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};
use tracing::trace;

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 64 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeKey, u32>>,
    index_to_key: RwLock<Vec<TypeKey>>,
}

impl TypeShard {
    fn new() -> TypeShard {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

/// Interner for short ordered sequences (custom-modifier lists).
/// Id 0 is always the empty sequence.
struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> SliceInterner<T> {
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

/// Type and signature interning table, shared per compilation.
/// Thread-safe; all handed-out values are immutable.
pub struct TypeInterner {
    /// Sharded storage for structural type keys
    shards: [TypeShard; SHARD_COUNT],
    /// String interner for type and parameter names
    pub string_interner: ShardedInterner,
    modifier_lists: RwLock<SliceInterner<Atom>>,
    /// `SignatureId` -> canonical signature
    signatures: RwLock<Vec<Arc<Signature>>>,
    /// Hash-keyed identity map for signature dedup. Keys are
    /// default-comparison-mode hashes; buckets resolve collisions by
    /// default-mode equality.
    signature_dedup: DashMap<u64, SmallVec<[SignatureId; 2]>>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create a new interner with pre-registered intrinsics.
    pub fn new() -> TypeInterner {
        TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            string_interner: {
                let interner = ShardedInterner::new();
                interner.intern_common();
                interner
            },
            modifier_lists: RwLock::new(SliceInterner::new()),
            signatures: RwLock::new(Vec::new()),
            signature_dedup: DashMap::new(),
        }
    }

    /// Intern a string into an Atom.
    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    /// Resolve an Atom back to its string value.
    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    // =========================================================================
    // Type interning
    // =========================================================================

    /// Intern a type key and return its `TypeId`.
    /// If the key already exists, returns the existing `TypeId`.
    pub fn intern(&self, key: TypeKey) -> TypeId {
        if let Some(id) = Self::intrinsic_id(&key) {
            return id;
        }

        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard
                .key_to_index
                .read()
                .expect("shard key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&key) {
                return Self::make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard
            .key_to_index
            .write()
            .expect("shard key_to_index lock poisoned");
        let mut storage = shard
            .index_to_key
            .write()
            .expect("shard index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&key) {
            return Self::make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        if local_index > (u32::MAX - TypeId::FIRST_USER) >> SHARD_BITS {
            return TypeId::ERROR;
        }

        trace!(shard = shard_idx, local_index, "interning new type key");
        storage.push(key.clone());
        map.insert(key, local_index);

        Self::make_id(local_index, shard_idx as u32)
    }

    /// Look up the `TypeKey` for a given `TypeId`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeKey> {
        if id.is_intrinsic() {
            return Self::intrinsic_key(id);
        }

        let raw_val = id.0.checked_sub(TypeId::FIRST_USER)?;
        let shard_idx = (raw_val & SHARD_MASK) as usize;
        let local_index = raw_val >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard
            .index_to_key
            .read()
            .expect("shard index_to_key lock poisoned");
        storage.get(local_index as usize).cloned()
    }

    #[inline]
    fn make_id(local_index: u32, shard_idx: u32) -> TypeId {
        let raw_val = (local_index << SHARD_BITS) | (shard_idx & SHARD_MASK);
        TypeId(TypeId::FIRST_USER + raw_val)
    }

    fn intrinsic_id(key: &TypeKey) -> Option<TypeId> {
        match key {
            TypeKey::Intrinsic(kind) => Some(kind.to_type_id()),
            TypeKey::Error => Some(TypeId::ERROR),
            _ => None,
        }
    }

    fn intrinsic_key(id: TypeId) -> Option<TypeKey> {
        if id.is_error() {
            return Some(TypeKey::Error);
        }
        IntrinsicKind::from_type_id(id).map(TypeKey::Intrinsic)
    }

    // =========================================================================
    // Convenience constructors
    // =========================================================================

    pub fn named(&self, name: Atom, args: Vec<TypeRef>) -> TypeId {
        self.intern(TypeKey::Named { name, args })
    }

    pub fn array(&self, element: TypeRef) -> TypeId {
        self.intern(TypeKey::Array(element))
    }

    pub fn pointer(&self, pointee: TypeRef) -> TypeId {
        self.intern(TypeKey::Pointer(pointee))
    }

    pub fn type_parameter(&self, index: u16, name: Atom) -> TypeId {
        self.intern(TypeKey::TypeParameter { index, name })
    }

    /// Intern a signature and wrap it as a function-type symbol.
    /// Two independently built occurrences of the same shape return the
    /// same `TypeId`.
    pub fn function_type(&self, signature: Signature) -> TypeId {
        let sig_id = self.intern_signature(signature);
        self.intern(TypeKey::Function(sig_id))
    }

    // =========================================================================
    // Custom modifiers
    // =========================================================================

    pub fn intern_modifiers(&self, modifiers: Vec<Atom>) -> ModifierSeqId {
        let mut lists = self
            .modifier_lists
            .write()
            .expect("modifier_lists lock poisoned");
        ModifierSeqId(lists.intern(modifiers))
    }

    pub fn modifier_list(&self, id: ModifierSeqId) -> Arc<[Atom]> {
        let lists = self
            .modifier_lists
            .read()
            .expect("modifier_lists lock poisoned");
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    // =========================================================================
    // Signature interning
    // =========================================================================

    /// Intern a signature, deduplicating against previously built
    /// signatures under the default comparison mode.
    ///
    /// The dedup bucket entry is the atomic insert-if-absent point:
    /// concurrent builders of the same shape may race to construct
    /// duplicate `Signature` values, but only one is published. A failed
    /// dedup probe never leaves a partial insert behind.
    pub fn intern_signature(&self, signature: Signature) -> SignatureId {
        let hash = self.hash_signature(&signature, ComparisonMode::DEFAULT);
        let mut bucket = self.signature_dedup.entry(hash).or_default();
        for &id in bucket.iter() {
            let existing = self.signature(id);
            if self.signatures_equal(&existing, &signature, ComparisonMode::DEFAULT) {
                return id;
            }
        }

        let id = {
            let mut signatures = self.signatures.write().expect("signatures lock poisoned");
            let id = SignatureId(signatures.len() as u32);
            signatures.push(Arc::new(signature));
            id
        };
        bucket.push(id);
        trace!(signature_id = id.0, "interning new signature");
        id
    }

    /// Get the canonical signature for an id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this interner.
    pub fn signature(&self, id: SignatureId) -> Arc<Signature> {
        self.signatures
            .read()
            .expect("signatures lock poisoned")
            .get(id.0 as usize)
            .cloned()
            .expect("signature id out of range for this interner")
    }

    /// Number of distinct signatures interned so far.
    pub fn signature_count(&self) -> usize {
        self.signatures
            .read()
            .expect("signatures lock poisoned")
            .len()
    }

    // =========================================================================
    // Equality and hashing under a comparison mode
    // =========================================================================

    /// Structural equality of annotated type references under `mode`.
    pub fn type_refs_equal(&self, a: TypeRef, b: TypeRef, mode: ComparisonMode) -> bool {
        if mode.contains(ComparisonMode::NULLABILITY) && a.nullability != b.nullability {
            return false;
        }
        if mode.contains(ComparisonMode::MODIFIERS) && a.modifiers != b.modifiers {
            return false;
        }
        self.type_ids_equal(a.ty, b.ty, mode)
    }

    /// Structural equality of underlying types under `mode`.
    pub fn type_ids_equal(&self, a: TypeId, b: TypeId, mode: ComparisonMode) -> bool {
        if a == b {
            // Fast path: interned identity
            return true;
        }
        if mode == ComparisonMode::DEFAULT {
            // Full-fidelity equality is id equality by construction
            return false;
        }
        match (self.lookup(a), self.lookup(b)) {
            (Some(key_a), Some(key_b)) => self.type_keys_equal(&key_a, &key_b, mode),
            _ => false,
        }
    }

    fn type_keys_equal(&self, a: &TypeKey, b: &TypeKey, mode: ComparisonMode) -> bool {
        match (a, b) {
            (TypeKey::Error, TypeKey::Error) => true,
            (TypeKey::Intrinsic(x), TypeKey::Intrinsic(y)) => x == y,
            (
                TypeKey::Named {
                    name: name_a,
                    args: args_a,
                },
                TypeKey::Named {
                    name: name_b,
                    args: args_b,
                },
            ) => {
                name_a == name_b
                    && args_a.len() == args_b.len()
                    && args_a
                        .iter()
                        .zip(args_b.iter())
                        .all(|(&x, &y)| self.type_refs_equal(x, y, mode))
            }
            (TypeKey::Array(x), TypeKey::Array(y))
            | (TypeKey::Pointer(x), TypeKey::Pointer(y)) => self.type_refs_equal(*x, *y, mode),
            (
                TypeKey::TypeParameter { index: index_a, .. },
                TypeKey::TypeParameter { index: index_b, .. },
            ) => index_a == index_b,
            (TypeKey::Function(sig_a), TypeKey::Function(sig_b)) => {
                let a = self.signature(*sig_a);
                let b = self.signature(*sig_b);
                self.signatures_equal(&a, &b, mode)
            }
            _ => false,
        }
    }

    /// Structural signature equality under `mode`: arity, exact passing
    /// modes and convention, and payload equality per the mode's flags.
    /// Parameter names never participate.
    pub fn signatures_equal(&self, a: &Signature, b: &Signature, mode: ComparisonMode) -> bool {
        if std::ptr::eq(a, b) {
            // Fast path: reference identity
            return true;
        }
        if a.params.len() != b.params.len()
            || a.return_passing != b.return_passing
            || a.convention != b.convention
        {
            return false;
        }
        if mode.contains(ComparisonMode::MODIFIERS)
            && a.return_ref_modifiers != b.return_ref_modifiers
        {
            return false;
        }
        if !self.type_refs_equal(a.return_type, b.return_type, mode) {
            return false;
        }
        a.params.iter().zip(b.params.iter()).all(|(pa, pb)| {
            pa.passing == pb.passing
                && (!mode.contains(ComparisonMode::MODIFIERS)
                    || pa.ref_modifiers == pb.ref_modifiers)
                && self.type_refs_equal(pa.ty, pb.ty, mode)
        })
    }

    /// Hash a signature consistently with [`Self::signatures_equal`] under
    /// the same mode.
    pub fn hash_signature(&self, signature: &Signature, mode: ComparisonMode) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash_signature_into(signature, mode, &mut hasher);
        hasher.finish()
    }

    fn hash_signature_into(&self, signature: &Signature, mode: ComparisonMode, h: &mut FxHasher) {
        std::mem::discriminant(&signature.return_passing).hash(h);
        std::mem::discriminant(&signature.convention).hash(h);
        signature.params.len().hash(h);
        if mode.contains(ComparisonMode::MODIFIERS) {
            signature.return_ref_modifiers.0.hash(h);
        }
        self.hash_type_ref(signature.return_type, mode, h);
        for param in &signature.params {
            std::mem::discriminant(&param.passing).hash(h);
            if mode.contains(ComparisonMode::MODIFIERS) {
                param.ref_modifiers.0.hash(h);
            }
            self.hash_type_ref(param.ty, mode, h);
        }
    }

    /// Hash an annotated type reference consistently with
    /// [`Self::type_refs_equal`] under the same mode.
    pub fn hash_type_ref(&self, type_ref: TypeRef, mode: ComparisonMode, h: &mut FxHasher) {
        if mode.contains(ComparisonMode::NULLABILITY) {
            type_ref.nullability.as_u8().hash(h);
        }
        if mode.contains(ComparisonMode::MODIFIERS) {
            type_ref.modifiers.0.hash(h);
        }
        self.hash_type_id(type_ref.ty, mode, h);
    }

    fn hash_type_id(&self, id: TypeId, mode: ComparisonMode, h: &mut FxHasher) {
        if mode == ComparisonMode::DEFAULT {
            // Ids are canonical for full-fidelity structure
            id.0.hash(h);
            return;
        }
        match self.lookup(id) {
            None | Some(TypeKey::Error) => 0u8.hash(h),
            Some(TypeKey::Intrinsic(kind)) => {
                1u8.hash(h);
                std::mem::discriminant(&kind).hash(h);
            }
            Some(TypeKey::Named { name, args }) => {
                2u8.hash(h);
                name.hash(h);
                args.len().hash(h);
                for &arg in &args {
                    self.hash_type_ref(arg, mode, h);
                }
            }
            Some(TypeKey::Array(element)) => {
                3u8.hash(h);
                self.hash_type_ref(element, mode, h);
            }
            Some(TypeKey::Pointer(pointee)) => {
                4u8.hash(h);
                self.hash_type_ref(pointee, mode, h);
            }
            Some(TypeKey::TypeParameter { index, .. }) => {
                5u8.hash(h);
                index.hash(h);
            }
            Some(TypeKey::Function(sig_id)) => {
                6u8.hash(h);
                let signature = self.signature(sig_id);
                self.hash_signature_into(&signature, mode, h);
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
