use core::hash::Hash;
use std::hash::Hasher;

#[cfg(feature = "std-hash")]
pub mod default {
    pub use std::collections::hash_map::DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::new()
    }
}

#[cfg(not(feature = "std-hash"))]
pub mod default {
    pub use ahash::AHasher as DefaultHasher;

    #[inline]
    pub fn new() -> DefaultHasher {
        DefaultHasher::default()
    }
}

/// Hash a single value with whichever default hasher is active.
#[inline]
pub fn hash_one<T: Hash + ?Sized>(v: &T) -> u64 {
    let mut h = default::new();
    v.hash(&mut h);
    h.finish()
}

/// Content fingerprint of a declaration.
///
/// Two values with the same structural key are treated as the same declaration
/// by the reconciler, which is what keeps registry entries stable across
/// renders that re-create equal values. Keys are only meaningful within one
/// process; they are never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralKey(u64);

impl StructuralKey {
    pub fn of<T: Hash + ?Sized>(value: &T) -> Self {
        StructuralKey(hash_one(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}
