//! Interning of structurally compared objects.
//! A [UniqueStore] keeps at most one copy of each distinct value,
//! so that handles to equal values are themselves equal.

use rustc_hash::{FxHashMap, FxHasher};
use std::{
    cell::RefCell,
    hash::{Hash, Hasher},
};

use crate::context::{ArenaCell, ArenaIndex};

/// A hash over both the value and its rust type, so that
/// equal looking values of different types land in different buckets.
/// ```rust
///     use arc_dialect::storage_uniquer::TypeValueHash;
///     #[derive(Hash)]
///     struct Width(u32);
///     #[derive(Hash)]
///     struct Depth(u32);
///     assert!(TypeValueHash::new(&Width(8)) != TypeValueHash::new(&Depth(8)));
///     assert!(TypeValueHash::new(&Width(8)) == TypeValueHash::new(&Width(8)));
/// ```
#[derive(Hash, Eq, PartialEq, Clone, Copy, Debug)]
pub struct TypeValueHash(u64);

impl TypeValueHash {
    pub fn new<T: Hash + 'static>(t: &T) -> TypeValueHash {
        let mut hasher = FxHasher::default();
        std::any::TypeId::of::<T>().hash(&mut hasher);
        t.hash(&mut hasher);
        TypeValueHash(hasher.finish())
    }
}

/// Arena of interned objects, bucketed by [TypeValueHash].
pub struct UniqueStore<T: 'static> {
    pub(crate) arena: ArenaCell<T>,
    buckets: FxHashMap<TypeValueHash, Vec<ArenaIndex>>,
}

impl<T: 'static> Default for UniqueStore<T> {
    fn default() -> Self {
        Self {
            arena: Default::default(),
            buckets: Default::default(),
        }
    }
}

impl<T: 'static> UniqueStore<T> {
    /// Find an interned object in the `hash` bucket for which `is` holds.
    pub fn lookup(&self, hash: TypeValueHash, is: impl Fn(&T) -> bool) -> Option<ArenaIndex> {
        self.buckets.get(&hash)?.iter().copied().find(|idx| {
            self.arena
                .get(*idx)
                .is_some_and(|candidate| is(&candidate.borrow()))
        })
    }

    /// Intern `t`, unless an `eq` object already exists in the `hash` bucket.
    /// Either way, the index of the interned copy is returned.
    pub fn intern(&mut self, t: T, hash: TypeValueHash, eq: impl Fn(&T, &T) -> bool) -> ArenaIndex {
        if let Some(existing) = self.lookup(hash, |candidate| eq(&t, candidate)) {
            return existing;
        }
        let idx = self.arena.insert(RefCell::new(t));
        self.buckets.entry(hash).or_default().push(idx);
        idx
    }

    /// Number of distinct objects interned so far.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{TypeValueHash, UniqueStore};

    #[test]
    fn interning() {
        let mut widths = UniqueStore::<u32>::default();
        let h = TypeValueHash::new;
        let w8 = widths.intern(8, h(&8u32), u32::eq);
        let w16 = widths.intern(16, h(&16u32), u32::eq);
        assert!(widths.intern(8, h(&8u32), u32::eq) == w8);
        assert!(w8 != w16);
        assert_eq!(widths.len(), 2);

        assert!(widths.lookup(h(&16u32), |w| *w == 16) == Some(w16));
        assert!(widths.lookup(h(&32u32), |w| *w == 32).is_none());
        // Right bucket, wrong value.
        assert!(widths.lookup(h(&8u32), |w| *w == 16).is_none());
    }
}
