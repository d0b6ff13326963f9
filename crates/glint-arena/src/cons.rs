//! Hash-consing index over arena items.
//!
//! [`ConsIndex`] maps a canonical content hash to the arena handles whose
//! content produced that hash. Lookups take the probe's hash plus an
//! equality closure, so a store can search by raw content (a byte view,
//! a parameter tuple) without first materialising an entry, and without
//! the index holding any back-reference to the store.

use std::hash::{BuildHasher, Hash};

use glint_core::SlotIndex;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

/// Canonical hash used for both stored entries and lookup probes.
///
/// Stores must hash stored content and probes through this one function
/// so that equal content always lands in the same bucket.
pub fn content_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    FxBuildHasher.hash_one(key)
}

/// Hash-keyed multimap from content hash to arena handles.
///
/// Collisions are kept side by side in a small inline bucket; the caller's
/// equality closure picks the right one. Uses `IndexMap` so that iteration
/// order (diagnostics only) is deterministic.
#[derive(Debug, Default)]
pub struct ConsIndex {
    buckets: IndexMap<u64, SmallVec<[SlotIndex; 1]>, FxBuildHasher>,
    len: usize,
}

impl ConsIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the handle under `hash` whose content satisfies `eq`.
    pub fn find(&self, hash: u64, mut eq: impl FnMut(SlotIndex) -> bool) -> Option<SlotIndex> {
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&index| eq(index))
    }

    /// Register `index` under `hash`.
    ///
    /// The caller guarantees no equal entry is already registered (it
    /// probed with [`ConsIndex::find`] first).
    pub fn insert(&mut self, hash: u64, index: SlotIndex) {
        self.buckets.entry(hash).or_default().push(index);
        self.len += 1;
    }

    /// Unregister `index` from `hash`. Returns whether it was present.
    pub fn remove(&mut self, hash: u64, index: SlotIndex) -> bool {
        let Some(bucket) = self.buckets.get_mut(&hash) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|&i| i == index) else {
            return false;
        };
        bucket.swap_remove(pos);
        if bucket.is_empty() {
            self.buckets.swap_remove(&hash);
        }
        self.len -= 1;
        true
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no handles are registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
