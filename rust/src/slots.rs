//! Sparse slot storage for implicit arrays.
//!
//! The implicit layout addresses nodes by position, but trailing levels are
//! usually only partly populated. Storing only occupied slots keeps a tall
//! tree with a thin last level from paying for every addressable position.

use std::collections::btree_map::{self, BTreeMap};
use std::ops::RangeBounds;

use crate::types::NodeIndex;

/// Statistics for a slot store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotStats {
    /// Number of occupied slots.
    pub occupied: usize,
    /// Addressable positions from 0 through the highest occupied index.
    pub span: usize,
    /// Unoccupied positions inside the span.
    pub holes: usize,
    /// `occupied / span`, or 1.0 for an empty store.
    pub density: f64,
}

/// Index-keyed sparse storage.
///
/// Behaves like an array with a sentinel for absent entries, without
/// allocating the absent entries. Iteration is in ascending index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitSlots<T> {
    storage: BTreeMap<NodeIndex, T>,
}

impl<T> ImplicitSlots<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            storage: BTreeMap::new(),
        }
    }

    /// Store `item` at `index`, returning whatever was there before.
    #[inline]
    pub fn insert(&mut self, index: NodeIndex, item: T) -> Option<T> {
        self.storage.insert(index, item)
    }

    /// Vacate `index` and return its item.
    #[inline]
    pub fn remove(&mut self, index: NodeIndex) -> Option<T> {
        self.storage.remove(&index)
    }

    /// Get the item at `index`
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&T> {
        self.storage.get(&index)
    }

    /// Get a mutable reference to the item at `index`
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut T> {
        self.storage.get_mut(&index)
    }

    /// Check if `index` is occupied
    #[inline]
    pub fn contains(&self, index: NodeIndex) -> bool {
        self.storage.contains_key(&index)
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if no slot is occupied
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Highest occupied index
    pub fn last_index(&self) -> Option<NodeIndex> {
        self.storage.keys().next_back().copied()
    }

    /// Positions `0..=last_index`, or 0 when empty
    pub fn span(&self) -> usize {
        self.last_index().map_or(0, |last| last + 1)
    }

    /// Occupied indices in ascending order
    pub fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.storage.keys().copied()
    }

    /// Occupied `(index, item)` pairs in ascending index order
    pub fn iter(&self) -> btree_map::Iter<'_, NodeIndex, T> {
        self.storage.iter()
    }

    /// Occupied `(index, item)` pairs with index in `range`
    pub fn range<R>(&self, range: R) -> btree_map::Range<'_, NodeIndex, T>
    where
        R: RangeBounds<NodeIndex>,
    {
        self.storage.range(range)
    }

    /// Dense view with `None` for every hole, up to the highest occupied index.
    pub fn to_dense(&self) -> Vec<Option<&T>> {
        let mut dense: Vec<Option<&T>> = Vec::with_capacity(self.span());
        for (&index, item) in &self.storage {
            dense.resize(index, None);
            dense.push(Some(item));
        }
        dense
    }

    /// Get statistics for this store
    pub fn stats(&self) -> SlotStats {
        let occupied = self.len();
        let span = self.span();
        SlotStats {
            occupied,
            span,
            holes: span - occupied,
            density: if span == 0 {
                1.0
            } else {
                occupied as f64 / span as f64
            },
        }
    }
}

impl<T> Default for ImplicitSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a ImplicitSlots<T> {
    type Item = (&'a NodeIndex, &'a T);
    type IntoIter = btree_map::Iter<'a, NodeIndex, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}
