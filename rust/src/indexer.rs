//! Index arithmetic for implicit B-tree layouts.
//!
//! Nodes are numbered level by level, left to right, starting with the root
//! at index 0. With branching factor `B` every node has up to `B + 1`
//! children, so level `p` holds `(B + 1)^p` slots and the node at index `i`
//! has its children at `i * (B + 1) + 1 ..= i * (B + 1) + B + 1`.
//!
//! Nothing here looks at key values.

use std::ops::Range;

use crate::construction::validation::validate_branching;
use crate::error::InitResult;
use crate::types::{Level, NodeIndex, DEFAULT_BRANCHING_FACTOR, ROOT_INDEX};

/// Pure index arithmetic for a fixed branching factor.
///
/// Level-size quantities saturate at `usize::MAX` instead of overflowing,
/// which keeps [`Indexer::height`] total for any input size. Index results
/// are exact as long as they fit in `usize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Indexer {
    branching: usize,
}

impl Indexer {
    /// Create an indexer for nodes of `branching` keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use implicit_btree::Indexer;
    ///
    /// let indexer = Indexer::new(3).unwrap();
    /// assert_eq!(indexer.child(0, 1), Some(1));
    /// assert_eq!(indexer.parent(4), Some(0));
    /// assert!(Indexer::new(0).is_err());
    /// ```
    pub fn new(branching: usize) -> InitResult<Self> {
        validate_branching(branching)?;
        Ok(Self { branching })
    }

    /// Maximum keys per node (`B`).
    #[inline]
    pub fn branching(&self) -> usize {
        self.branching
    }

    /// Maximum children per node (`B + 1`).
    #[inline]
    pub fn fanout(&self) -> usize {
        self.branching + 1
    }

    /// Number of slots at `level`: `(B + 1)^level`.
    pub fn nodes_at_level(&self, level: Level) -> usize {
        let exp = u32::try_from(level).unwrap_or(u32::MAX);
        self.fanout().saturating_pow(exp)
    }

    /// Number of keys a full `level` can hold: `(B + 1)^level * B`.
    pub fn level_capacity(&self, level: Level) -> usize {
        self.nodes_at_level(level).saturating_mul(self.branching)
    }

    /// Number of levels needed to hold `len` keys.
    ///
    /// The smallest `h` such that levels `0..h` together hold at least `len`
    /// keys. `height(0) == 0`.
    pub fn height(&self, len: usize) -> usize {
        let mut remaining = 0usize;
        let mut height = 0;
        while remaining < len {
            remaining = remaining.saturating_add(self.level_capacity(height));
            height += 1;
        }
        height
    }

    /// Index of the leftmost slot at `level`.
    ///
    /// Equal to the number of slots in all levels above it,
    /// `((B + 1)^level - 1) / B`. Saturates at `usize::MAX` for levels whose
    /// first slot is not representable; see
    /// [`Indexer::checked_first_node_index`].
    pub fn first_node_index(&self, level: Level) -> NodeIndex {
        self.checked_first_node_index(level).unwrap_or(NodeIndex::MAX)
    }

    /// Index of the leftmost slot at `level`, or `None` if it does not fit
    /// in `usize`.
    ///
    /// Built up as `first(p + 1) = first(p) * (B + 1) + 1`, so every
    /// representable boundary is exact.
    pub fn checked_first_node_index(&self, level: Level) -> Option<NodeIndex> {
        let mut first = ROOT_INDEX;
        for _ in 0..level {
            first = self.next_level_start(first)?;
        }
        Some(first)
    }

    /// Level containing index `index`.
    ///
    /// Stops at the deepest level whose first slot is representable, so
    /// every index up to `usize::MAX` has a level.
    pub fn level_of(&self, index: NodeIndex) -> Level {
        let mut level = 0;
        let mut next_start = self.next_level_start(ROOT_INDEX);
        while let Some(start) = next_start {
            if start > index {
                break;
            }
            level += 1;
            next_start = self.next_level_start(start);
        }
        level
    }

    /// First slot of the level below the level starting at `first`.
    #[inline]
    fn next_level_start(&self, first: NodeIndex) -> Option<NodeIndex> {
        first.checked_mul(self.fanout())?.checked_add(1)
    }

    /// Index of the `k`-th child of `index`, `1 <= k <= B + 1`.
    ///
    /// `None` for an out-of-range `k` or an index past `usize::MAX`.
    #[inline]
    pub fn child(&self, index: NodeIndex, k: usize) -> Option<NodeIndex> {
        if k == 0 || k > self.fanout() {
            return None;
        }
        index.checked_mul(self.fanout())?.checked_add(k)
    }

    /// Indices of all child slots of `index`, left to right.
    #[inline]
    pub fn children(&self, index: NodeIndex) -> Range<NodeIndex> {
        let base = index.saturating_mul(self.fanout());
        base.saturating_add(1)..base.saturating_add(self.fanout() + 1)
    }

    /// Index of the leftmost sibling of `index` (the first child of its
    /// parent). `None` for the root.
    #[inline]
    pub fn first_child(&self, index: NodeIndex) -> Option<NodeIndex> {
        if index == ROOT_INDEX {
            return None;
        }
        Some(index - (index - 1) % self.fanout())
    }

    /// 1-based position of `index` among its siblings. `None` for the root.
    #[inline]
    pub fn rank_of(&self, index: NodeIndex) -> Option<usize> {
        if index == ROOT_INDEX {
            return None;
        }
        Some((index - 1) % self.fanout() + 1)
    }

    /// Index of the parent of `index`. `None` for the root.
    ///
    /// Inverse of [`Indexer::child`]: for every non-root `i`,
    /// `child(parent(i), rank_of(i)) == i`.
    #[inline]
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.first_child(index)
            .map(|first| (first - 1) / self.fanout())
    }
}

impl Default for Indexer {
    fn default() -> Self {
        Self {
            branching: DEFAULT_BRANCHING_FACTOR,
        }
    }
}
