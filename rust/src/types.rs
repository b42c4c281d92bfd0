//! Core types and data structures for implicit B-tree layouts.
//!
//! This module contains the node and tree types, the builder configuration,
//! and the constants shared by the indexer and the bulk loader.

use crate::indexer::Indexer;
use crate::slots::ImplicitSlots;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Minimum branching factor (keys per node) accepted by the indexer.
pub const MIN_BRANCHING_FACTOR: usize = 1;

/// Branching factor used by `Default` implementations.
pub const DEFAULT_BRANCHING_FACTOR: usize = 16;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Position of a node in the implicit array.
pub type NodeIndex = usize;

/// Depth of a node, root = 0.
pub type Level = usize;

/// Index of the root node in every non-empty tree.
pub const ROOT_INDEX: NodeIndex = 0;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// A single slot of the implicit array: up to `B` ascending keys.
///
/// Nodes carry no child pointers. The children of the node stored at index
/// `i` live at `i * (B + 1) + k` for `k` in `1..=B + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K> {
    /// Ascending keys held by this node.
    pub(crate) keys: Vec<K>,
}

/// A bulk-loaded implicit B-tree.
///
/// The tree is produced once by [`TreeBuilder::build`] and is read-only
/// afterwards. Nodes are addressed by [`NodeIndex`]; parent and child
/// positions come from the tree's [`Indexer`].
///
/// # Examples
///
/// ```
/// use implicit_btree::build;
///
/// let keys: Vec<u32> = (1..=7).collect();
/// let tree = build(&keys, 3).unwrap();
///
/// assert_eq!(tree.height(), 2);
/// assert_eq!(tree.get(0).unwrap().keys(), &[4]);
/// assert_eq!(tree.get(1).unwrap().keys(), &[1, 2, 3]);
/// assert_eq!(tree.get(2).unwrap().keys(), &[5, 6, 7]);
/// assert_eq!(tree.keys().copied().collect::<Vec<_>>(), keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitTree<K> {
    /// Index arithmetic for this tree's branching factor.
    pub(crate) indexer: Indexer,
    /// Number of levels computed for the input size.
    pub(crate) height: usize,
    /// Total number of keys stored.
    pub(crate) len: usize,
    /// Populated slots keyed by array index.
    pub(crate) slots: ImplicitSlots<Node<K>>,
}

/// What the builder does with trailing nodes whose parent slot was never
/// populated when the input runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingRepair {
    /// Move the final leaf into its parent slot if that slot is empty.
    /// Only the final leaf is considered, and only one level.
    ParentSlot,
    /// Keep moving the final leaf up while its parent slot is empty, then
    /// give every remaining orphan an empty ancestor chain. Every populated
    /// non-root node ends up with a populated parent.
    #[default]
    Settle,
}

/// Bulk loader configuration.
///
/// A builder holds only its branching factor and repair policy; every call
/// to [`TreeBuilder::build`] is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeBuilder {
    pub(crate) indexer: Indexer,
    pub(crate) repair: TrailingRepair,
}
