//! Tree-level queries for ImplicitTree.
//!
//! Size and shape queries, per-level statistics, and the dense rendering
//! used when printing a tree.

use std::fmt;

use crate::indexer::Indexer;
use crate::slots::SlotStats;
use crate::types::{ImplicitTree, Node, NodeIndex, ROOT_INDEX};

/// Shape statistics for a built tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeStats {
    /// Keys stored.
    pub keys: usize,
    /// Levels computed for the input size.
    pub height: usize,
    /// Populated slots per level, root level first.
    pub nodes_per_level: Vec<usize>,
    /// Populated slots holding no keys.
    pub empty_nodes: usize,
    /// Occupancy of the underlying slot store.
    pub slots: SlotStats,
    /// `keys / (populated slots * B)`.
    pub fill_ratio: f64,
}

// ============================================================================
// TREE STRUCTURE OPERATIONS
// ============================================================================

impl<K> ImplicitTree<K> {
    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels computed for the input size.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Keys per node.
    pub fn branching(&self) -> usize {
        self.indexer.branching()
    }

    /// Index arithmetic for traversing this tree.
    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    /// Get the node stored at `index`.
    pub fn get(&self, index: NodeIndex) -> Option<&Node<K>> {
        self.slots.get(index)
    }

    /// Get the root node.
    pub fn root(&self) -> Option<&Node<K>> {
        self.get(ROOT_INDEX)
    }

    /// Returns the number of populated slots.
    pub fn node_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if `index` is populated and none of its child slots are.
    pub fn is_leaf(&self, index: NodeIndex) -> bool {
        self.slots.contains(index)
            && !self
                .indexer
                .children(index)
                .any(|child| self.slots.contains(child))
    }

    /// Returns the number of populated slots with no populated children.
    pub fn leaf_count(&self) -> usize {
        self.slots.indices().filter(|&index| self.is_leaf(index)).count()
    }

    /// Array view with `None` for every hole, up to the last populated slot.
    pub fn to_dense(&self) -> Vec<Option<&Node<K>>> {
        self.slots.to_dense()
    }

    /// Collect shape statistics.
    pub fn stats(&self) -> TreeStats {
        let nodes_per_level = (0..self.height).map(|level| self.level(level).count()).collect();
        let empty_nodes = self.nodes().filter(|(_, node)| node.is_empty()).count();
        let capacity = self.node_count() * self.branching();
        TreeStats {
            keys: self.len,
            height: self.height,
            nodes_per_level,
            empty_nodes,
            slots: self.slots.stats(),
            fill_ratio: if capacity == 0 {
                0.0
            } else {
                self.len as f64 / capacity as f64
            },
        }
    }
}

impl<K: fmt::Display> fmt::Display for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, key) in self.keys().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", key)?;
        }
        write!(f, "]")
    }
}

/// Prints the dense array, holes as `null`: `[[4],[1,2,3],[5,6,7]]`.
impl<K: fmt::Display> fmt::Display for ImplicitTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, slot) in self.to_dense().into_iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match slot {
                Some(node) => write!(f, "{}", node)?,
                None => write!(f, "null")?,
            }
        }
        write!(f, "]")
    }
}
