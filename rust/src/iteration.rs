//! Iterator implementations for ImplicitTree.
//!
//! Keys come out in key order by walking the implicit tree in order:
//! child 1, key 1, child 2, key 2, ..., key m, child m + 1. Child positions
//! come from the indexer; slots that were never populated are skipped.

use std::collections::btree_map;
use std::iter::FusedIterator;

use crate::types::{ImplicitTree, Level, Node, NodeIndex, ROOT_INDEX};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// In-order iterator over the keys of an implicit tree.
pub struct KeyIterator<'a, K> {
    tree: &'a ImplicitTree<K>,
    stack: Vec<Frame<'a, K>>,
}

/// A node on the current root-to-leaf path and the next key to emit from it.
struct Frame<'a, K> {
    index: NodeIndex,
    node: &'a Node<K>,
    next_key: usize,
}

/// Iterator over populated slots in ascending index order.
pub struct NodeIterator<'a, K> {
    inner: btree_map::Iter<'a, NodeIndex, Node<K>>,
}

/// Iterator over the populated slots of one level, left to right.
pub struct LevelIterator<'a, K> {
    inner: btree_map::Range<'a, NodeIndex, Node<K>>,
}

// ============================================================================
// IMPLICIT TREE ITERATOR METHODS
// ============================================================================

impl<K> ImplicitTree<K> {
    /// Returns an iterator over all keys in in-order sequence.
    ///
    /// For a tree built from ascending keys this reproduces the input.
    pub fn keys(&self) -> KeyIterator<'_, K> {
        KeyIterator::new(self)
    }

    /// Returns an iterator over `(index, node)` pairs in index order.
    pub fn nodes(&self) -> NodeIterator<'_, K> {
        NodeIterator {
            inner: self.slots.iter(),
        }
    }

    /// Returns an iterator over the populated slots of `level`.
    ///
    /// Empty for levels that start past `usize::MAX`. The deepest
    /// representable level runs to the end of the index range.
    pub fn level(&self, level: Level) -> LevelIterator<'_, K> {
        let Some(start) = self.indexer.checked_first_node_index(level) else {
            return LevelIterator {
                inner: self.slots.range(ROOT_INDEX..ROOT_INDEX),
            };
        };
        let end = level
            .checked_add(1)
            .and_then(|below| self.indexer.checked_first_node_index(below));
        let inner = match end {
            Some(end) => self.slots.range(start..end),
            None => self.slots.range(start..),
        };
        LevelIterator { inner }
    }
}

// ============================================================================
// KEY ITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K> KeyIterator<'a, K> {
    fn new(tree: &'a ImplicitTree<K>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::with_capacity(tree.height),
        };
        iter.descend_leftmost(Some(ROOT_INDEX));
        iter
    }

    /// Push `start` and its chain of first children onto the path.
    fn descend_leftmost(&mut self, start: Option<NodeIndex>) {
        let mut current = start;
        while let Some(index) = current {
            let Some(node) = self.tree.slots.get(index) else {
                break;
            };
            self.stack.push(Frame {
                index,
                node,
                next_key: 0,
            });
            current = self.tree.indexer.child(index, 1);
        }
    }
}

impl<'a, K> Iterator for KeyIterator<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;
            let position = frame.next_key;
            if position < node.len() {
                frame.next_key += 1;
                let index = frame.index;
                // the subtree right of key `position` is child `position + 2`
                self.descend_leftmost(self.tree.indexer.child(index, position + 2));
                return node.get_key(position);
            }
            self.stack.pop();
        }
    }
}

impl<K> FusedIterator for KeyIterator<'_, K> {}

// ============================================================================
// NODE AND LEVEL ITERATOR IMPLEMENTATIONS
// ============================================================================

impl<'a, K> Iterator for NodeIterator<'a, K> {
    type Item = (NodeIndex, &'a Node<K>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&index, node)| (index, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> DoubleEndedIterator for NodeIterator<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(&index, node)| (index, node))
    }
}

impl<K> ExactSizeIterator for NodeIterator<'_, K> {}

impl<'a, K> Iterator for LevelIterator<'a, K> {
    type Item = (NodeIndex, &'a Node<K>);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&index, node)| (index, node))
    }
}

impl<'a, K> IntoIterator for &'a ImplicitTree<K> {
    type Item = &'a K;
    type IntoIter = KeyIterator<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys()
    }
}

#[cfg(test)]
mod tests {
    use crate::types::TreeBuilder;

    #[test]
    fn test_keys_in_order_across_levels() {
        let keys: Vec<u32> = (1..=25).collect();
        let tree = TreeBuilder::new(3).unwrap().build(&keys).unwrap();
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), keys);
        assert_eq!((&tree).into_iter().count(), 25);
    }

    #[test]
    fn test_keys_of_empty_tree() {
        let tree = TreeBuilder::new(3).unwrap().build::<u32>(&[]).unwrap();
        assert_eq!(tree.keys().next(), None);
    }

    #[test]
    fn test_keys_is_fused() {
        let tree = TreeBuilder::new(2).unwrap().build(&[1, 2]).unwrap();
        let mut keys = tree.keys();
        assert_eq!(keys.next(), Some(&1));
        assert_eq!(keys.next(), Some(&2));
        assert_eq!(keys.next(), None);
        assert_eq!(keys.next(), None);
    }

    #[test]
    fn test_nodes_in_index_order() {
        let keys: Vec<u32> = (1..=7).collect();
        let tree = TreeBuilder::new(3).unwrap().build(&keys).unwrap();
        let indices: Vec<_> = tree.nodes().map(|(index, _)| index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(tree.nodes().len(), 3);
        assert_eq!(tree.nodes().next_back().unwrap().1.keys(), &[5, 6, 7]);
    }

    #[test]
    fn test_level_iteration() {
        let keys: Vec<u32> = (1..=25).collect();
        let tree = TreeBuilder::new(3).unwrap().build(&keys).unwrap();
        let level_sizes: Vec<usize> = (0..tree.height()).map(|p| tree.level(p).count()).collect();
        assert_eq!(level_sizes, vec![1, 2, 7]);
        let roots: Vec<_> = tree.level(0).map(|(_, node)| node.keys().to_vec()).collect();
        assert_eq!(roots, vec![vec![16]]);
        assert_eq!(tree.level(3).count(), 0);
    }

    #[test]
    fn test_level_past_index_range_is_empty() {
        let keys: Vec<u32> = (1..=25).collect();
        let tree = TreeBuilder::new(3).unwrap().build(&keys).unwrap();
        assert_eq!(tree.level(usize::MAX).count(), 0);
        assert_eq!(tree.level(32).count(), 0);
        assert_eq!(tree.level(33).count(), 0);

        let binary = TreeBuilder::new(1).unwrap().build(&keys).unwrap();
        assert_eq!(binary.level(64).count(), 0);
        assert_eq!(binary.level(usize::MAX).count(), 0);
        let total: usize = (0..binary.height()).map(|p| binary.level(p).count()).sum();
        assert_eq!(total, binary.node_count());
    }
}
