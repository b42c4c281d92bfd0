//! Bulk loading of sorted keys into an implicit tree.
//!
//! The pass alternates between filling the next leaf with up to `B` keys and
//! carrying the following key up as a separator. Each level keeps a cursor
//! pointing at the slot that receives its next key; a cursor moves right
//! only when its node is full and a separator has to pass it.

use tracing::{debug, trace};

use crate::error::{BuildResult, ImplicitTreeError, TreeResult};
use crate::indexer::Indexer;
use crate::slots::ImplicitSlots;
use crate::types::{ImplicitTree, Level, Node, NodeIndex, TrailingRepair, TreeBuilder};

impl TreeBuilder {
    /// Build an implicit tree from keys sorted in ascending order.
    ///
    /// Sortedness is not checked. Unsorted input produces a tree whose
    /// in-order walk is not ascending; [`ImplicitTree::validate`] reports it.
    ///
    /// # Errors
    ///
    /// Returns `StructuralInconsistency` if a separator finds no room at any
    /// level, in which case no tree is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use implicit_btree::TreeBuilder;
    ///
    /// let builder = TreeBuilder::new(3).unwrap();
    /// let tree = builder.build(&[1, 2, 3]).unwrap();
    /// assert_eq!(tree.node_count(), 1);
    /// assert_eq!(tree.root().unwrap().keys(), &[1, 2, 3]);
    /// ```
    pub fn build<K: Clone>(&self, keys: &[K]) -> BuildResult<ImplicitTree<K>> {
        self.load(keys.iter().cloned())
    }

    /// Build an implicit tree by moving keys out of an ascending vector.
    pub fn build_owned<K>(&self, keys: Vec<K>) -> BuildResult<ImplicitTree<K>> {
        self.load(keys.into_iter())
    }

    /// Sort `keys` and build an implicit tree from them.
    ///
    /// # Examples
    ///
    /// ```
    /// use implicit_btree::TreeBuilder;
    ///
    /// let tree = TreeBuilder::new(2).unwrap().sort_and_build(vec![5, 1, 4, 2, 3]).unwrap();
    /// assert_eq!(tree.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn sort_and_build<K: Ord>(&self, mut keys: Vec<K>) -> BuildResult<ImplicitTree<K>> {
        keys.sort();
        self.build_owned(keys)
    }

    /// Run one bulk-load pass over an exact-size stream of ascending keys.
    ///
    /// The tree is shaped from `keys.len()`. A stream that yields a different
    /// number of keys is rejected with `StructuralInconsistency`.
    pub fn load<K, I>(&self, keys: I) -> BuildResult<ImplicitTree<K>>
    where
        I: ExactSizeIterator<Item = K>,
    {
        let indexer = self.indexer;
        let len = keys.len();
        let height = indexer.height(len);
        debug!(keys = len, branching = indexer.branching(), height, "bulk load started");

        let mut pass = LoadPass::new(indexer, height);
        pass.run(keys)?;
        if pass.consumed != len {
            return Err(ImplicitTreeError::length_mismatch(len, pass.consumed));
        }
        let slots = pass.finish(self.repair);

        debug!(nodes = slots.len(), span = slots.span(), "bulk load finished");
        Ok(ImplicitTree {
            indexer,
            height,
            len,
            slots,
        })
    }
}

/// State of one bulk-load pass. Dropped when the pass returns.
struct LoadPass<K> {
    indexer: Indexer,
    height: usize,
    /// Next slot to fill at each level, `next[0]` for the root level.
    next: Vec<NodeIndex>,
    slots: ImplicitSlots<Node<K>>,
    consumed: usize,
    /// Index of the final leaf if the input ended right after a leaf.
    trailing_leaf: Option<NodeIndex>,
}

impl<K> LoadPass<K> {
    fn new(indexer: Indexer, height: usize) -> Self {
        Self {
            indexer,
            height,
            next: (0..height).map(|level| indexer.first_node_index(level)).collect(),
            slots: ImplicitSlots::new(),
            consumed: 0,
            trailing_leaf: None,
        }
    }

    fn run<I>(&mut self, mut keys: I) -> TreeResult<()>
    where
        I: ExactSizeIterator<Item = K>,
    {
        let total = keys.len();
        let Some(leaf_level) = self.height.checked_sub(1) else {
            return Ok(());
        };
        let branching = self.indexer.branching();

        loop {
            let chunk: Vec<K> = keys.by_ref().take(branching).collect();
            if chunk.is_empty() {
                // input ran out on a separator
                return Ok(());
            }
            let leaf_index = self.next[leaf_level];
            self.consumed += chunk.len();
            self.slots.insert(leaf_index, Node::from_sorted(chunk));

            let Some(separator) = keys.next() else {
                self.trailing_leaf = Some(leaf_index);
                return Ok(());
            };
            self.next[leaf_level] += 1;
            self.consumed += 1;
            if !self.carry(leaf_level, separator) {
                return Err(ImplicitTreeError::carry_overflow(
                    self.height,
                    self.consumed,
                    total,
                ));
            }
        }
    }

    /// Place `separator` in the nearest ancestor level with room, closing
    /// full nodes on the way up. Returns false if no level had room.
    fn carry(&mut self, leaf_level: Level, separator: K) -> bool {
        let branching = self.indexer.branching();
        let mut level = leaf_level;
        while level > 0 {
            level -= 1;
            let index = self.next[level];
            if let Some(node) = self.slots.get_mut(index) {
                if node.is_full(branching) {
                    trace!(level, index, "node closed");
                    self.next[level] += 1;
                    continue;
                }
                node.push_key(separator);
                return true;
            }
            self.slots.insert(index, Node::separator(separator, branching));
            return true;
        }
        false
    }

    fn finish(mut self, repair: TrailingRepair) -> ImplicitSlots<Node<K>> {
        if let Some(leaf_index) = self.trailing_leaf {
            self.lift_trailing_leaf(leaf_index, repair);
        }
        if repair == TrailingRepair::Settle {
            self.pad_orphans();
        }
        self.slots
    }

    /// Move the final leaf into its parent slot while that slot is empty.
    ///
    /// `ParentSlot` stops after one move. `Settle` keeps going until the
    /// parent exists, as long as the node being moved has no children.
    fn lift_trailing_leaf(&mut self, leaf_index: NodeIndex, repair: TrailingRepair) {
        let mut index = leaf_index;
        while let Some(parent) = self.indexer.parent(index) {
            if self.slots.contains(parent) || self.has_children(index) {
                break;
            }
            if let Some(node) = self.slots.remove(index) {
                self.slots.insert(parent, node);
            }
            debug!(from = index, to = parent, "moved trailing leaf into empty parent slot");
            index = parent;
            if repair == TrailingRepair::ParentSlot {
                break;
            }
        }
    }

    /// Give every node whose parent slot is empty a chain of empty
    /// ancestors up to the nearest populated one.
    fn pad_orphans(&mut self) {
        let orphans: Vec<NodeIndex> = self
            .slots
            .indices()
            .filter(|&index| self.is_orphan(index))
            .collect();

        for orphan in orphans {
            let mut index = orphan;
            while let Some(parent) = self.indexer.parent(index) {
                if self.slots.contains(parent) {
                    break;
                }
                debug!(orphan, slot = parent, "padding empty ancestor");
                self.slots
                    .insert(parent, Node::with_capacity(self.indexer.branching()));
                index = parent;
            }
        }
    }

    fn is_orphan(&self, index: NodeIndex) -> bool {
        self.indexer
            .parent(index)
            .is_some_and(|parent| !self.slots.contains(parent))
    }

    fn has_children(&self, index: NodeIndex) -> bool {
        self.indexer
            .children(index)
            .any(|child| self.slots.contains(child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(tree: &ImplicitTree<u32>) -> Vec<(NodeIndex, Vec<u32>)> {
        tree.nodes()
            .map(|(index, node)| (index, node.keys().to_vec()))
            .collect()
    }

    fn ascending(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_empty_input() {
        let tree = TreeBuilder::new(3).unwrap().build::<u32>(&[]).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node_count(), 0);
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_single_leaf() {
        let tree = TreeBuilder::new(3).unwrap().build(&ascending(3)).unwrap();
        assert_eq!(tree.height(), 1);
        assert_eq!(layout(&tree), vec![(0, vec![1, 2, 3])]);
    }

    #[test]
    fn test_partial_single_leaf() {
        let tree = TreeBuilder::new(3).unwrap().build(&ascending(2)).unwrap();
        assert_eq!(layout(&tree), vec![(0, vec![1, 2])]);
    }

    #[test]
    fn test_seven_keys_b3() {
        let tree = TreeBuilder::new(3).unwrap().build(&ascending(7)).unwrap();
        assert_eq!(tree.height(), 2);
        assert_eq!(
            layout(&tree),
            vec![(0, vec![4]), (1, vec![1, 2, 3]), (2, vec![5, 6, 7])]
        );
    }

    #[test]
    fn test_input_ends_on_separator() {
        let tree = TreeBuilder::new(3).unwrap().build(&ascending(8)).unwrap();
        assert_eq!(
            layout(&tree),
            vec![(0, vec![4, 8]), (1, vec![1, 2, 3]), (2, vec![5, 6, 7])]
        );
    }

    #[test]
    fn test_twenty_five_keys_b3() {
        let tree = TreeBuilder::new(3).unwrap().build(&ascending(25)).unwrap();
        assert_eq!(tree.height(), 3);
        assert_eq!(
            layout(&tree),
            vec![
                (0, vec![16]),
                (1, vec![4, 8, 12]),
                (2, vec![20, 24]),
                (5, vec![1, 2, 3]),
                (6, vec![5, 6, 7]),
                (7, vec![9, 10, 11]),
                (8, vec![13, 14, 15]),
                (9, vec![17, 18, 19]),
                (10, vec![21, 22, 23]),
                (11, vec![25]),
            ]
        );
    }

    #[test]
    fn test_trailing_leaf_moves_into_parent_slot() {
        // leaves 5..=8 fill node 1, key 16 closes it and lands in the root,
        // so the final leaf [17] would sit at 9 under an empty slot 2
        let tree = TreeBuilder::new(3).unwrap().build(&ascending(17)).unwrap();
        assert_eq!(tree.get(9), None);
        assert_eq!(tree.get(2).unwrap().keys(), &[17]);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), ascending(17));
    }

    #[test]
    fn test_settle_moves_leaf_more_than_one_level() {
        let keys = ascending(9);
        let tree = TreeBuilder::new(1).unwrap().build(&keys).unwrap();
        assert_eq!(tree.get(11), None);
        assert_eq!(tree.get(5), None);
        assert_eq!(tree.get(2).unwrap().keys(), &[9]);
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_parent_slot_moves_leaf_once() {
        let keys = ascending(9);
        let tree = TreeBuilder::new(1)
            .unwrap()
            .with_trailing_repair(TrailingRepair::ParentSlot)
            .build(&keys)
            .unwrap();
        assert_eq!(tree.get(11), None);
        assert_eq!(tree.get(5).unwrap().keys(), &[9]);
        assert_eq!(tree.get(2), None);
        // key 9 is stranded below an empty slot
        assert_eq!(tree.keys().count(), 8);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn test_settle_pads_orphaned_separator() {
        let keys = ascending(34);
        let tree = TreeBuilder::new(1).unwrap().build(&keys).unwrap();
        assert_eq!(tree.get(23).unwrap().keys(), &[34]);
        for padded in [11, 5, 2] {
            assert!(tree.get(padded).unwrap().is_empty(), "slot {}", padded);
        }
        assert_eq!(tree.keys().copied().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_build_owned_and_slice_agree() {
        let builder = TreeBuilder::new(4).unwrap();
        let keys: Vec<String> = (0..40).map(|i| format!("{:03}", i)).collect();
        let borrowed = builder.build(&keys).unwrap();
        let owned = builder.build_owned(keys.clone()).unwrap();
        assert_eq!(borrowed, owned);
        assert_eq!(owned.keys().cloned().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_overlong_iterator_is_structural_inconsistency() {
        // reports one key but yields many, so the height is too small
        struct Lying(std::ops::Range<u32>);
        impl Iterator for Lying {
            type Item = u32;
            fn next(&mut self) -> Option<u32> {
                self.0.next()
            }
        }
        impl ExactSizeIterator for Lying {
            fn len(&self) -> usize {
                1
            }
        }

        let err = TreeBuilder::new(2).unwrap().load(Lying(0..50)).unwrap_err();
        assert!(err.is_fatal());
    }

    /// Yields `keys` while claiming `reported` as its length.
    struct Misreported {
        keys: std::ops::Range<u32>,
        reported: usize,
    }

    impl Iterator for Misreported {
        type Item = u32;
        fn next(&mut self) -> Option<u32> {
            self.keys.next()
        }
    }

    impl ExactSizeIterator for Misreported {
        fn len(&self) -> usize {
            self.reported
        }
    }

    #[test]
    fn test_short_iterator_is_structural_inconsistency() {
        let builder = TreeBuilder::new(3).unwrap();
        let err = builder
            .load(Misreported {
                keys: 1..5,
                reported: 10,
            })
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("reported 10 keys but yielded 4"), "{}", err);
    }

    #[test]
    fn test_slightly_long_iterator_is_structural_inconsistency() {
        // one extra key still fits the height computed for six
        let builder = TreeBuilder::new(3).unwrap();
        let err = builder
            .load(Misreported {
                keys: 1..8,
                reported: 6,
            })
            .unwrap_err();
        assert!(err.to_string().contains("reported 6 keys but yielded 7"), "{}", err);
    }

    #[test]
    fn test_honest_iterator_len_matches_tree() {
        let builder = TreeBuilder::new(3).unwrap();
        let tree = builder
            .load(Misreported {
                keys: 1..26,
                reported: 25,
            })
            .unwrap();
        assert_eq!(tree.len(), 25);
        assert_eq!(tree.keys().count(), 25);
    }
}
