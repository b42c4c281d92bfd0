//! Validation and debugging utilities for ImplicitTree.
//!
//! The builder trusts its input to be sorted and does not check its own
//! output. These checks exist for tests and for callers that want to confirm
//! a tree before handing it to search code.

use crate::error::{ImplicitTreeError, TreeResult};
use crate::types::{ImplicitTree, NodeIndex};

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord> ImplicitTree<K> {
    /// Check if the tree satisfies all layout invariants.
    pub fn check_invariants(&self) -> bool {
        self.validate().is_ok()
    }

    /// Check invariants with detailed error reporting.
    pub fn check_invariants_detailed(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }

    /// Check every layout invariant, returning the first violation found.
    ///
    /// - no node holds more than `B` keys
    /// - every populated slot lies within the computed height
    /// - every populated non-root slot has a populated parent
    /// - empty nodes only appear above populated children
    /// - the in-order walk visits every key once, in ascending order
    pub fn validate(&self) -> Result<(), ImplicitTreeError> {
        self.check_node_capacity()?;
        self.check_levels()?;
        self.check_parents()?;
        self.check_empty_nodes()?;
        self.check_in_order()
    }

    fn check_node_capacity(&self) -> TreeResult<()> {
        let branching = self.branching();
        for (index, node) in self.nodes() {
            if node.len() > branching {
                return Err(ImplicitTreeError::corrupted_tree(
                    &format!("Node {}", index),
                    &format!("holds {} keys, capacity is {}", node.len(), branching),
                ));
            }
        }
        Ok(())
    }

    fn check_levels(&self) -> TreeResult<()> {
        let limit = self.indexer.first_node_index(self.height);
        match self.slots.last_index() {
            Some(last) if last >= limit => Err(ImplicitTreeError::corrupted_tree(
                &format!("Node {}", last),
                &format!("lies below the last level of a height {} tree", self.height),
            )),
            _ => Ok(()),
        }
    }

    fn check_parents(&self) -> TreeResult<()> {
        let orphans: Vec<NodeIndex> = self
            .slots
            .indices()
            .filter(|&index| {
                self.indexer
                    .parent(index)
                    .is_some_and(|parent| !self.slots.contains(parent))
            })
            .collect();
        if orphans.is_empty() {
            Ok(())
        } else {
            Err(ImplicitTreeError::corrupted_tree(
                "Parent slots",
                &format!("nodes {:?} have no populated parent", orphans),
            ))
        }
    }

    fn check_empty_nodes(&self) -> TreeResult<()> {
        for (index, node) in self.nodes() {
            if node.is_empty() && self.is_leaf(index) {
                return Err(ImplicitTreeError::corrupted_tree(
                    &format!("Node {}", index),
                    "is empty and has no children",
                ));
            }
        }
        Ok(())
    }

    fn check_in_order(&self) -> TreeResult<()> {
        let mut visited = 0;
        let mut previous: Option<&K> = None;
        for key in self.keys() {
            if previous.is_some_and(|prev| prev > key) {
                return Err(ImplicitTreeError::corrupted_tree(
                    "Key order",
                    &format!("in-order walk descends at position {}", visited),
                ));
            }
            previous = Some(key);
            visited += 1;
        }
        if visited != self.len {
            return Err(ImplicitTreeError::corrupted_tree(
                "Key count",
                &format!("in-order walk reaches {} of {} keys", visited, self.len),
            ));
        }
        Ok(())
    }
}
