//! Node implementation for implicit trees.
//!
//! A node is just an ascending run of keys. Whether it is a leaf or an
//! internal node is decided by where it sits in the array, not by its type.

use crate::types::Node;

impl<K> Node<K> {
    /// Creates an empty node with room for `branching` keys.
    pub fn with_capacity(branching: usize) -> Self {
        Self {
            keys: Vec::with_capacity(branching),
        }
    }

    /// Creates a node from keys that are already in ascending order.
    pub fn from_sorted(keys: Vec<K>) -> Self {
        Self { keys }
    }

    /// Creates a node holding a single separator key.
    pub(crate) fn separator(key: K, branching: usize) -> Self {
        let mut node = Self::with_capacity(branching);
        node.keys.push(key);
        node
    }

    /// Returns the number of keys in this node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this node holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true once the node holds `branching` keys and can take no more.
    pub fn is_full(&self, branching: usize) -> bool {
        self.keys.len() >= branching
    }

    /// Get the keys in this node.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Get a key by position.
    pub fn get_key(&self, index: usize) -> Option<&K> {
        self.keys.get(index)
    }

    /// Get the smallest key.
    pub fn first_key(&self) -> Option<&K> {
        self.keys.first()
    }

    /// Get the largest key.
    pub fn last_key(&self) -> Option<&K> {
        self.keys.last()
    }

    /// Append a key at the right end. The caller keeps keys ascending.
    pub(crate) fn push_key(&mut self, key: K) {
        self.keys.push(key);
    }

    /// Consume the node and return its keys.
    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

impl<K> Default for Node<K> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<K> From<Vec<K>> for Node<K> {
    fn from(keys: Vec<K>) -> Self {
        Self::from_sorted(keys)
    }
}
