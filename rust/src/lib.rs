//! Implicit (pointer-free) B-tree layouts built from sorted keys.
//!
//! An implicit B-tree stores its nodes in one flat array. Every slot holds up
//! to `B` keys and the node at index `i` finds its children at
//! `i * (B + 1) + k` for `k` in `1..=B + 1`, so traversal needs no stored
//! pointers. This crate provides the index arithmetic ([`Indexer`]) and a
//! one-shot bulk loader ([`TreeBuilder`]) that fills the array level by
//! level from an ascending key sequence.
//!
//! Trees are write-once: there is no insertion or deletion after a build.
//!
//! # Examples
//!
//! ```
//! use implicit_btree::{build, Indexer};
//!
//! let keys: Vec<u32> = (1..=25).collect();
//! let tree = build(&keys, 3).unwrap();
//!
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), keys);
//!
//! let indexer = Indexer::new(3).unwrap();
//! assert_eq!(indexer.child(1, 1), Some(5));
//! assert_eq!(indexer.parent(5), Some(1));
//! ```

mod bulk_load;
mod construction;
mod error;
mod indexer;
mod iteration;
mod node;
mod slots;
mod tree_structure;
mod types;
mod validation;

pub use construction::validation::{recommended_branching, validate_branching};
pub use error::{BuildResult, ImplicitTreeError, InitResult};
pub use indexer::Indexer;
pub use iteration::{KeyIterator, LevelIterator, NodeIterator};
pub use slots::{ImplicitSlots, SlotStats};
pub use tree_structure::TreeStats;
pub use types::{
    ImplicitTree, Level, Node, NodeIndex, TrailingRepair, TreeBuilder, DEFAULT_BRANCHING_FACTOR,
    MIN_BRANCHING_FACTOR, ROOT_INDEX,
};

/// Build an implicit tree of `branching` keys per node from ascending `keys`.
///
/// Shorthand for `TreeBuilder::new(branching)?.build(keys)`.
pub fn build<K: Clone>(keys: &[K], branching: usize) -> BuildResult<ImplicitTree<K>> {
    TreeBuilder::new(branching)?.build(keys)
}
