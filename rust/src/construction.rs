//! Construction and configuration logic for TreeBuilder.
//!
//! A builder is configured once with a branching factor and a trailing
//! repair policy. The bulk-load pass itself lives in `bulk_load`.

use crate::error::InitResult;
use crate::indexer::Indexer;
use crate::types::{TrailingRepair, TreeBuilder, DEFAULT_BRANCHING_FACTOR};

impl TreeBuilder {
    /// Create a builder for nodes of `branching` keys.
    ///
    /// # Arguments
    ///
    /// * `branching` - Keys per node, `B` (minimum 1)
    ///
    /// # Returns
    ///
    /// Returns `Ok(TreeBuilder)` if the branching factor is valid,
    /// `Err(ImplicitTreeError)` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use implicit_btree::TreeBuilder;
    ///
    /// let builder = TreeBuilder::new(3).unwrap();
    /// assert_eq!(builder.branching(), 3);
    /// assert!(TreeBuilder::new(0).is_err());
    /// ```
    pub fn new(branching: usize) -> InitResult<Self> {
        Ok(Self {
            indexer: Indexer::new(branching)?,
            repair: TrailingRepair::default(),
        })
    }

    /// Create a builder with the default branching factor.
    ///
    /// This is equivalent to calling `new(DEFAULT_BRANCHING_FACTOR)`.
    pub fn with_default_branching() -> InitResult<Self> {
        Self::new(DEFAULT_BRANCHING_FACTOR)
    }

    /// Choose how trailing nodes without a parent slot are handled.
    ///
    /// # Examples
    ///
    /// ```
    /// use implicit_btree::{TrailingRepair, TreeBuilder};
    ///
    /// let builder = TreeBuilder::new(3)
    ///     .unwrap()
    ///     .with_trailing_repair(TrailingRepair::ParentSlot);
    /// assert_eq!(builder.trailing_repair(), TrailingRepair::ParentSlot);
    /// ```
    pub fn with_trailing_repair(mut self, repair: TrailingRepair) -> Self {
        self.repair = repair;
        self
    }

    /// Keys per node.
    pub fn branching(&self) -> usize {
        self.indexer.branching()
    }

    /// Index arithmetic used by this builder.
    pub fn indexer(&self) -> &Indexer {
        &self.indexer
    }

    /// Configured trailing repair policy.
    pub fn trailing_repair(&self) -> TrailingRepair {
        self.repair
    }
}

impl Default for TreeBuilder {
    /// Create a builder with the default branching factor.
    fn default() -> Self {
        Self {
            indexer: Indexer::default(),
            repair: TrailingRepair::default(),
        }
    }
}

/// Validation utilities for construction
pub mod validation {
    use crate::error::{ImplicitTreeError, InitResult};
    use crate::types::MIN_BRANCHING_FACTOR;

    /// Validate that a branching factor is usable.
    pub fn validate_branching(branching: usize) -> InitResult<()> {
        if branching < MIN_BRANCHING_FACTOR {
            Err(ImplicitTreeError::invalid_branching(
                branching,
                MIN_BRANCHING_FACTOR,
            ))
        } else if branching == usize::MAX {
            Err(ImplicitTreeError::InvalidBranchingFactor(format!(
                "Branching factor {} leaves no room for a child count",
                branching
            )))
        } else {
            Ok(())
        }
    }

    /// Get a branching factor suited to the expected number of keys.
    ///
    /// Larger inputs get wider nodes so the tree stays shallow.
    pub fn recommended_branching(expected_keys: usize) -> usize {
        if expected_keys < 100 {
            4
        } else if expected_keys < 10_000 {
            16
        } else if expected_keys < 1_000_000 {
            64
        } else {
            256
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MIN_BRANCHING_FACTOR;

    #[test]
    fn test_builder_construction() {
        let builder = TreeBuilder::new(7).unwrap();
        assert_eq!(builder.branching(), 7);
        assert_eq!(builder.indexer().fanout(), 8);
        assert_eq!(builder.trailing_repair(), TrailingRepair::Settle);
    }

    #[test]
    fn test_builder_invalid_branching() {
        let result = TreeBuilder::new(0);
        assert!(result.unwrap_err().is_branching_error());
        assert!(TreeBuilder::new(MIN_BRANCHING_FACTOR).is_ok());
    }

    #[test]
    fn test_builder_default() {
        let builder = TreeBuilder::default();
        assert_eq!(builder.branching(), DEFAULT_BRANCHING_FACTOR);
        assert_eq!(builder, TreeBuilder::with_default_branching().unwrap());
    }

    #[test]
    fn test_validation() {
        assert!(validation::validate_branching(1).is_ok());
        assert!(validation::validate_branching(16).is_ok());
        assert!(validation::validate_branching(0).is_err());
        assert!(validation::validate_branching(usize::MAX).is_err());
    }

    #[test]
    fn test_recommended_branching() {
        assert_eq!(validation::recommended_branching(50), 4);
        assert_eq!(validation::recommended_branching(5_000), 16);
        assert_eq!(validation::recommended_branching(500_000), 64);
        assert_eq!(validation::recommended_branching(5_000_000), 256);
        for n in [0, 99, 100, 9_999, 999_999] {
            assert!(validation::validate_branching(validation::recommended_branching(n)).is_ok());
        }
    }
}
