//! Error handling and result types for implicit tree construction.
//!
//! Building an implicit tree is pure computation, so the taxonomy is small:
//! bad configuration, a fatal structural inconsistency during the carry walk,
//! and invariant violations reported by validation.

/// Error type for implicit tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImplicitTreeError {
    /// Branching factor below the supported minimum.
    InvalidBranchingFactor(String),
    /// The input did not match the size the tree was shaped for.
    StructuralInconsistency(String),
    /// A built tree failed an invariant check.
    CorruptedTree(String),
}

impl ImplicitTreeError {
    /// Create an InvalidBranchingFactor error with context
    pub fn invalid_branching(branching: usize, min_required: usize) -> Self {
        Self::InvalidBranchingFactor(format!(
            "Branching factor {} is invalid (minimum required: {})",
            branching, min_required
        ))
    }

    /// Create a StructuralInconsistency error for a carry walk that found no room.
    pub fn carry_overflow(height: usize, consumed: usize, total: usize) -> Self {
        Self::StructuralInconsistency(format!(
            "no room for separator above level 0 (height {}, {} of {} keys placed)",
            height, consumed, total
        ))
    }

    /// Create a StructuralInconsistency error for an input whose reported
    /// length differs from the number of keys it yielded.
    pub fn length_mismatch(reported: usize, consumed: usize) -> Self {
        Self::StructuralInconsistency(format!(
            "input reported {} keys but yielded {}",
            reported, consumed
        ))
    }

    /// Create a CorruptedTree error with context
    pub fn corrupted_tree(component: &str, details: &str) -> Self {
        Self::CorruptedTree(format!("{} corruption: {}", component, details))
    }

    /// Check if this error is a configuration error
    pub fn is_branching_error(&self) -> bool {
        matches!(self, Self::InvalidBranchingFactor(_))
    }

    /// Check if this error aborted a build
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StructuralInconsistency(_))
    }
}

impl std::fmt::Display for ImplicitTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImplicitTreeError::InvalidBranchingFactor(msg) => {
                write!(f, "Invalid branching factor: {}", msg)
            }
            ImplicitTreeError::StructuralInconsistency(msg) => {
                write!(f, "Structural inconsistency: {}", msg)
            }
            ImplicitTreeError::CorruptedTree(msg) => write!(f, "Corrupted tree: {}", msg),
        }
    }
}

impl std::error::Error for ImplicitTreeError {}

/// Internal result type for tree operations
pub(crate) type TreeResult<T> = Result<T, ImplicitTreeError>;

/// Result type for indexer and builder construction
pub type InitResult<T> = Result<T, ImplicitTreeError>;

/// Result type for bulk loading
pub type BuildResult<T> = Result<T, ImplicitTreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_branching_message() {
        let err = ImplicitTreeError::invalid_branching(0, 1);
        assert!(err.is_branching_error());
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Invalid branching factor: Branching factor 0 is invalid (minimum required: 1)"
        );
    }

    #[test]
    fn test_carry_overflow_is_fatal() {
        let err = ImplicitTreeError::carry_overflow(2, 9, 20);
        assert!(err.is_fatal());
        assert!(err.to_string().contains("9 of 20 keys"));
    }

    #[test]
    fn test_length_mismatch_is_fatal() {
        let err = ImplicitTreeError::length_mismatch(10, 4);
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Structural inconsistency: input reported 10 keys but yielded 4"
        );
    }

    #[test]
    fn test_corrupted_tree_message() {
        let err = ImplicitTreeError::corrupted_tree("Node 4", "holds 5 keys");
        assert_eq!(err.to_string(), "Corrupted tree: Node 4 corruption: holds 5 keys");
    }
}
