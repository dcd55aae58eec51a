//! Binary Merkle hash-tree engine used by the proof generator.
//!
//! This crate provides the hash node model, the generalized-index codec,
//! inclusion proof extraction and verification, and subtree grafting. It is
//! synchronous, performs no I/O, and knows nothing about where trees come from.

pub mod gindex;
pub mod graft;
pub mod node;
pub mod proof;

pub use gindex::{depth_of, index_of, path_of, Direction, GeneralizedIndex};
pub use graft::graft;
pub use node::{combine, Hash256, TreeNode, HASH_LEN, ZERO_HASH};
pub use proof::{prove, verify, Proof};

/// Errors produced by the tree engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The generalized index is zero, which addresses no node
    #[error("invalid generalized index: {0}")]
    InvalidIndex(GeneralizedIndex),
    /// The generalized index walks past a leaf of the tree
    #[error("generalized index {0} does not address a node in this tree")]
    IndexOutOfRange(GeneralizedIndex),
}
