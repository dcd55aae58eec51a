//! Hash node model: the binary tree abstraction all other components operate on.

use sha2::{Digest, Sha256};

/// Width of every node value in bytes
pub const HASH_LEN: usize = 32;

/// A 32-byte node value
pub type Hash256 = [u8; HASH_LEN];

/// The all-zero value used for padding leaves
pub const ZERO_HASH: Hash256 = [0u8; HASH_LEN];

/// One node of a binary hash tree.
///
/// A node is either a pure leaf with no children or a branch with exactly two
/// owned children; single-child nodes cannot be represented. For a branch,
/// `value == combine(left.value, right.value)` at all times except between a
/// graft and its ancestor recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Leaf {
        value: Hash256,
    },
    Branch {
        value: Hash256,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Compute a parent value from two child values: SHA-256 over the 64-byte
/// concatenation. This must stay bit-for-bit stable for proofs to be
/// cross-compatible with other implementations.
pub fn combine(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

impl TreeNode {
    /// Create a childless node storing `value`
    pub fn leaf(value: Hash256) -> Self {
        TreeNode::Leaf { value }
    }

    /// Create a padding leaf with the all-zero value
    pub fn zero_leaf() -> Self {
        TreeNode::Leaf { value: ZERO_HASH }
    }

    /// Create a branch node owning both children, with the combined value
    pub fn branch(left: TreeNode, right: TreeNode) -> Self {
        let value = combine(left.value(), right.value());
        TreeNode::Branch {
            value,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The 32-byte value stored at this node
    pub fn value(&self) -> &Hash256 {
        match self {
            TreeNode::Leaf { value } => value,
            TreeNode::Branch { value, .. } => value,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn left(&self) -> Option<&TreeNode> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Branch { left, .. } => Some(left),
        }
    }

    pub fn right(&self) -> Option<&TreeNode> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Branch { right, .. } => Some(right),
        }
    }
}
