//! SSZ-style merkleization helpers shared by the decoders.

use pgen_tree::{Hash256, TreeNode, ZERO_HASH};

/// Pack a `u64` into a 32-byte chunk, little-endian, zero-padded (SSZ basic
/// type packing).
pub fn chunk_u64(value: u64) -> Hash256 {
    let mut chunk = ZERO_HASH;
    chunk[..8].copy_from_slice(&value.to_le_bytes());
    chunk
}

/// Merkleize a layer of leaves into a single tree, padding with zero-value
/// leaves to the next power of two. An empty input yields a single zero leaf.
pub fn merkleize(mut leaves: Vec<TreeNode>) -> TreeNode {
    if leaves.is_empty() {
        return TreeNode::zero_leaf();
    }
    while !leaves.len().is_power_of_two() {
        leaves.push(TreeNode::zero_leaf());
    }
    while leaves.len() > 1 {
        let mut parents = Vec::with_capacity(leaves.len() / 2);
        let mut children = leaves.into_iter();
        while let (Some(left), Some(right)) = (children.next(), children.next()) {
            parents.push(TreeNode::branch(left, right));
        }
        leaves = parents;
    }
    leaves.swap_remove(0)
}
