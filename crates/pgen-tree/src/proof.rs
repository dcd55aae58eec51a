//! Inclusion proof extraction and verification over generalized indices.

use serde::{Deserialize, Serialize};

use crate::gindex::{path_of, Direction, GeneralizedIndex};
use crate::node::{combine, Hash256, TreeNode};
use crate::TreeError;

/// An inclusion proof: the value at a generalized index together with the
/// sibling hashes needed to recompute the tree root.
///
/// `hashes` holds one sibling per level, ordered from the target's own level
/// up to the level adjacent to the root, so `hashes.len()` equals the depth of
/// `index`. The proof owns no tree data and is immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub index: GeneralizedIndex,
    pub leaf: Hash256,
    pub hashes: Vec<Hash256>,
}

/// Walk `tree` to the node addressed by `index`, collecting sibling hashes.
///
/// Returns `IndexOutOfRange` if the path runs past a leaf before reaching the
/// target, i.e. no node exists at `index` in this tree. The walk is read-only.
pub fn prove(tree: &TreeNode, index: GeneralizedIndex) -> Result<Proof, TreeError> {
    let path = path_of(index)?;
    let mut current = tree;
    let mut hashes = Vec::with_capacity(path.len());
    for dir in &path {
        let TreeNode::Branch { left, right, .. } = current else {
            return Err(TreeError::IndexOutOfRange(index));
        };
        match dir {
            Direction::Left => {
                hashes.push(*right.value());
                current = left;
            }
            Direction::Right => {
                hashes.push(*left.value());
                current = right;
            }
        }
    }
    // Siblings were collected root-first; proofs carry them deepest-first
    hashes.reverse();
    Ok(Proof {
        index,
        leaf: *current.value(),
        hashes,
    })
}

/// Recompute a root from `leaf` and the sibling `hashes` and compare it to
/// `expected_root`.
///
/// The path of `index` is replayed from the leaf toward the root, consuming
/// `hashes` in the order [`prove`] produced them. At each step the running
/// value sits on the side its own direction bit says: a left step makes it the
/// left operand of [`combine`].
pub fn verify(
    leaf: &Hash256,
    index: GeneralizedIndex,
    hashes: &[Hash256],
    expected_root: &Hash256,
) -> bool {
    let Ok(path) = path_of(index) else {
        return false;
    };
    if hashes.len() != path.len() {
        return false;
    }
    let mut current = *leaf;
    for (dir, sibling) in path.iter().rev().zip(hashes) {
        current = match dir {
            Direction::Left => combine(&current, sibling),
            Direction::Right => combine(sibling, &current),
        };
    }
    current == *expected_root
}

impl Proof {
    /// Convenience wrapper around [`verify`] for a proof produced by [`prove`]
    pub fn verify(&self, expected_root: &Hash256) -> bool {
        verify(&self.leaf, self.index, &self.hashes, expected_root)
    }
}
