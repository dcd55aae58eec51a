//! Generalized-index codec: bit-path encoding between an integer index and a
//! root-to-node traversal sequence.
//!
//! The root is index 1; for any node, the left child is `2g` and the right
//! child is `2g + 1`. Stripping the leading one bit of `g` and reading the
//! remaining bits MSB-first yields the directions taken from the root.

use crate::TreeError;

/// Integer path-encoding of a node position in a binary tree
pub type GeneralizedIndex = u64;

/// One step of a root-to-node traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Depth of the node addressed by `index` below the root (bit length minus one)
pub fn depth_of(index: GeneralizedIndex) -> Result<usize, TreeError> {
    if index == 0 {
        return Err(TreeError::InvalidIndex(index));
    }
    Ok((GeneralizedIndex::BITS - 1 - index.leading_zeros()) as usize)
}

/// Decode `index` into the sequence of directions from the root to the node
pub fn path_of(index: GeneralizedIndex) -> Result<Vec<Direction>, TreeError> {
    let depth = depth_of(index)?;
    let mut path = Vec::with_capacity(depth);
    for level in (0..depth).rev() {
        if (index >> level) & 1 == 1 {
            path.push(Direction::Right);
        } else {
            path.push(Direction::Left);
        }
    }
    Ok(path)
}

/// Re-encode a direction sequence into a generalized index (inverse of
/// [`path_of`]). Paths longer than 63 steps are not addressable in a `u64`.
pub fn index_of(path: &[Direction]) -> GeneralizedIndex {
    let mut index: GeneralizedIndex = 1;
    for dir in path {
        index = (index << 1) | matches!(dir, Direction::Right) as GeneralizedIndex;
    }
    index
}
