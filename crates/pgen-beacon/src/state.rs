//! Beacon state summary decoder.
//!
//! The pipeline never needs the full beacon state, only its hash tree shape:
//! the 28 top-level field roots of the deneb state plus two fields expanded
//! into real subtrees, `latest_block_header` (for cross-validation against the
//! block header) and `finalized_checkpoint` (the value being proven). The data
//! provider serves exactly that as a JSON summary document.
//!
//! The decoder merkleizes both expansions itself and refuses summaries where
//! they do not reproduce the declared field roots, so a malformed or tampered
//! summary cannot reach the grafting stage.

use serde::Deserialize;
use tracing::debug;

use pgen_tree::{Hash256, TreeNode};

use crate::header::{BlockHeader, HeaderMessage};
use crate::merkle::{chunk_u64, merkleize};
use crate::{parse_root, parse_u64, DecodeError};

/// Number of top-level fields in the deneb beacon state
pub const STATE_FIELD_COUNT: usize = 28;

/// Position of `latest_block_header` among the state fields
const LATEST_BLOCK_HEADER_FIELD: usize = 4;

/// Position of `finalized_checkpoint` among the state fields
const FINALIZED_CHECKPOINT_FIELD: usize = 20;

#[derive(Debug, Deserialize)]
struct SummaryJson {
    slot: String,
    latest_block_header: HeaderMessage,
    finalized_checkpoint: CheckpointJson,
    field_roots: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CheckpointJson {
    epoch: String,
    root: String,
}

/// An epoch boundary reference: `{ epoch, root }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub epoch: u64,
    pub root: Hash256,
}

impl Checkpoint {
    /// The checkpoint's two-chunk SSZ tree; `root` is the right child, which
    /// is what makes the finalized root a real, provable node of the grafted
    /// tree.
    pub fn tree(&self) -> TreeNode {
        TreeNode::branch(
            TreeNode::leaf(chunk_u64(self.epoch)),
            TreeNode::leaf(self.root),
        )
    }
}

/// A decoded beacon state summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSummary {
    pub slot: u64,
    pub latest_block_header: BlockHeader,
    pub finalized_checkpoint: Checkpoint,
    field_roots: Vec<Hash256>,
}

impl StateSummary {
    /// Decode and cross-check a state summary JSON document
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        let summary: SummaryJson = serde_json::from_slice(bytes)?;

        if summary.field_roots.len() != STATE_FIELD_COUNT {
            return Err(DecodeError::FieldCount {
                expected: STATE_FIELD_COUNT,
                got: summary.field_roots.len(),
            });
        }
        let field_roots = summary
            .field_roots
            .iter()
            .map(|root| parse_root("field_roots", root))
            .collect::<Result<Vec<_>, _>>()?;

        let latest_block_header = BlockHeader::from_message(&summary.latest_block_header)?;
        let finalized_checkpoint = Checkpoint {
            epoch: parse_u64("finalized_checkpoint.epoch", &summary.finalized_checkpoint.epoch)?,
            root: parse_root("finalized_checkpoint.root", &summary.finalized_checkpoint.root)?,
        };

        // The expanded fields must merkleize to the roots the summary declares
        // for them, otherwise the summary is internally inconsistent.
        if latest_block_header.hash_tree_root() != field_roots[LATEST_BLOCK_HEADER_FIELD] {
            return Err(DecodeError::FieldRootMismatch {
                field: "latest_block_header",
            });
        }
        if *finalized_checkpoint.tree().value() != field_roots[FINALIZED_CHECKPOINT_FIELD] {
            return Err(DecodeError::FieldRootMismatch {
                field: "finalized_checkpoint",
            });
        }

        let state = StateSummary {
            slot: parse_u64("slot", &summary.slot)?,
            latest_block_header,
            finalized_checkpoint,
            field_roots,
        };
        debug!(slot = state.slot, "decoded beacon state summary");
        Ok(state)
    }

    /// Build the state's hash tree: 28 field leaves padded to 32, with the
    /// `finalized_checkpoint` leaf expanded into its two-chunk subtree.
    pub fn tree(&self) -> TreeNode {
        let leaves = self
            .field_roots
            .iter()
            .enumerate()
            .map(|(index, root)| {
                if index == FINALIZED_CHECKPOINT_FIELD {
                    self.finalized_checkpoint.tree()
                } else {
                    TreeNode::leaf(*root)
                }
            })
            .collect();
        merkleize(leaves)
    }

    /// The state's hash tree root
    pub fn hash_tree_root(&self) -> Hash256 {
        *self.tree().value()
    }

    /// Parent root recorded by the state's own latest block header, used to
    /// cross-validate the state against the block header before grafting
    pub fn parent_root(&self) -> &Hash256 {
        &self.latest_block_header.parent_root
    }
}
