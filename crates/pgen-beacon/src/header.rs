//! Beacon block header decoder.
//!
//! Consumes the JSON envelope returned by the beacon API headers endpoint and
//! produces the header's 8-chunk SSZ tree: five field chunks followed by three
//! zero padding chunks, giving the depth-3 tree whose root is the block root.

use serde::Deserialize;
use tracing::debug;

use pgen_tree::{Hash256, TreeNode};

use crate::merkle::{chunk_u64, merkleize};
use crate::{parse_root, parse_u64, DecodeError};

/// JSON envelope of the beacon API headers endpoint
#[derive(Debug, Deserialize)]
struct HeaderEnvelope {
    data: HeaderData,
}

#[derive(Debug, Deserialize)]
struct HeaderData {
    header: SignedHeader,
}

#[derive(Debug, Deserialize)]
struct SignedHeader {
    message: HeaderMessage,
}

/// The header fields as the API serializes them: decimal strings for integers,
/// 0x-prefixed hex for roots
#[derive(Debug, Deserialize)]
pub(crate) struct HeaderMessage {
    pub slot: String,
    pub proposer_index: String,
    pub parent_root: String,
    pub state_root: String,
    pub body_root: String,
}

/// A decoded beacon block header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub slot: u64,
    pub proposer_index: u64,
    pub parent_root: Hash256,
    pub state_root: Hash256,
    pub body_root: Hash256,
}

impl BlockHeader {
    /// Decode a header from the beacon API headers JSON envelope
    pub fn from_json(bytes: &[u8]) -> Result<Self, DecodeError> {
        let envelope: HeaderEnvelope = serde_json::from_slice(bytes)?;
        let header = Self::from_message(&envelope.data.header.message)?;
        debug!(slot = header.slot, "decoded beacon block header");
        Ok(header)
    }

    pub(crate) fn from_message(message: &HeaderMessage) -> Result<Self, DecodeError> {
        Ok(BlockHeader {
            slot: parse_u64("slot", &message.slot)?,
            proposer_index: parse_u64("proposer_index", &message.proposer_index)?,
            parent_root: parse_root("parent_root", &message.parent_root)?,
            state_root: parse_root("state_root", &message.state_root)?,
            body_root: parse_root("body_root", &message.body_root)?,
        })
    }

    /// Build the header's SSZ hash tree. The `state_root` leaf (generalized
    /// index 11) is the placeholder the state tree is later grafted into.
    pub fn tree(&self) -> TreeNode {
        merkleize(vec![
            TreeNode::leaf(chunk_u64(self.slot)),
            TreeNode::leaf(chunk_u64(self.proposer_index)),
            TreeNode::leaf(self.parent_root),
            TreeNode::leaf(self.state_root),
            TreeNode::leaf(self.body_root),
        ])
    }

    /// The header's hash tree root (the beacon block root)
    pub fn hash_tree_root(&self) -> Hash256 {
        *self.tree().value()
    }
}
