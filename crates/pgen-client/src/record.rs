//! Proof record assembly: packaging a proof with its provenance fields into
//! the flat JSON object consumers of the generator expect.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use pgen_beacon::{GENESIS_TIME, SECONDS_PER_SLOT};
use pgen_tree::{Hash256, Proof};

/// The output artifact of the generator: the inclusion proof for the
/// finalized checkpoint root plus the provenance needed to anchor it.
///
/// All binary fields are lowercase hex without a `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    /// Slot of the state's latest block header
    pub slot: u64,
    /// Root of the block header tree the proof was extracted from
    pub beacon_block_root: String,
    /// Root of the state tree grafted into the block header tree
    pub beacon_state_root: String,
    /// The finalized checkpoint root being proven
    pub finalized_root: String,
    /// Wall-clock time of the slot, derived from the genesis constant
    pub block_time: u64,
    /// Generalized index of the proven leaf
    pub index: u64,
    /// Value at the proven leaf, hex encoded
    pub leaf: String,
    /// Sibling hashes from the leaf's level up to the root, hex encoded
    pub hashes: Vec<String>,
}

/// Combine a proof with its provenance fields into a [`ProofRecord`]
pub fn assemble(
    proof: &Proof,
    slot: u64,
    block_root: &Hash256,
    state_root: &Hash256,
    finalized_root: &Hash256,
) -> ProofRecord {
    ProofRecord {
        slot,
        beacon_block_root: hex::encode(block_root),
        beacon_state_root: hex::encode(state_root),
        finalized_root: hex::encode(finalized_root),
        // Saturate: slot is attacker-supplied input and must not overflow
        block_time: GENESIS_TIME.saturating_add(slot.saturating_mul(SECONDS_PER_SLOT)),
        index: proof.index,
        leaf: hex::encode(proof.leaf),
        hashes: proof.hashes.iter().map(hex::encode).collect(),
    }
}

/// Format a derived block time for log output
pub fn format_block_time(block_time: u64) -> String {
    match DateTime::from_timestamp(block_time as i64, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => block_time.to_string(),
    }
}
