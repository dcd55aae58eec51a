//! Decoders turning beacon chain API documents into hash trees.
//!
//! Two structures are decoded: the beacon block header (the outer tree the
//! proof is extracted from) and a beacon state summary (the inner tree grafted
//! into the header's `state_root` leaf). Both follow SSZ merkleization rules
//! so the resulting roots match what the chain itself commits to.

pub mod header;
pub mod merkle;
pub mod state;

pub use header::BlockHeader;
pub use state::{Checkpoint, StateSummary, STATE_FIELD_COUNT};

/// Generalized index of `finalized_checkpoint.root` relative to the block
/// header root: `state_root` sits at index 11 in the 8-chunk header tree,
/// `finalized_checkpoint` is field 20 of the 32-chunk state tree, and `root`
/// is the checkpoint's right child. Concatenating the three paths gives 745.
pub const FINALIZED_ROOT_GINDEX: u64 = 745;

/// Mainnet genesis time (UNIX seconds), the base of slot-to-time conversion
pub const GENESIS_TIME: u64 = 1_606_824_023;

/// Seconds between consecutive slots on mainnet
pub const SECONDS_PER_SLOT: u64 = 12;

/// Errors produced while decoding beacon API documents
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("field {field}: invalid hex: {source}")]
    Hex {
        field: &'static str,
        source: hex::FromHexError,
    },
    #[error("field {field}: expected 32 bytes, got {len}")]
    BadLength { field: &'static str, len: usize },
    #[error("field {field}: invalid integer {value:?}")]
    BadInteger { field: &'static str, value: String },
    #[error("expected {expected} state field roots, got {got}")]
    FieldCount { expected: usize, got: usize },
    #[error("{field} expansion does not merkleize to its declared field root")]
    FieldRootMismatch { field: &'static str },
}

/// Parse a 32-byte root from a hex string, with or without a `0x` prefix
pub(crate) fn parse_root(
    field: &'static str,
    value: &str,
) -> Result<pgen_tree::Hash256, DecodeError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(stripped).map_err(|source| DecodeError::Hex { field, source })?;
    bytes.try_into().map_err(|bytes: Vec<u8>| DecodeError::BadLength {
        field,
        len: bytes.len(),
    })
}

/// Parse a decimal integer field (the beacon API encodes integers as strings)
pub(crate) fn parse_u64(field: &'static str, value: &str) -> Result<u64, DecodeError> {
    value.parse().map_err(|_| DecodeError::BadInteger {
        field,
        value: value.to_string(),
    })
}
