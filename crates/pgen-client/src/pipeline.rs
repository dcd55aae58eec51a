//! The proof pipeline: obtain and decode both inputs, cross-validate them,
//! graft the state tree into the block header tree, and extract the
//! finalized-checkpoint inclusion proof.
//!
//! Every stage is fatal on failure; the pipeline never emits a partial proof.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use pgen_beacon::{BlockHeader, DecodeError, StateSummary, FINALIZED_ROOT_GINDEX};
use pgen_tree::{graft, prove, TreeError};

use crate::fetch;
use crate::record::{self, ProofRecord};

/// Everything in a pipeline run the caller gets to choose
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Beacon API base URL; `None` when both inputs come from local files
    pub url: Option<String>,
    /// Local block header JSON instead of fetching it
    pub header_path: Option<PathBuf>,
    /// Local state summary JSON instead of fetching it
    pub state_path: Option<PathBuf>,
    /// Per-request HTTP timeout
    pub timeout: Duration,
    /// Directory fetched inputs are snapshotted to
    pub snapshot_dir: PathBuf,
}

/// Pipeline failures; all of them terminate a run without output
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("parent root mismatch: block header has {header}, state has {state}")]
    CrossReferenceMismatch { header: String, state: String },
    #[error("no leaf in the block tree carries the state root {0}")]
    GraftNotFound(String),
    #[error("block root changed after grafting: {before} became {after}")]
    Consistency { before: String, after: String },
    #[error(transparent)]
    Proof(#[from] TreeError),
    #[error("either a beacon API URL or local paths for both inputs are required")]
    MissingInput,
}

/// Run the pipeline end to end and return the assembled proof record
pub async fn run(config: PipelineConfig) -> Result<ProofRecord, PipelineError> {
    // Block header: local file or beacon API
    let header_bytes = match &config.header_path {
        Some(path) => read_input(path)?,
        None => {
            let url = config.url.as_deref().ok_or(PipelineError::MissingInput)?;
            fetch::fetch_header(url, config.timeout).await?
        }
    };
    let header = BlockHeader::from_json(&header_bytes)?;
    info!(
        slot = header.slot,
        parent_root = %hex::encode(header.parent_root),
        state_root = %hex::encode(header.state_root),
        "decoded beacon block header"
    );
    if config.header_path.is_none() {
        snapshot(
            &config.snapshot_dir,
            &format!("bheader.{}.json", header.slot),
            &header_bytes,
        )?;
    }

    // State summary: local file or beacon API, addressed by the state root
    // the header commits to
    let state_bytes = match &config.state_path {
        Some(path) => read_input(path)?,
        None => {
            let url = config.url.as_deref().ok_or(PipelineError::MissingInput)?;
            fetch::fetch_state_summary(url, &hex::encode(header.state_root), config.timeout)
                .await?
        }
    };
    let state = StateSummary::from_json(&state_bytes)?;
    info!(
        slot = state.slot,
        parent_root = %hex::encode(state.parent_root()),
        "decoded beacon state summary"
    );
    if config.state_path.is_none() {
        // Named after the block's slot so one run's snapshots pair up
        snapshot(
            &config.snapshot_dir,
            &format!("bstate.{}.json", header.slot),
            &state_bytes,
        )?;
    }

    // The state must describe the same point of the chain as the header
    if header.parent_root != *state.parent_root() {
        return Err(PipelineError::CrossReferenceMismatch {
            header: hex::encode(header.parent_root),
            state: hex::encode(state.parent_root()),
        });
    }

    let mut block_tree = header.tree();
    let root_before = *block_tree.value();
    info!(root = %hex::encode(root_before), "block tree before grafting");

    if !graft(&mut block_tree, &header.state_root, state.tree()) {
        return Err(PipelineError::GraftNotFound(hex::encode(header.state_root)));
    }

    // The state tree replaced a leaf carrying its own root, so the block root
    // must come out of the graft untouched; anything else means the state does
    // not belong to this header.
    let root_after = *block_tree.value();
    info!(root = %hex::encode(root_after), "block tree after grafting");
    if root_before != root_after {
        return Err(PipelineError::Consistency {
            before: hex::encode(root_before),
            after: hex::encode(root_after),
        });
    }

    let proof = prove(&block_tree, FINALIZED_ROOT_GINDEX)?;
    let record = record::assemble(
        &proof,
        state.latest_block_header.slot,
        &root_before,
        &header.state_root,
        &state.finalized_checkpoint.root,
    );
    info!(
        slot = record.slot,
        block_time = %record::format_block_time(record.block_time),
        finalized_root = %record.finalized_root,
        "assembled finalized checkpoint proof"
    );
    Ok(record)
}

fn read_input(path: &Path) -> Result<Vec<u8>, PipelineError> {
    std::fs::read(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn snapshot(dir: &Path, filename: &str, data: &[u8]) -> Result<(), PipelineError> {
    std::fs::create_dir_all(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(filename);
    std::fs::write(&path, data).map_err(|source| PipelineError::Io {
        path: path.clone(),
        source,
    })?;
    info!("input snapshot written to {}", path.display());
    Ok(())
}
