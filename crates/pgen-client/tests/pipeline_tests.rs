//! End-to-end pipeline tests over a self-consistent header/state fixture,
//! served over HTTP (wiremock) or from local files.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pgen_beacon::{BlockHeader, Checkpoint, StateSummary, GENESIS_TIME, STATE_FIELD_COUNT};
use pgen_client::{run, PipelineConfig, PipelineError, ProofRecord};

const SLOT: u64 = 8_300_000;
const PARENT_ROOT: [u8; 32] = [0x11; 32];
const FINALIZED_ROOT: [u8; 32] = [0xAA; 32];

fn hex32(byte: u8) -> String {
    format!("0x{}", hex::encode([byte; 32]))
}

/// The state summary document: 28 field roots with `latest_block_header` and
/// `finalized_checkpoint` expanded consistently.
fn summary_fixture() -> (String, StateSummary) {
    let latest_block_header = BlockHeader {
        slot: SLOT,
        proposer_index: 77,
        parent_root: PARENT_ROOT,
        // A state's own latest block header carries a zeroed state root
        state_root: [0x00; 32],
        body_root: [0x33; 32],
    };
    let finalized_checkpoint = Checkpoint {
        epoch: 259_374,
        root: FINALIZED_ROOT,
    };

    let mut field_roots: Vec<String> = (0..STATE_FIELD_COUNT as u8).map(hex32).collect();
    field_roots[4] = format!("0x{}", hex::encode(latest_block_header.hash_tree_root()));
    field_roots[20] = format!("0x{}", hex::encode(finalized_checkpoint.tree().value()));

    let doc = json!({
        "slot": SLOT.to_string(),
        "latest_block_header": {
            "slot": latest_block_header.slot.to_string(),
            "proposer_index": latest_block_header.proposer_index.to_string(),
            "parent_root": format!("0x{}", hex::encode(latest_block_header.parent_root)),
            "state_root": format!("0x{}", hex::encode(latest_block_header.state_root)),
            "body_root": format!("0x{}", hex::encode(latest_block_header.body_root))
        },
        "finalized_checkpoint": {
            "epoch": finalized_checkpoint.epoch.to_string(),
            "root": format!("0x{}", hex::encode(finalized_checkpoint.root))
        },
        "field_roots": field_roots
    })
    .to_string();

    let summary = StateSummary::from_json(doc.as_bytes()).expect("fixture must decode");
    (doc, summary)
}

/// The headers endpoint envelope for the block committing to `state_root`
fn header_fixture(state_root: [u8; 32], parent_root: [u8; 32]) -> String {
    json!({
        "execution_optimistic": false,
        "finalized": true,
        "data": {
            "root": hex32(0),
            "canonical": true,
            "header": {
                "message": {
                    "slot": (SLOT + 1).to_string(),
                    "proposer_index": "123456",
                    "parent_root": format!("0x{}", hex::encode(parent_root)),
                    "state_root": format!("0x{}", hex::encode(state_root)),
                    "body_root": hex32(0x55)
                },
                "signature": "0xab"
            }
        }
    })
    .to_string()
}

fn config(url: Option<String>, snapshot_dir: PathBuf) -> PipelineConfig {
    PipelineConfig {
        url,
        header_path: None,
        state_path: None,
        timeout: Duration::from_secs(5),
        snapshot_dir,
    }
}

/// Decode the record's hex fields and replay the proof against the block root
fn proof_verifies(record: &ProofRecord) -> bool {
    let leaf: [u8; 32] = hex::decode(&record.leaf).unwrap().try_into().unwrap();
    let root: [u8; 32] = hex::decode(&record.beacon_block_root)
        .unwrap()
        .try_into()
        .unwrap();
    let hashes: Vec<[u8; 32]> = record
        .hashes
        .iter()
        .map(|h| hex::decode(h).unwrap().try_into().unwrap())
        .collect();
    pgen_tree::verify(&leaf, record.index, &hashes, &root)
}

async fn mount_fixture(server: &MockServer, header_doc: &str, summary_doc: &str, state_root: [u8; 32]) {
    Mock::given(method("GET"))
        .and(path("/eth/v1/beacon/headers/head"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(header_doc, "application/json"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/eth/v1/beacon/states/0x{}/summary",
            hex::encode(state_root)
        )))
        .respond_with(ResponseTemplate::new(200).set_body_raw(summary_doc, "application/json"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn end_to_end_over_http() {
    let (summary_doc, summary) = summary_fixture();
    let state_root = summary.hash_tree_root();
    let header_doc = header_fixture(state_root, PARENT_ROOT);

    let server = MockServer::start().await;
    mount_fixture(&server, &header_doc, &summary_doc, state_root).await;

    let snapshots = TempDir::new().unwrap();
    let record = run(config(Some(server.uri()), snapshots.path().to_path_buf()))
        .await
        .unwrap();

    assert_eq!(record.index, 745);
    assert_eq!(record.slot, SLOT);
    assert_eq!(record.block_time, GENESIS_TIME + SLOT * 12);
    assert_eq!(record.finalized_root, hex::encode(FINALIZED_ROOT));
    assert_eq!(record.beacon_state_root, hex::encode(state_root));
    assert_eq!(record.leaf, hex::encode(FINALIZED_ROOT));
    assert_eq!(record.hashes.len(), 9);
    assert!(proof_verifies(&record));

    // Fetched inputs were snapshotted for replay, both named after the
    // block's slot
    assert!(snapshots.path().join(format!("bheader.{}.json", SLOT + 1)).exists());
    assert!(snapshots.path().join(format!("bstate.{}.json", SLOT + 1)).exists());
}

#[tokio::test]
async fn end_to_end_from_local_files() {
    let (summary_doc, summary) = summary_fixture();
    let state_root = summary.hash_tree_root();
    let header_doc = header_fixture(state_root, PARENT_ROOT);

    let inputs = TempDir::new().unwrap();
    let header_path = inputs.path().join("bheader.json");
    let state_path = inputs.path().join("bstate.json");
    std::fs::write(&header_path, &header_doc).unwrap();
    std::fs::write(&state_path, &summary_doc).unwrap();

    let record = run(PipelineConfig {
        url: None,
        header_path: Some(header_path),
        state_path: Some(state_path),
        timeout: Duration::from_secs(5),
        snapshot_dir: inputs.path().to_path_buf(),
    })
    .await
    .unwrap();

    assert_eq!(record.index, 745);
    assert!(proof_verifies(&record));

    // Local inputs are not snapshotted again
    assert!(!inputs.path().join(format!("bheader.{}.json", SLOT + 1)).exists());
}

#[tokio::test]
async fn parent_root_mismatch_is_fatal() {
    let (summary_doc, summary) = summary_fixture();
    let state_root = summary.hash_tree_root();
    // A header whose parent root disagrees with the state's latest block header
    let header_doc = header_fixture(state_root, [0xEE; 32]);

    let server = MockServer::start().await;
    mount_fixture(&server, &header_doc, &summary_doc, state_root).await;

    let snapshots = TempDir::new().unwrap();
    let err = run(config(Some(server.uri()), snapshots.path().to_path_buf()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::CrossReferenceMismatch { .. }));
}

#[tokio::test]
async fn foreign_state_fails_the_consistency_check() {
    let (summary_doc, _) = summary_fixture();
    // The header commits to a different state root; the graft still lands on
    // that placeholder leaf but must change the block root, which the
    // pipeline treats as fatal.
    let foreign_root = [0xEE; 32];
    let header_doc = header_fixture(foreign_root, PARENT_ROOT);

    let server = MockServer::start().await;
    mount_fixture(&server, &header_doc, &summary_doc, foreign_root).await;

    let snapshots = TempDir::new().unwrap();
    let err = run(config(Some(server.uri()), snapshots.path().to_path_buf()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Consistency { .. }));
}

#[tokio::test]
async fn missing_inputs_are_rejected() {
    let snapshots = TempDir::new().unwrap();
    let err = run(config(None, snapshots.path().to_path_buf()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MissingInput));
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/eth/v1/beacon/headers/head"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let snapshots = TempDir::new().unwrap();
    let err = run(config(Some(server.uri()), snapshots.path().to_path_buf()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Fetch { what: "block header", .. }));
}
