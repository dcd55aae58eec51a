//! HTTP fetch layer for the two pipeline inputs.
//!
//! Every request carries the caller-specified timeout; a timeout or non-2xx
//! status fails the request and, through the pipeline, the whole run. Retry
//! policy belongs to whoever operates the endpoints, not to this client.

use std::time::Duration;

use tracing::info;

use crate::pipeline::PipelineError;

/// Fetch the current head block header from the beacon API
pub async fn fetch_header(base_url: &str, timeout: Duration) -> Result<Vec<u8>, PipelineError> {
    let url = format!(
        "{}/eth/v1/beacon/headers/head",
        base_url.trim_end_matches('/')
    );
    get_bytes(&url, timeout, "block header").await
}

/// Fetch the state summary for the state identified by `state_root` (hex
/// without prefix)
pub async fn fetch_state_summary(
    base_url: &str,
    state_root: &str,
    timeout: Duration,
) -> Result<Vec<u8>, PipelineError> {
    let url = format!(
        "{}/eth/v1/beacon/states/0x{}/summary",
        base_url.trim_end_matches('/'),
        state_root
    );
    get_bytes(&url, timeout, "state summary").await
}

async fn get_bytes(
    url: &str,
    timeout: Duration,
    what: &'static str,
) -> Result<Vec<u8>, PipelineError> {
    info!("Fetching {} from {} ...", what, url);
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| PipelineError::Fetch { what, source })?;
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|source| PipelineError::Fetch { what, source })?;
    match response.error_for_status() {
        Ok(res) => Ok(res
            .bytes()
            .await
            .map_err(|source| PipelineError::Fetch { what, source })?
            .to_vec()),
        Err(source) => Err(PipelineError::Fetch { what, source }),
    }
}
