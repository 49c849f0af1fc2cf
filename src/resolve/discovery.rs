//! etcd discovery URL generation
//!
//! Requests a fresh cluster token from the public discovery service.
//! <https://etcd.io/docs/latest/op-guide/clustering/#etcd-discovery>

use crate::ParamGenError;
use reqwest::Client;
use tracing::debug;

/// Public etcd discovery endpoint
pub const DISCOVERY_ENDPOINT: &str = "https://discovery.etcd.io/new";

/// Request a new discovery URL for a cluster of `size` members.
///
/// The response body is returned verbatim.
pub async fn new_discovery_url(
    client: &Client,
    endpoint: &str,
    size: i64,
) -> Result<String, ParamGenError> {
    let url = format!("{}?size={}", endpoint, size);
    debug!("Requesting discovery url: {}", url);

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(ParamGenError::Discovery(format!(
            "discovery service returned {}",
            response.status()
        )));
    }

    Ok(response.text().await?)
}
