//! customData payload generation

use crate::ParamGenError;
use crate::params::ParameterSet;
use crate::template::{is_cloud_config, render_cloud_config, validate_cloud_config};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Template file looked up in the working directory
pub const CLOUD_CONFIG_TEMPLATE: &str = "cloud-config.yaml.template";

/// Render the template at `path` and base64-encode the result
pub async fn build_custom_data(
    path: &Path,
    params: &ParameterSet,
) -> Result<String, ParamGenError> {
    debug!("Loading cloud-config template from {}", path.display());

    let template = fs::read_to_string(path)
        .await
        .map_err(|e| ParamGenError::template_load(path, e))?;

    let rendered = render_cloud_config(&template, params)?;

    if is_cloud_config(&rendered)
        && let Err(e) = validate_cloud_config(&rendered)
    {
        warn!("Rendered cloud-config is not valid YAML: {}", e);
    }

    Ok(encode_custom_data(&rendered))
}

/// Base64-encode (standard alphabet, padded)
pub fn encode_custom_data(rendered: &str) -> String {
    STANDARD.encode(rendered.as_bytes())
}
