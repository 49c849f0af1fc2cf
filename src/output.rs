//! Parameters file writer

use crate::ParamGenError;
use crate::params::DeploymentDocument;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Output file written to the working directory
pub const OUTPUT_FILE: &str = "azuredeploy.parameters.json";

/// Serialize the document and write it, replacing any existing file
pub async fn write_document(doc: &DeploymentDocument, path: &Path) -> Result<(), ParamGenError> {
    let bytes = doc.to_json()?;

    let mut file = fs::File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;

    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
