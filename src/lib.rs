//! azure-paramgen library
//!
//! Generates `azuredeploy.parameters.json` for deploying a CoreOS/etcd
//! cluster with Azure Resource Manager.
//!
//! # Pipeline
//!
//! - **Load**: command line flags become a [`ParameterSet`] ([`config`])
//! - **Resolve**: ssh key, discovery URL and cloud-config payload are
//!   filled in ([`resolve`])
//! - **Write**: the [`DeploymentDocument`] is serialized to disk ([`output`])
//!
//! Every failure is returned as a [`ParamGenError`]; nothing is written
//! unless resolution succeeded.

pub mod config;
pub mod output;
pub mod params;
pub mod resolve;
pub mod template;

mod error;

pub use error::ParamGenError;
pub use params::{DeploymentDocument, ParameterSet};
pub use resolve::Resolver;

use std::path::Path;
use tracing::info;

/// Resolve the remaining parameters and write the document to `output`
pub async fn generate(
    params: ParameterSet,
    resolver: &Resolver,
    output: &Path,
) -> Result<DeploymentDocument, ParamGenError> {
    let params = resolver.resolve(params).await?;
    info!("Resolved all parameters");

    let doc = DeploymentDocument::new(params);
    output::write_document(&doc, output).await?;

    Ok(doc)
}
