//! Value resolution
//!
//! Fills in the parameters that have no command line flag:
//! `sshKeyData`, `discoveryUrl` and `customData`. Each step runs only when
//! its field is still empty, in that fixed order, so the cloud-config
//! template sees the key and discovery URL resolved before it.

pub mod cloud_config;
pub mod discovery;
pub mod ssh;

pub use cloud_config::CLOUD_CONFIG_TEMPLATE;
pub use discovery::DISCOVERY_ENDPOINT;

use crate::ParamGenError;
use crate::params::ParameterSet;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Resolves derived parameter values
#[derive(Debug, Clone)]
pub struct Resolver {
    client: Client,
    discovery_endpoint: String,
    template_path: PathBuf,
    home_dir: Option<PathBuf>,
}

impl Resolver {
    /// Create a resolver with the standard endpoint and template location
    pub fn new() -> Result<Self, ParamGenError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            discovery_endpoint: DISCOVERY_ENDPOINT.to_string(),
            template_path: PathBuf::from(CLOUD_CONFIG_TEMPLATE),
            home_dir: None,
        })
    }

    /// Use a different discovery endpoint (for testing)
    pub fn with_discovery_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.discovery_endpoint = endpoint.into();
        self
    }

    /// Use a different template file
    pub fn with_template_path(mut self, path: impl AsRef<Path>) -> Self {
        self.template_path = path.as_ref().to_path_buf();
        self
    }

    /// Use a fixed home directory instead of the current user's
    pub fn with_home_dir(mut self, home: impl AsRef<Path>) -> Self {
        self.home_dir = Some(home.as_ref().to_path_buf());
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Resolve all empty derived fields, returning the completed set
    pub async fn resolve(&self, mut params: ParameterSet) -> Result<ParameterSet, ParamGenError> {
        if params.ssh_key_data.is_empty() {
            let home = match &self.home_dir {
                Some(home) => home.clone(),
                None => ssh::current_home_dir().await?,
            };
            info!("Reading ssh public key from {}", home.join(ssh::SSH_PUBLIC_KEY).display());
            params.ssh_key_data.value = ssh::read_public_key(&home).await?;
        } else {
            debug!("sshKeyData already set, skipping");
        }

        if params.discovery_url.is_empty() {
            info!(
                "Creating discovery url for {} nodes",
                params.number_of_nodes.value
            );
            params.discovery_url.value = discovery::new_discovery_url(
                &self.client,
                &self.discovery_endpoint,
                params.number_of_nodes.value,
            )
            .await?;
            debug!("Discovery url: {}", params.discovery_url.value);
        } else {
            debug!("discoveryUrl already set, skipping");
        }

        if params.custom_data.is_empty() {
            info!("Rendering {}", self.template_path.display());
            params.custom_data.value =
                cloud_config::build_custom_data(&self.template_path, &params).await?;
        } else {
            debug!("customData already set, skipping");
        }

        Ok(params)
    }
}
