//! Error types for azure-paramgen

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for parameter generation
#[derive(Error, Debug)]
pub enum ParamGenError {
    #[error("Current user is not found: {0}")]
    UserNotFound(String),

    #[error("Read default ssh key file {path} failed: {source}")]
    SshKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Create new discovery url failed: {0}")]
    Discovery(String),

    #[error("Error loading cloud-config template {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template error: {0}")]
    Template(String),

    #[error("Error exporting to json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ParamGenError {
    /// Create an ssh key read error
    pub fn ssh_key(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SshKey {
            path: path.into(),
            source,
        }
    }

    /// Create a template load error
    pub fn template_load(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TemplateLoad {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for ParamGenError {
    fn from(e: reqwest::Error) -> Self {
        Self::Discovery(e.to_string())
    }
}
