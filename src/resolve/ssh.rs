//! SSH public key resolution

use crate::ParamGenError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Default public key location relative to the home directory
pub const SSH_PUBLIC_KEY: &str = ".ssh/id_rsa.pub";

/// Determine the invoking user's home directory.
///
/// Uses `$HOME`, then falls back to the `/etc/passwd` entry of `$USER`
/// (or `$LOGNAME`).
pub async fn current_home_dir() -> Result<PathBuf, ParamGenError> {
    if let Some(home) = std::env::var_os("HOME").filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }

    let username = std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .map_err(|_| ParamGenError::UserNotFound("neither HOME nor USER is set".to_string()))?;

    let passwd = fs::read_to_string("/etc/passwd").await?;
    passwd_home(&passwd, &username)
        .ok_or_else(|| ParamGenError::UserNotFound(format!("no passwd entry for {}", username)))
}

/// Look up a user's home directory in passwd(5) content
pub fn passwd_home(passwd: &str, username: &str) -> Option<PathBuf> {
    passwd.lines().find_map(|line| {
        let fields: Vec<&str> = line.split(':').collect();
        (fields.len() >= 6 && fields[0] == username).then(|| PathBuf::from(fields[5]))
    })
}

/// Read `<home>/.ssh/id_rsa.pub`, stripping surrounding newlines
pub async fn read_public_key(home: &Path) -> Result<String, ParamGenError> {
    let path = home.join(SSH_PUBLIC_KEY);
    debug!("Reading ssh public key from {}", path.display());

    let content = fs::read_to_string(&path)
        .await
        .map_err(|e| ParamGenError::ssh_key(&path, e))?;

    Ok(content.trim_matches('\n').to_string())
}
