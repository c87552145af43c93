//! Model hub transport.
//!
//! Downloads single files or whole repository snapshots from the
//! HuggingFace Hub, with authentication and caching.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::{Api, ApiBuilder};
use tracing::info;

use crate::error::{Error, Result};

/// Downloads model artifacts from a remote hub.
///
/// Both operations are always permitted to hit the network; failures
/// propagate to the caller untranslated.
pub trait HubTransport {
    /// Download a single file from a repository, returning its local path.
    fn download_file(
        &self,
        repo_id: &str,
        filename: &str,
        cache_dir: Option<&Path>,
    ) -> Result<PathBuf>;

    /// Download every file in a repository, returning the snapshot directory.
    fn download_snapshot(&self, repo_id: &str, cache_dir: Option<&Path>) -> Result<PathBuf>;
}

/// HuggingFace-Hub-backed transport.
pub struct HfHub {
    token: Option<String>,
}

impl HfHub {
    /// Create a transport with the ambient token, if any.
    ///
    /// Anonymous pulls are allowed when no token is found.
    #[must_use]
    pub fn new() -> Self {
        Self {
            token: resolve_token(),
        }
    }

    /// Create a transport with an explicit token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    fn api(&self, cache_dir: Option<&Path>) -> Result<Api> {
        let mut builder = ApiBuilder::new();
        if let Some(dir) = cache_dir {
            builder = builder.with_cache_dir(dir.to_path_buf());
        }
        if let Some(token) = &self.token {
            builder = builder.with_token(Some(token.clone()));
        }
        Ok(builder.build()?)
    }
}

impl Default for HfHub {
    fn default() -> Self {
        Self::new()
    }
}

impl HubTransport for HfHub {
    fn download_file(
        &self,
        repo_id: &str,
        filename: &str,
        cache_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        let api = self.api(cache_dir)?;
        info!(repo_id, filename, "downloading file from hub");
        Ok(api.model(repo_id.to_string()).get(filename)?)
    }

    fn download_snapshot(&self, repo_id: &str, cache_dir: Option<&Path>) -> Result<PathBuf> {
        let api = self.api(cache_dir)?;
        let repo = api.model(repo_id.to_string());
        let repo_info = repo.info()?;
        info!(
            repo_id,
            files = repo_info.siblings.len(),
            "downloading repository snapshot"
        );
        let mut snapshot_root: Option<PathBuf> = None;
        for sibling in &repo_info.siblings {
            let local = repo.get(&sibling.rfilename)?;
            if snapshot_root.is_none() {
                // The local path ends with the file's repo-relative name;
                // strip those components to get the snapshot directory.
                let mut root = local.clone();
                for _ in sibling.rfilename.split('/') {
                    root.pop();
                }
                snapshot_root = Some(root);
            }
        }
        snapshot_root.ok_or_else(|| Error::SnapshotEmpty {
            repo_id: repo_id.to_string(),
        })
    }
}

/// Resolve the hub token.
///
/// Priority:
/// 1. `HF_TOKEN` environment variable
/// 2. `~/.huggingface/token` file
fn resolve_token() -> Option<String> {
    if let Ok(token) = std::env::var("HF_TOKEN") {
        if !token.is_empty() {
            return Some(token);
        }
    }
    if let Some(home) = dirs::home_dir() {
        let token_path = home.join(".huggingface").join("token");
        if let Ok(token) = std::fs::read_to_string(token_path) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                return Some(token);
            }
        }
    }
    None
}
