//! Filesystem artifact store
//!
//! A location is `<root>/<model_id>` and the artifact lives next to it as
//! `<location>.json`. Writes go to a temporary sibling first and are renamed
//! into place, so a reader never observes a half-written artifact.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use common::error::{Error, Result};

use crate::store::ArtifactStore;

/// Artifact store backed by JSON files
#[derive(Debug, Clone)]
pub struct FilesystemAdapter {
    /// Directory that holds the artifacts
    root: PathBuf,
}

impl FilesystemAdapter {
    /// Creates a filesystem adapter rooted at a directory
    ///
    /// The directory is created lazily on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    
    /// Gets the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }
    
    /// Path of the JSON document behind a location
    pub fn artifact_path(location: &str) -> PathBuf {
        PathBuf::from(format!("{}.json", location))
    }
    
    /// Resolves a location to its artifact path, refusing anything outside the root
    fn resolve(&self, location: &str) -> Result<PathBuf> {
        let path = Path::new(location);
        
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(Error::InvalidInput(format!(
                "artifact location must not contain '..': {}",
                location
            )));
        }
        
        let root = without_cur_dir(&self.root);
        let target = without_cur_dir(path);
        
        if target == root || !target.starts_with(&root) {
            return Err(Error::InvalidInput(format!(
                "artifact location is outside {:?}: {}",
                self.root, location
            )));
        }
        
        Ok(Self::artifact_path(location))
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[async_trait]
impl ArtifactStore for FilesystemAdapter {
    fn name(&self) -> &str {
        "filesystem"
    }
    
    fn location_for(&self, model_id: &str) -> String {
        self.root.join(model_id).to_string_lossy().into_owned()
    }
    
    async fn save(&self, location: &str, artifact: &Value) -> Result<()> {
        let path = self.resolve(location)?;
        
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        
        let bytes = serde_json::to_vec_pretty(artifact)?;
        let tmp_path = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        
        tokio::fs::write(&tmp_path, &bytes).await?;
        
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            warn!("Failed to move artifact into place at {:?}: {}", path, e);
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                debug!("Could not remove temporary artifact {:?}: {}", tmp_path, cleanup);
            }
            return Err(e.into());
        }
        
        debug!("Saved artifact {:?} ({} bytes)", path, bytes.len());
        
        Ok(())
    }
    
    async fn load(&self, location: &str) -> Result<Value> {
        let path = self.resolve(location)?;
        
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Read artifact {:?} ({} bytes)", path, bytes.len());
                Ok(serde_json::from_slice(&bytes)?)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::ArtifactNotFound(location.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
