//! Asset storage for card covers and other uploaded files

use crate::error::{CardwallError, Result};
use crate::types::AssetId;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// Blob store holding uploaded files.
///
/// The engine only keeps [`AssetId`] references; the bytes live behind this
/// trait so hosts can plug in object storage.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `data` and return its new id
    async fn put(&self, name: &str, data: &[u8]) -> Result<AssetId>;

    /// Read an asset back
    async fn get(&self, id: &AssetId) -> Result<Vec<u8>>;

    /// Release an asset. Removing an unknown id is not an error.
    async fn remove(&self, id: &AssetId) -> Result<()>;

    async fn exists(&self, id: &AssetId) -> bool;
}

/// Assets stored as plain files in one directory
#[derive(Debug, Clone)]
pub struct FileAssetStore {
    dir: PathBuf,
}

impl FileAssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, id: &AssetId) -> PathBuf {
        self.dir.join(id.as_str())
    }
}

#[async_trait]
impl AssetStore for FileAssetStore {
    async fn put(&self, name: &str, data: &[u8]) -> Result<AssetId> {
        fs::create_dir_all(&self.dir).await?;
        let id = AssetId::new();
        fs::write(self.path(&id), data).await?;
        debug!(asset = %id, name, bytes = data.len(), "stored asset");
        Ok(id)
    }

    async fn get(&self, id: &AssetId) -> Result<Vec<u8>> {
        let path = self.path(id);
        if !path.exists() {
            return Err(CardwallError::NotFound {
                resource: "asset".into(),
                id: id.to_string(),
            });
        }
        Ok(fs::read(path).await?)
    }

    async fn remove(&self, id: &AssetId) -> Result<()> {
        let path = self.path(id);
        if path.exists() {
            fs::remove_file(path).await?;
            debug!(asset = %id, "removed asset");
        }
        Ok(())
    }

    async fn exists(&self, id: &AssetId) -> bool {
        self.path(id).exists()
    }
}
