use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;

/// URL prefix under which stored media is served.
pub const MEDIA_PREFIX: &str = "/media/";

/// File storage for uploaded videos and thumbnails.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `key` (e.g. `videos/<id>.mp4`) and returns its URL.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, AppError>;

    /// Deletes the blob behind a URL returned by `put`. Missing blobs are not an error.
    async fn delete(&self, url: &str) -> Result<(), AppError>;
}

fn key_from_url(url: &str) -> Result<&str, AppError> {
    let key = url
        .strip_prefix(MEDIA_PREFIX)
        .ok_or_else(|| AppError::InternalServerError(format!("not a media url: {}", url)))?;
    if key.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(AppError::InternalServerError(format!("bad media key: {}", key)));
    }
    Ok(key)
}

/// Writes blobs below a directory on local disk.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let url = format!("{}{}", MEDIA_PREFIX, key);
        let path = self.root.join(key_from_url(&url)?);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Stored blob {}", path.display());
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), AppError> {
        let path = self.root.join(key_from_url(url)?);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps blobs in memory. Used by tests.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, url: &str) -> bool {
        self.blobs.read().await.contains_key(url)
    }

    pub async fn count(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, AppError> {
        let url = format!("{}{}", MEDIA_PREFIX, key);
        key_from_url(&url)?;
        self.blobs.write().await.insert(url.clone(), bytes);
        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<(), AppError> {
        self.blobs.write().await.remove(url);
        Ok(())
    }
}
