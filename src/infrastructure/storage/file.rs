//! File-backed object store
//!
//! Each object is a file in the store directory; revoking deletes it.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use crate::application::ports::{ObjectStore, ObjectUrl, StoreError};
use crate::domain::audio::{AudioData, AudioMimeType};

/// Stores objects as files under a cache directory
#[derive(Debug)]
pub struct FileObjectStore {
    dir: PathBuf,
    objects: Mutex<HashMap<ObjectUrl, (PathBuf, AudioMimeType)>>,
}

impl FileObjectStore {
    /// Store under `$XDG_CACHE_HOME/voice-record/objects`
    pub fn new() -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("voice-record")
            .join("objects");
        Self::with_dir(dir)
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn poisoned() -> StoreError {
        StoreError::Io("object map lock poisoned".into())
    }

    fn lookup(&self, url: &ObjectUrl) -> Result<(PathBuf, AudioMimeType), StoreError> {
        self.objects
            .lock()
            .map_err(|_| Self::poisoned())?
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }
}

impl Default for FileObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for FileObjectStore {
    async fn create(&self, audio: &AudioData) -> Result<ObjectUrl, StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let name = format!("{}.{}", Uuid::new_v4(), audio.mime_type().extension());
        let path = self.dir.join(name);
        tokio::fs::write(&path, audio.data())
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;

        let url = ObjectUrl::new(format!("file://{}", path.display()));
        debug!("Created object {}", url);
        self.objects
            .lock()
            .map_err(|_| Self::poisoned())?
            .insert(url.clone(), (path, audio.mime_type()));
        Ok(url)
    }

    async fn read(&self, url: &ObjectUrl) -> Result<AudioData, StoreError> {
        let (path, mime_type) = self.lookup(url)?;
        let data = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(url.to_string()),
            _ => StoreError::Io(e.to_string()),
        })?;
        Ok(AudioData::new(data, mime_type))
    }

    fn revoke(&self, url: &ObjectUrl) -> Result<(), StoreError> {
        let (path, _) = self
            .objects
            .lock()
            .map_err(|_| Self::poisoned())?
            .remove(url)
            .ok_or_else(|| StoreError::NotFound(url.to_string()))?;

        debug!("Revoked object {}", url);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}
