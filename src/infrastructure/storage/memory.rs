//! In-memory object store

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::{ObjectStore, ObjectUrl, StoreError};
use crate::domain::audio::AudioData;

const URL_PREFIX: &str = "blob:memory/";

/// Keeps objects in a map. Counts revocations so leaks are observable.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<ObjectUrl, AudioData>>,
    revoked: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// References created and not yet revoked
    pub fn live_count(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    /// References revoked so far
    pub fn revoked_count(&self) -> usize {
        self.revoked.load(Ordering::SeqCst)
    }

    fn poisoned() -> StoreError {
        StoreError::Io("object map lock poisoned".into())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn create(&self, audio: &AudioData) -> Result<ObjectUrl, StoreError> {
        let url = ObjectUrl::new(format!("{}{}", URL_PREFIX, Uuid::new_v4()));
        self.objects
            .lock()
            .map_err(|_| Self::poisoned())?
            .insert(url.clone(), audio.clone());
        Ok(url)
    }

    async fn read(&self, url: &ObjectUrl) -> Result<AudioData, StoreError> {
        self.objects
            .lock()
            .map_err(|_| Self::poisoned())?
            .get(url)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }

    fn revoke(&self, url: &ObjectUrl) -> Result<(), StoreError> {
        self.objects
            .lock()
            .map_err(|_| Self::poisoned())?
            .remove(url)
            .ok_or_else(|| StoreError::NotFound(url.to_string()))?;
        self.revoked.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::AudioMimeType;

    #[tokio::test]
    async fn create_read_revoke() {
        let store = MemoryObjectStore::new();
        let audio = AudioData::new(vec![1, 2, 3], AudioMimeType::Wav);

        let url = store.create(&audio).await.unwrap();
        assert!(url.as_str().starts_with(URL_PREFIX));
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.read(&url).await.unwrap(), audio);

        store.revoke(&url).unwrap();
        assert_eq!(store.live_count(), 0);
        assert_eq!(store.revoked_count(), 1);
        assert!(matches!(store.read(&url).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn double_revoke_is_an_error() {
        let store = MemoryObjectStore::new();
        let url = store
            .create(&AudioData::new(vec![0], AudioMimeType::Flac))
            .await
            .unwrap();

        store.revoke(&url).unwrap();
        assert!(store.revoke(&url).is_err());
        assert_eq!(store.revoked_count(), 1);
    }

    #[tokio::test]
    async fn urls_are_unique() {
        let store = MemoryObjectStore::new();
        let audio = AudioData::new(vec![0], AudioMimeType::Wav);
        let a = store.create(&audio).await.unwrap();
        let b = store.create(&audio).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(store.live_count(), 2);
    }
}
