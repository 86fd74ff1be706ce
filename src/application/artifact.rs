//! Owned handle to the playable artifact

use std::sync::Arc;

use log::warn;

use crate::domain::audio::{AudioData, AudioMimeType};

use super::ports::{ObjectStore, ObjectUrl, StoreError};

/// Single-owner reference to stored audio.
///
/// `release` revokes the reference explicitly; a handle dropped without
/// being released is revoked on drop.
pub struct ArtifactHandle<S: ObjectStore> {
    store: Arc<S>,
    url: ObjectUrl,
    mime_type: AudioMimeType,
    size_bytes: usize,
    released: bool,
}

impl<S: ObjectStore> ArtifactHandle<S> {
    /// Store `audio` and take ownership of the new reference
    pub async fn create(store: Arc<S>, audio: &AudioData) -> Result<Self, StoreError> {
        let url = store.create(audio).await?;
        Ok(Self {
            store,
            url,
            mime_type: audio.mime_type(),
            size_bytes: audio.size_bytes(),
            released: false,
        })
    }

    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }

    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Read the referenced bytes
    pub async fn read(&self) -> Result<AudioData, StoreError> {
        self.store.read(&self.url).await
    }

    /// Revoke the reference
    pub fn release(mut self) -> Result<(), StoreError> {
        self.released = true;
        self.store.revoke(&self.url)
    }
}

impl<S: ObjectStore> Drop for ArtifactHandle<S> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.store.revoke(&self.url) {
                warn!("Failed to revoke {}: {}", self.url, e);
            }
        }
    }
}

impl<S: ObjectStore> std::fmt::Debug for ArtifactHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactHandle")
            .field("url", &self.url)
            .field("mime_type", &self.mime_type)
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryObjectStore;

    fn wav(bytes: &[u8]) -> AudioData {
        AudioData::new(bytes.to_vec(), AudioMimeType::Wav)
    }

    #[tokio::test]
    async fn create_and_read_back() {
        let store = Arc::new(MemoryObjectStore::new());
        let handle = ArtifactHandle::create(Arc::clone(&store), &wav(&[1, 2, 3]))
            .await
            .unwrap();

        assert_eq!(handle.read().await.unwrap().data(), &[1, 2, 3]);
        assert_eq!(handle.mime_type(), AudioMimeType::Wav);
        assert_eq!(handle.size_bytes(), 3);
        assert_eq!(store.live_count(), 1);
    }

    #[tokio::test]
    async fn release_revokes() {
        let store = Arc::new(MemoryObjectStore::new());
        let handle = ArtifactHandle::create(Arc::clone(&store), &wav(&[1]))
            .await
            .unwrap();
        let url = handle.url().clone();

        handle.release().unwrap();
        assert_eq!(store.live_count(), 0);
        assert!(store.read(&url).await.is_err());
        assert_eq!(store.revoked_count(), 1);
    }

    #[tokio::test]
    async fn drop_revokes_exactly_once() {
        let store = Arc::new(MemoryObjectStore::new());
        {
            let _handle = ArtifactHandle::create(Arc::clone(&store), &wav(&[1]))
                .await
                .unwrap();
        }
        assert_eq!(store.live_count(), 0);
        assert_eq!(store.revoked_count(), 1);

        let handle = ArtifactHandle::create(Arc::clone(&store), &wav(&[2]))
            .await
            .unwrap();
        handle.release().unwrap();
        assert_eq!(store.revoked_count(), 2);
    }
}
