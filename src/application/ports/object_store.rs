//! Revocable object reference port interface

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioData;

/// Object store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Unknown or revoked object reference: {0}")]
    NotFound(String),

    #[error("Object store I/O failed: {0}")]
    Io(String),
}

/// Opaque reference to stored audio bytes, valid until revoked
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Port for creating and revoking references to audio bytes
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `audio` and hand back a reference to it
    async fn create(&self, audio: &AudioData) -> Result<ObjectUrl, StoreError>;

    /// Read back what a live reference points at
    async fn read(&self, url: &ObjectUrl) -> Result<AudioData, StoreError>;

    /// Release a reference. Revoking an unknown reference is an error.
    ///
    /// Synchronous so handles can revoke from `Drop`; must not wait on I/O
    /// beyond unlinking.
    fn revoke(&self, url: &ObjectUrl) -> Result<(), StoreError>;
}
