//! Audio encoding port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::{AudioData, AudioMimeType, SampleBuffer};

/// Failure to encode samples
#[derive(Debug, Clone, Error)]
#[error("Audio encoding failed: {0}")]
pub struct EncodeError(pub String);

/// Port for encoding samples into an uncompressed container
#[async_trait]
pub trait AudioEncoder: Send + Sync {
    /// Container this encoder produces
    fn mime_type(&self) -> AudioMimeType;

    async fn encode(&self, buffer: &SampleBuffer) -> Result<AudioData, EncodeError>;
}
