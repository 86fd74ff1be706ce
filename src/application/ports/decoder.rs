//! Audio decoding port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::{AudioData, SampleBuffer, SampleBufferError};

/// Failure to turn captured bytes into samples
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("No audio data to decode")]
    Empty,

    #[error("Unsupported audio format: {0}")]
    Unsupported(String),

    #[error("Corrupt audio data: {0}")]
    Corrupt(String),

    #[error("Decoded audio is malformed: {0}")]
    Malformed(#[from] SampleBufferError),
}

/// Port for decoding a compressed container into raw samples
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    async fn decode(&self, audio: &AudioData) -> Result<SampleBuffer, DecodeError>;
}
