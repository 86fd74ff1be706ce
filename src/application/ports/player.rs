//! Audio playback port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioData;

/// Errors that can occur during playback
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port trait for playing encoded audio
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play `audio` to completion
    async fn play(&self, audio: &AudioData) -> Result<(), PlaybackError>;
}
