//! No-op playback adapter
//!
//! Used when there is no output device, and in tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::application::ports::{AudioPlayer, PlaybackError};
use crate::domain::audio::AudioData;

/// Player that discards audio, counting what it was asked to play
#[derive(Debug, Default)]
pub struct NoOpPlayer {
    played: AtomicUsize,
}

impl NoOpPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played_count(&self) -> usize {
        self.played.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioPlayer for NoOpPlayer {
    async fn play(&self, _audio: &AudioData) -> Result<(), PlaybackError> {
        self.played.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
