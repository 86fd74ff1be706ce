//! Rodio-based playback adapter
//!
//! Plays an encoded recording through the default output device.

use std::io::Cursor;

use async_trait::async_trait;
use log::debug;
use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{AudioPlayer, PlaybackError};
use crate::domain::audio::AudioData;

/// Audio player implementation using rodio
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, audio: &AudioData) -> Result<(), PlaybackError> {
        let data = audio.data().to_vec();
        // Run audio playback in blocking thread to avoid blocking the async runtime
        tokio::task::spawn_blocking(move || play_sync(data))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Play encoded bytes synchronously (called from spawn_blocking)
fn play_sync(data: Vec<u8>) -> Result<(), PlaybackError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

    let source =
        Decoder::new(Cursor::new(data)).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

    debug!("Starting playback");
    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::{AudioMimeType, SampleBuffer};
    use crate::infrastructure::encoding::WavEncoder;

    #[tokio::test]
    #[ignore = "Requires audio hardware"]
    async fn can_play_wav() {
        let buffer = SampleBuffer::silence(44_100, 1, 4_410).unwrap();
        let wav = WavEncoder::encode_blocking(&buffer).unwrap();

        let result = RodioPlayer::new()
            .play(&AudioData::new(wav, AudioMimeType::Wav))
            .await;
        assert!(result.is_ok());
    }
}
