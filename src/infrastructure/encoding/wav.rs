//! WAV encoder using hound
//!
//! Output is RIFF/WAVE, 16-bit little-endian PCM, interleaved channels,
//! at the buffer's own sample rate.

use std::io::Cursor;

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};

use super::sample_to_i16;
use crate::application::ports::{AudioEncoder, EncodeError};
use crate::domain::audio::{AudioData, AudioMimeType, SampleBuffer};

const BITS_PER_SAMPLE: u16 = 16;

/// Encodes sample buffers as 16-bit PCM WAV
#[derive(Debug, Default, Clone, Copy)]
pub struct WavEncoder;

impl WavEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode synchronously into an in-memory WAV file
    pub fn encode_blocking(buffer: &SampleBuffer) -> Result<Vec<u8>, EncodeError> {
        let channels = u16::try_from(buffer.channel_count())
            .map_err(|_| EncodeError(format!("too many channels: {}", buffer.channel_count())))?;

        let spec = WavSpec {
            channels,
            sample_rate: buffer.sample_rate(),
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer =
                WavWriter::new(&mut cursor, spec).map_err(|e| EncodeError(e.to_string()))?;
            for sample in buffer.interleaved() {
                writer
                    .write_sample(sample_to_i16(sample))
                    .map_err(|e| EncodeError(e.to_string()))?;
            }
            writer.finalize().map_err(|e| EncodeError(e.to_string()))?;
        }

        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl AudioEncoder for WavEncoder {
    fn mime_type(&self) -> AudioMimeType {
        AudioMimeType::Wav
    }

    async fn encode(&self, buffer: &SampleBuffer) -> Result<AudioData, EncodeError> {
        let buffer = buffer.clone();
        let bytes = tokio::task::spawn_blocking(move || Self::encode_blocking(&buffer))
            .await
            .map_err(|e| EncodeError(format!("encoder task failed: {}", e)))??;

        Ok(AudioData::new(bytes, AudioMimeType::Wav))
    }
}
