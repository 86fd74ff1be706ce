//! Container decoder using symphonia
//!
//! Handles the capture containers (FLAC, Ogg/Vorbis, WebM/Matroska) as well
//! as WAV. Decoding runs on the blocking pool.

use std::io::Cursor;

use async_trait::async_trait;
use log::{debug, warn};
use symphonia::core::audio::SampleBuffer as PacketBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoder, DecodeError};
use crate::domain::audio::{AudioData, SampleBuffer};

/// Decodes any container symphonia was built with into a `SampleBuffer`
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode synchronously. `extension` only guides probing.
    pub fn decode_blocking(data: Vec<u8>, extension: &str) -> Result<SampleBuffer, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());
        let mut hint = Hint::new();
        hint.with_extension(extension);

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

        let mut format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| DecodeError::Unsupported("no audio track found".into()))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channel_count = track.codec_params.channels.map(|c| c.count());

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

        let mut samples: Vec<f32> = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(DecodeError::Corrupt(e.to_string())),
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("Skipping undecodable packet: {}", e);
                    continue;
                }
                Err(e) => return Err(DecodeError::Corrupt(e.to_string())),
            };

            let spec = *decoded.spec();
            sample_rate.get_or_insert(spec.rate);
            channel_count.get_or_insert(spec.channels.count());

            let mut packet_buffer = PacketBuffer::<f32>::new(decoded.capacity() as u64, spec);
            packet_buffer.copy_interleaved_ref(decoded);
            samples.extend_from_slice(packet_buffer.samples());
        }

        let sample_rate =
            sample_rate.ok_or_else(|| DecodeError::Corrupt("no sample rate".into()))?;
        let channel_count =
            channel_count.ok_or_else(|| DecodeError::Corrupt("no channel layout".into()))?;

        debug!(
            "Decoded {} samples ({} channel(s) at {} Hz)",
            samples.len(),
            channel_count,
            sample_rate
        );

        Ok(SampleBuffer::from_interleaved(
            sample_rate,
            channel_count,
            &samples,
        )?)
    }
}

#[async_trait]
impl AudioDecoder for SymphoniaDecoder {
    async fn decode(&self, audio: &AudioData) -> Result<SampleBuffer, DecodeError> {
        if audio.is_empty() {
            return Err(DecodeError::Empty);
        }

        let data = audio.data().to_vec();
        let extension = audio.mime_type().extension();

        tokio::task::spawn_blocking(move || Self::decode_blocking(data, extension))
            .await
            .map_err(|e| DecodeError::Corrupt(format!("decoder task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::AudioMimeType;
    use crate::infrastructure::encoding::WavEncoder;
    use crate::infrastructure::recording::encode_to_flac;

    #[tokio::test]
    async fn decodes_wav() {
        let original = SampleBuffer::from_interleaved(16_000, 2, &[0.0, 0.5, -0.5, 0.25]).unwrap();
        let wav = WavEncoder::encode_blocking(&original).unwrap();

        let decoded = SymphoniaDecoder::new()
            .decode(&AudioData::new(wav, AudioMimeType::Wav))
            .await
            .unwrap();

        assert_eq!(decoded.sample_rate(), 16_000);
        assert_eq!(decoded.channel_count(), 2);
        assert_eq!(decoded.frames(), 2);
    }

    #[tokio::test]
    async fn decodes_flac_capture() {
        let samples = vec![0i16; 8_000 * 3];
        let flac = encode_to_flac(&samples, 1, 8_000).unwrap();

        let decoded = SymphoniaDecoder::new()
            .decode(&AudioData::new(flac, AudioMimeType::Flac))
            .await
            .unwrap();

        assert_eq!(decoded.sample_rate(), 8_000);
        assert_eq!(decoded.channel_count(), 1);
        assert_eq!(decoded.frames(), 8_000 * 3);
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let result = SymphoniaDecoder::new()
            .decode(&AudioData::new(Vec::new(), AudioMimeType::Flac))
            .await;
        assert!(matches!(result, Err(DecodeError::Empty)));
    }

    #[tokio::test]
    async fn garbage_is_unsupported() {
        let result = SymphoniaDecoder::new()
            .decode(&AudioData::new(
                b"definitely not audio".repeat(32),
                AudioMimeType::Flac,
            ))
            .await;
        assert!(matches!(result, Err(DecodeError::Unsupported(_))));
    }
}
