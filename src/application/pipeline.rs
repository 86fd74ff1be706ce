//! Decode-trim-encode pipeline

use log::{debug, info};
use thiserror::Error;

use crate::domain::audio::{AudioData, AudioMimeType, SampleBuffer};
use crate::domain::recording::Duration;

use super::ports::{AudioDecoder, AudioEncoder, DecodeError, EncodeError};

/// Errors from the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to decode recording: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to encode trimmed recording: {0}")]
    Encode(#[from] EncodeError),
}

/// Result of a successful pipeline run
#[derive(Debug, Clone)]
pub struct TrimOutcome {
    /// Length of the decoded capture before trimming
    pub original_duration: Duration,
    /// The trimmed samples
    pub trimmed: SampleBuffer,
    /// The trimmed samples in the encoder's container
    pub audio: AudioData,
}

/// Turns a finished capture into a playable, length-capped recording
pub struct TrimPipeline<D, E>
where
    D: AudioDecoder,
    E: AudioEncoder,
{
    decoder: D,
    encoder: E,
    max_duration: Duration,
}

impl<D, E> TrimPipeline<D, E>
where
    D: AudioDecoder,
    E: AudioEncoder,
{
    pub fn new(decoder: D, encoder: E, max_duration: Duration) -> Self {
        Self {
            decoder,
            encoder,
            max_duration,
        }
    }

    /// Trim cap applied by `process`
    pub fn max_duration(&self) -> Duration {
        self.max_duration
    }

    /// Concatenate capture fragments and process the resulting blob
    pub async fn run<B: AsRef<[u8]>>(
        &self,
        fragments: &[B],
        mime_type: AudioMimeType,
    ) -> Result<TrimOutcome, PipelineError> {
        let capture = AudioData::from_fragments(fragments, mime_type);
        self.process(&capture).await
    }

    /// Decode `capture`, keep at most `max_duration` of it and re-encode
    pub async fn process(&self, capture: &AudioData) -> Result<TrimOutcome, PipelineError> {
        debug!(
            "Decoding {} capture ({})",
            capture.mime_type(),
            capture.human_readable_size()
        );
        let raw = self.decoder.decode(capture).await?;

        let trimmed = raw.trim_to(self.max_duration);
        info!(
            "Trimmed {:.2}s of {}-channel audio at {} Hz to {:.2}s",
            raw.duration_secs(),
            raw.channel_count(),
            raw.sample_rate(),
            trimmed.duration_secs()
        );

        let audio = self.encoder.encode(&trimmed).await?;

        Ok(TrimOutcome {
            original_duration: raw.duration(),
            trimmed,
            audio,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Decoder that ignores the bytes and yields a fixed buffer
    struct FixedDecoder(Result<SampleBuffer, DecodeError>);

    #[async_trait]
    impl AudioDecoder for FixedDecoder {
        async fn decode(&self, _audio: &AudioData) -> Result<SampleBuffer, DecodeError> {
            self.0.clone()
        }
    }

    /// Encoder that writes one byte per frame
    struct FrameCountEncoder;

    #[async_trait]
    impl AudioEncoder for FrameCountEncoder {
        fn mime_type(&self) -> AudioMimeType {
            AudioMimeType::Wav
        }

        async fn encode(&self, buffer: &SampleBuffer) -> Result<AudioData, EncodeError> {
            Ok(AudioData::new(vec![0; buffer.frames()], AudioMimeType::Wav))
        }
    }

    struct FailingEncoder;

    #[async_trait]
    impl AudioEncoder for FailingEncoder {
        fn mime_type(&self) -> AudioMimeType {
            AudioMimeType::Wav
        }

        async fn encode(&self, _buffer: &SampleBuffer) -> Result<AudioData, EncodeError> {
            Err(EncodeError("disk full".to_string()))
        }
    }

    fn silence(secs: usize) -> SampleBuffer {
        SampleBuffer::silence(8_000, 2, secs * 8_000).unwrap()
    }

    #[tokio::test]
    async fn long_capture_is_capped() {
        let pipeline = TrimPipeline::new(
            FixedDecoder(Ok(silence(10))),
            FrameCountEncoder,
            Duration::from_secs(5),
        );

        let outcome = pipeline.run(&[b"abc"], AudioMimeType::Flac).await.unwrap();
        assert_eq!(outcome.original_duration.as_secs(), 10);
        assert_eq!(outcome.trimmed.frames(), 5 * 8_000);
        assert_eq!(outcome.trimmed.channel_count(), 2);
        assert_eq!(outcome.audio.size_bytes(), 5 * 8_000);
        assert_eq!(outcome.audio.mime_type(), AudioMimeType::Wav);
    }

    #[tokio::test]
    async fn short_capture_is_kept() {
        let pipeline = TrimPipeline::new(
            FixedDecoder(Ok(silence(2))),
            FrameCountEncoder,
            Duration::default_trim(),
        );

        let outcome = pipeline.run(&[b"abc"], AudioMimeType::Flac).await.unwrap();
        assert_eq!(outcome.trimmed.frames(), 2 * 8_000);
    }

    #[tokio::test]
    async fn decode_failure_aborts() {
        let pipeline = TrimPipeline::new(
            FixedDecoder(Err(DecodeError::Corrupt("bad header".to_string()))),
            FrameCountEncoder,
            Duration::default_trim(),
        );

        let err = pipeline.run(&[b"junk"], AudioMimeType::Flac).await.unwrap_err();
        assert!(matches!(err, PipelineError::Decode(DecodeError::Corrupt(_))));
    }

    #[tokio::test]
    async fn encode_failure_is_reported() {
        let pipeline = TrimPipeline::new(
            FixedDecoder(Ok(silence(1))),
            FailingEncoder,
            Duration::default_trim(),
        );

        let err = pipeline.run(&[b"abc"], AudioMimeType::Flac).await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
    }
}
