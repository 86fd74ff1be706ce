//! Decoded multi-channel sample buffer

use thiserror::Error;

use crate::domain::recording::Duration;

/// Error when a sample buffer would be malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleBufferError {
    #[error("Sample rate must be greater than zero")]
    ZeroSampleRate,

    #[error("Audio must have at least one channel")]
    NoChannels,

    #[error("Channel {channel} has {actual} samples, expected {expected}")]
    RaggedChannels {
        channel: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{len} interleaved samples do not divide into {channels} channels")]
    PartialFrame { len: usize, channels: usize },
}

/// Planar floating-point audio: one sample vector per channel, all the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Build a buffer from per-channel samples
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, SampleBufferError> {
        if sample_rate == 0 {
            return Err(SampleBufferError::ZeroSampleRate);
        }
        let expected = channels.first().ok_or(SampleBufferError::NoChannels)?.len();
        if let Some((channel, samples)) = channels
            .iter()
            .enumerate()
            .find(|(_, samples)| samples.len() != expected)
        {
            return Err(SampleBufferError::RaggedChannels {
                channel,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    /// Build a buffer from interleaved samples (L, R, L, R, ...)
    pub fn from_interleaved(
        sample_rate: u32,
        channel_count: usize,
        samples: &[f32],
    ) -> Result<Self, SampleBufferError> {
        if channel_count == 0 {
            return Err(SampleBufferError::NoChannels);
        }
        if samples.len() % channel_count != 0 {
            return Err(SampleBufferError::PartialFrame {
                len: samples.len(),
                channels: channel_count,
            });
        }

        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(sample_rate, channels)
    }

    /// A buffer of digital silence
    pub fn silence(
        sample_rate: u32,
        channel_count: usize,
        frames: usize,
    ) -> Result<Self, SampleBufferError> {
        Self::new(sample_rate, vec![vec![0.0; frames]; channel_count])
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel
    pub fn frames(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Samples of one channel
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Duration in fractional seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Duration rounded down to the millisecond
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.frames() as u64 * 1000 / self.sample_rate as u64)
    }

    /// Samples interleaved frame by frame
    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frames() * self.channel_count());
        for frame in 0..self.frames() {
            out.extend(self.channels.iter().map(|channel| channel[frame]));
        }
        out
    }

    /// Copy the first `min(max, duration)` of audio into a new buffer.
    ///
    /// Channel count and sample rate are preserved. The result holds
    /// `min(frames, max * sample_rate)` samples per channel.
    pub fn trim_to(&self, max: Duration) -> SampleBuffer {
        let cap = usize::try_from(max.frames_at(self.sample_rate)).unwrap_or(usize::MAX);
        let keep = self.frames().min(cap);

        SampleBuffer {
            sample_rate: self.sample_rate,
            channels: self
                .channels
                .iter()
                .map(|channel| channel[..keep].to_vec())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rate: u32, channels: usize, frames: usize) -> SampleBuffer {
        let data = (0..channels)
            .map(|c| (0..frames).map(|i| (i + c * frames) as f32 / 1e6).collect())
            .collect();
        SampleBuffer::new(rate, data).unwrap()
    }

    #[test]
    fn rejects_malformed_buffers() {
        assert_eq!(
            SampleBuffer::new(0, vec![vec![0.0]]).unwrap_err(),
            SampleBufferError::ZeroSampleRate
        );
        assert_eq!(
            SampleBuffer::new(8000, vec![]).unwrap_err(),
            SampleBufferError::NoChannels
        );
        assert!(matches!(
            SampleBuffer::new(8000, vec![vec![0.0; 4], vec![0.0; 3]]),
            Err(SampleBufferError::RaggedChannels { channel: 1, .. })
        ));
    }

    #[test]
    fn interleave_round_trip() {
        let buffer = SampleBuffer::from_interleaved(8000, 2, &[0.1, -0.1, 0.2, -0.2]).unwrap();
        assert_eq!(buffer.channel(0), Some(&[0.1, 0.2][..]));
        assert_eq!(buffer.channel(1), Some(&[-0.1, -0.2][..]));
        assert_eq!(buffer.interleaved(), vec![0.1, -0.1, 0.2, -0.2]);

        assert!(matches!(
            SampleBuffer::from_interleaved(8000, 2, &[0.0; 3]),
            Err(SampleBufferError::PartialFrame { len: 3, channels: 2 })
        ));
    }

    #[test]
    fn two_seconds_mono_is_kept_whole() {
        let raw = SampleBuffer::silence(44_100, 1, 2 * 44_100).unwrap();
        let trimmed = raw.trim_to(Duration::from_secs(5));
        assert_eq!(trimmed.channel_count(), 1);
        assert_eq!(trimmed.frames(), 2 * 44_100);
    }

    #[test]
    fn ten_seconds_is_capped_at_five() {
        let raw = ramp(48_000, 2, 10 * 48_000);
        let trimmed = raw.trim_to(Duration::from_secs(5));
        assert_eq!(trimmed.frames(), 5 * 48_000);
        assert_eq!(trimmed.channel_count(), 2);
        assert_eq!(trimmed.sample_rate(), 48_000);
        for c in 0..2 {
            assert_eq!(
                trimmed.channel(c).unwrap(),
                &raw.channel(c).unwrap()[..5 * 48_000]
            );
        }
    }

    #[test]
    fn trimmed_duration_is_min_of_cap_and_original() {
        for (frames, expected_ms) in [(8_000, 1_000), (40_000, 5_000), (56_000, 5_000), (4, 0)] {
            let raw = SampleBuffer::silence(8_000, 1, frames).unwrap();
            assert_eq!(raw.trim_to(Duration::from_secs(5)).duration().as_millis(), expected_ms);
        }
    }

    #[test]
    fn trimming_is_idempotent() {
        let raw = ramp(16_000, 2, 7 * 16_000 + 123);
        let once = raw.trim_to(Duration::from_secs(5));
        assert_eq!(once.trim_to(Duration::from_secs(5)), once);
        assert_eq!(once.trim_to(Duration::from_secs(30)), once);
    }

    #[test]
    fn trim_copies_rather_than_views() {
        let raw = ramp(8_000, 1, 100);
        let trimmed = raw.trim_to(Duration::from_secs(5));
        drop(raw);
        assert_eq!(trimmed.frames(), 100);
    }

    #[test]
    fn fractional_rate_rounds_down() {
        let raw = SampleBuffer::silence(22_050, 1, 22_050 * 10).unwrap();
        let trimmed = raw.trim_to(Duration::from_millis(1_500));
        assert_eq!(trimmed.frames(), 33_075);
    }

    #[test]
    fn huge_cap_keeps_the_whole_buffer() {
        let raw = SampleBuffer::silence(44_100, 1, 441_000).unwrap();
        let cap: Duration = "5000000000000000s".parse().unwrap();
        assert_eq!(raw.trim_to(cap).frames(), 441_000);
    }
}
