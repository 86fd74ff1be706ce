//! Synthetic recorder standing in for a microphone
//!
//! Produces a fixed length of generated audio per session, encoded the same
//! way as a real capture. Can also refuse access or emit undecodable bytes.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use log::debug;

use super::flac_encoder::encode_to_flac;
use super::{emit_capture, FRAGMENT_SIZE};
use crate::application::ports::{CaptureEventSender, MediaRecorder, RecordingError};
use crate::domain::audio::AudioMimeType;
use crate::domain::recording::Duration;
use crate::infrastructure::encoding::sample_to_i16;

/// What the synthetic microphone "hears"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticSignal {
    Silence,
    /// Sine tone at the given frequency in Hz
    Tone(f32),
    /// Bytes that are not a valid audio container
    Garbage,
}

/// Hardware-free `MediaRecorder`
pub struct SyntheticRecorder {
    sample_rate: u32,
    channels: usize,
    length: Duration,
    signal: SyntheticSignal,
    deny_access: bool,
    fragment_size: usize,
    is_recording: AtomicBool,
    events: StdMutex<Option<CaptureEventSender>>,
    sessions: AtomicU32,
}

impl SyntheticRecorder {
    /// Recorder yielding `length` of silence per session
    pub fn new(sample_rate: u32, channels: usize, length: Duration) -> Self {
        Self {
            sample_rate,
            channels,
            length,
            signal: SyntheticSignal::Silence,
            deny_access: false,
            fragment_size: FRAGMENT_SIZE,
            is_recording: AtomicBool::new(false),
            events: StdMutex::new(None),
            sessions: AtomicU32::new(0),
        }
    }

    pub fn with_signal(mut self, signal: SyntheticSignal) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_fragment_size(mut self, fragment_size: usize) -> Self {
        self.fragment_size = fragment_size;
        self
    }

    /// Make every `start` fail as if microphone access were refused
    pub fn denying_access(mut self) -> Self {
        self.deny_access = true;
        self
    }

    /// Number of sessions that started successfully
    pub fn sessions_started(&self) -> u32 {
        self.sessions.load(Ordering::SeqCst)
    }

    /// Interleaved i16 samples for one session
    fn generate(&self) -> Vec<i16> {
        let frames = self.length.frames_at(self.sample_rate) as usize;
        let mut samples = Vec::with_capacity(frames * self.channels);
        for i in 0..frames {
            let value = match self.signal {
                SyntheticSignal::Tone(freq) => {
                    let t = i as f32 / self.sample_rate as f32;
                    sample_to_i16(0.5 * f32::sin(2.0 * std::f32::consts::PI * freq * t))
                }
                _ => 0,
            };
            samples.extend(std::iter::repeat(value).take(self.channels));
        }
        samples
    }

    fn encode(&self) -> Result<Vec<u8>, RecordingError> {
        if self.signal == SyntheticSignal::Garbage {
            return Ok(b"this is not an audio container".repeat(64));
        }
        encode_to_flac(&self.generate(), self.channels, self.sample_rate)
            .map_err(|e| RecordingError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MediaRecorder for SyntheticRecorder {
    fn mime_type(&self) -> AudioMimeType {
        AudioMimeType::Flac
    }

    async fn start(&self, events: CaptureEventSender) -> Result<(), RecordingError> {
        if self.deny_access {
            return Err(RecordingError::PermissionDenied(
                "synthetic microphone refused access".into(),
            ));
        }
        if self.is_recording.swap(true, Ordering::SeqCst) {
            return Err(RecordingError::AlreadyRecording);
        }

        if let Ok(mut slot) = self.events.lock() {
            *slot = Some(events);
        }
        self.sessions.fetch_add(1, Ordering::SeqCst);
        debug!("Synthetic capture started");
        Ok(())
    }

    async fn stop(&self) -> Result<(), RecordingError> {
        if !self.is_recording.swap(false, Ordering::SeqCst) {
            return Err(RecordingError::NotRecording);
        }

        let events = self
            .events
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .ok_or(RecordingError::NotRecording)?;

        let encoded = self.encode()?;
        emit_capture(&events, &encoded, self.fragment_size);
        Ok(())
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CaptureEvent;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn emits_flac_fragments_on_stop() {
        let recorder = SyntheticRecorder::new(8_000, 1, Duration::from_secs(1))
            .with_signal(SyntheticSignal::Tone(440.0))
            .with_fragment_size(100);
        let (tx, mut rx) = mpsc::unbounded_channel();

        recorder.start(tx).await.unwrap();
        assert!(recorder.is_recording());
        recorder.stop().await.unwrap();
        assert!(!recorder.is_recording());

        let mut bytes = Vec::new();
        let mut fragments = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                CaptureEvent::Fragment(chunk) => {
                    assert!(chunk.len() <= 100);
                    bytes.extend(chunk);
                    fragments += 1;
                }
                CaptureEvent::Finalized => break,
            }
        }
        assert!(fragments > 1);
        assert_eq!(&bytes[0..4], b"fLaC");
        assert_eq!(recorder.sessions_started(), 1);
    }

    #[tokio::test]
    async fn denied_access_never_starts() {
        let recorder = SyntheticRecorder::new(8_000, 1, Duration::from_secs(1)).denying_access();
        let (tx, _rx) = mpsc::unbounded_channel();

        let err = recorder.start(tx).await.unwrap_err();
        assert!(matches!(err, RecordingError::PermissionDenied(_)));
        assert!(!recorder.is_recording());
        assert_eq!(recorder.sessions_started(), 0);
    }

    #[tokio::test]
    async fn one_session_at_a_time() {
        let recorder = SyntheticRecorder::new(8_000, 1, Duration::from_secs(1));
        let (tx, _rx) = mpsc::unbounded_channel();
        recorder.start(tx.clone()).await.unwrap();

        assert!(matches!(
            recorder.start(tx).await,
            Err(RecordingError::AlreadyRecording)
        ));
    }
}
