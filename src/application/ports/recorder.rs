//! Recording port interfaces

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::AudioMimeType;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("Microphone access denied or unavailable: {0}")]
    PermissionDenied(String),

    #[error("Failed to start recording: {0}")]
    StartFailed(String),

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("No recording in progress")]
    NotRecording,

    #[error("Failed to encode captured audio: {0}")]
    EncodeFailed(String),
}

/// Events emitted by an active capture, in emission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A chunk of the compressed capture container
    Fragment(Vec<u8>),
    /// Capture stopped; every fragment has been delivered
    Finalized,
}

/// Sending half of a capture's event stream
pub type CaptureEventSender = mpsc::UnboundedSender<CaptureEvent>;

/// Port for microphone capture into compressed fragments
#[async_trait]
pub trait MediaRecorder: Send + Sync {
    /// Container type of the emitted fragments once concatenated
    fn mime_type(&self) -> AudioMimeType;

    /// Acquire the microphone and begin capturing.
    ///
    /// Fragments are pushed to `events` as they are produced, followed by exactly
    /// one `CaptureEvent::Finalized` after `stop`. Fails with
    /// `RecordingError::PermissionDenied` when no microphone can be opened.
    async fn start(&self, events: CaptureEventSender) -> Result<(), RecordingError>;

    /// Ask the capture to stop. Finalization is reported on the event stream.
    async fn stop(&self) -> Result<(), RecordingError>;

    /// Check if currently recording
    fn is_recording(&self) -> bool;
}
