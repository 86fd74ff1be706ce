//! Cross-platform microphone recorder using cpal
//!
//! Captures at the device's default configuration:
//! - Device sample rate and channel count
//! - i16 or f32 input, stored as i16
//! - FLAC container via the flac encoder, emitted on stop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BuildStreamError, SampleFormat, StreamConfig};
use log::{debug, error, info};
use tokio::sync::oneshot;

use super::flac_encoder::encode_to_flac;
use super::{emit_capture, FRAGMENT_SIZE};
use crate::application::ports::{
    CaptureEvent, CaptureEventSender, MediaRecorder, RecordingError,
};
use crate::domain::audio::AudioMimeType;
use crate::infrastructure::encoding::sample_to_i16;

/// How often the capture thread checks for a stop request
const POLL_INTERVAL: StdDuration = StdDuration::from_millis(20);

/// Run flag of the current capture thread.
///
/// Every session gets a fresh flag, so a stop followed quickly by a start
/// never revives the previous thread.
#[derive(Debug, Default)]
struct SessionSlot {
    active: StdMutex<Option<Arc<AtomicBool>>>,
}

impl SessionSlot {
    /// Claim the slot for a new session and return its run flag
    fn begin(&self) -> Result<Arc<AtomicBool>, RecordingError> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| RecordingError::StartFailed("session lock poisoned".into()))?;
        if active.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }
        let running = Arc::new(AtomicBool::new(true));
        *active = Some(Arc::clone(&running));
        Ok(running)
    }

    /// Signal the current session to stop and free the slot
    fn end(&self) -> Result<(), RecordingError> {
        let running = self
            .active
            .lock()
            .ok()
            .and_then(|mut active| active.take())
            .ok_or(RecordingError::NotRecording)?;
        running.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Free the slot if `running` still holds it
    fn abandon(&self, running: &Arc<AtomicBool>) {
        running.store(false, Ordering::SeqCst);
        if let Ok(mut active) = self.active.lock() {
            if active.as_ref().is_some_and(|a| Arc::ptr_eq(a, running)) {
                *active = None;
            }
        }
    }

    fn is_active(&self) -> bool {
        self.active.lock().map(|a| a.is_some()).unwrap_or(false)
    }
}

/// Microphone recorder using cpal.
///
/// The stream lives on a dedicated thread because `cpal::Stream` is not `Send`.
pub struct CpalRecorder {
    session: SessionSlot,
    /// Bytes per emitted fragment
    fragment_size: usize,
}

impl CpalRecorder {
    /// Create a new cpal-based recorder
    pub fn new() -> Self {
        Self {
            session: SessionSlot::default(),
            fragment_size: FRAGMENT_SIZE,
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, RecordingError> {
        let host = cpal::default_host();
        host.default_input_device().ok_or_else(|| {
            RecordingError::PermissionDenied("no input device available".into())
        })
    }

    /// Get the device's default input configuration
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), RecordingError> {
        let supported = device
            .default_input_config()
            .map_err(|e| RecordingError::PermissionDenied(e.to_string()))?;

        Ok((supported.config(), supported.sample_format()))
    }

    /// Build an input stream that appends interleaved i16 samples to `buffer`
    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        buffer: Arc<StdMutex<Vec<i16>>>,
        running: Arc<AtomicBool>,
    ) -> Result<cpal::Stream, RecordingError> {
        let on_error = |err: cpal::StreamError| error!("Audio stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if running.load(Ordering::SeqCst) {
                        if let Ok(mut buffer) = buffer.lock() {
                            buffer.extend_from_slice(data);
                        }
                    }
                },
                on_error,
                None,
            ),

            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if running.load(Ordering::SeqCst) {
                        if let Ok(mut buffer) = buffer.lock() {
                            buffer.extend(data.iter().map(|&s| sample_to_i16(s)));
                        }
                    }
                },
                on_error,
                None,
            ),

            other => {
                return Err(RecordingError::StartFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream.map_err(|e| match e {
            BuildStreamError::DeviceNotAvailable => {
                RecordingError::PermissionDenied(e.to_string())
            }
            other => RecordingError::StartFailed(other.to_string()),
        })
    }

    /// Body of the capture thread: open, record until stopped, encode, emit
    fn run_capture(
        running: Arc<AtomicBool>,
        fragment_size: usize,
        ready: oneshot::Sender<Result<(), RecordingError>>,
        events: CaptureEventSender,
    ) {
        let buffer = Arc::new(StdMutex::new(Vec::new()));

        let opened = Self::get_input_device().and_then(|device| {
            let (config, sample_format) = Self::get_input_config(&device)?;
            let stream = Self::build_stream(
                &device,
                &config,
                sample_format,
                Arc::clone(&buffer),
                Arc::clone(&running),
            )?;
            stream
                .play()
                .map_err(|e| RecordingError::StartFailed(e.to_string()))?;
            Ok((stream, config))
        });

        let (stream, config) = match opened {
            Ok(opened) => opened,
            Err(e) => {
                running.store(false, Ordering::SeqCst);
                let _ = ready.send(Err(e));
                return;
            }
        };

        info!(
            "Capturing {} channel(s) at {} Hz",
            config.channels, config.sample_rate.0
        );
        let _ = ready.send(Ok(()));

        while running.load(Ordering::SeqCst) {
            std::thread::sleep(POLL_INTERVAL);
        }
        drop(stream);

        let samples = match buffer.lock() {
            Ok(mut buffer) => std::mem::take(&mut *buffer),
            Err(_) => Vec::new(),
        };
        debug!("Captured {} samples", samples.len());

        if !samples.is_empty() {
            match encode_to_flac(&samples, config.channels as usize, config.sample_rate.0) {
                Ok(flac) => {
                    emit_capture(&events, &flac, fragment_size);
                    return;
                }
                Err(e) => error!("{}", RecordingError::EncodeFailed(e.to_string())),
            }
        }
        let _ = events.send(CaptureEvent::Finalized);
    }
}

impl Default for CpalRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaRecorder for CpalRecorder {
    fn mime_type(&self) -> AudioMimeType {
        AudioMimeType::Flac
    }

    async fn start(&self, events: CaptureEventSender) -> Result<(), RecordingError> {
        let running = self.session.begin()?;

        let (ready_tx, ready_rx) = oneshot::channel();
        let thread_running = Arc::clone(&running);
        let fragment_size = self.fragment_size;

        std::thread::spawn(move || {
            CpalRecorder::run_capture(thread_running, fragment_size, ready_tx, events)
        });

        let result = ready_rx.await.unwrap_or_else(|_| {
            Err(RecordingError::StartFailed(
                "capture thread exited before reporting".into(),
            ))
        });
        if result.is_err() {
            self.session.abandon(&running);
        }
        result
    }

    async fn stop(&self) -> Result<(), RecordingError> {
        self.session.end()
    }

    fn is_recording(&self) -> bool {
        self.session.is_active()
    }
}
