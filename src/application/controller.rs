//! Capture controller: countdown, recording lifecycle and the live artifact

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info, warn};
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};

use crate::domain::audio::AudioData;
use crate::domain::presentation::PresentationState;
use crate::domain::recording::{CaptureSession, Countdown};

use super::artifact::ArtifactHandle;
use super::pipeline::TrimPipeline;
use super::ports::{
    AudioDecoder, AudioEncoder, AudioPlayer, CaptureEvent, MediaRecorder, ObjectStore,
    PlaybackError, StoreError,
};
use super::ticker::{RepeatingTask, TICK_PERIOD};

/// Errors from the controller's artifact operations
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("No recording available")]
    NoArtifact,

    #[error("Stored recording unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to save recording to {path}: {message}")]
    Save { path: PathBuf, message: String },

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),
}

/// Mutable controller state, owned behind one lock
struct RecorderState<S: ObjectStore> {
    session: CaptureSession,
    /// A start is waiting on microphone access
    starting: bool,
    countdown: Option<u32>,
    countdown_clicked: bool,
    elapsed_secs: u64,
    /// Incremented on every capture start
    capture_generation: u64,
    artifact: Option<ArtifactHandle<S>>,
    /// Capture generation the live artifact came from
    artifact_generation: u64,
    /// Newest capture whose artifact was deleted; its later artifacts are dropped
    deleted_generation: u64,
    countdown_task: Option<RepeatingTask>,
    timer_task: Option<RepeatingTask>,
    shut_down: bool,
}

impl<S: ObjectStore> RecorderState<S> {
    fn new() -> Self {
        Self {
            session: CaptureSession::new(),
            starting: false,
            countdown: None,
            countdown_clicked: false,
            elapsed_secs: 0,
            capture_generation: 0,
            artifact: None,
            artifact_generation: 0,
            deleted_generation: 0,
            countdown_task: None,
            timer_task: None,
            shut_down: false,
        }
    }

    fn presentation(&self) -> PresentationState {
        PresentationState {
            capture: self.session.state(),
            countdown: self.countdown,
            elapsed_secs: self.elapsed_secs,
            artifact: self.artifact.as_ref().map(ArtifactHandle::mime_type),
            countdown_clicked: self.countdown_clicked,
        }
    }

    /// Drop the live artifact, revoking its reference
    fn release_artifact(&mut self) {
        if let Some(old) = self.artifact.take() {
            let url = old.url().clone();
            match old.release() {
                Ok(()) => debug!("Revoked {}", url),
                Err(e) => warn!("Failed to revoke {}: {}", url, e),
            }
        }
    }
}

struct Shared<R, D, E, S, P>
where
    R: MediaRecorder,
    D: AudioDecoder,
    E: AudioEncoder,
    S: ObjectStore,
    P: AudioPlayer,
{
    recorder: Arc<R>,
    pipeline: TrimPipeline<D, E>,
    store: Arc<S>,
    player: P,
    state: Mutex<RecorderState<S>>,
    updates: watch::Sender<PresentationState>,
}

/// Orchestrates capture, the decode-trim-encode pipeline and the playable artifact.
///
/// Cheap to clone; clones share the same session.
pub struct RecorderController<R, D, E, S, P>
where
    R: MediaRecorder,
    D: AudioDecoder,
    E: AudioEncoder,
    S: ObjectStore,
    P: AudioPlayer,
{
    shared: Arc<Shared<R, D, E, S, P>>,
}

impl<R, D, E, S, P> Clone for RecorderController<R, D, E, S, P>
where
    R: MediaRecorder,
    D: AudioDecoder,
    E: AudioEncoder,
    S: ObjectStore,
    P: AudioPlayer,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R, D, E, S, P> RecorderController<R, D, E, S, P>
where
    R: MediaRecorder + 'static,
    D: AudioDecoder + 'static,
    E: AudioEncoder + 'static,
    S: ObjectStore + 'static,
    P: AudioPlayer + 'static,
{
    pub fn new(recorder: R, pipeline: TrimPipeline<D, E>, store: Arc<S>, player: P) -> Self {
        let (updates, _) = watch::channel(PresentationState::default());
        Self {
            shared: Arc::new(Shared {
                recorder: Arc::new(recorder),
                pipeline,
                store,
                player,
                state: Mutex::new(RecorderState::new()),
                updates,
            }),
        }
    }

    /// Current presentation state
    pub async fn snapshot(&self) -> PresentationState {
        self.shared.state.lock().await.presentation()
    }

    /// Receive a fresh `PresentationState` on every change
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.shared.updates.subscribe()
    }

    pub fn recorder(&self) -> &R {
        &self.shared.recorder
    }

    pub fn player(&self) -> &P {
        &self.shared.player
    }

    /// Trim length applied to finished captures
    pub fn max_duration(&self) -> crate::domain::recording::Duration {
        self.shared.pipeline.max_duration()
    }

    /// Count down `ticks` seconds, then start recording.
    ///
    /// Anything below 1 is ignored.
    pub async fn start_countdown(&self, ticks: i64) {
        let Some(countdown) = Countdown::new(ticks) else {
            debug!("Ignoring countdown of {}", ticks);
            return;
        };

        let mut state = self.shared.state.lock().await;
        if state.shut_down || state.starting {
            return;
        }
        if let Err(e) = state.session.begin_countdown() {
            warn!("{}", e);
            return;
        }

        state.countdown_clicked = true;
        state.countdown = Some(countdown.ticks());

        let this = self.clone();
        state.countdown_task = Some(RepeatingTask::spawn(TICK_PERIOD, move || {
            let this = this.clone();
            async move { this.countdown_tick().await }
        }));

        info!("Countdown started ({}s)", countdown);
        self.publish(&state);
    }

    async fn countdown_tick(&self) -> ControlFlow<()> {
        let mut state = self.shared.state.lock().await;
        if !state.session.is_counting_down() {
            return ControlFlow::Break(());
        }

        let remaining = state.countdown.unwrap_or(1).saturating_sub(1);
        if remaining > 0 {
            state.countdown = Some(remaining);
            self.publish(&state);
            return ControlFlow::Continue(());
        }

        state.countdown = None;
        self.publish(&state);
        drop(state);

        // Started from its own task: start_recording drops the countdown handle
        let this = self.clone();
        tokio::spawn(async move { this.start_recording().await });
        ControlFlow::Break(())
    }

    /// Acquire the microphone and start capturing.
    ///
    /// Access failures are logged and leave the controller idle.
    pub async fn start_recording(&self) {
        let generation = {
            let mut state = self.shared.state.lock().await;
            if state.shut_down {
                return;
            }
            if state.starting || state.session.is_recording() {
                warn!("Recording already in progress");
                return;
            }
            state.starting = true;
            state.capture_generation += 1;
            state.capture_generation
        };

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let started = self.shared.recorder.start(events_tx).await;

        let mut state = self.shared.state.lock().await;
        state.starting = false;

        if let Err(e) = started {
            error!("Error accessing microphone: {}", e);
            state.session.reset();
            state.countdown = None;
            state.countdown_clicked = false;
            state.countdown_task = None;
            self.publish(&state);
            return;
        }

        if state.shut_down {
            drop(state);
            self.spawn_hardware_stop();
            return;
        }

        if let Err(e) = state.session.begin_recording() {
            warn!("{}", e);
            drop(state);
            self.spawn_hardware_stop();
            return;
        }
        state.countdown_task = None;
        state.countdown = None;
        state.elapsed_secs = 0;

        let this = self.clone();
        state.timer_task = Some(RepeatingTask::spawn(TICK_PERIOD, move || {
            let this = this.clone();
            async move { this.timer_tick(generation).await }
        }));

        info!("Recording started");
        self.publish(&state);
        drop(state);

        let this = self.clone();
        tokio::spawn(async move { this.collect_capture(events_rx, generation).await });
    }

    async fn timer_tick(&self, generation: u64) -> ControlFlow<()> {
        let mut state = self.shared.state.lock().await;
        if !state.session.is_recording() || state.capture_generation != generation {
            return ControlFlow::Break(());
        }
        state.elapsed_secs += 1;
        self.publish(&state);
        ControlFlow::Continue(())
    }

    /// Stop the active capture, or abandon a running countdown.
    ///
    /// The screen goes idle immediately; the hardware stop runs on the next
    /// scheduler turn and the pipeline follows once the capture finalizes.
    pub async fn stop_recording(&self) {
        let mut state = self.shared.state.lock().await;

        if state.session.is_counting_down() {
            let _ = state.session.cancel_countdown();
            if let Some(task) = state.countdown_task.take() {
                task.cancel();
            }
            state.countdown = None;
            state.countdown_clicked = false;
            info!("Countdown cancelled");
            self.publish(&state);
            return;
        }

        if let Err(e) = state.session.finish_recording() {
            debug!("{}", e);
            return;
        }
        if let Some(task) = state.timer_task.take() {
            task.cancel();
        }
        state.countdown_clicked = false;
        self.publish(&state);
        drop(state);

        self.spawn_hardware_stop();
    }

    fn spawn_hardware_stop(&self) {
        let recorder = Arc::clone(&self.shared.recorder);
        tokio::spawn(async move {
            // Let the input that triggered the stop pass before the capture ends
            tokio::task::yield_now().await;
            if recorder.is_recording() {
                if let Err(e) = recorder.stop().await {
                    warn!("Failed to stop recorder: {}", e);
                }
            }
        });
    }

    async fn collect_capture(
        &self,
        mut events: mpsc::UnboundedReceiver<CaptureEvent>,
        generation: u64,
    ) {
        let mut fragments: Vec<Vec<u8>> = Vec::new();
        while let Some(event) = events.recv().await {
            match event {
                CaptureEvent::Fragment(bytes) => fragments.push(bytes),
                CaptureEvent::Finalized => {
                    self.finalize_capture(fragments, generation).await;
                    return;
                }
            }
        }
        warn!("Capture ended without finalizing; discarding {} fragments", fragments.len());
    }

    async fn finalize_capture(&self, fragments: Vec<Vec<u8>>, generation: u64) {
        let capture = AudioData::from_fragments(&fragments, self.shared.recorder.mime_type());
        info!(
            "Capture finalized: {} fragments, {}",
            fragments.len(),
            capture.human_readable_size()
        );

        if !capture.is_empty() {
            self.install_artifact(&capture, generation).await;
        }

        match self.shared.pipeline.process(&capture).await {
            Ok(outcome) => {
                info!(
                    "Recording trimmed from {} to {:.2}s",
                    outcome.original_duration,
                    outcome.trimmed.duration_secs()
                );
                self.install_artifact(&outcome.audio, generation).await;
            }
            Err(e) => error!("Error decoding or processing audio data: {}", e),
        }
    }

    /// Make `audio` the live artifact, revoking the one it replaces
    async fn install_artifact(&self, audio: &AudioData, generation: u64) {
        let handle = match ArtifactHandle::create(Arc::clone(&self.shared.store), audio).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Failed to store recording: {}", e);
                return;
            }
        };

        let mut state = self.shared.state.lock().await;
        if state.shut_down
            || generation < state.artifact_generation
            || generation <= state.deleted_generation
        {
            debug!("Discarding stale artifact {}", handle.url());
            if let Err(e) = handle.release() {
                warn!("{}", e);
            }
            return;
        }

        state.release_artifact();
        debug!("Playable artifact is now {}", handle.url());
        state.artifact = Some(handle);
        state.artifact_generation = generation;
        self.publish(&state);
    }

    /// Discard the playable artifact
    pub async fn delete_recording(&self) {
        let mut state = self.shared.state.lock().await;
        if state.artifact.is_none() {
            return;
        }
        state.deleted_generation = state.artifact_generation;
        state.release_artifact();
        info!("Recording deleted");
        self.publish(&state);
    }

    /// Write the playable artifact to `dir`, returning the file path
    pub async fn save_artifact(&self, dir: &Path) -> Result<PathBuf, ControllerError> {
        let audio = self.read_artifact().await?;
        let path = dir.join(audio.mime_type().download_name());

        let written = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, audio.data()).await
        };
        written.await.map_err(|e: std::io::Error| ControllerError::Save {
            path: path.clone(),
            message: e.to_string(),
        })?;

        info!("Saved {} to {}", audio.human_readable_size(), path.display());
        Ok(path)
    }

    /// Play the playable artifact to completion
    pub async fn play_artifact(&self) -> Result<(), ControllerError> {
        let audio = self.read_artifact().await?;
        self.shared.player.play(&audio).await?;
        Ok(())
    }

    /// Read the live artifact without holding the state lock across the store read.
    ///
    /// A concurrent delete surfaces as `StoreError::NotFound`.
    async fn read_artifact(&self) -> Result<AudioData, ControllerError> {
        let url = {
            let state = self.shared.state.lock().await;
            let handle = state.artifact.as_ref().ok_or(ControllerError::NoArtifact)?;
            handle.url().clone()
        };
        Ok(self.shared.store.read(&url).await?)
    }

    /// Tear down: cancel ticks, stop any capture and release the artifact
    pub async fn shutdown(&self) {
        let mut state = self.shared.state.lock().await;
        if state.shut_down {
            return;
        }
        state.shut_down = true;
        state.countdown_task = None;
        state.timer_task = None;
        state.countdown = None;
        state.countdown_clicked = false;

        let was_recording = state.session.is_recording();
        state.session.reset();
        state.release_artifact();
        self.publish(&state);
        drop(state);

        if was_recording && self.shared.recorder.is_recording() {
            if let Err(e) = self.shared.recorder.stop().await {
                warn!("Failed to stop recorder: {}", e);
            }
        }
        debug!("Recorder shut down");
    }

    fn publish(&self, state: &RecorderState<S>) {
        self.shared.updates.send_replace(state.presentation());
    }
}
