//! Presentation state and the view derived from it

use crate::domain::audio::AudioMimeType;
use crate::domain::recording::{format_clock, CaptureState};

/// Everything the screen depends on. Rendering is a pure function of this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentationState {
    /// Capture sub-state
    pub capture: CaptureState,
    /// Remaining countdown ticks, while a countdown runs
    pub countdown: Option<u32>,
    /// Seconds elapsed since recording started
    pub elapsed_secs: u64,
    /// Container of the live playable artifact, if any
    pub artifact: Option<AudioMimeType>,
    /// Set by "record with countdown" until the next stop; hides stale playback controls
    pub countdown_clicked: bool,
}

impl PresentationState {
    pub fn is_recording(&self) -> bool {
        self.capture == CaptureState::Recording
    }

    /// Derive the visible controls
    pub fn render(&self) -> View {
        let recording = self.is_recording();
        let playback = self.artifact.filter(|_| !self.countdown_clicked);

        View {
            countdown_button: if recording {
                STOP_LABEL
            } else {
                "Start Recording With Countdown"
            },
            record_button: if recording { STOP_LABEL } else { "Start Recording" },
            timer: recording
                .then(|| format!("Recording Time: {}", format_clock(self.elapsed_secs))),
            countdown: self.countdown,
            recording_banner: recording,
            download_name: playback.map(|mime| mime.download_name()),
        }
    }
}

const STOP_LABEL: &str = "Stop Recording";

/// Rendered controls and text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Label of the "with countdown" control
    pub countdown_button: &'static str,
    /// Label of the immediate-start control
    pub record_button: &'static str,
    /// Elapsed time line, while recording
    pub timer: Option<String>,
    /// Countdown value, while a countdown runs
    pub countdown: Option<u32>,
    /// Whether the "recording in progress" line shows
    pub recording_banner: bool,
    /// Download file name; present exactly when playback/download/delete controls show
    pub download_name: Option<String>,
}

impl View {
    pub fn shows_playback(&self) -> bool {
        self.download_name.is_some()
    }
}
