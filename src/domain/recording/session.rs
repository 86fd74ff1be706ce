//! Capture session state machine

use std::fmt;
use thiserror::Error;

/// Capture sub-states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    CountdownPending,
    Recording,
}

impl CaptureState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CountdownPending => "countdown",
            Self::Recording => "recording",
        }
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: CaptureState,
    pub action: String,
}

/// Capture session entity.
/// Guarantees at most one capture is active at a time.
///
/// State machine:
///   IDLE -> COUNTDOWN_PENDING (begin_countdown)
///   IDLE | COUNTDOWN_PENDING -> RECORDING (begin_recording)
///   COUNTDOWN_PENDING -> IDLE (cancel_countdown)
///   RECORDING -> IDLE (finish_recording)
#[derive(Debug, Default)]
pub struct CaptureSession {
    state: CaptureState,
}

impl CaptureSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == CaptureState::Idle
    }

    pub fn is_counting_down(&self) -> bool {
        self.state == CaptureState::CountdownPending
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Transition from IDLE to COUNTDOWN_PENDING
    pub fn begin_countdown(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Idle {
            return Err(self.invalid("begin countdown"));
        }
        self.state = CaptureState::CountdownPending;
        Ok(())
    }

    /// Transition from COUNTDOWN_PENDING back to IDLE
    pub fn cancel_countdown(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::CountdownPending {
            return Err(self.invalid("cancel countdown"));
        }
        self.state = CaptureState::Idle;
        Ok(())
    }

    /// Transition from IDLE or COUNTDOWN_PENDING to RECORDING
    pub fn begin_recording(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state == CaptureState::Recording {
            return Err(self.invalid("start recording"));
        }
        self.state = CaptureState::Recording;
        Ok(())
    }

    /// Transition from RECORDING to IDLE
    pub fn finish_recording(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != CaptureState::Recording {
            return Err(self.invalid("stop recording"));
        }
        self.state = CaptureState::Idle;
        Ok(())
    }

    /// Force the session back to IDLE (failed start, teardown)
    pub fn reset(&mut self) {
        self.state = CaptureState::Idle;
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = CaptureSession::new();
        assert!(session.is_idle());
        assert!(!session.is_counting_down());
        assert!(!session.is_recording());
    }

    #[test]
    fn countdown_then_recording() {
        let mut session = CaptureSession::new();
        session.begin_countdown().unwrap();
        assert!(session.is_counting_down());

        session.begin_recording().unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn recording_directly_from_idle() {
        let mut session = CaptureSession::new();
        assert!(session.begin_recording().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn second_recording_is_rejected() {
        let mut session = CaptureSession::new();
        session.begin_recording().unwrap();

        let err = session.begin_recording().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn countdown_only_from_idle() {
        let mut session = CaptureSession::new();
        session.begin_countdown().unwrap();
        assert!(session.begin_countdown().is_err());

        session.begin_recording().unwrap();
        let err = session.begin_countdown().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Recording);
    }

    #[test]
    fn cancel_countdown_returns_to_idle() {
        let mut session = CaptureSession::new();
        session.begin_countdown().unwrap();
        session.cancel_countdown().unwrap();
        assert!(session.is_idle());
        assert!(session.cancel_countdown().is_err());
    }

    #[test]
    fn finish_recording_requires_recording() {
        let mut session = CaptureSession::new();
        let err = session.finish_recording().unwrap_err();
        assert_eq!(err.current_state, CaptureState::Idle);

        session.begin_recording().unwrap();
        session.finish_recording().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.begin_recording().unwrap();
        assert!(session.is_recording());
    }

    #[test]
    fn reset_always_idles() {
        let mut session = CaptureSession::new();
        session.begin_countdown().unwrap();
        session.reset();
        assert!(session.is_idle());
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: CaptureState::Recording,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("recording state"));
    }
}
