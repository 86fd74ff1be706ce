//! Recording domain module

mod countdown;
mod duration;
mod session;

pub use countdown::{Countdown, DEFAULT_COUNTDOWN_SECS};
pub use duration::{format_clock, Duration, DEFAULT_TRIM_SECS};
pub use session::{CaptureSession, CaptureState, InvalidStateTransition};
