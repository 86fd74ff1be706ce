//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod presentation;
pub mod recording;

// Re-export common types
pub use audio::{AudioData, AudioMimeType, SampleBuffer};
pub use config::AppConfig;
pub use error::*;
pub use presentation::{PresentationState, View};
pub use recording::{CaptureSession, CaptureState, Countdown, Duration};
