//! Application layer - Use cases and port interfaces
//!
//! Contains the capture controller, the decode-trim-encode pipeline
//! and trait definitions for external system interactions.

pub mod artifact;
pub mod controller;
pub mod pipeline;
pub mod ports;
pub mod ticker;

// Re-export use cases
pub use artifact::ArtifactHandle;
pub use controller::{ControllerError, RecorderController};
pub use pipeline::{PipelineError, TrimOutcome, TrimPipeline};
pub use ticker::{RepeatingTask, TICK_PERIOD};
