//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod object_store;
pub mod player;
pub mod recorder;

// Re-export common types
pub use config::ConfigStore;
pub use decoder::{AudioDecoder, DecodeError};
pub use encoder::{AudioEncoder, EncodeError};
pub use object_store::{ObjectStore, ObjectUrl, StoreError};
pub use player::{AudioPlayer, PlaybackError};
pub use recorder::{CaptureEvent, CaptureEventSender, MediaRecorder, RecordingError};
