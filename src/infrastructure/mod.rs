//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, symphonia, hound and rodio.

pub mod config;
pub mod decoding;
pub mod encoding;
pub mod playback;
pub mod recording;
pub mod storage;

// Re-export adapters
pub use config::XdgConfigStore;
pub use decoding::SymphoniaDecoder;
pub use encoding::WavEncoder;
pub use playback::{NoOpPlayer, RodioPlayer};
pub use recording::{CpalRecorder, SyntheticRecorder, SyntheticSignal};
pub use storage::{FileObjectStore, MemoryObjectStore};
