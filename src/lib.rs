//! VoiceRecord - microphone recorder with countdown and fixed-length trim
//!
//! This crate records from the microphone, optionally after a countdown,
//! trims each recording to a maximum length and re-encodes it as WAV for
//! playback and download.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the capture state machine, sample buffers and the view
//! - **Application**: The capture controller, the decode-trim-encode pipeline and port traits
//! - **Infrastructure**: Adapter implementations (cpal, symphonia, hound, rodio, object stores)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
