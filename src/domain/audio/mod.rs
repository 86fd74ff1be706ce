//! Audio domain module

mod audio_data;
mod sample_buffer;

pub use audio_data::{AudioData, AudioMimeType, DOWNLOAD_STEM};
pub use sample_buffer::{SampleBuffer, SampleBufferError};
