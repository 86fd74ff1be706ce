//! Recording infrastructure module
//!
//! Provides microphone capture using cpal, plus a synthetic recorder
//! that stands in for hardware. Captures are delivered as FLAC fragments.

mod cpal_recorder;
mod flac_encoder;
mod synthetic;

pub use cpal_recorder::CpalRecorder;
pub use flac_encoder::{encode_to_flac, EncodingError};
pub use synthetic::{SyntheticRecorder, SyntheticSignal};

use crate::application::ports::{CaptureEvent, CaptureEventSender};

/// Bytes per emitted capture fragment
pub const FRAGMENT_SIZE: usize = 64 * 1024;

/// Push an encoded capture as ordered fragments, then finalize
pub(crate) fn emit_capture(events: &CaptureEventSender, encoded: &[u8], fragment_size: usize) {
    for chunk in encoded.chunks(fragment_size.max(1)) {
        if events.send(CaptureEvent::Fragment(chunk.to_vec())).is_err() {
            return;
        }
    }
    let _ = events.send(CaptureEvent::Finalized);
}
