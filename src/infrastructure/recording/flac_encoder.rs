//! FLAC encoder for captured microphone audio
//!
//! FLAC is the capture container: lossless, compressed and decodable
//! by the pipeline's decoder.
//!
//! Settings:
//! - Device sample rate and channel count, unchanged
//! - 16-bit samples

use flacenc::bitsink::ByteSink;
use flacenc::component::BitRepr;
use flacenc::config;
use flacenc::error::Verify;
use flacenc::source::MemSource;

/// Bits per sample (16-bit audio)
const BITS_PER_SAMPLE: usize = 16;

/// Encode interleaved PCM samples to a FLAC stream
pub fn encode_to_flac(
    interleaved: &[i16],
    channels: usize,
    sample_rate: u32,
) -> Result<Vec<u8>, EncodingError> {
    if channels == 0 || interleaved.len() % channels != 0 {
        return Err(EncodingError::Layout {
            samples: interleaved.len(),
            channels,
        });
    }

    // flacenc works on i32 internally
    let samples_i32: Vec<i32> = interleaved.iter().map(|&s| s as i32).collect();

    let config = config::Encoder::default()
        .into_verified()
        .map_err(|(_, e)| EncodingError::Config(format!("{:?}", e)))?;

    let source = MemSource::from_samples(
        &samples_i32,
        channels,
        BITS_PER_SAMPLE,
        sample_rate as usize,
    );

    let flac_stream = flacenc::encode_with_fixed_block_size(&config, source, config.block_size)
        .map_err(|e| EncodingError::Encode(format!("{:?}", e)))?;

    let mut sink = ByteSink::new();
    flac_stream
        .write(&mut sink)
        .map_err(|e| EncodingError::Write(e.to_string()))?;

    Ok(sink.into_inner())
}

/// FLAC encoding errors
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    #[error("{samples} samples do not divide into {channels} channels")]
    Layout { samples: usize, channels: usize },

    #[error("FLAC config error: {0}")]
    Config(String),

    #[error("FLAC encoding failed: {0}")]
    Encode(String),

    #[error("FLAC write failed: {0}")]
    Write(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_silence() {
        let silence = vec![0i16; 16_000];
        let flac_data = encode_to_flac(&silence, 1, 16_000).unwrap();

        assert!(flac_data.len() > 50);
        assert_eq!(&flac_data[0..4], b"fLaC");
    }

    #[test]
    fn encode_stereo_signal_compresses() {
        let rate = 44_100;
        let samples: Vec<i16> = (0..rate)
            .flat_map(|i| {
                let t = i as f32 / rate as f32;
                let s = (f32::sin(2.0 * std::f32::consts::PI * 440.0 * t) * 16000.0) as i16;
                [s, s / 2]
            })
            .collect();

        let flac_data = encode_to_flac(&samples, 2, rate as u32).unwrap();
        assert!(flac_data.len() < samples.len() * 2);
    }

    #[test]
    fn rejects_partial_frames() {
        assert!(matches!(
            encode_to_flac(&[0, 0, 0], 2, 8_000),
            Err(EncodingError::Layout { samples: 3, channels: 2 })
        ));
        assert!(encode_to_flac(&[0, 0], 0, 8_000).is_err());
    }
}
