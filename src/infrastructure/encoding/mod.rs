//! Encoding adapters

mod wav;

pub use wav::WavEncoder;

/// Convert a float sample to 16-bit PCM.
///
/// Input is clamped to [-1.0, 1.0]; negative values scale by 32768 and
/// positive values by 32767 so both extremes are reachable.
pub fn sample_to_i16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_full_scale() {
        assert_eq!(sample_to_i16(1.0), i16::MAX);
        assert_eq!(sample_to_i16(-1.0), i16::MIN);
        assert_eq!(sample_to_i16(0.0), 0);
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(sample_to_i16(3.5), i16::MAX);
        assert_eq!(sample_to_i16(-7.0), i16::MIN);
        assert_eq!(sample_to_i16(f32::NAN), 0);
    }
}
