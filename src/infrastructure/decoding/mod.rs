//! Decoding adapters

mod symphonia;

pub use self::symphonia::SymphoniaDecoder;
