//! Playback adapters

mod noop;
mod rodio;

pub use noop::NoOpPlayer;
pub use self::rodio::RodioPlayer;
