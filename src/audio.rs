//! Audio playback subsystem.
//!
//! A dedicated thread hosts the playback session behind an mpsc command
//! channel; the UI reads progress through a shared `PlaybackHandle`.

mod decoder;
mod focus;
mod player;
mod thread;
mod types;

pub use decoder::*;
pub use focus::*;
pub use player::*;
pub use types::*;
