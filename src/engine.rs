//! Playback engine: the state machine that owns the current track,
//! playback position and audio-focus level.
//!
//! The engine is deliberately free of any platform code. It consumes a
//! decoder, a focus negotiator and a listener through traits so the whole
//! state machine can be driven in unit tests without an audio device.

mod session;
mod traits;
mod types;

pub use session::*;
pub use traits::*;
pub use types::*;
