//! Application model.
//!
//! The `App` struct holds the current library, selected track and the
//! playback snapshot used by the UI and runtime.

mod model;

pub use model::*;
