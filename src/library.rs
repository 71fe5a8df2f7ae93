//! Track model and enumeration.
//!
//! Tracks come either from a filesystem scan (`scan`) or, when the scan
//! yields nothing, from the bundled sample list (`sample_tracks`).

mod display;
mod model;
mod samples;
mod scan;

pub use display::*;
pub use model::*;
pub use samples::*;
pub use scan::*;
