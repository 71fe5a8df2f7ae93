//! Desktop focus negotiation.
//!
//! There is no system arbiter for the audio output here, so focus requests
//! always succeed and no change notifications ever arrive. The session's
//! duck/pause policy stays exercised through tests and alternative
//! negotiators.

use crate::engine::{FocusChange, FocusNegotiator};

#[derive(Debug, Default)]
pub struct UncontestedFocus;

impl FocusNegotiator for UncontestedFocus {
    fn request(&mut self) -> bool {
        true
    }

    fn release(&mut self) {}

    fn poll_event(&mut self) -> Option<FocusChange> {
        None
    }
}
