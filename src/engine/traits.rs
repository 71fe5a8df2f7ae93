//! Capability traits injected into the playback session.
//!
//! The session never talks to the platform directly: decoding, focus
//! negotiation and state reporting all go through these seams, which is
//! what makes the state machine testable without an audio device.

use std::path::Path;
use std::time::Duration;

use super::types::{DecodeError, FocusChange, PlaybackState};

/// Opaque capability that turns a track locator into audible output.
pub trait Decoder {
    /// Prepare the source behind `locator` for playback. The decoder is
    /// left paused at position zero; `start` makes it audible.
    fn load(&mut self, locator: &Path) -> Result<(), DecodeError>;
    fn start(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, position: Duration);
    fn position(&self) -> Duration;
    fn is_playing(&self) -> bool;
    /// Whether the loaded source has run to its end.
    fn is_finished(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
    /// Tear down the loaded source. Safe to call when nothing is loaded.
    fn release(&mut self);
    /// Whether a source is currently loaded.
    fn is_active(&self) -> bool;
}

/// Exclusive-access negotiation for the audio output device.
pub trait FocusNegotiator {
    /// Request focus; `true` means granted. Denial is not an error, the
    /// session degrades to a no-duck policy.
    fn request(&mut self) -> bool;
    fn release(&mut self);
    /// Next pending focus-change notification, if any.
    fn poll_event(&mut self) -> Option<FocusChange>;
}

/// Collaborator informed after every observable transition so an external
/// display (UI, MPRIS) can refresh itself.
pub trait PlaybackListener {
    fn state_changed(&mut self, state: PlaybackState);
    fn position_changed(&mut self, position: Duration);
    fn playback_completed(&mut self);
}
