//! Small engine types: playback states, focus levels and decoder errors.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Volume applied while another application holds focus but ducking is allowed.
pub const VOLUME_DUCK: f32 = 0.2;
/// Volume applied while this player holds audio focus.
pub const VOLUME_NORMAL: f32 = 1.0;

/// Positions earlier than this make "previous" jump to the prior track;
/// later positions restart the current track instead.
pub const INSTANT_RESET_WINDOW: Duration = Duration::from_millis(5000);

/// Cadence of the position poll while playback is audible.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Externally visible playback status of the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// No track loaded.
    Invalid,
    /// Audible, freshly started from a track load or a restart.
    Playing,
    /// Not audible; decoder retains its position.
    Paused,
    /// Audible again after a pause. Equivalent to `Playing` except for
    /// display purposes.
    Resumed,
    /// The current track ran to its end.
    Completed,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Invalid
    }
}

impl PlaybackState {
    /// Whether this state produces sound.
    pub fn is_audible(self) -> bool {
        matches!(self, Self::Playing | Self::Resumed)
    }
}

/// Audio-focus level currently held by the session.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FocusLevel {
    /// Full focus; play at normal volume.
    Focused,
    /// Focus lost to a peer that allows ducked playback.
    NoFocusCanDuck,
    /// Focus lost entirely; playback must pause.
    NoFocusNoDuck,
}

/// Focus-change notification delivered by the focus negotiator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FocusChange {
    /// Focus (re)gained.
    Gain,
    /// Temporary loss; ducked playback is acceptable.
    TransientLossCanDuck,
    /// Temporary loss; playback should pause and resume on the next gain.
    TransientLoss,
    /// Permanent loss.
    Loss,
}

/// Why a decoder refused to load a track.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("track has no source location")]
    EmptyLocator,
    #[error("failed to open {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path:?}: {reason}")]
    Undecodable { path: PathBuf, reason: String },
}
