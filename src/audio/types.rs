//! Audio-related small types and handles.
//!
//! This module defines the command enum sent to the audio thread and the
//! playback info struct shared with the UI and MPRIS.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::engine::PlaybackState;

#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing the track at the given index.
    Play(usize),
    /// Stop playback and drop the loaded track.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Skip to the next track (wraps at the end of the list).
    Next,
    /// Previous-button semantics: early in the track go to the prior one,
    /// otherwise restart the current track.
    Prev,
    /// Seek by the specified number of seconds (positive or negative).
    SeekBy(i32),
    /// Flip the replay-on-completion flag.
    ToggleReplay,
    /// Quit the audio thread.
    Quit,
}

#[derive(Debug, Clone)]
/// Runtime playback information shared with the UI.
pub struct PlaybackInfo {
    /// Currently playing track index in the library (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Current session state.
    pub state: PlaybackState,
    /// Whether the finished track will be replayed instead of advancing.
    pub replay: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            state: PlaybackState::Invalid,
            replay: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
