use std::time::Duration;

use crate::audio::PlaybackHandle;
use crate::engine::PlaybackState;
use crate::library::Track;

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub selected: usize,

    /// Snapshot of the audio thread's state, refreshed every tick.
    pub playback: PlaybackState,
    pub playing_index: Option<usize>,
    pub elapsed: Duration,
    pub replay: bool,

    pub playback_handle: Option<PlaybackHandle>,
    pub current_dir: Option<String>,
    pub metadata_window: bool,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            selected: 0,
            playback: PlaybackState::Invalid,
            playing_index: None,
            elapsed: Duration::ZERO,
            replay: false,
            playback_handle: None,
            current_dir: None,
            metadata_window: false,
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Record the current directory in the app state.
    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    /// Pull the latest playback snapshot out of the shared handle.
    pub fn refresh_playback(&mut self) {
        let Some(handle) = self.playback_handle.as_ref() else {
            return;
        };
        if let Ok(info) = handle.lock() {
            self.playback = info.state;
            self.playing_index = info.index;
            self.elapsed = info.elapsed;
            self.replay = info.replay;
        }
    }

    /// Return true if the library contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// The track currently loaded in the audio thread, if any.
    pub fn playing_track(&self) -> Option<&Track> {
        self.playing_index.and_then(|i| self.tracks.get(i))
    }

    /// Set the selected track index, clamped to the list.
    pub fn set_selected(&mut self, idx: usize) {
        if self.tracks.is_empty() {
            self.selected = 0;
        } else {
            self.selected = idx.min(self.tracks.len() - 1);
        }
    }

    /// Move selection to the next track, wrapping at the end.
    pub fn next(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.tracks.len();
    }

    /// Move selection to the previous track, wrapping at the start.
    pub fn prev(&mut self) {
        if self.tracks.is_empty() {
            return;
        }
        if self.selected == 0 {
            self.selected = self.tracks.len() - 1;
        } else {
            self.selected -= 1;
        }
    }
}
