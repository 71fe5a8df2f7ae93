//! The playback state machine.
//!
//! `PlaybackSession` owns the selected track, the list it was chosen from,
//! the audio-focus level and the replay/resume flags, and derives the
//! externally visible playback state from user commands and focus events.

use std::time::Duration;

use crate::library::Track;

use super::traits::{Decoder, FocusNegotiator, PlaybackListener};
use super::types::{
    FocusChange, FocusLevel, INSTANT_RESET_WINDOW, PlaybackState, VOLUME_DUCK, VOLUME_NORMAL,
};

pub struct PlaybackSession<D, F, L> {
    decoder: D,
    focus: F,
    listener: L,

    tracks: Vec<Track>,
    selected: Option<Track>,

    state: PlaybackState,
    focus_level: FocusLevel,

    /// Replay the current track once when it completes.
    replay_on_completion: bool,
    /// Resume playback when focus returns after a transient loss.
    resume_on_focus_gain: bool,
    /// Whether the host should run the periodic position poll.
    poll_armed: bool,
}

impl<D, F, L> PlaybackSession<D, F, L>
where
    D: Decoder,
    F: FocusNegotiator,
    L: PlaybackListener,
{
    pub fn new(decoder: D, focus: F, listener: L) -> Self {
        Self {
            decoder,
            focus,
            listener,
            tracks: Vec::new(),
            selected: None,
            state: PlaybackState::Invalid,
            focus_level: FocusLevel::NoFocusNoDuck,
            replay_on_completion: false,
            resume_on_focus_gain: false,
            poll_armed: false,
        }
    }

    /// Select `track` out of `tracks` and load it into the decoder.
    ///
    /// `track` must be an element of `tracks`; next/previous lookups are
    /// index-based against that list. A bad locator does not surface an
    /// error: the session fails forward to the next track.
    pub fn load_track(&mut self, track: Track, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.selected = Some(track);
        self.init_decoder();
    }

    /// Load the selected track, failing forward through the list on decode
    /// errors. Bounded to one full pass: when every track fails the session
    /// gives up and returns to `Invalid` instead of skipping forever.
    fn init_decoder(&mut self) {
        let mut attempts = 0;
        loop {
            let Some(track) = self.selected.clone() else {
                return;
            };

            self.focus_level = if self.focus.request() {
                FocusLevel::Focused
            } else {
                FocusLevel::NoFocusNoDuck
            };

            let loaded = if track.locator.as_os_str().is_empty() {
                Err(super::types::DecodeError::EmptyLocator)
            } else {
                self.decoder.load(&track.locator)
            };

            match loaded {
                Ok(()) => {
                    self.decoder.start();
                    self.start_position_updates();
                    self.set_state(PlaybackState::Playing);
                    return;
                }
                Err(_) => {
                    attempts += 1;
                    if self.tracks.is_empty() || attempts >= self.tracks.len() {
                        self.decoder.release();
                        self.stop_position_updates();
                        self.set_state(PlaybackState::Invalid);
                        return;
                    }
                    let current = self.selected_index().unwrap_or(0);
                    let next = self.neighbor_index(current, true);
                    self.selected = Some(self.tracks[next].clone());
                }
            }
        }
    }

    /// Resume (or start) audible playback if a track is loaded.
    pub fn play(&mut self) {
        if self.decoder.is_active() && !self.decoder.is_playing() {
            self.decoder.start();
            self.set_state(PlaybackState::Resumed);
            self.start_position_updates();
        }
    }

    /// Pause playback and cancel the position poll.
    pub fn pause(&mut self) {
        self.set_state(PlaybackState::Paused);
        if self.decoder.is_active() {
            self.decoder.pause();
        }
        self.stop_position_updates();
    }

    /// Dispatch to `pause` or `play` based on current audibility.
    pub fn toggle(&mut self) {
        if self.decoder.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Reposition within the current track. No-op without a loaded decoder.
    pub fn seek(&mut self, position: Duration) {
        if self.decoder.is_active() {
            self.decoder.seek_to(position);
        }
    }

    /// Move to the neighboring track. Out-of-range wraps to the opposite
    /// end of the list: this is a circular-list policy, not an error.
    pub fn skip(&mut self, forward: bool) {
        let Some(current) = self.selected_index() else {
            return;
        };
        let next = self.neighbor_index(current, forward);
        self.selected = Some(self.tracks[next].clone());
        self.init_decoder();
    }

    /// Conventional "previous" button semantics: early in the track go to
    /// the prior one, otherwise restart the current track from zero.
    pub fn instant_reset(&mut self) {
        if !self.decoder.is_active() {
            return;
        }
        if self.decoder.position() < INSTANT_RESET_WINDOW {
            self.skip(false);
        } else {
            self.restart_current();
        }
    }

    /// Flip the replay-on-completion flag.
    pub fn toggle_replay(&mut self) {
        self.replay_on_completion = !self.replay_on_completion;
    }

    /// The current track ran to its end: replay it once if requested,
    /// otherwise advance to the next track.
    pub fn on_completion(&mut self) {
        self.set_state(PlaybackState::Completed);
        self.listener.playback_completed();

        if self.replay_on_completion {
            if self.decoder.is_active() {
                self.restart_current();
            }
            self.replay_on_completion = false;
        } else {
            self.skip(true);
        }
    }

    /// Record a focus change and re-derive the volume/pause policy.
    pub fn on_focus_changed(&mut self, change: FocusChange) {
        match change {
            FocusChange::Gain => self.focus_level = FocusLevel::Focused,
            FocusChange::TransientLossCanDuck => self.focus_level = FocusLevel::NoFocusCanDuck,
            FocusChange::TransientLoss => {
                self.focus_level = FocusLevel::NoFocusNoDuck;
                self.resume_on_focus_gain = self.decoder.is_active() && self.state.is_audible();
            }
            FocusChange::Loss => self.focus_level = FocusLevel::NoFocusNoDuck,
        }

        if self.decoder.is_active() {
            self.apply_focus_policy();
        }
    }

    /// Drain pending focus notifications from the negotiator.
    pub fn drain_focus_events(&mut self) {
        while let Some(change) = self.focus.poll_event() {
            self.on_focus_changed(change);
        }
    }

    /// Stop playback and return to `Invalid`, keeping the track list so a
    /// later load can reuse it.
    pub fn stop(&mut self) {
        self.release();
        self.set_state(PlaybackState::Invalid);
    }

    /// Tear down the decoder and give up focus.
    pub fn release(&mut self) {
        if self.decoder.is_active() {
            self.decoder.release();
            self.focus.release();
            self.focus_level = FocusLevel::NoFocusNoDuck;
        }
        self.stop_position_updates();
    }

    /// Report the current position to the listener. Driven by the host at
    /// a fixed cadence; does nothing unless the poll is armed and audible.
    pub fn poll(&mut self) {
        if self.poll_armed && self.decoder.is_active() && self.decoder.is_playing() {
            self.listener.position_changed(self.decoder.position());
        }
    }

    /// Whether the loaded track has run to its end while audible.
    pub fn track_finished(&self) -> bool {
        self.decoder.is_active() && self.decoder.is_playing() && self.decoder.is_finished()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Current decoder position, zero when nothing is loaded.
    pub fn position(&self) -> Duration {
        if self.decoder.is_active() {
            self.decoder.position()
        } else {
            Duration::ZERO
        }
    }

    pub fn focus_level(&self) -> FocusLevel {
        self.focus_level
    }

    pub fn is_playing(&self) -> bool {
        self.decoder.is_playing()
    }

    pub fn replay_on_completion(&self) -> bool {
        self.replay_on_completion
    }

    pub fn poll_armed(&self) -> bool {
        self.poll_armed
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.selected.as_ref()
    }

    /// Index of the selected track within its list, if it is still there.
    pub fn current_index(&self) -> Option<usize> {
        self.selected_index()
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.tracks.iter().position(|t| t.id == selected.id)
    }

    fn neighbor_index(&self, current: usize, forward: bool) -> usize {
        let last = self.tracks.len().saturating_sub(1);
        if forward {
            if current >= last { 0 } else { current + 1 }
        } else if current == 0 {
            last
        } else {
            current - 1
        }
    }

    fn restart_current(&mut self) {
        self.decoder.seek_to(Duration::ZERO);
        self.decoder.start();
        self.set_state(PlaybackState::Playing);
        self.start_position_updates();
    }

    fn apply_focus_policy(&mut self) {
        match self.focus_level {
            FocusLevel::NoFocusNoDuck => self.pause(),
            level => {
                let volume = if level == FocusLevel::NoFocusCanDuck {
                    VOLUME_DUCK
                } else {
                    VOLUME_NORMAL
                };
                self.decoder.set_volume(volume);
                if self.resume_on_focus_gain {
                    self.play();
                    self.resume_on_focus_gain = false;
                }
            }
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        self.state = state;
        self.listener.state_changed(state);
    }

    fn start_position_updates(&mut self) {
        self.poll_armed = true;
    }

    fn stop_position_updates(&mut self) {
        self.poll_armed = false;
    }
}
