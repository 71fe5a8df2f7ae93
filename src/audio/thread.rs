use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::OutputStreamBuilder;

use crate::engine::{PlaybackListener, PlaybackSession, PlaybackState, POLL_INTERVAL};
use crate::library::Track;

use super::decoder::RodioDecoder;
use super::focus::UncontestedFocus;
use super::types::{AudioCmd, PlaybackHandle};

/// Listener that mirrors session transitions into the shared handle the
/// UI and MPRIS read from.
pub(super) struct SharedInfoListener {
    info: PlaybackHandle,
}

impl SharedInfoListener {
    pub(super) fn new(info: PlaybackHandle) -> Self {
        Self { info }
    }
}

impl PlaybackListener for SharedInfoListener {
    fn state_changed(&mut self, state: PlaybackState) {
        if let Ok(mut info) = self.info.lock() {
            info.state = state;
            // A fresh start plays from zero; a dead session has no position.
            if matches!(state, PlaybackState::Playing | PlaybackState::Invalid) {
                info.elapsed = Duration::ZERO;
            }
        }
    }

    fn position_changed(&mut self, position: Duration) {
        if let Ok(mut info) = self.info.lock() {
            info.elapsed = position;
        }
    }

    fn playback_completed(&mut self) {
        if let Ok(mut info) = self.info.lock() {
            info.elapsed = Duration::ZERO;
        }
    }
}

pub(super) fn spawn_audio_thread(
    tracks: Vec<Track>,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let decoder = RodioDecoder::new(stream);
        let listener = SharedInfoListener::new(playback_info.clone());
        let mut session = PlaybackSession::new(decoder, UncontestedFocus, listener);

        let mut last_poll = Instant::now();

        fn sync_info(playback_info: &PlaybackHandle, session_index: Option<usize>, replay: bool) {
            if let Ok(mut info) = playback_info.lock() {
                info.index = session_index;
                info.replay = replay;
            }
        }

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play(i) => {
                        if let Some(track) = tracks.get(i).cloned() {
                            session.load_track(track, tracks.clone());
                        }
                    }

                    AudioCmd::TogglePause => session.toggle(),

                    AudioCmd::SeekBy(secs) => {
                        let cur = session.position().as_secs() as i64;
                        let target = (cur + secs as i64).max(0) as u64;
                        session.seek(Duration::from_secs(target));
                        if let Ok(mut info) = playback_info.lock() {
                            info.elapsed = session.position();
                        }
                    }

                    AudioCmd::Next => session.skip(true),

                    AudioCmd::Prev => session.instant_reset(),

                    AudioCmd::ToggleReplay => session.toggle_replay(),

                    AudioCmd::Stop => session.stop(),

                    AudioCmd::Quit => {
                        session.stop();
                        sync_info(&playback_info, None, session.replay_on_completion());
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => {
                    session.drain_focus_events();

                    if session.track_finished() {
                        session.on_completion();
                    }

                    if last_poll.elapsed() >= POLL_INTERVAL {
                        session.poll();
                        last_poll = Instant::now();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }

            sync_info(
                &playback_info,
                session.current_index(),
                session.replay_on_completion(),
            );
        }
    })
}
