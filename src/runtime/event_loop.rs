use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::engine::PlaybackState;
use crate::mpris::ControlCmd;
use crate::mpris::MprisHandle;
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last-known playing index as emitted to MPRIS.
    pub last_mpris_index: Option<usize>,
    /// Last-known playback state as emitted to MPRIS.
    pub last_mpris_playback: PlaybackState,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            pending_gg: false,
            last_mpris_index: None,
            last_mpris_playback: app.playback,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Sync the playback snapshot from the audio thread.
        app.refresh_playback();

        // Keep MPRIS in sync even when playback changes come from
        // auto-advance or a focus policy inside the audio thread.
        if app.playing_index != state.last_mpris_index
            || app.playback != state.last_mpris_playback
        {
            update_mpris(mpris, app);
            state.last_mpris_index = app.playing_index;
            state.last_mpris_playback = app.playback;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, audio_player)? {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, control_tx, state)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_control_cmd(
    cmd: ControlCmd,
    app: &mut App,
    audio_player: &AudioPlayer,
) -> Result<bool, Box<dyn std::error::Error>> {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit();
            return Ok(true);
        }
        ControlCmd::Play => match app.playback {
            PlaybackState::Paused => {
                let _ = audio_player.send(AudioCmd::TogglePause);
            }
            PlaybackState::Invalid | PlaybackState::Completed => {
                if app.has_tracks() {
                    let _ = audio_player.send(AudioCmd::Play(app.selected));
                }
            }
            PlaybackState::Playing | PlaybackState::Resumed => {}
        },
        ControlCmd::Pause => {
            if app.playback.is_audible() {
                let _ = audio_player.send(AudioCmd::TogglePause);
            }
        }
        ControlCmd::PlayPause => match app.playback {
            PlaybackState::Invalid | PlaybackState::Completed => {
                if app.has_tracks() {
                    let _ = audio_player.send(AudioCmd::Play(app.selected));
                }
            }
            _ => {
                let _ = audio_player.send(AudioCmd::TogglePause);
            }
        },
        ControlCmd::Stop => {
            let _ = audio_player.send(AudioCmd::Stop);
        }
        ControlCmd::Next => {
            if app.has_tracks() {
                let _ = audio_player.send(AudioCmd::Next);
            }
        }
        ControlCmd::Prev => {
            if app.has_tracks() {
                let _ = audio_player.send(AudioCmd::Prev);
            }
        }
    }

    Ok(false)
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            audio_player.quit();
            return Ok(true);
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.set_selected(0);
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            if app.has_tracks() {
                app.set_selected(app.tracks.len() - 1);
            }
        }
        KeyCode::Char('j') => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if app.has_tracks() {
                let already_playing_selected =
                    app.playback.is_audible() && app.playing_index == Some(app.selected);
                if !already_playing_selected {
                    let _ = audio_player.send(AudioCmd::Play(app.selected));
                }
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            let secs = settings.controls.scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(secs));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            let secs = settings.controls.scrub_seconds.min(i32::MAX as u64) as i32;
            let _ = audio_player.send(AudioCmd::SeekBy(-secs));
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            let _ = audio_player.send(AudioCmd::ToggleReplay);
        }
        KeyCode::Char('x') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            app.toggle_metadata_window();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    Ok(false)
}
