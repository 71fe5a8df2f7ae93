//! MPRIS (org.mpris.MediaPlayer2) front-end.
//!
//! A background thread owns the D-Bus connection; the rest of the app
//! pushes state through `MprisHandle` and receives remote commands over
//! the `ControlCmd` channel. A missing session bus degrades to a notice
//! on stderr, it never takes the player down.

use std::collections::HashMap;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::engine::PlaybackState;
use crate::library::Track;

#[cfg(test)]
mod tests;

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
        let _ = self.notify.send(());
    }

    /// Publish (or clear) the metadata for the currently loaded track.
    pub fn set_track_metadata(&self, index: Option<usize>, track: Option<&Track>) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.title = Some(t.title.clone());
                    s.artist = t.artist.clone().into_iter().collect();
                    s.album = t.album.clone();
                    s.url = Some(format!("file://{}", t.locator.display()));
                    s.length_micros = t.duration.map(|d| d.as_micros() as i64);
                    s.track_id = index.and_then(|i| {
                        ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{i}"))
                            .ok()
                            .map(|p| p.into())
                    });
                }
                None => {
                    s.title = None;
                    s.artist.clear();
                    s.album = None;
                    s.url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "encore"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Playing | PlaybackState::Resumed => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Invalid | PlaybackState::Completed => "Stopped",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        fn insert(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        }

        if let Some(ref id) = s.track_id {
            insert(
                &mut map,
                "mpris:trackid",
                Value::ObjectPath(id.clone().into_inner()),
            );
        }
        if let Some(ref title) = s.title {
            insert(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(ref album) = s.album {
            insert(&mut map, "xesam:album", Value::from(album.clone()));
        }
        if let Some(ref url) = s.url {
            insert(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(length) = s.length_micros {
            insert(&mut map, "mpris:length", Value::from(length));
        }
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        serve(tx, state_for_thread, notify_rx);
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

fn serve(tx: Sender<ControlCmd>, state: Arc<Mutex<SharedState>>, notify_rx: Receiver<()>) {
    block_on(async move {
        let path = "/org/mpris/MediaPlayer2";

        let connection = match Connection::session().await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("MPRIS: failed to connect to session bus: {e}");
                return;
            }
        };

        if let Err(e) = connection
            .request_name("org.mpris.MediaPlayer2.encore")
            .await
        {
            eprintln!("MPRIS: failed to acquire name: {e}");
            return;
        }

        let object_server = connection.object_server();

        if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
            eprintln!("MPRIS: failed to register root iface: {e}");
            return;
        }

        if let Err(e) = object_server
            .at(
                path,
                PlayerIface {
                    tx,
                    state: state.clone(),
                },
            )
            .await
        {
            eprintln!("MPRIS: failed to register player iface: {e}");
            return;
        }

        let iface_ref = match object_server.interface::<_, PlayerIface>(path).await {
            Ok(r) => r,
            Err(e) => {
                eprintln!("MPRIS: failed to look up player iface: {e}");
                return;
            }
        };

        // Forward state pushes as PropertiesChanged so remotes refresh
        // without polling.
        loop {
            Timer::after(Duration::from_millis(500)).await;

            let mut dirty = false;
            while notify_rx.try_recv().is_ok() {
                dirty = true;
            }
            if dirty {
                let iface = iface_ref.get().await;
                let emitter = iface_ref.signal_emitter();
                let _ = iface.playback_status_changed(emitter).await;
                let _ = iface.metadata_changed(emitter).await;
            }
        }
    });
}
