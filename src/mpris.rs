use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::audio::PlayerState;
use crate::catalog::{CatalogLoader, Track};

#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Relative seek, microseconds.
    SeekBy(i64),
    /// Absolute seek, microseconds.
    SeekTo(i64),
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlayerState,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    url: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    position_micros: i64,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
    loader: CatalogLoader,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlayerState) {
        let changed = match self.state.lock() {
            Ok(mut s) if s.playback != playback => {
                s.playback = playback;
                true
            }
            _ => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }

    /// Publish metadata for the loaded track, or clear it between tracks.
    pub fn set_track_metadata(
        &self,
        id: Option<u64>,
        track: Option<&Track>,
        length_micros: Option<i64>,
    ) {
        if let Ok(mut s) = self.state.lock() {
            match track {
                Some(t) => {
                    s.title = Some(t.title.clone());
                    s.artist = if t.artist.is_empty() {
                        Vec::new()
                    } else {
                        vec![t.artist.clone()]
                    };
                    s.album = if t.album.is_empty() {
                        None
                    } else {
                        Some(t.album.clone())
                    };
                    s.url = Some(self.file_url(t.key()));
                    let image = if t.cover.is_empty() { &t.art } else { &t.cover };
                    s.art_url = if image.is_empty() {
                        None
                    } else {
                        Some(self.file_url(image))
                    };
                    s.length_micros = length_micros;
                    s.track_id = id.and_then(|n| {
                        ObjectPath::try_from(format!("/org/mpris/MediaPlayer2/track/{n}"))
                            .ok()
                            .map(OwnedObjectPath::from)
                    });
                }
                None => {
                    s.title = None;
                    s.artist = Vec::new();
                    s.album = None;
                    s.url = None;
                    s.art_url = None;
                    s.length_micros = None;
                    s.track_id = None;
                }
            }
        }
        let _ = self.notify.send(());
    }

    pub fn set_position(&self, micros: i64) {
        if let Ok(mut s) = self.state.lock() {
            s.position_micros = micros;
        }
    }

    fn file_url(&self, rel: &str) -> String {
        format!("file://{}", self.loader.resolve(rel).display())
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
        "rondo"
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

    fn seek(&self, offset: i64) {
        let _ = self.tx.send(ControlCmd::SeekBy(offset));
    }

    // A Rust method named `set_position` would be taken as the setter for
    // the `Position` property, so the D-Bus name is attached explicitly.
    #[zbus(name = "SetPosition")]
    fn jump_to_position(&self, track_id: ObjectPath<'_>, position: i64) {
        let matches = self
            .state
            .lock()
            .ok()
            .and_then(|s| s.track_id.as_ref().map(|id| id.as_str() == track_id.as_str()))
            .unwrap_or(false);
        if matches {
            let _ = self.tx.send(ControlCmd::SeekTo(position));
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlayerState::Idle => "Stopped",
            // Nothing is audible while buffering, and "Stopped" would make
            // desktop widgets drop the metadata mid-load.
            PlayerState::Loading => "Paused",
            PlayerState::Playing => "Playing",
            PlayerState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state.lock().map(|s| s.position_micros).unwrap_or(0)
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn minimum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn maximum_rate(&self) -> f64 {
        1.0
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
    fn can_seek(&self) -> bool {
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

        if let Some(id) = s.track_id.as_ref() {
            insert_value(&mut map, "mpris:trackid", Value::from(id.clone()));
        }
        if let Some(title) = s.title.as_ref() {
            insert_value(&mut map, "xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            insert_value(&mut map, "xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = s.album.as_ref() {
            insert_value(&mut map, "xesam:album", Value::from(album.clone()));
        }
        if let Some(url) = s.url.as_ref() {
            insert_value(&mut map, "xesam:url", Value::from(url.clone()));
        }
        if let Some(art) = s.art_url.as_ref() {
            insert_value(&mut map, "mpris:artUrl", Value::from(art.clone()));
        }
        if let Some(length) = s.length_micros {
            insert_value(&mut map, "mpris:length", Value::from(length));
        }
        map
    }
}

fn insert_value(map: &mut HashMap<String, OwnedValue>, key: &str, value: Value<'_>) {
    if let Ok(owned) = OwnedValue::try_from(value) {
        map.insert(key.to_string(), owned);
    }
}

/// Register the player on the session bus. Returns a handle the runtime
/// feeds with playback changes; bus failures are reported on stderr and the
/// player keeps running without a session bridge.
pub fn spawn_mpris(tx: Sender<ControlCmd>, loader: CatalogLoader) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = std::sync::mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("rondo: MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name("org.mpris.MediaPlayer2.rondo").await {
                eprintln!("rondo: MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                eprintln!("rondo: MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                eprintln!("rondo: MPRIS: failed to register player iface: {e}");
                return;
            }

            let player_ref = match object_server.interface::<_, PlayerIface>(path).await {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("rondo: MPRIS: failed to look up player iface: {e}");
                    return;
                }
            };

            // Wake periodically and emit PropertiesChanged when the runtime
            // pushed an update through the notify channel.
            loop {
                Timer::after(std::time::Duration::from_millis(500)).await;
                let mut dirty = false;
                while notify_rx.try_recv().is_ok() {
                    dirty = true;
                }
                if dirty {
                    let iface = player_ref.get().await;
                    let emitter = player_ref.signal_emitter();
                    let _ = iface.playback_status_changed(emitter).await;
                    let _ = iface.metadata_changed(emitter).await;
                }
            }
        });
    });

    MprisHandle {
        state,
        notify: notify_tx,
        loader,
    }
}

#[cfg(test)]
mod tests;
