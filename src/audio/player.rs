use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::catalog::{CatalogLoader, Track};

use super::thread::spawn_audio_thread;
use super::types::{
    clamp_volume, AudioCmd, EngineEvent, LyricsHandle, PlaybackHandle, PlaybackInfo,
};

/// Handle to the audio thread: command sender plus the shared state the
/// engine publishes into.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<EngineEvent>,
    playback: PlaybackHandle,
    lyrics: LyricsHandle,
    load_token: AtomicU64,
    latest_token: Arc<AtomicU64>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(loader: CatalogLoader, initial_volume: f32) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
            volume: clamp_volume(initial_volume),
            ..PlaybackInfo::default()
        }));
        let lyrics: LyricsHandle = Arc::new(Mutex::new(Vec::new()));
        let latest_token = Arc::new(AtomicU64::new(0));

        let handle = spawn_audio_thread(
            loader,
            rx,
            event_tx,
            playback.clone(),
            lyrics.clone(),
            latest_token.clone(),
        );

        Self {
            tx,
            events: event_rx,
            playback,
            lyrics,
            load_token: AtomicU64::new(0),
            latest_token,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn lyrics_handle(&self) -> LyricsHandle {
        self.lyrics.clone()
    }

    /// Load and play `track`, superseding any in-flight load.
    ///
    /// Each attempt gets a fresh token; the engine publishes lyric results
    /// only while their token is still the latest one issued, so a slow
    /// fetch from a superseded selection can never overwrite newer lyrics.
    pub fn play(&self, track: Track) {
        let token = self.load_token.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_token.store(token, Ordering::SeqCst);
        let _ = self.send(AudioCmd::Play { track, token });
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Non-blocking poll of engine notifications.
    pub fn try_recv_event(&self) -> Option<EngineEvent> {
        self.events.try_recv().ok()
    }

    /// Ask the engine to fade out and stop, then wait for the thread.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
