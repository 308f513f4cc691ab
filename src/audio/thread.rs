use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::catalog::{CatalogLoader, Track};

use super::sink::create_sink_at;
use super::state::{PlayerEvent, PlayerState};
use super::types::{clamp_volume, AudioCmd, EngineEvent, LyricsHandle, PlaybackHandle};

pub(super) fn spawn_audio_thread(
    loader: CatalogLoader,
    rx: Receiver<AudioCmd>,
    events: Sender<EngineEvent>,
    playback_info: PlaybackHandle,
    lyrics: LyricsHandle,
    latest_token: Arc<AtomicU64>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        let initial_volume = playback_info
            .lock()
            .map(|info| info.volume)
            .unwrap_or(1.0);

        // Ticker thread advances the shared elapsed clock while playing.
        let info_for_ticker = playback_info.clone();
        thread::spawn(move || loop {
            thread::sleep(Duration::from_millis(500));
            if let Ok(mut info) = info_for_ticker.lock() {
                if info.state == PlayerState::Playing {
                    info.elapsed += Duration::from_millis(500);
                }
            }
        });

        let mut engine = Engine {
            loader,
            stream,
            events,
            playback_info,
            lyrics,
            latest_token,
            current: None,
            state: PlayerState::Idle,
            sink: None,
            duration: None,
            volume: initial_volume,
            looping: false,
        };

        loop {
            match rx.recv_timeout(Duration::from_millis(200)) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play { track, token } => engine.load_and_play(track, token),
                    AudioCmd::TogglePause => engine.toggle_pause(),
                    AudioCmd::Stop => engine.stop(),
                    AudioCmd::SeekTo(secs) => engine.seek_to(secs),
                    AudioCmd::SetVolume(v) => engine.set_volume(v),
                    AudioCmd::SetLooping(on) => engine.looping = on,
                    AudioCmd::Quit { fade_out_ms } => {
                        if let Some(ref s) = engine.sink {
                            fade_out_sink(s, fade_out_ms);
                            s.stop();
                        }
                        // Update shared state so UI/MPRIS don't keep showing Playing.
                        if let Ok(mut info) = engine.playback_info.lock() {
                            info.state = PlayerState::Idle;
                        }
                        break;
                    }
                },
                // The poll tick doubles as the completion check, so
                // advancement is always deferred by at least one turn
                // instead of firing inside an output callback.
                Err(RecvTimeoutError::Timeout) => engine.on_tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

struct Engine {
    loader: CatalogLoader,
    stream: OutputStream,
    events: Sender<EngineEvent>,
    playback_info: PlaybackHandle,
    lyrics: LyricsHandle,
    latest_token: Arc<AtomicU64>,

    current: Option<Track>,
    state: PlayerState,
    sink: Option<Sink>,
    duration: Option<Duration>,
    volume: f32,
    looping: bool,
}

impl Engine {
    fn transition(&mut self, event: PlayerEvent) {
        self.state = self.state.apply(event);
    }

    fn publish(&self) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.track = self.current.clone();
            info.state = self.state;
            info.duration = self.duration;
            info.volume = self.volume;
        }
    }

    fn set_elapsed(&mut self, elapsed: Duration) {
        if let Ok(mut info) = self.playback_info.lock() {
            info.elapsed = elapsed;
        }
    }

    /// Tear down the old source and start `track` from the beginning.
    ///
    /// Lyrics are fetched on a helper thread while the sink is built, and
    /// both are joined before playback starts. A stale `token` means a
    /// newer selection superseded this attempt; its lyrics are discarded.
    fn load_and_play(&mut self, track: Track, token: u64) {
        // The old source goes away synchronously before the new one is
        // assigned; two sinks are never audible at once.
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        self.current = Some(track.clone());
        self.duration = None;
        self.transition(PlayerEvent::Select);
        self.set_elapsed(Duration::ZERO);
        if token_is_current(token, self.latest_token.load(Ordering::SeqCst)) {
            if let Ok(mut l) = self.lyrics.lock() {
                l.clear();
            }
        }
        self.publish();

        let fetch_loader = self.loader.clone();
        let fetch_track = track.clone();
        let fetch = thread::spawn(move || fetch_loader.load_lyrics(&fetch_track));

        let audio_path = self.loader.resolve(track.key());
        let built = create_sink_at(&self.stream, &audio_path, Duration::ZERO);

        let lines = fetch.join().unwrap_or_default();
        if token_is_current(token, self.latest_token.load(Ordering::SeqCst)) {
            if let Ok(mut l) = self.lyrics.lock() {
                *l = lines;
            }
        }

        match built {
            Ok((sink, duration)) => {
                sink.set_volume(self.volume);
                sink.play();
                self.sink = Some(sink);
                self.duration = duration;
                self.transition(PlayerEvent::ReadyToPlay);
            }
            Err(e) => {
                eprintln!("rondo: cannot play {}: {e}", audio_path.display());
                self.transition(PlayerEvent::PlayFailed);
            }
        }
        self.publish();
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.current = None;
        self.duration = None;
        self.state = PlayerState::Idle;
        self.set_elapsed(Duration::ZERO);
        if let Ok(mut l) = self.lyrics.lock() {
            l.clear();
        }
        self.publish();
    }

    fn toggle_pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        match self.state {
            PlayerState::Playing => {
                sink.pause();
                self.transition(PlayerEvent::PauseRequested);
            }
            PlayerState::Paused => {
                sink.play();
                self.transition(PlayerEvent::PlayRequested);
            }
            _ => return,
        }
        self.publish();
    }

    /// Scrubbing: rebuild the sink and skip into the file at the target.
    fn seek_to(&mut self, secs: f64) {
        let Some(track) = self.current.clone() else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        let target = seek_target(secs, self.duration);

        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let audio_path = self.loader.resolve(track.key());
        match create_sink_at(&self.stream, &audio_path, target) {
            Ok((sink, duration)) => {
                sink.set_volume(self.volume);
                if self.state == PlayerState::Playing {
                    sink.play();
                }
                self.sink = Some(sink);
                if duration.is_some() {
                    self.duration = duration;
                }
                self.set_elapsed(target);
            }
            Err(e) => {
                eprintln!("rondo: seek failed for {}: {e}", audio_path.display());
                self.transition(PlayerEvent::PlayFailed);
            }
        }
        self.publish();
    }

    fn set_volume(&mut self, v: f32) {
        self.volume = clamp_volume(v);
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
        self.publish();
    }

    /// Periodic completion check.
    fn on_tick(&mut self) {
        let sink_empty = self.sink.as_ref().is_some_and(|s| s.empty());
        match track_completion(self.state, sink_empty, self.looping) {
            None => {}
            Some(TrackEnd::Replay) => {
                if let Some(track) = self.current.clone() {
                    self.replay(&track);
                }
            }
            Some(TrackEnd::Advance) => {
                self.sink = None;
                self.transition(PlayerEvent::Ended);
                self.set_elapsed(Duration::ZERO);
                self.publish();
                let _ = self.events.send(EngineEvent::Ended);
            }
        }
    }

    /// Restart the current track from zero without re-fetching lyrics.
    fn replay(&mut self, track: &Track) {
        let audio_path = self.loader.resolve(track.key());
        match create_sink_at(&self.stream, &audio_path, Duration::ZERO) {
            Ok((sink, duration)) => {
                sink.set_volume(self.volume);
                sink.play();
                self.sink = Some(sink);
                if duration.is_some() {
                    self.duration = duration;
                }
                self.set_elapsed(Duration::ZERO);
            }
            Err(e) => {
                eprintln!("rondo: loop restart failed for {}: {e}", audio_path.display());
                self.sink = None;
                self.transition(PlayerEvent::PlayFailed);
            }
        }
        self.publish();
    }
}

/// What a drained sink means for the current track.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum TrackEnd {
    /// Repeat-one is on: restart the same track, keep the queue where it is.
    Replay,
    /// Report completion so the runtime can move along the queue.
    Advance,
}

/// Decide what to do on a poll tick. `None` unless a playing sink has
/// actually drained; pauses and loads never complete a track.
pub(super) fn track_completion(
    state: PlayerState,
    sink_empty: bool,
    looping: bool,
) -> Option<TrackEnd> {
    if state != PlayerState::Playing || !sink_empty {
        return None;
    }
    Some(if looping {
        TrackEnd::Replay
    } else {
        TrackEnd::Advance
    })
}

/// A lyric result may only be published while its load token is still the
/// latest one issued; anything else belongs to a superseded selection.
pub(super) fn token_is_current(token: u64, latest: u64) -> bool {
    token == latest
}

/// Clamp a requested seek position to [0, duration].
pub(super) fn seek_target(secs: f64, duration: Option<Duration>) -> Duration {
    let mut target = secs.max(0.0);
    if let Some(d) = duration {
        target = target.min(d.as_secs_f64());
    }
    Duration::from_secs_f64(target)
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    let start = sink.volume();
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
