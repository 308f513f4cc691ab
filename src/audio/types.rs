//! Audio-related small types and handles.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::{LyricLine, Track};

use super::state::PlayerState;

#[derive(Debug)]
pub enum AudioCmd {
    /// Tear down the current source and play `track` from the start.
    /// `token` tags the load attempt so stale lyric fetches are discarded.
    Play { track: Track, token: u64 },
    /// Toggle pause/resume.
    TogglePause,
    /// Stop playback and release the current source.
    Stop,
    /// Seek to an absolute position in seconds; clamped to [0, duration].
    SeekTo(f64),
    /// Set the output volume; clamped to [0, 1].
    SetVolume(f32),
    /// While looping, natural completion replays the current track and
    /// queue advancement stays suspended.
    SetLooping(bool),
    /// Quit the audio thread, optionally fading out over `fade_out_ms`.
    Quit { fade_out_ms: u64 },
}

/// Notifications from the engine back to the runtime.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The current track finished naturally while looping was off.
    Ended,
}

/// Runtime playback information shared with the UI and the session bridge.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Currently loaded track, if any.
    pub track: Option<Track>,
    pub state: PlayerState,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Total duration as reported by the decoder, when known.
    pub duration: Option<Duration>,
    pub volume: f32,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            track: None,
            state: PlayerState::Idle,
            elapsed: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
pub type LyricsHandle = Arc<Mutex<Vec<LyricLine>>>;

/// Volume is always kept inside [0, 1].
pub(crate) fn clamp_volume(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
