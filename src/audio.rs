//! Playback engine: exactly one native audio output on a dedicated thread.
//!
//! The engine receives imperative commands over an mpsc channel, publishes
//! progress through a shared `PlaybackInfo` handle and notifies the runtime
//! of natural track completion through `EngineEvent`s.

mod player;
mod sink;
mod state;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use state::{PlayerEvent, PlayerState};
pub use types::{AudioCmd, EngineEvent, LyricsHandle, PlaybackHandle, PlaybackInfo};

#[cfg(test)]
mod tests;
