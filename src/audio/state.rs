//! The playback state machine.
//!
//! Playback lifecycle is modeled as an explicit transition table instead of
//! ad hoc `playing`/`loading` flags, so overlapping states cannot exist.

/// Playback lifecycle states.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayerState {
    /// No source loaded.
    #[default]
    Idle,
    /// A selection is buffering; lyrics and audio are being fetched.
    Loading,
    Playing,
    Paused,
}

/// Inputs that drive `PlayerState` transitions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A track was selected for playback.
    Select,
    /// Audio and lyrics are ready; playback starts.
    ReadyToPlay,
    /// The source could not be opened, decoded or restarted.
    PlayFailed,
    /// The current track finished naturally.
    Ended,
    PauseRequested,
    PlayRequested,
}

impl PlayerState {
    /// Apply one event; pairs not listed in the table keep the state.
    pub fn apply(self, event: PlayerEvent) -> PlayerState {
        use PlayerEvent::*;
        use PlayerState::*;

        match (self, event) {
            // A new selection supersedes whatever was happening.
            (_, Select) => Loading,
            // Failures always resolve to "not playing, not loading".
            (_, PlayFailed) => Idle,
            (Loading, ReadyToPlay) => Playing,
            (Playing, Ended) => Idle,
            (Playing, PauseRequested) => Paused,
            (Paused, PlayRequested) => Playing,
            (state, _) => state,
        }
    }

    pub fn is_playing(self) -> bool {
        self == PlayerState::Playing
    }

    pub fn is_loading(self) -> bool {
        self == PlayerState::Loading
    }
}
