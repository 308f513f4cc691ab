use std::time::Duration;

use super::state::{PlayerEvent, PlayerState};
use super::thread::{seek_target, token_is_current, track_completion, TrackEnd};
use super::types::clamp_volume;

#[test]
fn select_always_enters_loading() {
    for start in [
        PlayerState::Idle,
        PlayerState::Loading,
        PlayerState::Playing,
        PlayerState::Paused,
    ] {
        assert_eq!(start.apply(PlayerEvent::Select), PlayerState::Loading);
    }
}

#[test]
fn play_failed_always_resolves_to_idle() {
    for start in [
        PlayerState::Idle,
        PlayerState::Loading,
        PlayerState::Playing,
        PlayerState::Paused,
    ] {
        assert_eq!(start.apply(PlayerEvent::PlayFailed), PlayerState::Idle);
    }
}

#[test]
fn loading_becomes_playing_when_ready() {
    assert_eq!(
        PlayerState::Loading.apply(PlayerEvent::ReadyToPlay),
        PlayerState::Playing
    );
}

#[test]
fn ready_to_play_is_ignored_outside_loading() {
    assert_eq!(
        PlayerState::Idle.apply(PlayerEvent::ReadyToPlay),
        PlayerState::Idle
    );
    assert_eq!(
        PlayerState::Paused.apply(PlayerEvent::ReadyToPlay),
        PlayerState::Paused
    );
}

#[test]
fn pause_and_resume_round_trip() {
    let paused = PlayerState::Playing.apply(PlayerEvent::PauseRequested);
    assert_eq!(paused, PlayerState::Paused);
    assert_eq!(paused.apply(PlayerEvent::PlayRequested), PlayerState::Playing);
}

#[test]
fn pause_is_ignored_when_not_playing() {
    assert_eq!(
        PlayerState::Idle.apply(PlayerEvent::PauseRequested),
        PlayerState::Idle
    );
    assert_eq!(
        PlayerState::Loading.apply(PlayerEvent::PauseRequested),
        PlayerState::Loading
    );
}

#[test]
fn natural_end_returns_to_idle() {
    assert_eq!(
        PlayerState::Playing.apply(PlayerEvent::Ended),
        PlayerState::Idle
    );
    // Ended from anywhere else keeps the state.
    assert_eq!(
        PlayerState::Paused.apply(PlayerEvent::Ended),
        PlayerState::Paused
    );
}

#[test]
fn volume_is_clamped_to_unit_range() {
    assert_eq!(clamp_volume(1.5), 1.0);
    assert_eq!(clamp_volume(-0.2), 0.0);
    assert_eq!(clamp_volume(0.65), 0.65);
}

#[test]
fn stale_lyric_results_are_discarded() {
    // Token 3 was superseded by a newer selection; only 5 may publish.
    assert!(!token_is_current(3, 5));
    assert!(token_is_current(5, 5));
}

#[test]
fn drained_sink_advances_only_while_playing() {
    assert_eq!(
        track_completion(PlayerState::Playing, true, false),
        Some(TrackEnd::Advance)
    );
    // A paused or loading sink draining is not a completion.
    assert_eq!(track_completion(PlayerState::Paused, true, false), None);
    assert_eq!(track_completion(PlayerState::Loading, true, false), None);
    assert_eq!(track_completion(PlayerState::Idle, true, false), None);
    // Still audible: nothing to do yet.
    assert_eq!(track_completion(PlayerState::Playing, false, false), None);
}

#[test]
fn loop_replays_instead_of_advancing() {
    assert_eq!(
        track_completion(PlayerState::Playing, true, true),
        Some(TrackEnd::Replay)
    );
    // Looping never turns a non-completion into one.
    assert_eq!(track_completion(PlayerState::Playing, false, true), None);
    assert_eq!(track_completion(PlayerState::Paused, true, true), None);
}

#[test]
fn seek_target_clamps_to_track_bounds() {
    let duration = Some(Duration::from_secs(180));
    assert_eq!(seek_target(-5.0, duration), Duration::ZERO);
    assert_eq!(seek_target(200.0, duration), Duration::from_secs(180));
    assert_eq!(seek_target(42.0, duration), Duration::from_secs(42));
    // Unknown duration only clamps the lower bound.
    assert_eq!(seek_target(9000.0, None), Duration::from_secs(9000));
}
