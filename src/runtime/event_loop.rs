use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::ambient::{self, Palette};
use crate::app::{App, Pane};
use crate::audio::{AudioCmd, AudioPlayer, EngineEvent, PlaybackInfo, PlayerState};
use crate::catalog::{CatalogLoader, Track};
use crate::config;
use crate::mpris::ControlCmd;
use crate::mpris::MprisHandle;
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last track key emitted to MPRIS.
    last_mpris_key: Option<String>,
    /// Last playback state emitted to MPRIS.
    last_mpris_playback: PlayerState,
    /// In-flight artwork analysis, keyed by the track it belongs to.
    palette_rx: Option<(String, mpsc::Receiver<Palette>)>,
    /// Track whose palette is currently applied.
    palette_key: Option<String>,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            pending_gg: false,
            last_mpris_key: None,
            last_mpris_playback: PlayerState::Idle,
            palette_rx: None,
            palette_key: None,
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
    loader: &CatalogLoader,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Natural track completion: advance along the queue from the track
        // that just finished. A missing successor leaves the player idle.
        while let Some(EngineEvent::Ended) = audio_player.try_recv_event() {
            if let Some(key) = app.current_track_key() {
                if let Some(next) = app.queue.next_after(&key).cloned() {
                    play_track(app, audio_player, &next, false);
                }
            }
        }

        let info = snapshot_playback(app);

        sync_ambient_palette(app, loader, state, &info);

        // Keep MPRIS in sync even when changes come from auto-advance or
        // media keys rather than our own keybindings.
        let current_key = info.track.as_ref().map(|t| t.key().to_string());
        if current_key != state.last_mpris_key || info.state != state.last_mpris_playback {
            update_mpris(mpris, app);
            state.last_mpris_key = current_key;
            state.last_mpris_playback = info.state;
        }
        mpris.set_position(info.elapsed.as_micros() as i64);

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, mpris)? {
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

fn snapshot_playback(app: &App) -> PlaybackInfo {
    app.playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()))
        .unwrap_or_default()
}

/// Start playback of `track`. A user pick from the catalog rebuilds the
/// queue behind it; queue-driven starts keep the existing order.
fn play_track(app: &mut App, audio_player: &AudioPlayer, track: &Track, creates_new_queue: bool) {
    app.queue.select(track, creates_new_queue);
    if creates_new_queue {
        app.queue_selected = 0;
    }
    audio_player.play(track.clone());
}

fn play_neighbor(app: &mut App, audio_player: &AudioPlayer, forward: bool) {
    let Some(key) = app.current_track_key() else {
        return;
    };
    let neighbor = if forward {
        app.queue.next_after(&key).cloned()
    } else {
        app.queue.previous_before(&key).cloned()
    };
    if let Some(track) = neighbor {
        play_track(app, audio_player, &track, false);
    }
}

/// Keep the ambient palette keyed to the loaded track. Artwork analysis
/// runs on a worker; a result is applied only while its track is still the
/// current one, so slow decodes cannot overwrite a newer palette.
fn sync_ambient_palette(
    app: &mut App,
    loader: &CatalogLoader,
    state: &mut EventLoopState,
    info: &PlaybackInfo,
) {
    let desired = info.track.as_ref().map(|t| t.key().to_string());

    match &desired {
        None => {
            if state.palette_key.is_some() {
                app.palette = Palette::default();
                state.palette_key = None;
                state.palette_rx = None;
            }
        }
        Some(key) => {
            let pending_matches = state
                .palette_rx
                .as_ref()
                .is_some_and(|(k, _)| k == key);
            if state.palette_key.as_ref() != Some(key) && !pending_matches {
                let image = info.track.as_ref().map(|t| {
                    if t.cover.is_empty() { t.art.clone() } else { t.cover.clone() }
                });
                match image.filter(|i| !i.is_empty()) {
                    Some(rel) => {
                        let rx = ambient::spawn_extractor(loader.resolve(&rel));
                        state.palette_rx = Some((key.clone(), rx));
                    }
                    None => {
                        app.palette = Palette::default();
                        state.palette_key = Some(key.clone());
                        state.palette_rx = None;
                    }
                }
            }
        }
    }

    if let Some((key, rx)) = state.palette_rx.take() {
        match rx.try_recv() {
            Ok(palette) => {
                if desired.as_deref() == Some(key.as_str()) {
                    app.palette = palette;
                    state.palette_key = Some(key);
                }
            }
            Err(mpsc::TryRecvError::Empty) => {
                state.palette_rx = Some((key, rx));
            }
            Err(mpsc::TryRecvError::Disconnected) => {}
        }
    }
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
) -> Result<bool, Box<dyn std::error::Error>> {
    let info = snapshot_playback(app);

    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        ControlCmd::Play => match info.state {
            PlayerState::Paused => {
                let _ = audio_player.send(AudioCmd::TogglePause);
                update_mpris(mpris, app);
            }
            PlayerState::Idle => {
                if let Some(track) = app.selected_track().cloned() {
                    play_track(app, audio_player, &track, true);
                    update_mpris(mpris, app);
                }
            }
            PlayerState::Loading | PlayerState::Playing => {}
        },
        ControlCmd::Pause => {
            if info.state == PlayerState::Playing {
                let _ = audio_player.send(AudioCmd::TogglePause);
                update_mpris(mpris, app);
            }
        }
        ControlCmd::PlayPause => {
            match info.state {
                PlayerState::Idle => {
                    if let Some(track) = app.selected_track().cloned() {
                        play_track(app, audio_player, &track, true);
                    }
                }
                PlayerState::Playing | PlayerState::Paused => {
                    let _ = audio_player.send(AudioCmd::TogglePause);
                }
                PlayerState::Loading => {}
            }
            update_mpris(mpris, app);
        }
        ControlCmd::Stop => {
            let _ = audio_player.send(AudioCmd::Stop);
            update_mpris(mpris, app);
        }
        ControlCmd::Next => {
            play_neighbor(app, audio_player, true);
            update_mpris(mpris, app);
        }
        ControlCmd::Prev => {
            play_neighbor(app, audio_player, false);
            update_mpris(mpris, app);
        }
        ControlCmd::SeekBy(offset_micros) => {
            let target =
                info.elapsed.as_secs_f64() + offset_micros as f64 / 1_000_000.0;
            let _ = audio_player.send(AudioCmd::SeekTo(target.max(0.0)));
        }
        ControlCmd::SeekTo(position_micros) => {
            let target = (position_micros.max(0) as f64) / 1_000_000.0;
            let _ = audio_player.send(AudioCmd::SeekTo(target));
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
    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => {
                if app.display_indices().is_empty() {
                    return Ok(false);
                }
                app.exit_filter_mode();
                if let Some(track) = app.selected_track().cloned() {
                    play_track(app, audio_player, &track, true);
                }
            }
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return Ok(true);
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.enter_filter_mode();
        }
        KeyCode::Tab => {
            state.pending_gg = false;
            app.cycle_pane();
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            app.shuffle = !app.shuffle;
            let current = app.current_track_key();
            app.queue.set_shuffle(app.shuffle, current.as_deref());
            app.clamp_queue_cursor();
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            app.looping = !app.looping;
            let _ = audio_player.send(AudioCmd::SetLooping(app.looping));
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            match app.pane {
                Pane::Queue => app.queue_next(),
                _ => app.next(),
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            match app.pane {
                Pane::Queue => app.queue_prev(),
                _ => app.prev(),
            }
        }
        KeyCode::Char('J') => {
            state.pending_gg = false;
            if app.pane == Pane::Queue && app.queue_selected + 1 < app.queue.len() {
                app.queue.reorder(app.queue_selected, app.queue_selected + 1);
                app.queue_selected += 1;
            }
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            if app.pane == Pane::Queue && app.queue_selected > 0 {
                app.queue.reorder(app.queue_selected, app.queue_selected - 1);
                app.queue_selected -= 1;
            }
        }
        KeyCode::Char('x') | KeyCode::Char('d') => {
            state.pending_gg = false;
            if app.pane == Pane::Queue && app.queue_selected < app.queue.len() {
                app.queue.remove(app.queue_selected);
                app.clamp_queue_cursor();
            }
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            match app.pane {
                Pane::Queue => {
                    if let Some(track) = app.queue_selected_track().cloned() {
                        play_track(app, audio_player, &track, false);
                    }
                }
                _ => {
                    if let Some(track) = app.selected_track().cloned() {
                        play_track(app, audio_player, &track, true);
                    }
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
            let micros = (settings.controls.seek_seconds as i64).saturating_mul(1_000_000);
            let _ = control_tx.send(ControlCmd::SeekBy(micros));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            let micros = (settings.controls.seek_seconds as i64).saturating_mul(1_000_000);
            let _ = control_tx.send(ControlCmd::SeekBy(-micros));
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            state.pending_gg = false;
            let info = snapshot_playback(app);
            let _ = audio_player.send(AudioCmd::SetVolume(
                info.volume + settings.controls.volume_step,
            ));
        }
        KeyCode::Char('-') => {
            state.pending_gg = false;
            let info = snapshot_playback(app);
            let _ = audio_player.send(AudioCmd::SetVolume(
                info.volume - settings.controls.volume_step,
            ));
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    Ok(false)
}
