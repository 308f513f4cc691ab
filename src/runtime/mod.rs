use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::CatalogLoader;
use crate::mpris::ControlCmd;
use crate::queue::PlayQueue;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let root = env::args()
        .nth(1)
        .unwrap_or_else(|| settings.library.root.clone());

    let loader = CatalogLoader::new(root, settings.library.catalog_file.clone());
    let tracks = loader.load_tracks();
    if tracks.is_empty() {
        eprintln!(
            "rondo: no tracks found under {} (catalog: {})",
            loader.root().display(),
            settings.library.catalog_file
        );
    }

    // The catalog is dealt in a fresh random order every launch; that order
    // doubles as the initial queue.
    let queue = PlayQueue::shuffled(tracks);
    let audio_player = AudioPlayer::new(loader.clone(), settings.audio.volume);

    let mut app = App::new(queue);
    app.set_playback_handle(audio_player.playback_handle());
    app.set_lyrics_handle(audio_player.lyrics_handle());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone(), loader.clone());

    mpris_sync::update_mpris(&mpris, &app);

    startup::apply_playback_defaults(&mut app, &audio_player, &settings);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = {
        let mut state = event_loop::EventLoopState::new();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &loader,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
