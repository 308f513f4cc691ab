use super::*;
use crate::catalog::Track;
use crate::queue::PlayQueue;

fn track(title: &str, artist: &str, genre: &str, url: &str) -> Track {
    Track {
        title: title.to_string(),
        artist: artist.to_string(),
        album: "Album".to_string(),
        year: None,
        genre: genre.to_string(),
        art: String::new(),
        cover: String::new(),
        url: url.to_string(),
        lyric: String::new(),
    }
}

fn sample_app() -> App {
    let catalog = vec![
        track("Plastic Love", "Mariya Takeuchi", "City Pop", "a.mp3"),
        track("Stay With Me", "Miki Matsubara", "City Pop", "b.mp3"),
        track("Blue Monday", "New Order", "Synth Pop", "c.mp3"),
    ];
    App::new(PlayQueue::new(catalog))
}

#[test]
fn display_indices_without_filter_show_everything_in_order() {
    let app = sample_app();
    assert_eq!(app.display_indices(), vec![0, 1, 2]);
}

#[test]
fn filter_narrows_by_substring_over_track_fields() {
    let mut app = sample_app();
    app.filter_query = "city".to_string();
    assert_eq!(app.display_indices(), vec![0, 1]);

    app.filter_query = "new order".to_string();
    assert_eq!(app.display_indices(), vec![2]);

    app.filter_query = "zzz".to_string();
    assert!(app.display_indices().is_empty());
}

#[test]
fn cursor_wraps_in_both_directions() {
    let mut app = sample_app();
    assert_eq!(app.selected, 0);

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected, 1);
}

#[test]
fn cursor_moves_within_the_filtered_view_only() {
    let mut app = sample_app();
    app.filter_query = "city".to_string();

    app.next();
    assert_eq!(app.selected, 1);
    app.next();
    assert_eq!(app.selected, 0);
}

#[test]
fn narrowing_filter_snaps_selection_to_first_visible() {
    let mut app = sample_app();
    app.selected = 2;

    app.enter_filter_mode();
    for c in "city".chars() {
        app.push_filter_char(c);
    }
    assert_eq!(app.selected, 0);

    app.clear_filter();
    assert!(app.filter_query.is_empty());
    assert!(!app.filter_mode);
}

#[test]
fn pane_cycle_visits_all_three_panes() {
    let mut app = sample_app();
    assert_eq!(app.pane, Pane::Catalog);
    app.cycle_pane();
    assert_eq!(app.pane, Pane::Queue);
    app.cycle_pane();
    assert_eq!(app.pane, Pane::Lyrics);
    app.cycle_pane();
    assert_eq!(app.pane, Pane::Catalog);
}

#[test]
fn queue_cursor_wraps_and_clamps_after_removal() {
    let mut app = sample_app();
    app.pane = Pane::Queue;

    app.queue_prev();
    assert_eq!(app.queue_selected, 2);
    app.queue_next();
    assert_eq!(app.queue_selected, 0);

    app.queue_selected = 2;
    app.queue.remove(2);
    app.clamp_queue_cursor();
    assert_eq!(app.queue_selected, 1);
}

#[test]
fn first_and_last_jumps_respect_the_focused_pane() {
    let mut app = sample_app();
    app.select_last();
    assert_eq!(app.selected, 2);
    app.select_first();
    assert_eq!(app.selected, 0);

    app.pane = Pane::Queue;
    app.select_last();
    assert_eq!(app.queue_selected, 2);
    app.select_first();
    assert_eq!(app.queue_selected, 0);
}

#[test]
fn current_track_key_requires_a_playback_handle() {
    let app = sample_app();
    assert_eq!(app.current_track_key(), None);
}
