use super::*;

fn t(name: &str) -> Track {
    Track {
        title: name.to_string(),
        artist: "Artist".to_string(),
        album: "Album".to_string(),
        year: None,
        genre: String::new(),
        art: String::new(),
        cover: String::new(),
        url: format!("audio/{name}.mp3"),
        lyric: String::new(),
    }
}

fn keys(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(Track::key).collect()
}

fn sorted_keys(tracks: &[Track]) -> Vec<&str> {
    let mut k = keys(tracks);
    k.sort_unstable();
    k
}

#[test]
fn selecting_from_catalog_rebuilds_queue_with_track_first() {
    let (a, b, c) = (t("a"), t("b"), t("c"));
    let mut q = PlayQueue::new(vec![a.clone(), b.clone(), c.clone()]);

    q.select(&b, true);
    assert_eq!(keys(q.tracks()), vec![b.key(), a.key(), c.key()]);
}

#[test]
fn engine_driven_selection_preserves_queue_order() {
    let (a, b, c) = (t("a"), t("b"), t("c"));
    let mut q = PlayQueue::new(vec![a.clone(), b.clone(), c.clone()]);
    q.select(&b, true);

    q.select(&c, false);
    assert_eq!(keys(q.tracks()), vec![b.key(), a.key(), c.key()]);
}

#[test]
fn next_walks_the_queue_and_wraps_around() {
    let (a, b, c) = (t("a"), t("b"), t("c"));
    let mut q = PlayQueue::new(vec![a.clone(), b.clone(), c.clone()]);

    // Picking B makes the queue [B, A, C]; three nexts wrap back to B.
    q.select(&b, true);
    let first = q.next_after(b.key()).unwrap().clone();
    assert_eq!(first.key(), a.key());
    let second = q.next_after(first.key()).unwrap().clone();
    assert_eq!(second.key(), c.key());
    let third = q.next_after(second.key()).unwrap().clone();
    assert_eq!(third.key(), b.key());
}

#[test]
fn next_then_previous_returns_to_the_original_track() {
    let tracks: Vec<Track> = ["a", "b", "c", "d"].iter().map(|n| t(n)).collect();
    let q = PlayQueue::new(tracks.clone());

    for track in &tracks {
        let next = q.next_after(track.key()).unwrap().clone();
        let back = q.previous_before(next.key()).unwrap();
        assert_eq!(back.key(), track.key());
    }
}

#[test]
fn advancement_is_a_noop_on_empty_and_single_item_queues() {
    let empty = PlayQueue::new(Vec::new());
    assert!(empty.next_after("audio/a.mp3").is_none());
    assert!(empty.previous_before("audio/a.mp3").is_none());

    let single = PlayQueue::new(vec![t("a")]);
    assert!(single.next_after("audio/a.mp3").is_none());
    assert!(single.previous_before("audio/a.mp3").is_none());
}

#[test]
fn advancement_is_a_noop_for_unknown_keys() {
    let q = PlayQueue::new(vec![t("a"), t("b")]);
    assert!(q.next_after("audio/unknown.mp3").is_none());
}

#[test]
fn shuffling_preserves_the_multiset_of_tracks() {
    for n in 0..8 {
        let tracks: Vec<Track> = (0..n).map(|i| t(&format!("s{i}"))).collect();
        let mut q = PlayQueue::new(tracks.clone());
        q.set_shuffle(true, None);
        assert_eq!(sorted_keys(q.tracks()), sorted_keys(&tracks));
    }
}

#[test]
fn initial_shuffle_preserves_the_multiset_of_tracks() {
    let tracks: Vec<Track> = (0..16).map(|i| t(&format!("s{i}"))).collect();
    let q = PlayQueue::shuffled(tracks.clone());
    assert_eq!(sorted_keys(q.tracks()), sorted_keys(&tracks));
    assert_eq!(sorted_keys(q.catalog()), sorted_keys(&tracks));
    // Queue and display order start out identical.
    assert_eq!(keys(q.tracks()), keys(q.catalog()));
}

#[test]
fn disabling_shuffle_restores_saved_order_minus_current_track() {
    let tracks: Vec<Track> = ["a", "b", "c", "d"].iter().map(|n| t(n)).collect();
    let mut q = PlayQueue::new(tracks.clone());

    q.set_shuffle(true, Some("audio/b.mp3"));
    q.set_shuffle(false, Some("audio/b.mp3"));

    assert_eq!(
        keys(q.tracks()),
        vec!["audio/a.mp3", "audio/c.mp3", "audio/d.mp3"]
    );
}

#[test]
fn shuffle_snapshot_is_taken_once_and_consumed_once() {
    let tracks: Vec<Track> = ["a", "b", "c"].iter().map(|n| t(n)).collect();
    let mut q = PlayQueue::new(tracks);

    // Toggling on twice must not overwrite the original snapshot.
    q.set_shuffle(true, None);
    q.set_shuffle(true, None);
    q.set_shuffle(false, None);
    assert_eq!(
        keys(q.tracks()),
        vec!["audio/a.mp3", "audio/b.mp3", "audio/c.mp3"]
    );

    // Snapshot is gone; toggling off again changes nothing.
    q.reorder(0, 2);
    let after_reorder: Vec<String> =
        q.tracks().iter().map(|t| t.key().to_string()).collect();
    q.set_shuffle(false, None);
    assert_eq!(
        q.tracks().iter().map(Track::key).collect::<Vec<_>>(),
        after_reorder.iter().map(String::as_str).collect::<Vec<_>>()
    );
}

#[test]
fn reorder_moves_one_entry_and_preserves_the_rest() {
    let tracks: Vec<Track> = ["a", "b", "c", "d"].iter().map(|n| t(n)).collect();
    let mut q = PlayQueue::new(tracks.clone());

    q.reorder(0, 2);
    assert_eq!(
        keys(q.tracks()),
        vec!["audio/b.mp3", "audio/c.mp3", "audio/a.mp3", "audio/d.mp3"]
    );
    assert_eq!(q.len(), tracks.len());
    assert_eq!(sorted_keys(q.tracks()), sorted_keys(&tracks));

    q.reorder(2, 0);
    assert_eq!(
        keys(q.tracks()),
        vec!["audio/a.mp3", "audio/b.mp3", "audio/c.mp3", "audio/d.mp3"]
    );
}

#[test]
fn remove_deletes_exactly_one_entry() {
    let mut q = PlayQueue::new(vec![t("a"), t("b"), t("c")]);
    q.remove(1);
    assert_eq!(keys(q.tracks()), vec!["audio/a.mp3", "audio/c.mp3"]);
    assert_eq!(q.catalog().len(), 3);
}
