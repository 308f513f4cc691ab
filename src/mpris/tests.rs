use super::*;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        title: "Plastic Love".to_string(),
        artist: "Mariya Takeuchi".to_string(),
        album: "Variety".to_string(),
        year: Some(1984),
        genre: "City Pop".to_string(),
        art: "art/variety.jpg".to_string(),
        cover: "cover/plastic-love.jpg".to_string(),
        url: "audio/plastic-love.mp3".to_string(),
        lyric: "lyrics/plastic-love.json".to_string(),
    }
}

fn make_handle() -> (MprisHandle, Arc<Mutex<SharedState>>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, _notify_rx) = mpsc::channel::<()>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
        loader: CatalogLoader::new("/srv/music", "detail.json"),
    };
    (handle, state)
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state) = make_handle();

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track), Some(1_234_567));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Plastic Love"));
        assert_eq!(s.artist, vec!["Mariya Takeuchi".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Variety"));
        assert_eq!(
            s.url.as_deref(),
            Some("file:///srv/music/audio/plastic-love.mp3")
        );
        assert_eq!(
            s.art_url.as_deref(),
            Some("file:///srv/music/cover/plastic-love.jpg")
        );
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.album, None);
        assert_eq!(s.url, None);
        assert_eq!(s.art_url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn art_url_falls_back_to_album_art() {
    let (handle, state) = make_handle();

    let mut track = make_track();
    track.cover = String::new();
    handle.set_track_metadata(Some(1), Some(&track), None);

    let s = state.lock().unwrap();
    assert_eq!(
        s.art_url.as_deref(),
        Some("file:///srv/music/art/variety.jpg")
    );
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    for (playback, expected) in [
        (PlayerState::Idle, "Stopped"),
        (PlayerState::Loading, "Paused"),
        (PlayerState::Playing, "Playing"),
        (PlayerState::Paused, "Paused"),
    ] {
        state.lock().unwrap().playback = playback;
        assert_eq!(iface.playback_status(), expected);
    }
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    {
        let mut s = state.lock().unwrap();
        s.title = Some("Title".to_string());
        s.artist = vec!["Artist".to_string()];
        s.album = Some("Album".to_string());
        s.url = Some("file:///srv/music/audio/test.mp3".to_string());
        s.art_url = Some("file:///srv/music/art/test.jpg".to_string());
        s.length_micros = Some(42);
        s.track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/1")
            .ok()
            .map(OwnedObjectPath::from);
    }

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "xesam:url",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_between_tracks() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };
    assert!(iface.metadata().is_empty());
}

#[test]
fn set_position_jumps_only_for_the_current_track_id() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    state.lock().unwrap().track_id = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/3")
        .ok()
        .map(OwnedObjectPath::from);

    let stale = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/2").unwrap();
    iface.jump_to_position(stale, 5_000_000);
    assert!(rx.try_recv().is_err());

    let current = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/3").unwrap();
    iface.jump_to_position(current, 5_000_000);
    match rx.try_recv() {
        Ok(ControlCmd::SeekTo(micros)) => assert_eq!(micros, 5_000_000),
        other => panic!("unexpected: {other:?}"),
    }
}
