use crate::app::App;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    let info = app
        .playback_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|i| i.clone()));

    let (state, track, length_micros) = match info {
        Some(i) => (i.state, i.track, i.duration.map(|d| d.as_micros() as i64)),
        None => (Default::default(), None, None),
    };

    let id = track.as_ref().and_then(|t| {
        app.queue
            .catalog()
            .iter()
            .position(|c| c.key() == t.key())
            .map(|p| p as u64)
    });

    mpris.set_track_metadata(id, track.as_ref(), length_micros);
    mpris.set_playback(state);
}
