use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;

pub fn apply_playback_defaults(
    app: &mut App,
    audio_player: &AudioPlayer,
    settings: &config::Settings,
) {
    app.shuffle = settings.playback.shuffle;
    app.looping = settings.playback.looping;

    if app.shuffle {
        // Nothing is playing yet, so there is no current track to protect.
        app.queue.set_shuffle(true, None);
    }
    let _ = audio_player.send(AudioCmd::SetLooping(app.looping));
}
