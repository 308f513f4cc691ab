//! Utilities for creating `rodio` sinks from catalog audio paths.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

/// Failure opening or decoding an audio source.
#[derive(Debug)]
pub(super) enum SinkError {
    Open(std::io::Error),
    Decode(rodio::decoder::DecoderError),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Open(e) => write!(f, "cannot open source: {e}"),
            SinkError::Decode(e) => write!(f, "cannot decode source: {e}"),
        }
    }
}

impl std::error::Error for SinkError {}

/// Create a paused `Sink` for the audio file at `path`, positioned at
/// `start_at`, along with the decoder-reported total duration when known.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<(Sink, Option<Duration>), SinkError> {
    let file = File::open(path).map_err(SinkError::Open)?;
    let source = Decoder::new(BufReader::new(file)).map_err(SinkError::Decode)?;
    let duration = source.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = source.skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}
