use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::model::{LyricLine, Track};

/// Loads the track catalog and per-track lyric documents from a library root.
///
/// Constructed once at startup and handed to consumers by reference or
/// clone; there is deliberately no process-wide shared instance.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    root: PathBuf,
    catalog_file: String,
}

impl CatalogLoader {
    pub fn new(root: impl Into<PathBuf>, catalog_file: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            catalog_file: catalog_file.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a root-relative asset path from a catalog record.
    pub fn resolve(&self, rel: &str) -> PathBuf {
        self.root.join(rel.trim_start_matches('/'))
    }

    /// Read the catalog document.
    ///
    /// Any I/O or parse failure logs and yields an empty list; callers
    /// treat an empty catalog as a valid "no data" state rather than
    /// distinguishing the cause.
    pub fn load_tracks(&self) -> Vec<Track> {
        let path = self.root.join(&self.catalog_file);
        let tracks: Vec<Track> = match File::open(&path) {
            Ok(f) => match serde_json::from_reader(BufReader::new(f)) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("rondo: failed to parse catalog {}: {e}", path.display());
                    return Vec::new();
                }
            },
            Err(e) => {
                eprintln!("rondo: failed to open catalog {}: {e}", path.display());
                return Vec::new();
            }
        };

        dedupe_by_key(tracks)
    }

    /// Read a track's lyric document; failures degrade to no lyrics.
    pub fn load_lyrics(&self, track: &Track) -> Vec<LyricLine> {
        if track.lyric.trim().is_empty() {
            return Vec::new();
        }

        let path = self.resolve(&track.lyric);
        match File::open(&path) {
            Ok(f) => match serde_json::from_reader(BufReader::new(f)) {
                Ok(lines) => lines,
                Err(e) => {
                    eprintln!("rondo: failed to parse lyrics {}: {e}", path.display());
                    Vec::new()
                }
            },
            Err(e) => {
                eprintln!("rondo: failed to open lyrics {}: {e}", path.display());
                Vec::new()
            }
        }
    }
}

// Queue lookups key tracks by audio path, so duplicate keys would make
// position searches ambiguous. First occurrence wins.
fn dedupe_by_key(tracks: Vec<Track>) -> Vec<Track> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<Track> = Vec::with_capacity(tracks.len());
    for track in tracks {
        if seen.insert(track.url.clone()) {
            out.push(track);
        } else {
            eprintln!("rondo: dropping duplicate catalog entry {}", track.url);
        }
    }
    out
}
