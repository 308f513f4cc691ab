use serde::Deserialize;

/// A playable song record from the catalog document.
///
/// Tracks carry no numeric id, so the audio source path (`url`) acts as
/// the identity key everywhere tracks are compared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub year: Option<u16>,
    /// Comma-separated free text, e.g. "City Pop, Funk".
    #[serde(default)]
    pub genre: String,
    /// Album artwork path, root-relative.
    #[serde(default)]
    pub art: String,
    /// Vinyl-label artwork path, root-relative.
    #[serde(default)]
    pub cover: String,
    /// Audio source path, root-relative. Identity key.
    pub url: String,
    /// Lyric document path, root-relative.
    #[serde(default)]
    pub lyric: String,
}

impl Track {
    /// Identity key: the audio source path.
    pub fn key(&self) -> &str {
        &self.url
    }

    /// "Artist - Title", or just the title when the artist is blank.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }

    /// Case-insensitive substring match over title, artist, album and genre.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.title.to_lowercase().contains(&q)
            || self.artist.to_lowercase().contains(&q)
            || self.album.to_lowercase().contains(&q)
            || self.genre.to_lowercase().contains(&q)
    }
}

/// One timestamped lyric line; `time` is milliseconds from track start.
///
/// A track's lyric document is assumed sorted ascending by `time`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LyricLine {
    pub time: u64,
    pub text: String,
}
