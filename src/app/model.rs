//! Application model types: `App` and `Pane`.

use crate::ambient::Palette;
use crate::audio::{LyricsHandle, PlaybackHandle};
use crate::catalog::Track;
use crate::queue::PlayQueue;

/// Which pane currently has keyboard focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Catalog,
    Queue,
    Lyrics,
}

impl Pane {
    pub fn next(self) -> Pane {
        match self {
            Pane::Catalog => Pane::Queue,
            Pane::Queue => Pane::Lyrics,
            Pane::Lyrics => Pane::Catalog,
        }
    }
}

/// The main application model.
pub struct App {
    pub queue: PlayQueue,
    /// Catalog cursor, an index into the catalog order.
    pub selected: usize,
    /// Queue cursor, an index into the queue order.
    pub queue_selected: usize,
    pub pane: Pane,

    pub shuffle: bool,
    pub looping: bool,

    pub filter_mode: bool,
    pub filter_query: String,

    pub playback_handle: Option<PlaybackHandle>,
    pub lyrics_handle: Option<LyricsHandle>,
    pub palette: Palette,
}

impl App {
    pub fn new(queue: PlayQueue) -> Self {
        Self {
            queue,
            selected: 0,
            queue_selected: 0,
            pane: Pane::default(),
            shuffle: false,
            looping: false,
            filter_mode: false,
            filter_query: String::new(),
            playback_handle: None,
            lyrics_handle: None,
            palette: Palette::default(),
        }
    }

    /// Attach the shared playback state published by the audio thread.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Attach the shared lyric document for the loaded track.
    pub fn set_lyrics_handle(&mut self, h: LyricsHandle) {
        self.lyrics_handle = Some(h);
    }

    pub fn cycle_pane(&mut self) {
        self.pane = self.pane.next();
        self.clamp_queue_cursor();
    }

    pub fn has_tracks(&self) -> bool {
        !self.queue.catalog().is_empty()
    }

    /// Identity key of the track currently loaded in the audio thread.
    pub fn current_track_key(&self) -> Option<String> {
        let handle = self.playback_handle.as_ref()?;
        let info = handle.lock().ok()?;
        info.track.as_ref().map(|t| t.key().to_string())
    }

    /// Catalog indices visible under the active filter, in catalog order.
    pub fn display_indices(&self) -> Vec<usize> {
        let catalog = self.queue.catalog();
        let query = self.filter_query.trim();
        if query.is_empty() {
            (0..catalog.len()).collect()
        } else {
            (0..catalog.len())
                .filter(|&i| catalog[i].matches_query(query))
                .collect()
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.queue.catalog().get(self.selected)
    }

    pub fn queue_selected_track(&self) -> Option<&Track> {
        self.queue.get(self.queue_selected)
    }

    /// Move the catalog cursor to the next visible track, wrapping around.
    pub fn next(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(p) => display[(p + 1) % display.len()],
            None => display[0],
        };
    }

    /// Move the catalog cursor to the previous visible track, wrapping around.
    pub fn prev(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        self.selected = match display.iter().position(|&i| i == self.selected) {
            Some(0) | None => display[display.len() - 1],
            Some(p) => display[p - 1],
        };
    }

    /// Jump the focused cursor to the first entry.
    pub fn select_first(&mut self) {
        match self.pane {
            Pane::Queue => self.queue_selected = 0,
            _ => {
                if let Some(&first) = self.display_indices().first() {
                    self.selected = first;
                }
            }
        }
    }

    /// Jump the focused cursor to the last entry.
    pub fn select_last(&mut self) {
        match self.pane {
            Pane::Queue => {
                self.queue_selected = self.queue.len().saturating_sub(1);
            }
            _ => {
                if let Some(&last) = self.display_indices().last() {
                    self.selected = last;
                }
            }
        }
    }

    pub fn queue_next(&mut self) {
        let len = self.queue.len();
        if len > 0 {
            self.queue_selected = (self.queue_selected + 1) % len;
        }
    }

    pub fn queue_prev(&mut self) {
        let len = self.queue.len();
        if len > 0 {
            self.queue_selected = (self.queue_selected + len - 1) % len;
        }
    }

    /// Keep the queue cursor inside the queue after removals.
    pub fn clamp_queue_cursor(&mut self) {
        let len = self.queue.len();
        if len == 0 {
            self.queue_selected = 0;
        } else if self.queue_selected >= len {
            self.queue_selected = len - 1;
        }
    }

    /// Enter filter mode; keystrokes now edit the query.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.pane = Pane::Catalog;
        self.ensure_selected_visible();
    }

    /// Exit filter mode keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter and restore selection visibility.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Move the selection to the first visible track when the filter
    /// narrowed it out of view.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }
        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }
}
