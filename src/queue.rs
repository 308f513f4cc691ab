//! The play queue: decides what plays next, independent of engine mechanics.
//!
//! `PlayQueue` owns the loaded catalog (already in display order) and the
//! ordered queue of upcoming tracks derived from it. All lookups key tracks
//! by their audio path; the catalog loader guarantees keys are unique.

use rand::rng;
use rand::seq::SliceRandom;

use crate::catalog::Track;

pub struct PlayQueue {
    catalog: Vec<Track>,
    queue: Vec<Track>,
    /// Pre-shuffle queue order; populated only while shuffled.
    saved_order: Option<Vec<Track>>,
}

impl PlayQueue {
    /// Build a queue over `catalog`, preserving its order.
    pub fn new(catalog: Vec<Track>) -> Self {
        Self {
            queue: catalog.clone(),
            catalog,
            saved_order: None,
        }
    }

    /// Build a queue over a uniform random shuffle of `catalog`.
    ///
    /// The shuffled order becomes the display order as well, so the queue
    /// and the visible catalog start out identical.
    pub fn shuffled(mut catalog: Vec<Track>) -> Self {
        catalog.shuffle(&mut rng());
        Self::new(catalog)
    }

    pub fn catalog(&self) -> &[Track] {
        &self.catalog
    }

    pub fn tracks(&self) -> &[Track] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.queue.get(index)
    }

    /// Register that `track` is about to play.
    ///
    /// When the user explicitly picked it from the catalog
    /// (`creates_new_queue`), the queue is rebuilt as the chosen track
    /// followed by the rest of the catalog. Engine-driven advancement
    /// passes `false` and leaves the existing order untouched.
    pub fn select(&mut self, track: &Track, creates_new_queue: bool) {
        if !creates_new_queue {
            return;
        }

        let mut next: Vec<Track> = Vec::with_capacity(self.catalog.len());
        next.push(track.clone());
        next.extend(
            self.catalog
                .iter()
                .filter(|t| t.key() != track.key())
                .cloned(),
        );
        self.queue = next;
    }

    /// The queue entry one past the track with `key`, wrapping around.
    ///
    /// `None` when the key is absent or the queue has fewer than two
    /// entries; wraparound on empty or single-item queues is a no-op.
    pub fn next_after(&self, key: &str) -> Option<&Track> {
        self.step_from(key, 1)
    }

    /// The queue entry one before the track with `key`, wrapping around.
    pub fn previous_before(&self, key: &str) -> Option<&Track> {
        self.step_from(key, -1)
    }

    fn step_from(&self, key: &str, delta: isize) -> Option<&Track> {
        if self.queue.len() < 2 {
            return None;
        }
        let pos = self.queue.iter().position(|t| t.key() == key)?;
        let len = self.queue.len() as isize;
        let next = (pos as isize + delta).rem_euclid(len) as usize;
        self.queue.get(next)
    }

    /// Turn shuffle on or off.
    ///
    /// Turning on snapshots the current order once and randomizes the queue
    /// in place. Turning off restores the snapshot minus the currently
    /// playing track (conceptually already played) and consumes it, so
    /// toggling off twice in a row does not re-shuffle.
    pub fn set_shuffle(&mut self, on: bool, current_key: Option<&str>) {
        if on {
            if self.saved_order.is_none() {
                self.saved_order = Some(self.queue.clone());
            }
            self.queue.shuffle(&mut rng());
        } else if let Some(saved) = self.saved_order.take() {
            self.queue = match current_key {
                Some(key) => saved.into_iter().filter(|t| t.key() != key).collect(),
                None => saved,
            };
        }
    }

    /// Move the entry at `from` so it ends up at index `to`.
    ///
    /// Out-of-range indices are a caller contract violation and panic.
    pub fn reorder(&mut self, from: usize, to: usize) {
        let item = self.queue.remove(from);
        self.queue.insert(to, item);
    }

    /// Drop one queue entry. The catalog and whatever is currently playing
    /// are unaffected, even when they coincide with the removed entry.
    pub fn remove(&mut self, index: usize) {
        self.queue.remove(index);
    }
}

#[cfg(test)]
mod tests;
